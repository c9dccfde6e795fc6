use std::time::Duration;

use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::{
  components::{content::QuizContent, status::{ErrorNotice, LoadingIndicator}},
  utils::{
    api::{QuizApi, API_BASE_URL},
    flow::{after_load, load_quiz, QuizState},
    pixels::{PixelInjector, PIXEL_DELAY_MS},
    storage::{BrowserStore, DomSink},
  },
};

enum Action {
  Load(String),
}

// Public quiz page. Mounting it resolves the quiz exactly once; the view
// event and the pixel flow start only after a published quiz came back, and
// never touch the page state.
#[component]
pub fn QuizView(id: String) -> Element {
  static CSS: Asset = asset!("/assets/quiz.css");

  let mut state: Signal<QuizState> = use_signal(|| QuizState::Loading);

  let loader = use_coroutine(move |mut rx| async move {
    while let Some(action) = rx.next().await {
      match action {
        Action::Load(quiz_id) => {
          let api = QuizApi::new(reqwest::Client::new(), API_BASE_URL);
          let next = load_quiz(&api, &quiz_id).await;
          let ready = matches!(next, QuizState::Ready(_));
          state.set(next);

          if ready {
            spawn(async move {
              let mut injector =
                PixelInjector::new(DomSink, BrowserStore, Duration::from_millis(PIXEL_DELAY_MS));
              after_load(&api, &mut injector, &quiz_id).await;
            });
          }
        }
      }
    }
  });

  use_hook(|| loader.send(Action::Load(id.clone())));

  rsx! {
    document::Stylesheet { href: CSS },
    div {
      class: "quiz-page",
      {match state() {
        QuizState::Loading => rsx! { LoadingIndicator {} },
        QuizState::Failed(kind) => rsx! { ErrorNotice { kind } },
        QuizState::Ready(quiz) => rsx! { QuizContent { quiz } },
      }}
    }
  }
}
