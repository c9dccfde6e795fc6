use dioxus::prelude::*;

use crate::utils::server::QuizLoadError;

#[component]
pub fn LoadingIndicator() -> Element {
  rsx! {
    div {
      class: "quiz-loading",
      div { class: "spinner" }
      p { "Loading quiz..." }
    }
  }
}

#[component]
pub fn ErrorNotice(kind: QuizLoadError) -> Element {
  let (title, detail) = match &kind {
    QuizLoadError::NotFound => ("Quiz not found", "The quiz you are looking for does not exist or has been removed."),
    QuizLoadError::Unpublished => ("Quiz unavailable", "This quiz has not been published by its owner yet."),
    QuizLoadError::LoadFailed(_) => ("Something went wrong", "We could not load this quiz. Please try again in a moment."),
  };

  rsx! {
    div {
      class: "quiz-error",
      h1 { "{title}" }
      p { "{detail}" }
    }
  }
}
