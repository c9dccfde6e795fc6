use dioxus::prelude::*;

use crate::utils::server::PublicQuiz;

// Presentational rendering of a published quiz. Answer handling lives in the
// embedded funnel flow, not here.
#[component]
pub fn QuizContent(quiz: PublicQuiz) -> Element {
  let description = quiz.description.clone().unwrap_or_default();

  rsx! {
    div {
      class: "quiz-content",
      header {
        class: "quiz-header",
        h1 { "{quiz.title}" }
        if !description.is_empty() {
          p { class: "quiz-description", "{description}" }
        }
      }
      for question in quiz.questions.iter() {
        section {
          class: "quiz-question",
          key: "{question.id}",
          h2 { "{question.text}" }
          div {
            class: "quiz-options",
            for option in question.options.iter() {
              button { class: "quiz-option", "{option}" }
            }
          }
        }
      }
    }
  }
}
