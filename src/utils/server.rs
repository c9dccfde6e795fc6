use std::fmt;
use serde::{Deserialize, Serialize};

/* Server Requests */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEventRequest {
  pub visitor_id: String,
}

/* Server Responses */
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
  pub id: String,
  pub is_published: bool,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub id: String,
  pub text: String,
  #[serde(default)]
  pub options: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PixelConfig {
  pub quiz_id: String,
  #[serde(default)]
  pub pixels: Vec<Pixel>,
  #[serde(default)]
  pub custom_scripts: Vec<CustomScript>,
  #[serde(default)]
  pub utm_code: Option<String>,
  #[serde(default)]
  pub pixel_delay: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pixel {
  pub name: String,
  #[serde(rename = "type")]
  pub pixel_type: String,
  pub value: String,
  #[serde(default)]
  pub mode: String,
}

impl Pixel {
  pub fn is_deferred(&self) -> bool {
    self.mode.eq_ignore_ascii_case("deferred")
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomScript {
  #[serde(default)]
  pub name: String,
  pub code: String,
}

// Client-side projection of a pixel configuration, kept in session storage so
// repeat views of the same quiz skip the configuration fetch. The backend
// stays the source of truth.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedPixels {
  pub quiz_id: String,
  pub pixels: Vec<Pixel>,
  pub custom_scripts: Vec<CustomScript>,
  pub utm_code: Option<String>,
  pub cached_at: f64,
}

impl From<CachedPixels> for PixelConfig {
  fn from(entry: CachedPixels) -> Self {
    PixelConfig {
      quiz_id: entry.quiz_id,
      pixels: entry.pixels,
      custom_scripts: entry.custom_scripts,
      utm_code: entry.utm_code,
      // the delay split only matters on the first paint of a view; cached
      // replays inject everything up front
      pixel_delay: false,
    }
  }
}

// Quiz retrieval errors, the only ones surfaced to the page
#[derive(Debug, Clone, PartialEq)]
pub enum QuizLoadError {
  NotFound,
  Unpublished,
  LoadFailed(String),
}

impl std::error::Error for QuizLoadError {}

impl fmt::Display for QuizLoadError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QuizLoadError::NotFound => write!(f, "Quiz not found"),
      QuizLoadError::Unpublished => write!(f, "Quiz is not published"),
      QuizLoadError::LoadFailed(msg) => write!(f, "Quiz load failed: {}", msg),
    }
  }
}

// App Errors
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
  RequestFailed(String),
  SerializeError(String),
  DeserializeError(String),
  StorageError(String),
  SnippetError(String),
  EvalError(String),
}

impl std::error::Error for AppError {}

impl fmt::Display for AppError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AppError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
      AppError::SerializeError(msg) => write!(f, "Serialize error: {}", msg),
      AppError::DeserializeError(msg) => write!(f, "Deserialize error: {}", msg),
      AppError::StorageError(msg) => write!(f, "Storage error: {}", msg),
      AppError::SnippetError(msg) => write!(f, "Snippet error: {}", msg),
      AppError::EvalError(msg) => write!(f, "Eval error: {}", msg),
    }
  }
}
