use dioxus::logger::tracing::{info, warn};
use uuid::Uuid;

use super::server::{AppError, PixelConfig, PublicQuiz, QuizLoadError, ViewEventRequest};

pub const API_BASE_URL: &str = env!("API_BASE_URL");

// Client for the public quiz endpoints
#[derive(Clone)]
pub struct QuizApi {
  client: reqwest::Client,
  base_url: String,
}

impl QuizApi {
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self { client, base_url: base_url.to_string() }
  }

  // One request, no retries. 404 and unpublished quizzes are regular
  // outcomes here, not transport failures.
  pub async fn public_quiz(&self, quiz_id: &str) -> Result<PublicQuiz, QuizLoadError> {
    let url = format!("{}/api/quiz/{}/public", self.base_url, quiz_id);
    let resp = self.client.get(&url).send().await.map_err(|e| QuizLoadError::LoadFailed(e.to_string()))?;
    let status = resp.status().as_u16();
    let body = resp.text().await.map_err(|e| QuizLoadError::LoadFailed(e.to_string()))?;
    quiz_from_response(status, &body)
  }

  pub async fn record_view(&self, quiz_id: &str) -> Result<(), AppError> {
    let url = format!("{}/api/analytics/{}/view", self.base_url, quiz_id);
    let payload = ViewEventRequest { visitor_id: Uuid::new_v4().to_string() };
    let resp = self.client.post(&url).json(&payload).send().await.map_err(|e| AppError::RequestFailed(e.to_string()))?;
    if !resp.status().is_success() {
      return Err(AppError::RequestFailed(format!("view event rejected with status {}", resp.status().as_u16())));
    }
    Ok(())
  }

  // A quiz without pixels is the common case, so every failure mode on this
  // path collapses to "no configuration".
  pub async fn pixel_config(&self, quiz_id: &str) -> Option<PixelConfig> {
    let url = format!("{}/api/quiz/{}/pixels/public", self.base_url, quiz_id);
    let resp = match self.client.get(&url).send().await {
      Ok(r) => r,
      Err(e) => {
        warn!("pixel configuration request for quiz {} failed: {}", quiz_id, e);
        return None;
      }
    };
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    pixel_config_from_response(quiz_id, status, &body)
  }
}

pub fn quiz_from_response(status: u16, body: &str) -> Result<PublicQuiz, QuizLoadError> {
  if status == 404 {
    return Err(QuizLoadError::NotFound);
  }
  if !(200..300).contains(&status) {
    return Err(QuizLoadError::LoadFailed(format!("unexpected status {}", status)));
  }
  let quiz = serde_json::from_str::<PublicQuiz>(body).map_err(|e| QuizLoadError::LoadFailed(e.to_string()))?;
  if !quiz.is_published {
    return Err(QuizLoadError::Unpublished);
  }
  Ok(quiz)
}

pub fn pixel_config_from_response(quiz_id: &str, status: u16, body: &str) -> Option<PixelConfig> {
  if !(200..300).contains(&status) {
    info!("no pixel configuration for quiz {} (status {})", quiz_id, status);
    return None;
  }
  match serde_json::from_str::<PixelConfig>(body) {
    Ok(config) => {
      if config.pixels.is_empty() {
        info!("pixel configuration for quiz {} has no pixels", quiz_id);
        return None;
      }
      Some(config)
    }
    Err(e) => {
      warn!("failed to deserialize pixel configuration for quiz {}: {}", quiz_id, e);
      None
    }
  }
}
