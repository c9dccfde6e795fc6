use dioxus::logger::tracing::{error, warn};
use futures::future::join;

use super::api::QuizApi;
use super::pixels::{ConfigStore, DocumentSink, PixelInjector};
use super::server::{AppError, PixelConfig, PublicQuiz, QuizLoadError};

// What the page renders. Only quiz retrieval errors ever land here; the
// tracking and pixel paths are invisible to it.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
  Loading,
  Ready(PublicQuiz),
  Failed(QuizLoadError),
}

#[allow(async_fn_in_trait)]
pub trait QuizBackend {
  async fn public_quiz(&self, quiz_id: &str) -> Result<PublicQuiz, QuizLoadError>;
  async fn record_view(&self, quiz_id: &str) -> Result<(), AppError>;
  async fn pixel_config(&self, quiz_id: &str) -> Option<PixelConfig>;
}

impl QuizBackend for QuizApi {
  async fn public_quiz(&self, quiz_id: &str) -> Result<PublicQuiz, QuizLoadError> {
    QuizApi::public_quiz(self, quiz_id).await
  }

  async fn record_view(&self, quiz_id: &str) -> Result<(), AppError> {
    QuizApi::record_view(self, quiz_id).await
  }

  async fn pixel_config(&self, quiz_id: &str) -> Option<PixelConfig> {
    QuizApi::pixel_config(self, quiz_id).await
  }
}

// Resolves the page state. No tracking and no pixel work happens here; both
// start only once a published quiz came back.
pub async fn load_quiz<B: QuizBackend>(backend: &B, quiz_id: &str) -> QuizState {
  match backend.public_quiz(quiz_id).await {
    Ok(quiz) => QuizState::Ready(quiz),
    Err(kind) => {
      error!("quiz {} failed to load: {}", quiz_id, kind);
      QuizState::Failed(kind)
    }
  }
}

// Post-load side effects: the analytics view event and the pixel flow, run
// concurrently. Both are best-effort; failures end up in the log, never in
// the page state.
pub async fn after_load<B, D, S>(backend: &B, injector: &mut PixelInjector<D, S>, quiz_id: &str)
where
  B: QuizBackend,
  D: DocumentSink,
  S: ConfigStore,
{
  let view = async {
    if let Err(e) = backend.record_view(quiz_id).await {
      warn!("view tracking for quiz {} failed: {}", quiz_id, e);
    }
  };

  let pixels = async {
    let config = match injector.cached(quiz_id) {
      Some(cached) => Some(cached),
      None => backend.pixel_config(quiz_id).await,
    };
    if let Some(config) = config {
      injector.apply(&config).await;
    }
  };

  join(view, pixels).await;
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::collections::HashMap;
  use std::time::Duration;

  use futures::executor::block_on;

  use super::{after_load, load_quiz, QuizBackend, QuizState};
  use crate::utils::pixels::{ConfigStore, DocumentSink, PixelInjector};
  use crate::utils::server::{AppError, CachedPixels, PixelConfig, Pixel, PublicQuiz, QuizLoadError};

  struct StubBackend {
    quiz: Result<PublicQuiz, QuizLoadError>,
    view_fails: bool,
    views: RefCell<Vec<String>>,
    pixels: Option<PixelConfig>,
    pixel_fetches: RefCell<usize>,
  }

  impl StubBackend {
    fn new(quiz: Result<PublicQuiz, QuizLoadError>) -> Self {
      Self { quiz, view_fails: false, views: RefCell::new(vec![]), pixels: None, pixel_fetches: RefCell::new(0) }
    }
  }

  impl QuizBackend for StubBackend {
    async fn public_quiz(&self, _quiz_id: &str) -> Result<PublicQuiz, QuizLoadError> {
      self.quiz.clone()
    }

    async fn record_view(&self, quiz_id: &str) -> Result<(), AppError> {
      self.views.borrow_mut().push(quiz_id.to_string());
      if self.view_fails {
        return Err(AppError::RequestFailed("boom".to_string()));
      }
      Ok(())
    }

    async fn pixel_config(&self, _quiz_id: &str) -> Option<PixelConfig> {
      *self.pixel_fetches.borrow_mut() += 1;
      self.pixels.clone()
    }
  }

  #[derive(Default)]
  struct VecSink(Vec<String>);

  impl DocumentSink for VecSink {
    fn append_script(&mut self, source: &str) -> Result<(), AppError> {
      self.0.push(source.to_string());
      Ok(())
    }
  }

  #[derive(Default)]
  struct MapStore(RefCell<HashMap<String, CachedPixels>>);

  impl ConfigStore for MapStore {
    fn load(&self, quiz_id: &str) -> Result<Option<CachedPixels>, AppError> {
      Ok(self.0.borrow().get(quiz_id).cloned())
    }

    fn save(&self, entry: &CachedPixels) -> Result<(), AppError> {
      self.0.borrow_mut().insert(entry.quiz_id.clone(), entry.clone());
      Ok(())
    }
  }

  fn published(id: &str) -> PublicQuiz {
    PublicQuiz {
      id: id.to_string(),
      is_published: true,
      title: "Quiz".to_string(),
      description: None,
      questions: vec![],
    }
  }

  fn fb_config(quiz_id: &str) -> PixelConfig {
    PixelConfig {
      quiz_id: quiz_id.to_string(),
      pixels: vec![Pixel {
        name: "FB".to_string(),
        pixel_type: "facebook".to_string(),
        value: "123".to_string(),
        mode: "immediate".to_string(),
      }],
      custom_scripts: vec![],
      utm_code: None,
      pixel_delay: false,
    }
  }

  fn injector() -> PixelInjector<VecSink, MapStore> {
    PixelInjector::new(VecSink::default(), MapStore::default(), Duration::ZERO)
  }

  #[test]
  fn load_does_not_track_views() {
    let backend = StubBackend::new(Err(QuizLoadError::NotFound));
    let state = block_on(load_quiz(&backend, "abc123"));
    assert_eq!(state, QuizState::Failed(QuizLoadError::NotFound));
    assert!(backend.views.borrow().is_empty());
    assert_eq!(*backend.pixel_fetches.borrow(), 0);

    let backend = StubBackend::new(Ok(published("abc123")));
    let state = block_on(load_quiz(&backend, "abc123"));
    assert!(matches!(state, QuizState::Ready(_)));
    assert!(backend.views.borrow().is_empty());
  }

  #[test]
  fn view_is_tracked_once_even_without_pixels() {
    let backend = StubBackend::new(Ok(published("abc123")));
    let mut inj = injector();
    block_on(after_load(&backend, &mut inj, "abc123"));

    assert_eq!(backend.views.borrow().as_slice(), ["abc123".to_string()]);
    let (sink, _) = inj.into_parts();
    assert!(sink.0.is_empty());
  }

  #[test]
  fn pixel_flow_survives_a_failing_view_event() {
    let mut backend = StubBackend::new(Ok(published("abc123")));
    backend.view_fails = true;
    backend.pixels = Some(fb_config("abc123"));
    let mut inj = injector();
    block_on(after_load(&backend, &mut inj, "abc123"));

    assert_eq!(backend.views.borrow().len(), 1);
    let (sink, _) = inj.into_parts();
    assert_eq!(sink.0.len(), 1);
  }

  #[test]
  fn cache_hit_skips_the_pixel_fetch() {
    let mut backend = StubBackend::new(Ok(published("abc123")));
    backend.pixels = Some(fb_config("abc123"));
    let mut inj = injector();

    block_on(after_load(&backend, &mut inj, "abc123"));
    assert_eq!(*backend.pixel_fetches.borrow(), 1);

    // same session, fresh page life: the store answers, the network stays idle
    let (_, store) = inj.into_parts();
    let mut inj = PixelInjector::new(VecSink::default(), store, Duration::ZERO);
    block_on(after_load(&backend, &mut inj, "abc123"));

    assert_eq!(*backend.pixel_fetches.borrow(), 1);
    let (sink, _) = inj.into_parts();
    assert_eq!(sink.0.len(), 1);
  }
}
