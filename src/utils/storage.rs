use dioxus::document;

use super::pixels::{ConfigStore, DocumentSink};
use super::server::{AppError, CachedPixels};

fn storage_key(quiz_id: &str) -> String {
  format!("pixels:{}", quiz_id)
}

fn session_storage() -> Result<web_sys::Storage, AppError> {
  let window = web_sys::window().ok_or_else(|| AppError::StorageError("no window in this context".to_string()))?;
  window
    .session_storage()
    .map_err(|e| AppError::StorageError(format!("{:?}", e)))?
    .ok_or_else(|| AppError::StorageError("session storage is unavailable".to_string()))
}

// Pixel cache backed by the browser's session storage. Duplicate tabs for the
// same quiz race on the write, last one wins.
pub struct BrowserStore;

impl ConfigStore for BrowserStore {
  fn load(&self, quiz_id: &str) -> Result<Option<CachedPixels>, AppError> {
    let storage = session_storage()?;
    let raw = storage.get_item(&storage_key(quiz_id)).map_err(|e| AppError::StorageError(format!("{:?}", e)))?;
    match raw {
      Some(raw) => {
        let entry = serde_json::from_str(&raw).map_err(|e| AppError::DeserializeError(e.to_string()))?;
        Ok(Some(entry))
      }
      None => Ok(None),
    }
  }

  fn save(&self, entry: &CachedPixels) -> Result<(), AppError> {
    let storage = session_storage()?;
    let raw = serde_json::to_string(entry).map_err(|e| AppError::SerializeError(e.to_string()))?;
    storage
      .set_item(&storage_key(&entry.quiz_id), &raw)
      .map_err(|e| AppError::StorageError(format!("{:?}", e)))
  }
}

// Executes snippets by appending script elements to the live document head,
// so provider tags boot exactly as if the page had shipped them.
pub struct DomSink;

impl DocumentSink for DomSink {
  fn append_script(&mut self, source: &str) -> Result<(), AppError> {
    // JSON-encode the snippet so it lands in the eval shim as a string literal
    let encoded = serde_json::to_string(source).map_err(|e| AppError::SerializeError(e.to_string()))?;
    document::eval(&format!(
      r#"
      var scriptElem = document.createElement('script');
      scriptElem.text = {};
      document.head.appendChild(scriptElem);
      "#,
      encoded
    ));
    Ok(())
  }
}
