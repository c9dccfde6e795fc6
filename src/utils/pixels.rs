use std::collections::HashSet;
use std::time::Duration;

use dioxus::logger::tracing::{info, warn};

use super::server::{AppError, CachedPixels, Pixel, PixelConfig};

// Delay applied to deferred-mode pixels on the live page. Critical pixels
// always go in synchronously; ad-network tags marked deferred wait this long
// so they don't compete with the first paint.
pub const PIXEL_DELAY_MS: u64 = 4_000;

// Marketing tag bootstraps, verbatim from the providers except for the id slot.
const FACEBOOK_TAG: &str = r#"!function(f,b,e,v,n,t,s){if(f.fbq)return;n=f.fbq=function(){n.callMethod?n.callMethod.apply(n,arguments):n.queue.push(arguments)};if(!f._fbq)f._fbq=n;n.push=n;n.loaded=!0;n.version='2.0';n.queue=[];t=b.createElement(e);t.async=!0;t.src=v;s=b.getElementsByTagName(e)[0];s.parentNode.insertBefore(t,s)}(window,document,'script','https://connect.facebook.net/en_US/fbevents.js');fbq('init','__PIXEL_ID__');fbq('track','PageView');"#;

const GOOGLE_TAG: &str = r#"var gtagScript=document.createElement('script');gtagScript.async=true;gtagScript.src='https://www.googletagmanager.com/gtag/js?id=__PIXEL_ID__';document.head.appendChild(gtagScript);window.dataLayer=window.dataLayer||[];function gtag(){dataLayer.push(arguments);}gtag('js',new Date());gtag('config','__PIXEL_ID__');"#;

const TIKTOK_TAG: &str = r#"!function(w,d,t){w.TiktokAnalyticsObject=t;var ttq=w[t]=w[t]||[];ttq.methods=["page","track","identify","instances","debug","on","off","once","ready","alias","group","enableCookie","disableCookie"];ttq.setAndDefer=function(t,e){t[e]=function(){t.push([e].concat(Array.prototype.slice.call(arguments,0)))}};for(var i=0;i<ttq.methods.length;i++)ttq.setAndDefer(ttq,ttq.methods[i]);ttq.load=function(e,n){var r="https://analytics.tiktok.com/i18n/pixel/events.js";ttq._i=ttq._i||{};ttq._i[e]=[];ttq._i[e]._u=r;ttq._t=ttq._t||{};ttq._t[e]=+new Date;ttq._o=ttq._o||{};ttq._o[e]=n||{};var o=document.createElement("script");o.type="text/javascript";o.async=!0;o.src=r+"?sdkid="+e+"&lib="+t;var a=document.getElementsByTagName("script")[0];a.parentNode.insertBefore(o,a)};ttq.load('__PIXEL_ID__');ttq.page();}(window,document,'ttq');"#;

// Renders the provider bootstrap for one pixel entry. Providers we don't know
// how to bootstrap are rejected per entry so the rest of the batch survives.
pub fn snippet_for(pixel: &Pixel) -> Result<String, AppError> {
  let provider = pixel.pixel_type.trim();
  let id = pixel.value.trim();
  if provider.is_empty() || id.is_empty() {
    return Err(AppError::SnippetError(format!("pixel '{}' is missing a provider type or tracking id", pixel.name)));
  }
  let template = match provider {
    "facebook" => FACEBOOK_TAG,
    "google" => GOOGLE_TAG,
    "tiktok" => TIKTOK_TAG,
    other => return Err(AppError::SnippetError(format!("unsupported pixel provider '{}'", other))),
  };
  Ok(template.replace("__PIXEL_ID__", id))
}

// Where generated snippets end up. The live implementation appends script
// elements to the document head; tests record what would have executed.
pub trait DocumentSink {
  fn append_script(&mut self, source: &str) -> Result<(), AppError>;
}

// Session-scoped cache of resolved pixel configurations, keyed by quiz id.
pub trait ConfigStore {
  fn load(&self, quiz_id: &str) -> Result<Option<CachedPixels>, AppError>;
  fn save(&self, entry: &CachedPixels) -> Result<(), AppError>;
}

pub fn split_by_mode(pixels: &[Pixel], delay_enabled: bool) -> (Vec<&Pixel>, Vec<&Pixel>) {
  if !delay_enabled {
    return (pixels.iter().collect(), Vec::new());
  }
  pixels.iter().partition(|p| !p.is_deferred())
}

fn now_ms() -> f64 {
  #[cfg(target_arch = "wasm32")]
  {
    js_sys::Date::now()
  }
  #[cfg(not(target_arch = "wasm32"))]
  {
    std::time::SystemTime::now()
      .duration_since(std::time::UNIX_EPOCH)
      .map(|d| d.as_millis() as f64)
      .unwrap_or(0.0)
  }
}

fn cache_entry(config: &PixelConfig) -> CachedPixels {
  CachedPixels {
    quiz_id: config.quiz_id.clone(),
    pixels: config.pixels.clone(),
    custom_scripts: config.custom_scripts.clone(),
    utm_code: config.utm_code.clone(),
    cached_at: now_ms(),
  }
}

pub struct PixelInjector<D, S> {
  sink: D,
  store: S,
  delay: Duration,
  // quiz ids already injected within this page life; a fast re-render must
  // not duplicate tags
  injected: HashSet<String>,
}

impl<D: DocumentSink, S: ConfigStore> PixelInjector<D, S> {
  pub fn new(sink: D, store: S, delay: Duration) -> Self {
    Self { sink, store, delay, injected: HashSet::new() }
  }

  pub fn into_parts(self) -> (D, S) {
    (self.sink, self.store)
  }

  // Same-session cache lookup. Read failures degrade to a miss.
  pub fn cached(&self, quiz_id: &str) -> Option<PixelConfig> {
    match self.store.load(quiz_id) {
      Ok(Some(entry)) => Some(PixelConfig::from(entry)),
      Ok(None) => None,
      Err(e) => {
        warn!("pixel cache read for quiz {} failed: {}", quiz_id, e);
        None
      }
    }
  }

  // Cache the configuration, then inject: immediate pixels and custom scripts
  // synchronously, deferred pixels after the delay. A config without pixels
  // is a no-op, including the cache write.
  pub async fn apply(&mut self, config: &PixelConfig) {
    if config.pixels.is_empty() {
      return;
    }
    if !self.injected.insert(config.quiz_id.clone()) {
      info!("pixels for quiz {} already injected, skipping", config.quiz_id);
      return;
    }

    if let Err(e) = self.store.save(&cache_entry(config)) {
      warn!("pixel cache write for quiz {} failed: {}", config.quiz_id, e);
    }

    let (immediate, deferred) = split_by_mode(&config.pixels, config.pixel_delay);
    self.inject_batch(&config.quiz_id, &immediate);

    for script in &config.custom_scripts {
      if let Err(e) = self.sink.append_script(&script.code) {
        warn!("custom script '{}' for quiz {} failed: {}", script.name, config.quiz_id, e);
      }
    }

    if !deferred.is_empty() {
      async_std::task::sleep(self.delay).await;
      self.inject_batch(&config.quiz_id, &deferred);
    }
  }

  fn inject_batch(&mut self, quiz_id: &str, pixels: &[&Pixel]) {
    for pixel in pixels {
      match snippet_for(pixel) {
        Ok(snippet) => match self.sink.append_script(&snippet) {
          Ok(()) => info!("injected {} pixel '{}' for quiz {}", pixel.pixel_type, pixel.name, quiz_id),
          Err(e) => warn!("injecting pixel '{}' for quiz {} failed: {}", pixel.name, quiz_id, e),
        },
        Err(e) => warn!("skipping pixel '{}' for quiz {}: {}", pixel.name, quiz_id, e),
      }
    }
  }
}
