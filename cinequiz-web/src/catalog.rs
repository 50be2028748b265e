//! Catalog download for the browser build.

use cinequiz_game::{Catalog, CatalogError, recover_catalog};
use wasm_bindgen::JsValue;

use crate::dom;

/// Catalog served next to the page by default.
pub const DEFAULT_CATALOG_URL: &str = "./catalog.json";
const BASE_BACKOFF_MS: i32 = 250;

#[derive(Debug, thiserror::Error)]
pub enum WebCatalogError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<JsValue> for WebCatalogError {
    fn from(value: JsValue) -> Self {
        Self::Network(dom::js_error_message(&value))
    }
}

/// Delay before retry number `attempt` (zero based), doubling up to a cap.
#[must_use]
pub fn backoff_ms(attempt: u32) -> i32 {
    BASE_BACKOFF_MS.saturating_mul(1 << attempt.min(6))
}

#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
async fn fetch_once(url: &str) -> Result<Catalog, WebCatalogError> {
    let resp = dom::fetch_response(url).await?;
    if !resp.ok() {
        return Err(WebCatalogError::Status(resp.status()));
    }
    let body = dom::response_text(&resp).await?;
    let stamp: String = js_sys::Date::new_0().to_iso_string().into();
    Ok(Catalog::from_json(&body)?.with_last_updated(stamp))
}

/// Download the catalog at `url`, trying up to `retries` times.
///
/// # Errors
/// Returns the last failure once every attempt has been used.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn try_fetch_catalog(url: &str, retries: u32) -> Result<Catalog, WebCatalogError> {
    let attempts = retries.max(1);
    let mut attempt = 0;
    loop {
        match fetch_once(url).await {
            Ok(catalog) => return Ok(catalog),
            Err(err) if attempt + 1 < attempts => {
                log::info!("catalog fetch {} of {attempts} failed: {err}", attempt + 1);
                dom::sleep_ms(backoff_ms(attempt)).await?;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Download the catalog, falling back to the built-in movies on failure.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn fetch_catalog(url: &str, retries: u32) -> Catalog {
    let loaded = try_fetch_catalog(url, retries).await;
    if let Err(err) = &loaded {
        dom::console_error(&format!("catalog download failed: {err}"));
    }
    recover_catalog(loaded)
}
