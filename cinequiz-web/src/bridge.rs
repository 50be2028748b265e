//! JavaScript-facing handle for the page script.
//!
//! Every mutating call returns the refreshed view as a plain JS object
//! (camelCase keys), so the UI re-renders from a single shape.

use cinequiz_game::{Quiz, SUGGESTION_LIMIT, suggest_titles};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::catalog::{DEFAULT_CATALOG_URL, fetch_catalog};
use crate::dom;
use crate::storage::BrowserStore;

const FETCH_RETRIES: u32 = 3;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct QuizHandle {
    quiz: Quiz<BrowserStore>,
}

#[wasm_bindgen]
impl QuizHandle {
    /// Fetch the catalog (default `./catalog.json`) and resume or start today's game.
    ///
    /// # Errors
    /// Rejects when no movie can be picked for today. Without `localStorage`
    /// the game still starts but progress only lasts until the page closes.
    #[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
    pub async fn start(catalog_url: Option<String>) -> Result<QuizHandle, JsValue> {
        let url = catalog_url.unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
        let catalog = fetch_catalog(&url, FETCH_RETRIES).await;
        let store = BrowserStore::open_or_memory();
        let today = dom::today()?;
        let quiz = Quiz::initialize(store, catalog, today).map_err(|err| {
            dom::console_error(&err.to_string());
            js_err(err)
        })?;
        Ok(Self { quiz })
    }

    /// # Errors
    /// Fails only if the view cannot be converted to a JS value.
    #[wasm_bindgen(js_name = submitGuess)]
    pub fn submit_guess(&mut self, title: &str) -> Result<JsValue, JsValue> {
        self.quiz.submit_guess(title);
        self.view()
    }

    /// # Errors
    /// Fails only if the view cannot be converted to a JS value.
    #[wasm_bindgen(js_name = revealHint)]
    pub fn reveal_hint(&mut self) -> Result<JsValue, JsValue> {
        self.quiz.reveal_hint();
        self.view()
    }

    /// # Errors
    /// Rejects when the catalog is empty; the current game is kept.
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.quiz.reset().map_err(js_err)?;
        self.view()
    }

    /// Start a new game if the calendar day changed while the page stayed open.
    ///
    /// # Errors
    /// Rejects when a new day begins with an empty catalog.
    #[wasm_bindgen(js_name = refreshDay)]
    pub fn refresh_day(&mut self) -> Result<JsValue, JsValue> {
        let today = dom::today()?;
        self.quiz.roll_over(today).map_err(js_err)?;
        self.view()
    }

    /// Whether progress is being saved to `localStorage`.
    #[wasm_bindgen(getter)]
    pub fn persistent(&self) -> bool {
        self.quiz.store().is_persistent()
    }

    /// # Errors
    /// Fails only if the view cannot be converted to a JS value.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.quiz.view())
    }

    /// Catalog titles containing `query`, for the guess input's autocomplete.
    ///
    /// # Errors
    /// Fails only if the list cannot be converted to a JS value.
    pub fn suggest(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&suggest_titles(self.quiz.catalog(), query, SUGGESTION_LIMIT))
    }
}
