//! Browser build of Cinequiz: localStorage persistence, catalog download,
//! and the `QuizHandle` bridge consumed by the page script.
#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod catalog;
pub mod dom;
pub mod storage;

pub use bridge::QuizHandle;
pub use catalog::{fetch_catalog, try_fetch_catalog};
pub use storage::{BrowserStore, LocalStorageStore, WebStorageError};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
