//! Chat App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters around a conversation session and
//! exposes the result to the page as the `ChatClient` class.

mod app;
mod config;

pub use app::ChatClient;

use wasm_bindgen::prelude::*;

/// WASM entry point, runs when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Chat client WASM starting...");
}
