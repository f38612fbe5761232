pub mod document;
pub mod drag;
pub mod editor;
pub mod layout;
pub mod measure;
pub mod model;
pub mod rules;
pub mod store;
pub mod view;
pub mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;

use wasm_bindgen::prelude::*;

pub use document::DocumentError;
pub use editor::{EditError, Editor, ScenarioMode, SelectionPolicy, StepDirection, TableMode};
pub use model::{Column, ForeignKey, Index, Position, Relation, Scenario, ScenarioStep, SchemaGraph, Table};
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Validate document text and return it normalized (positions hoisted,
/// pretty-printed).
#[wasm_bindgen(js_name = "normalizeDocument")]
pub fn normalize_document(source: &str) -> Result<String, String> {
    let graph = document::parse(source).map_err(|e| e.to_string())?;
    document::to_pretty_json(&graph).map_err(|e| e.to_string())
}
