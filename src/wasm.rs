//! Browser bindings. The view layer talks to the editor in JSON text.

use crate::document;
use crate::drag::DragOutcome;
use crate::editor::{Editor, StepDirection};
use crate::layout::PlanarPoint;
use crate::model::{Column, SchemaGraph, Table};
use crate::store::{DocumentStore, MemoryStore, StoreError};
use tracing::warn;
use wasm_bindgen::prelude::*;

/// Forwards every save to a JavaScript function receiving the document as
/// JSON text. Loading happens on the JS side before the editor is built.
struct CallbackStore {
    save: js_sys::Function,
}

impl DocumentStore for CallbackStore {
    fn load(&self) -> Result<Option<SchemaGraph>, StoreError> {
        Ok(None)
    }

    fn save(&self, graph: &SchemaGraph) -> Result<(), StoreError> {
        let text = serde_json::to_string(graph)?;
        self.save
            .call1(&JsValue::NULL, &JsValue::from_str(&text))
            .map(|_| ())
            .map_err(|e| StoreError::Callback(format!("{:?}", e)))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub struct SchemaEditor {
    inner: Editor,
}

#[wasm_bindgen]
impl SchemaEditor {
    /// `initial` is the stored document text, if the host found one. An
    /// invalid or missing document falls back to the bundled example.
    #[wasm_bindgen(constructor)]
    pub fn new(initial: Option<String>, on_save: Option<js_sys::Function>) -> SchemaEditor {
        let store: Box<dyn DocumentStore> = match on_save {
            Some(save) => Box::new(CallbackStore { save }),
            None => Box::new(MemoryStore::new()),
        };
        let document = match initial.as_deref().map(document::parse) {
            Some(Ok(graph)) => graph,
            Some(Err(e)) => {
                warn!(error = %e, "stored schema graph is invalid, using bundled example");
                document::bundled_example()
            }
            None => document::bundled_example(),
        };
        SchemaEditor {
            inner: Editor::new(document, store),
        }
    }

    #[wasm_bindgen(js_name = "documentJson")]
    pub fn document_json(&self) -> Result<String, String> {
        to_json(self.inner.document())
    }

    #[wasm_bindgen(js_name = "viewJson")]
    pub fn view_json(&self) -> Result<String, String> {
        to_json(&self.inner.view())
    }

    #[wasm_bindgen(js_name = "exportJson")]
    pub fn export_json(&self) -> Result<String, String> {
        self.inner.export_json().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "submitJson")]
    pub fn submit_json(&mut self, text: &str) -> Result<(), String> {
        self.inner.submit_json(text).map_err(|e| e.to_string())
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision()
    }

    pub fn selection(&self) -> Option<String> {
        self.inner.selection().map(str::to_string)
    }

    #[wasm_bindgen(js_name = "draftJson")]
    pub fn draft_json(&self) -> Result<Option<String>, String> {
        self.inner.draft().map(to_json).transpose()
    }

    #[wasm_bindgen(js_name = "selectTable")]
    pub fn select_table(&mut self, name: Option<String>) {
        self.inner.select_table(name.as_deref());
    }

    #[wasm_bindgen(js_name = "beginTableEdit")]
    pub fn begin_table_edit(&mut self) -> Result<(), String> {
        self.inner.begin_table_edit().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "beginTableCreation")]
    pub fn begin_table_creation(&mut self) -> String {
        self.inner.begin_table_creation()
    }

    #[wasm_bindgen(js_name = "changeDraftColumns")]
    pub fn change_draft_columns(&mut self, columns_json: &str) -> Result<(), String> {
        let columns: Vec<Column> = serde_json::from_str(columns_json).map_err(|e| e.to_string())?;
        self.inner
            .change_draft_columns(columns)
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "changeDraftTable")]
    pub fn change_draft_table(&mut self, table_json: &str) -> Result<(), String> {
        let table: Table = serde_json::from_str(table_json).map_err(|e| e.to_string())?;
        self.inner.change_draft_table(table).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "saveDraft")]
    pub fn save_draft(&mut self) -> Result<(), String> {
        self.inner.save_draft().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "cancelDraftEdit")]
    pub fn cancel_draft_edit(&mut self) {
        self.inner.cancel_draft_edit();
    }

    #[wasm_bindgen(js_name = "deleteTable")]
    pub fn delete_table(&mut self, name: &str) -> Result<(), String> {
        self.inner.delete_table(name).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "setLayoutEditing")]
    pub fn set_layout_editing(&mut self, enabled: bool) {
        self.inner.set_layout_editing(enabled);
    }

    #[wasm_bindgen(js_name = "dragBegin")]
    pub fn drag_begin(&mut self, table: &str) -> Result<(), String> {
        self.inner.drag_begin(table).map_err(|e| e.to_string())
    }

    /// Returns the name of the overlapped table, if any.
    #[wasm_bindgen(js_name = "dragMove")]
    pub fn drag_move(&mut self, x: f64, z: f64) -> Option<String> {
        self.inner.drag_move(PlanarPoint::new(x, z))
    }

    /// Returns true when the position was committed.
    #[wasm_bindgen(js_name = "dragRelease")]
    pub fn drag_release(&mut self, lock_z: bool) -> Result<bool, String> {
        self.inner
            .drag_release(lock_z)
            .map(|outcome| matches!(outcome, DragOutcome::Commit { .. }))
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "dragCancel")]
    pub fn drag_cancel(&mut self) {
        self.inner.drag_cancel();
    }

    #[wasm_bindgen(js_name = "setActiveScenario")]
    pub fn set_active_scenario(&mut self, id: Option<String>) -> Result<(), String> {
        self.inner
            .set_active_scenario(id.as_deref())
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "beginScenarioCreation")]
    pub fn begin_scenario_creation(&mut self) {
        self.inner.begin_scenario_creation();
    }

    #[wasm_bindgen(js_name = "setScenarioDraftName")]
    pub fn set_scenario_draft_name(&mut self, name: &str) {
        self.inner.set_scenario_draft_name(name);
    }

    #[wasm_bindgen(js_name = "saveScenarioCreation")]
    pub fn save_scenario_creation(&mut self) -> Result<Option<String>, String> {
        self.inner.save_scenario_creation().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "cancelScenarioCreation")]
    pub fn cancel_scenario_creation(&mut self) {
        self.inner.cancel_scenario_creation();
    }

    #[wasm_bindgen(js_name = "beginScenarioEdit")]
    pub fn begin_scenario_edit(&mut self) -> Result<(), String> {
        self.inner.begin_scenario_edit().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "saveScenarioEdit")]
    pub fn save_scenario_edit(&mut self) -> Result<(), String> {
        self.inner.save_scenario_edit().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "cancelScenarioEdit")]
    pub fn cancel_scenario_edit(&mut self) {
        self.inner.cancel_scenario_edit();
    }

    #[wasm_bindgen(js_name = "scenarioDraftJson")]
    pub fn scenario_draft_json(&self) -> Result<String, String> {
        let draft = self.inner.scenario_draft();
        to_json(&serde_json::json!({
            "name": draft.name,
            "tableNames": draft.table_names,
            "steps": draft.steps,
        }))
    }

    #[wasm_bindgen(js_name = "addDraftStep")]
    pub fn add_draft_step(&mut self) {
        self.inner.add_draft_step();
    }

    #[wasm_bindgen(js_name = "removeDraftStep")]
    pub fn remove_draft_step(&mut self, index: usize) -> bool {
        self.inner.remove_draft_step(index)
    }

    #[wasm_bindgen(js_name = "editDraftStep")]
    pub fn edit_draft_step(&mut self, index: usize, text: &str) -> bool {
        self.inner.edit_draft_step(index, text)
    }

    #[wasm_bindgen(js_name = "moveDraftStep")]
    pub fn move_draft_step(&mut self, index: usize, up: bool) -> bool {
        let direction = if up { StepDirection::Up } else { StepDirection::Down };
        self.inner.reorder_draft_step(index, direction)
    }

    /// The host asks the user first and only calls this once confirmed.
    #[wasm_bindgen(js_name = "deleteActiveScenario")]
    pub fn delete_active_scenario(&mut self) -> Result<bool, String> {
        self.inner
            .delete_active_scenario(|_| true)
            .map_err(|e| e.to_string())
    }
}
