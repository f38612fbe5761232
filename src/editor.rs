//! Edit orchestrator.
//!
//! `Editor` owns the current document together with selection, table draft,
//! scenario draft and drag state. Its methods are the only way to change
//! them. Every committed edit produces a new document, bumps the revision,
//! is mirrored to the store and re-checks the selection.

use crate::document::{self, DocumentError};
use crate::drag::{DragOutcome, DragState, placement_conflict};
use crate::layout::{PlanarPoint, resolve_positions};
use crate::measure::FootprintMetrics;
use crate::model::{Column, Position, Scenario, ScenarioStep, SchemaGraph, Table};
use crate::rules::{
    Rename, apply_column_set_to_table, derive_relations_from_foreign_keys, detect_single_rename,
    merge_relations_on_table_save, remove_table, rename_table_references,
    sanitize_scenario_table_names, unique_table_name,
};
use crate::store::DocumentStore;
use crate::view::GraphView;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

const NEW_TABLE_BASE: &str = "new_table";

#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("No table draft in progress")]
    NoDraft,
    #[error("No table selected")]
    NoSelection,
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("A table named {0} already exists")]
    DuplicateTable(String),
    #[error("No active scenario")]
    NoActiveScenario,
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
    #[error("Not editing a scenario")]
    NotEditingScenario,
    #[error("Layout editing is off")]
    LayoutLocked,
}

/// Whether a commit keeps the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    Clear,
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    /// The draft mirrors the committed version of the selected table.
    #[default]
    Viewing,
    Editing,
    Creating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioMode {
    #[default]
    Idle,
    Creating,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioDraft {
    pub name: String,
    pub table_names: Vec<String>,
    pub steps: Vec<ScenarioStep>,
}

impl ScenarioDraft {
    fn from_scenario(scenario: &Scenario) -> Self {
        let mut steps = scenario.steps.clone();
        steps.sort_by_key(|s| s.order);
        Self {
            name: scenario.name.clone(),
            table_names: scenario.table_names.clone(),
            steps,
        }
    }

    fn toggle(&mut self, name: &str) {
        match self.table_names.iter().position(|n| n == name) {
            Some(index) => {
                self.table_names.remove(index);
            }
            None => self.table_names.push(name.to_string()),
        }
    }

    /// Members in document table order.
    fn ordered_members(&self, graph: &SchemaGraph) -> Vec<String> {
        graph
            .tables
            .iter()
            .filter(|t| self.table_names.contains(&t.name))
            .map(|t| t.name.clone())
            .collect()
    }
}

/// Renumber steps 1..=n by list position; blank descriptions become
/// `Step <n>`.
pub fn normalize_steps(steps: &[ScenarioStep]) -> Vec<ScenarioStep> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let order = i as u32 + 1;
            ScenarioStep {
                order,
                description: if step.description.trim().is_empty() {
                    format!("Step {}", order)
                } else {
                    step.description.clone()
                },
            }
        })
        .collect()
}

pub struct Editor {
    document: SchemaGraph,
    revision: u64,
    selection: Option<String>,
    draft: Option<Table>,
    origin_name: Option<String>,
    table_mode: TableMode,
    layout_editing: bool,
    active_scenario: Option<String>,
    scenario_mode: ScenarioMode,
    scenario_draft: ScenarioDraft,
    drag: DragState,
    metrics: FootprintMetrics,
    store: Box<dyn DocumentStore>,
}

impl Editor {
    pub fn new(document: SchemaGraph, store: Box<dyn DocumentStore>) -> Self {
        Self {
            document,
            revision: 0,
            selection: None,
            draft: None,
            origin_name: None,
            table_mode: TableMode::Viewing,
            layout_editing: false,
            active_scenario: None,
            scenario_mode: ScenarioMode::Idle,
            scenario_draft: ScenarioDraft::default(),
            drag: DragState::Idle,
            metrics: FootprintMetrics::default(),
            store,
        }
    }

    /// Start from the stored document when there is a valid one, else from
    /// the bundled example.
    pub fn bootstrap(store: Box<dyn DocumentStore>) -> Self {
        let document = match store.load() {
            Ok(Some(graph)) => {
                info!(tables = graph.tables.len(), "loaded stored schema graph");
                graph
            }
            Ok(None) => {
                info!("no stored schema graph, using bundled example");
                document::bundled_example()
            }
            Err(error) => {
                warn!(%error, "ignoring stored schema graph");
                document::bundled_example()
            }
        };
        Self::new(document, store)
    }

    /// Apply a load that finished after startup, unless an edit was
    /// committed since `seen_revision`.
    pub fn apply_late_load(&mut self, graph: SchemaGraph, seen_revision: u64) -> bool {
        if self.revision != seen_revision {
            debug!(seen_revision, revision = self.revision, "dropping stale load");
            return false;
        }
        self.document = graph;
        self.revision += 1;
        self.after_change();
        true
    }

    pub fn document(&self) -> &SchemaGraph {
        &self.document
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn draft(&self) -> Option<&Table> {
        self.draft.as_ref()
    }

    pub fn origin_name(&self) -> Option<&str> {
        self.origin_name.as_deref()
    }

    pub fn table_mode(&self) -> TableMode {
        self.table_mode
    }

    pub fn is_layout_editing(&self) -> bool {
        self.layout_editing
    }

    pub fn active_scenario(&self) -> Option<&Scenario> {
        self.active_scenario
            .as_deref()
            .and_then(|id| self.document.scenario(id))
    }

    pub fn scenario_mode(&self) -> ScenarioMode {
        self.scenario_mode
    }

    pub fn scenario_draft(&self) -> &ScenarioDraft {
        &self.scenario_draft
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// The document as the viewer should show it. An active scenario
    /// filters it, except while scenario membership is being edited.
    pub fn view(&self) -> GraphView {
        let filter = match self.scenario_mode {
            ScenarioMode::Idle => self.active_scenario(),
            ScenarioMode::Creating | ScenarioMode::Editing => None,
        };
        GraphView::new(&self.document, filter)
    }

    pub fn export_json(&self) -> Result<String, EditError> {
        Ok(document::to_pretty_json(&self.document)?)
    }

    // -- document ---------------------------------------------------------

    /// Parse and submit document text, as pasted or imported from a file.
    pub fn submit_json(&mut self, text: &str) -> Result<(), EditError> {
        let candidate = document::parse(text).inspect_err(|error| {
            warn!(%error, "rejected submitted document");
        })?;
        self.submit_document(candidate, SelectionPolicy::Clear);
        Ok(())
    }

    /// Make `candidate` the current document. A single table rename against
    /// the previous document is followed through references and scenarios;
    /// scenario members that no longer exist are dropped.
    pub fn submit_document(&mut self, candidate: SchemaGraph, policy: SelectionPolicy) {
        let rename =
            detect_single_rename(self.document.table_names(), candidate.table_names());

        let mut next = match &rename {
            Some(rename) => {
                debug!(from = %rename.from, to = %rename.to, "detected table rename");
                rename_table_references(&candidate, rename)
            }
            None => candidate,
        };

        if let Some(scenarios) = &next.scenarios {
            let current: HashSet<&str> = next.tables.iter().map(|t| t.name.as_str()).collect();
            let renames = rename.as_ref().map(Rename::to_map).unwrap_or_default();
            let sanitized = sanitize_scenario_table_names(scenarios, &current, &renames);
            next.scenarios = Some(sanitized);
        }

        self.commit(next, policy);
    }

    fn commit(&mut self, next: SchemaGraph, policy: SelectionPolicy) {
        self.document = next;
        self.revision += 1;

        if policy == SelectionPolicy::Clear {
            self.selection = None;
            self.draft = None;
            self.origin_name = None;
            self.table_mode = TableMode::Viewing;
        }

        info!(
            revision = self.revision,
            tables = self.document.tables.len(),
            relations = self.document.relations.len(),
            "committed schema graph"
        );

        if let Err(error) = self.store.save(&self.document) {
            warn!(%error, "failed to persist schema graph");
        }

        self.after_change();
    }

    /// Re-establish invariants that depend on the document: the active
    /// scenario must exist, the selection must be visible, and a viewing
    /// draft mirrors the committed table.
    fn after_change(&mut self) {
        if let Some(id) = &self.active_scenario {
            if self.document.scenario(id).is_none() {
                self.active_scenario = None;
                self.scenario_mode = ScenarioMode::Idle;
            }
        }

        if let Some(selected) = &self.selection {
            if !self.view().contains_table(selected) {
                debug!(table = %selected, "selection no longer visible");
                self.selection = None;
            }
        }

        if self.table_mode == TableMode::Viewing {
            self.draft = self.committed_selection();
            self.origin_name = None;
        }
    }

    fn committed_selection(&self) -> Option<Table> {
        self.selection
            .as_deref()
            .and_then(|name| self.document.table(name))
            .cloned()
    }

    // -- tables -----------------------------------------------------------

    /// Select a table, or clear the selection with `None`. While a scenario
    /// draft is open the table's membership is toggled as well.
    pub fn select_table(&mut self, name: Option<&str>) {
        if self.table_mode == TableMode::Creating {
            debug!("abandoning unsaved new table");
            self.draft = None;
            self.table_mode = TableMode::Viewing;
        }

        if self.table_mode == TableMode::Editing && self.origin_name.as_deref() != name {
            self.table_mode = TableMode::Viewing;
        }

        if let Some(name) = name {
            if self.scenario_mode != ScenarioMode::Idle && self.document.has_table(name) {
                self.scenario_draft.toggle(name);
            }
        }

        self.selection = name.map(str::to_string);
        self.after_change();
    }

    /// Open the selected table for editing.
    pub fn begin_table_edit(&mut self) -> Result<(), EditError> {
        let table = self.committed_selection().ok_or(EditError::NoSelection)?;
        self.origin_name = Some(table.name.clone());
        self.draft = Some(table);
        self.table_mode = TableMode::Editing;
        Ok(())
    }

    /// Open a draft for a new, uniquely named, empty table.
    pub fn begin_table_creation(&mut self) -> String {
        let existing: HashSet<&str> = self.document.table_names().into_iter().collect();
        let name = unique_table_name(NEW_TABLE_BASE, &existing);

        self.selection = None;
        self.origin_name = None;
        self.draft = Some(Table::new(name.clone()));
        self.table_mode = TableMode::Creating;
        debug!(table = %name, "creating table");
        name
    }

    pub fn change_draft_columns(&mut self, next_columns: Vec<Column>) -> Result<(), EditError> {
        let draft = self.editable_draft()?;
        *draft = apply_column_set_to_table(draft, next_columns);
        Ok(())
    }

    /// Replace the whole draft, e.g. after a rename or domain change.
    pub fn change_draft_table(&mut self, table: Table) -> Result<(), EditError> {
        let draft = self.editable_draft()?;
        let columns = table.columns.clone();
        *draft = apply_column_set_to_table(&table, columns);
        Ok(())
    }

    fn editable_draft(&mut self) -> Result<&mut Table, EditError> {
        if self.table_mode == TableMode::Viewing {
            return Err(EditError::NoDraft);
        }
        self.draft.as_mut().ok_or(EditError::NoDraft)
    }

    /// Commit the table draft. Relations for the table are regenerated from
    /// its foreign keys; a rename during the edit is carried into inbound
    /// relations, foreign keys, layout and scenarios.
    pub fn save_draft(&mut self) -> Result<(), EditError> {
        if self.table_mode == TableMode::Viewing {
            return Err(EditError::NoDraft);
        }
        let draft = self.draft.clone().ok_or(EditError::NoDraft)?;
        let origin = self.origin_name.clone();

        let is_new = self.table_mode == TableMode::Creating
            || origin.as_deref().is_none_or(|o| !self.document.has_table(o));

        let replaced = if is_new { None } else { origin.as_deref() };
        let collides = self
            .document
            .tables
            .iter()
            .any(|t| t.name == draft.name && Some(t.name.as_str()) != replaced);
        if collides {
            return Err(EditError::DuplicateTable(draft.name));
        }

        let rename = replaced
            .filter(|o| *o != draft.name)
            .map(|o| Rename::new(o, draft.name.clone()));

        let existing = origin
            .as_deref()
            .map(|o| self.document.relations_from(o))
            .unwrap_or_default();
        let derived = derive_relations_from_foreign_keys(&draft, &existing);
        let relations = merge_relations_on_table_save(
            &self.document.relations,
            &draft.name,
            derived,
            rename.as_ref(),
        );

        let mut tables = self.document.tables.clone();
        match replaced.and_then(|o| tables.iter().position(|t| t.name == o)) {
            Some(index) => tables[index] = draft.clone(),
            None => tables.push(draft.clone()),
        }

        let mut next = SchemaGraph {
            tables,
            relations,
            ..self.document.clone()
        };
        if let Some(rename) = &rename {
            next = rename_table_references(&next, rename);
        }

        info!(table = %draft.name, is_new, renamed = rename.is_some(), "saving table");

        self.selection = Some(draft.name.clone());
        self.table_mode = TableMode::Viewing;
        self.origin_name = None;
        self.submit_document(next, SelectionPolicy::Preserve);
        Ok(())
    }

    /// Drop unsaved table changes. A new table is discarded; an edited one
    /// goes back to its committed version and the selection stays.
    pub fn cancel_draft_edit(&mut self) {
        if self.table_mode == TableMode::Creating {
            debug!("discarding new table");
        }
        self.table_mode = TableMode::Viewing;
        self.origin_name = None;
        self.draft = self.committed_selection();
    }

    pub fn delete_table(&mut self, name: &str) -> Result<(), EditError> {
        if !self.document.has_table(name) {
            return Err(EditError::UnknownTable(name.to_string()));
        }
        info!(table = %name, "deleting table");
        let next = remove_table(&self.document, name);
        self.submit_document(next, SelectionPolicy::Preserve);
        Ok(())
    }

    // -- layout -----------------------------------------------------------

    pub fn set_layout_editing(&mut self, enabled: bool) {
        self.layout_editing = enabled;
        if !enabled {
            self.drag.cancel();
        }
    }

    /// Store an explicit position. Height is kept from the existing
    /// position; with `lock_z` the existing depth is kept too.
    pub fn update_layout_position(
        &mut self,
        table: &str,
        point: PlanarPoint,
        lock_z: bool,
    ) -> Result<(), EditError> {
        if !self.document.has_table(table) {
            return Err(EditError::UnknownTable(table.to_string()));
        }

        let existing = self.document.position(table);
        let position = Position {
            x: point.x,
            y: existing.map_or(0.0, |p| p.y),
            z: match existing {
                Some(p) if lock_z => p.z,
                _ => point.z,
            },
        };

        let mut positions = self.document.positions.clone().unwrap_or_default();
        positions.insert(table.to_string(), position);
        let next = SchemaGraph {
            positions: Some(positions),
            ..self.document.clone()
        };

        debug!(table, x = position.x, y = position.y, z = position.z, "moved table");
        self.submit_document(next, SelectionPolicy::Preserve);
        Ok(())
    }

    pub fn drag_begin(&mut self, table: &str) -> Result<(), EditError> {
        if !self.layout_editing {
            return Err(EditError::LayoutLocked);
        }
        let view = self.view();
        let start = view
            .positions
            .get(table)
            .copied()
            .ok_or_else(|| EditError::UnknownTable(table.to_string()))?;
        self.drag.begin(table, PlanarPoint::from(start));
        Ok(())
    }

    /// Track the pointer. Returns the table the candidate overlaps, for a
    /// transient warning; nothing is committed here.
    pub fn drag_move(&mut self, candidate: PlanarPoint) -> Option<String> {
        let table = self.drag.session()?.table.clone();
        let view = self.view();
        let conflict = placement_conflict(
            &view.document,
            &view.positions,
            &table,
            candidate,
            &self.metrics,
        );
        self.drag.pointer_move(candidate, conflict.clone());
        conflict
    }

    /// End the gesture, committing a valid position exactly once.
    pub fn drag_release(&mut self, lock_z: bool) -> Result<DragOutcome, EditError> {
        let outcome = self.drag.release();
        match &outcome {
            DragOutcome::Commit { table, point } => {
                self.update_layout_position(table, *point, lock_z)?;
            }
            DragOutcome::Revert { table, .. } => {
                warn!(table = %table, "drop position overlaps another table, reverting");
            }
            DragOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Resolved position of every table, explicit or fallback.
    pub fn positions(&self) -> BTreeMap<String, Position> {
        resolve_positions(&self.document)
    }

    // -- scenarios --------------------------------------------------------

    pub fn set_active_scenario(&mut self, id: Option<&str>) -> Result<(), EditError> {
        if let Some(id) = id {
            if self.document.scenario(id).is_none() {
                return Err(EditError::UnknownScenario(id.to_string()));
            }
        }
        self.active_scenario = id.map(str::to_string);
        self.scenario_mode = ScenarioMode::Idle;
        self.scenario_draft = ScenarioDraft::default();
        self.after_change();
        Ok(())
    }

    pub fn begin_scenario_creation(&mut self) {
        self.active_scenario = None;
        self.scenario_mode = ScenarioMode::Creating;
        self.scenario_draft = ScenarioDraft {
            name: self.default_scenario_name(),
            ..Default::default()
        };
        self.after_change();
    }

    fn default_scenario_name(&self) -> String {
        format!("Scenario {}", self.document.scenarios().len() + 1)
    }

    pub fn set_scenario_draft_name(&mut self, name: &str) {
        self.scenario_draft.name = name.to_string();
    }

    /// Commit the new scenario and make it active. Returns `None` without
    /// committing when no table was picked.
    pub fn save_scenario_creation(&mut self) -> Result<Option<String>, EditError> {
        if self.scenario_mode != ScenarioMode::Creating {
            return Err(EditError::NotEditingScenario);
        }
        let table_names = self.scenario_draft.ordered_members(&self.document);
        if table_names.is_empty() {
            debug!("refusing to create a scenario without tables");
            return Ok(None);
        }

        let name = match self.scenario_draft.name.trim() {
            "" => self.default_scenario_name(),
            name => name.to_string(),
        };
        let id = new_scenario_id(&self.document);
        let scenario = Scenario {
            id: id.clone(),
            name,
            steps: Vec::new(),
            table_names,
        };

        let mut scenarios = self.document.scenarios().to_vec();
        scenarios.push(scenario);
        let next = SchemaGraph {
            scenarios: Some(scenarios),
            ..self.document.clone()
        };

        info!(scenario = %id, "created scenario");
        self.scenario_mode = ScenarioMode::Idle;
        self.scenario_draft = ScenarioDraft::default();
        self.active_scenario = Some(id.clone());
        self.submit_document(next, SelectionPolicy::Preserve);
        Ok(Some(id))
    }

    pub fn cancel_scenario_creation(&mut self) {
        if self.scenario_mode == ScenarioMode::Creating {
            self.scenario_mode = ScenarioMode::Idle;
            self.scenario_draft = ScenarioDraft::default();
            self.after_change();
        }
    }

    pub fn begin_scenario_edit(&mut self) -> Result<(), EditError> {
        let scenario = self.active_scenario().ok_or(EditError::NoActiveScenario)?;
        self.scenario_draft = ScenarioDraft::from_scenario(scenario);
        self.scenario_mode = ScenarioMode::Editing;
        self.after_change();
        Ok(())
    }

    pub fn save_scenario_edit(&mut self) -> Result<(), EditError> {
        if self.scenario_mode != ScenarioMode::Editing {
            return Err(EditError::NotEditingScenario);
        }
        let current = self.active_scenario().ok_or(EditError::NoActiveScenario)?;

        let updated = Scenario {
            id: current.id.clone(),
            name: match self.scenario_draft.name.trim() {
                "" => current.name.clone(),
                name => name.to_string(),
            },
            steps: normalize_steps(&self.scenario_draft.steps),
            table_names: self.scenario_draft.ordered_members(&self.document),
        };

        let scenarios = self
            .document
            .scenarios()
            .iter()
            .map(|s| if s.id == updated.id { updated.clone() } else { s.clone() })
            .collect();
        let next = SchemaGraph {
            scenarios: Some(scenarios),
            ..self.document.clone()
        };

        info!(scenario = %updated.id, steps = updated.steps.len(), "saved scenario");
        self.scenario_mode = ScenarioMode::Idle;
        self.scenario_draft = ScenarioDraft::default();
        self.submit_document(next, SelectionPolicy::Preserve);
        Ok(())
    }

    /// Leave edit mode, restoring the draft from the committed scenario.
    pub fn cancel_scenario_edit(&mut self) {
        if self.scenario_mode != ScenarioMode::Editing {
            return;
        }
        self.scenario_draft = self
            .active_scenario()
            .map(ScenarioDraft::from_scenario)
            .unwrap_or_default();
        self.scenario_mode = ScenarioMode::Idle;
        self.after_change();
    }

    pub fn add_draft_step(&mut self) {
        let order = self.scenario_draft.steps.len() as u32 + 1;
        self.scenario_draft.steps.push(ScenarioStep {
            order,
            description: String::new(),
        });
    }

    pub fn remove_draft_step(&mut self, index: usize) -> bool {
        if index >= self.scenario_draft.steps.len() {
            return false;
        }
        self.scenario_draft.steps.remove(index);
        true
    }

    pub fn edit_draft_step(&mut self, index: usize, text: &str) -> bool {
        match self.scenario_draft.steps.get_mut(index) {
            Some(step) => {
                step.description = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Swap a step with its neighbour. Moving past either end is a no-op.
    pub fn reorder_draft_step(&mut self, index: usize, direction: StepDirection) -> bool {
        let target = match direction {
            StepDirection::Up => index.checked_sub(1),
            StepDirection::Down => index.checked_add(1),
        };
        let len = self.scenario_draft.steps.len();
        match target {
            Some(target) if index < len && target < len => {
                self.scenario_draft.steps.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Remove the active scenario once `confirm` agrees.
    pub fn delete_active_scenario<F>(&mut self, confirm: F) -> Result<bool, EditError>
    where
        F: FnOnce(&Scenario) -> bool,
    {
        let scenario = self.active_scenario().ok_or(EditError::NoActiveScenario)?;
        if !confirm(scenario) {
            return Ok(false);
        }
        let id = scenario.id.clone();

        let scenarios = self
            .document
            .scenarios()
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        let next = SchemaGraph {
            scenarios: Some(scenarios),
            ..self.document.clone()
        };

        info!(scenario = %id, "deleted scenario");
        self.active_scenario = None;
        self.scenario_mode = ScenarioMode::Idle;
        self.scenario_draft = ScenarioDraft::default();
        self.submit_document(next, SelectionPolicy::Preserve);
        Ok(true)
    }
}

/// Time-based id, suffixed when an id from the same millisecond exists.
fn new_scenario_id(graph: &SchemaGraph) -> String {
    let base = format!("scenario-{}", now_millis());
    let taken = |id: &str| graph.scenario(id).is_some();
    if !taken(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|id| !taken(id))
        .unwrap_or(base)
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
