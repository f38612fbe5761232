//! Consistency rules that turn one valid document into the next.
//!
//! All functions here are pure and total: they take borrowed inputs and
//! return new values, never mutating a document that was already handed out.

use crate::model::{Column, Relation, Scenario, SchemaGraph, Table};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A single table rename, old name to new name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Rename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        if name == self.from { &self.to } else { name }
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(self.from.clone(), self.to.clone())])
    }
}

pub fn primary_key_of(columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| c.is_primary)
        .map(|c| c.name.clone())
        .collect()
}

/// Replace a table's columns and recompute its primary key.
pub fn apply_column_set_to_table(table: &Table, next_columns: Vec<Column>) -> Table {
    Table {
        primary_key: primary_key_of(&next_columns),
        columns: next_columns,
        ..table.clone()
    }
}

pub fn relation_name_for(table: &str, column: &str) -> String {
    format!("fk_{}_{}", table, column)
}

/// Build the outgoing single-column relations for every column carrying a
/// foreign key. Names and referential actions are carried over from a
/// matching existing relation when the column does not set its own.
pub fn derive_relations_from_foreign_keys(table: &Table, existing: &[Relation]) -> Vec<Relation> {
    table
        .columns
        .iter()
        .filter_map(|column| {
            let fk = column.foreign_key.as_ref()?;
            let matched = existing
                .iter()
                .find(|r| r.from_columns.len() == 1 && r.from_columns[0] == column.name);

            Some(Relation {
                name: matched
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| relation_name_for(&table.name, &column.name)),
                from_table: table.name.clone(),
                from_columns: vec![column.name.clone()],
                to_table: fk.table.clone(),
                to_columns: vec![fk.column.clone()],
                on_update: fk
                    .on_update
                    .clone()
                    .or_else(|| matched.and_then(|r| r.on_update.clone())),
                on_delete: fk
                    .on_delete
                    .clone()
                    .or_else(|| matched.and_then(|r| r.on_delete.clone())),
            })
        })
        .collect()
}

/// Replace the saved table's outgoing single-column relations with
/// `derived`. Multi-column relations are kept as authored.
///
/// With a rename, every relation endpoint naming the old table is moved to
/// the new name first, so the old outgoing relations are dropped as well
/// and inbound relations keep pointing at a live table.
pub fn merge_relations_on_table_save(
    all: &[Relation],
    saved_table: &str,
    derived: Vec<Relation>,
    rename: Option<&Rename>,
) -> Vec<Relation> {
    all.iter()
        .map(|r| match rename {
            Some(rename) => Relation {
                from_table: rename.apply(&r.from_table).to_string(),
                to_table: rename.apply(&r.to_table).to_string(),
                ..r.clone()
            },
            None => r.clone(),
        })
        .filter(|r| r.from_table != saved_table || r.from_columns.len() != 1)
        .chain(derived)
        .collect()
}

/// Exactly one name removed and one added is read as a rename. Anything
/// else, including several adds and removes at once, is not.
pub fn detect_single_rename<'a, P, N>(previous: P, next: N) -> Option<Rename>
where
    P: IntoIterator<Item = &'a str>,
    N: IntoIterator<Item = &'a str>,
{
    let previous: BTreeSet<&str> = previous.into_iter().collect();
    let next: BTreeSet<&str> = next.into_iter().collect();

    let mut removed = previous.difference(&next);
    let mut added = next.difference(&previous);

    match (removed.next(), removed.next(), added.next(), added.next()) {
        (Some(from), None, Some(to), None) => Some(Rename::new(*from, *to)),
        _ => None,
    }
}

/// Map scenario members through `renames`, then keep only names that
/// still exist. Scenarios left empty are kept.
pub fn sanitize_scenario_table_names(
    scenarios: &[Scenario],
    current: &HashSet<&str>,
    renames: &BTreeMap<String, String>,
) -> Vec<Scenario> {
    scenarios
        .iter()
        .map(|scenario| {
            let mut seen = HashSet::new();
            let table_names = scenario
                .table_names
                .iter()
                .map(|name| renames.get(name).unwrap_or(name))
                .filter(|name| current.contains(name.as_str()))
                .filter(|name| seen.insert(name.as_str()))
                .cloned()
                .collect();

            Scenario {
                table_names,
                ..scenario.clone()
            }
        })
        .collect()
}

/// `base` if free, else `base_1`, `base_2`, ... taking the first gap.
pub fn unique_table_name(base: &str, existing: &HashSet<&str>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !existing.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

/// Point every reference to `rename.from` at `rename.to`: relation
/// endpoints, column foreign keys and the layout position key. An existing
/// position under the new name wins over the migrated one.
pub fn rename_table_references(graph: &SchemaGraph, rename: &Rename) -> SchemaGraph {
    let tables = graph
        .tables
        .iter()
        .map(|table| Table {
            columns: table
                .columns
                .iter()
                .map(|column| match &column.foreign_key {
                    Some(fk) if fk.table == rename.from => {
                        let mut column = column.clone();
                        if let Some(fk) = column.foreign_key.as_mut() {
                            fk.table = rename.to.clone();
                        }
                        column
                    }
                    _ => column.clone(),
                })
                .collect(),
            ..table.clone()
        })
        .collect();

    let relations = graph
        .relations
        .iter()
        .map(|r| Relation {
            from_table: rename.apply(&r.from_table).to_string(),
            to_table: rename.apply(&r.to_table).to_string(),
            ..r.clone()
        })
        .collect();

    let positions = graph.positions.as_ref().map(|positions| {
        let mut positions = positions.clone();
        if let Some(moved) = positions.remove(&rename.from) {
            positions.entry(rename.to.clone()).or_insert(moved);
        }
        positions
    });

    SchemaGraph {
        tables,
        relations,
        positions,
        ..graph.clone()
    }
}

/// Drop a table with its position and every relation touching it. Foreign
/// keys on other tables that targeted it are cleared so that no column
/// declares a relation that no longer exists.
pub fn remove_table(graph: &SchemaGraph, name: &str) -> SchemaGraph {
    let tables = graph
        .tables
        .iter()
        .filter(|t| t.name != name)
        .map(|table| Table {
            columns: table
                .columns
                .iter()
                .map(|column| Column {
                    foreign_key: column
                        .foreign_key
                        .clone()
                        .filter(|fk| fk.table != name),
                    ..column.clone()
                })
                .collect(),
            ..table.clone()
        })
        .collect();

    let relations = graph
        .relations
        .iter()
        .filter(|r| r.from_table != name && r.to_table != name)
        .cloned()
        .collect();

    let positions = graph.positions.as_ref().map(|positions| {
        let mut positions = positions.clone();
        positions.remove(name);
        positions
    });

    SchemaGraph {
        tables,
        relations,
        positions,
        ..graph.clone()
    }
}
