//! Schema graph document: tables, relations, layout positions and scenarios.
//!
//! Field names follow the JSON exchanged with the viewer (`camelCase`).
//! Everything except the table and relation collections is optional on
//! ingest and falls back to its default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub typ: String,
    #[serde(default)]
    pub nullable: bool,
    /// Default expression, kept as raw JSON (string, number, bool...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_indexed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            nullable: true,
            ..Default::default()
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self.nullable = false;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
            on_update: None,
            on_delete: None,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    /// Grouping tag, only used for color-coding in the viewer.
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Names of columns flagged `isPrimary`, in column order.
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_estimate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(default)]
    pub name: String,
    pub from_table: String,
    #[serde(default)]
    pub from_columns: Vec<String>,
    pub to_table: String,
    #[serde(default)]
    pub to_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioStep {
    pub order: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
    #[serde(default)]
    pub table_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaGraph {
    pub tables: Vec<Table>,
    pub relations: Vec<Relation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<BTreeMap<String, Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<Scenario>>,
    /// Top-level fields this crate does not interpret, written back verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SchemaGraph {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn position(&self, name: &str) -> Option<Position> {
        self.positions.as_ref().and_then(|p| p.get(name)).copied()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        self.scenarios.as_deref().unwrap_or_default()
    }

    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios().iter().find(|s| s.id == id)
    }

    pub fn relations_from(&self, table: &str) -> Vec<Relation> {
        self.relations
            .iter()
            .filter(|r| r.from_table == table)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_json_names() {
        let column = Column::new("user_id", "int").references("users", "id");
        let json = serde_json::to_value(&column).unwrap();

        assert_eq!(json["type"], "int");
        assert_eq!(json["isPrimary"], false);
        assert_eq!(json["foreignKey"]["table"], "users");
        assert!(json.get("comment").is_none());
    }

    #[test]
    fn test_lenient_table_fields() {
        let table: Table = serde_json::from_str(r#"{ "name": "users" }"#).unwrap();

        assert_eq!(table.name, "users");
        assert!(table.columns.is_empty());
        assert!(table.primary_key.is_empty());
        assert_eq!(table.row_estimate, None);
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let graph: SchemaGraph = serde_json::from_str(
            r#"{ "tables": [], "relations": [], "version": 3, "title": "demo" }"#,
        )
        .unwrap();

        assert_eq!(graph.extra["version"], 3);
        let back = serde_json::to_value(&graph).unwrap();
        assert_eq!(back["title"], "demo");
        assert!(back.get("positions").is_none());
    }

    #[test]
    fn test_position_defaults_height() {
        let p: Position = serde_json::from_str(r#"{ "x": 1.5, "z": -2 }"#).unwrap();
        assert_eq!(p, Position::new(1.5, 0.0, -2.0));
    }

    #[test]
    fn test_scenario_lookup() {
        let graph = SchemaGraph {
            scenarios: Some(vec![Scenario {
                id: "s1".to_string(),
                name: "Checkout".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        };

        assert_eq!(graph.scenario("s1").map(|s| s.name.as_str()), Some("Checkout"));
        assert!(graph.scenario("s2").is_none());
        assert!(SchemaGraph::default().scenarios().is_empty());
    }
}
