//! Ingest and export of schema graph documents.
//!
//! Validation is shallow on purpose: a document must be a JSON object with
//! non-null `tables` and `relations`. Remaining fields are read leniently.

use crate::model::{Position, SchemaGraph};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

const BUNDLED_EXAMPLE: &str = include_str!("../assets/example-schema.json");

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("Document must be a JSON object")]
    NotAnObject,
    #[error("Document is missing `{0}`")]
    MissingField(&'static str),
    #[error("Malformed document: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Parse document text.
pub fn parse(text: &str) -> Result<SchemaGraph, DocumentError> {
    let value: Value = serde_json::from_str(text).map_err(DocumentError::Syntax)?;
    from_value(value)
}

/// Validate an already-parsed JSON value and read it as a document.
pub fn from_value(value: Value) -> Result<SchemaGraph, DocumentError> {
    let Value::Object(mut object) = value else {
        return Err(DocumentError::NotAnObject);
    };

    for field in ["tables", "relations"] {
        if object.get(field).is_none_or(Value::is_null) {
            return Err(DocumentError::MissingField(field));
        }
    }

    hoist_layout_nodes(&mut object)?;

    serde_json::from_value(Value::Object(object)).map_err(DocumentError::Shape)
}

/// Some documents keep positions under `layout.nodes` instead of
/// `positions`. Move them so the rest of the crate sees one shape.
fn hoist_layout_nodes(object: &mut Map<String, Value>) -> Result<(), DocumentError> {
    if object.get("positions").is_some_and(|p| !p.is_null()) {
        return Ok(());
    }

    let Some(Value::Object(layout)) = object.get_mut("layout") else {
        return Ok(());
    };
    let Some(nodes) = layout.remove("nodes") else {
        return Ok(());
    };
    if layout.is_empty() {
        object.remove("layout");
    }

    let nodes: BTreeMap<String, Position> =
        serde_json::from_value(nodes).map_err(DocumentError::Shape)?;
    object.insert(
        "positions".to_string(),
        serde_json::to_value(nodes).map_err(DocumentError::Shape)?,
    );
    Ok(())
}

/// Pretty-printed JSON, as written by export and the file store.
pub fn to_pretty_json(graph: &SchemaGraph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(graph)
}

/// The example schema shipped with the crate, used when nothing was saved.
pub fn bundled_example() -> SchemaGraph {
    parse(BUNDLED_EXAMPLE).expect("bundled example schema is a valid document")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let graph = parse(r#"{ "tables": [], "relations": [] }"#).unwrap();
        assert!(graph.tables.is_empty());
        assert!(graph.positions.is_none());
    }

    #[test]
    fn test_missing_relations() {
        let err = parse(r#"{ "tables": [] }"#).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField("relations")));
    }

    #[test]
    fn test_null_tables() {
        let err = parse(r#"{ "tables": null, "relations": [] }"#).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField("tables")));
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(parse("[1, 2]"), Err(DocumentError::NotAnObject)));
    }

    #[test]
    fn test_invalid_syntax() {
        let err = parse("{ tables: ").unwrap_err();
        assert!(matches!(err, DocumentError::Syntax(_)));
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_wrong_field_type() {
        let err = parse(r#"{ "tables": "users", "relations": [] }"#).unwrap_err();
        assert!(matches!(err, DocumentError::Shape(_)));
    }

    #[test]
    fn test_layout_nodes_variant() {
        let graph = parse(
            r#"{
                "tables": [{ "name": "users" }],
                "relations": [],
                "layout": { "nodes": { "users": { "x": 2, "y": 1, "z": 3 } } }
            }"#,
        )
        .unwrap();

        assert_eq!(graph.position("users"), Some(Position::new(2.0, 1.0, 3.0)));
        assert!(!graph.extra.contains_key("layout"));
    }

    #[test]
    fn test_positions_take_precedence_over_layout() {
        let graph = parse(
            r#"{
                "tables": [{ "name": "users" }],
                "relations": [],
                "positions": { "users": { "x": 1, "y": 0, "z": 1 } },
                "layout": { "nodes": { "users": { "x": 9, "y": 9, "z": 9 } } }
            }"#,
        )
        .unwrap();

        assert_eq!(graph.position("users"), Some(Position::new(1.0, 0.0, 1.0)));
        assert!(graph.extra.contains_key("layout"));
    }

    #[test]
    fn test_bundled_example_parses() {
        let graph = bundled_example();
        assert!(!graph.tables.is_empty());
        assert!(!graph.relations.is_empty());
    }

    #[test]
    fn test_pretty_json_round_trip() {
        let graph = bundled_example();
        let text = to_pretty_json(&graph).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(parse(&text).unwrap(), graph);
    }
}
