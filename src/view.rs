use crate::layout::resolve_positions;
use crate::model::{Position, Scenario, SchemaGraph};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// What the viewer renders: the (possibly filtered) document plus the
/// resolved position of every table in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub document: SchemaGraph,
    pub positions: BTreeMap<String, Position>,
}

impl GraphView {
    /// Positions are resolved on the whole document before filtering, so a
    /// table without a saved position keeps its grid cell inside a scenario.
    pub fn new(graph: &SchemaGraph, scenario: Option<&Scenario>) -> Self {
        let resolved = resolve_positions(graph);

        let Some(scenario) = scenario else {
            return Self {
                document: graph.clone(),
                positions: resolved,
            };
        };

        let members: HashSet<&str> = scenario.table_names.iter().map(|s| s.as_str()).collect();

        let tables = graph
            .tables
            .iter()
            .filter(|t| members.contains(t.name.as_str()))
            .cloned()
            .collect();

        let relations = graph
            .relations
            .iter()
            .filter(|r| {
                members.contains(r.from_table.as_str()) && members.contains(r.to_table.as_str())
            })
            .cloned()
            .collect();

        let saved = graph.positions.as_ref().map(|positions| {
            positions
                .iter()
                .filter(|(name, _)| members.contains(name.as_str()))
                .map(|(name, p)| (name.clone(), *p))
                .collect()
        });

        let positions = resolved
            .into_iter()
            .filter(|(name, _)| members.contains(name.as_str()))
            .collect();

        Self {
            document: SchemaGraph {
                tables,
                relations,
                positions: saved,
                // the scenario list stays complete so the switcher keeps working
                scenarios: graph.scenarios.clone(),
                extra: graph.extra.clone(),
            },
            positions,
        }
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.document.has_table(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Relation, Table};

    fn graph() -> SchemaGraph {
        let relation = |from: &str, to: &str| Relation {
            name: format!("fk_{}_{}", from, to),
            from_table: from.to_string(),
            from_columns: vec!["x".to_string()],
            to_table: to.to_string(),
            to_columns: vec!["id".to_string()],
            ..Default::default()
        };
        SchemaGraph {
            tables: vec![Table::new("users"), Table::new("orders"), Table::new("products")],
            relations: vec![relation("orders", "users"), relation("orders", "products")],
            positions: Some(BTreeMap::from([
                ("users".to_string(), Position::new(1.0, 0.0, 1.0)),
                ("products".to_string(), Position::new(9.0, 0.0, 9.0)),
            ])),
            scenarios: Some(vec![
                Scenario {
                    id: "a".to_string(),
                    table_names: vec!["users".to_string(), "orders".to_string()],
                    ..Default::default()
                },
                Scenario {
                    id: "b".to_string(),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_unfiltered() {
        let graph = graph();
        let view = GraphView::new(&graph, None);
        assert_eq!(view.document, graph);
        assert_eq!(view.positions.len(), 3);
    }

    #[test]
    fn test_filtered_by_scenario() {
        let graph = graph();
        let view = GraphView::new(&graph, graph.scenario("a"));

        assert_eq!(view.document.table_names(), vec!["users", "orders"]);
        assert_eq!(view.document.relations.len(), 1);
        assert_eq!(view.document.relations[0].to_table, "users");
        assert_eq!(view.document.scenarios().len(), 2);

        let saved = view.document.positions.as_ref().unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved.contains_key("users"));

        assert_eq!(view.positions.len(), 2);
        // orders keeps the grid cell it has in the full document
        assert_eq!(view.positions["orders"], Position::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_scenario() {
        let graph = graph();
        let view = GraphView::new(&graph, graph.scenario("b"));
        assert!(view.document.tables.is_empty());
        assert!(view.document.relations.is_empty());
        assert!(!view.contains_table("users"));
    }
}
