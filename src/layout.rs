use crate::model::{Position, SchemaGraph, Table};
use std::collections::BTreeMap;

/// Distance between neighbouring cells of the fallback grid.
pub const GRID_SPACING: f64 = 4.0;

/// A point on the ground plane. Dragging never changes height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPoint {
    pub x: f64,
    pub z: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

impl From<Position> for PlanarPoint {
    fn from(p: Position) -> Self {
        Self { x: p.x, z: p.z }
    }
}

/// Row-major grid placement by table order: `ceil(sqrt(n))` columns,
/// `GRID_SPACING` apart, at ground height.
pub fn fallback_grid_positions(tables: &[Table]) -> BTreeMap<String, Position> {
    if tables.is_empty() {
        return BTreeMap::new();
    }

    let column_count = (tables.len() as f64).sqrt().ceil() as usize;

    tables
        .iter()
        .enumerate()
        .map(|(i, table)| {
            let column = i % column_count;
            let row = i / column_count;
            (
                table.name.clone(),
                Position::new(column as f64 * GRID_SPACING, 0.0, row as f64 * GRID_SPACING),
            )
        })
        .collect()
}

/// Explicit positions where saved, fallback grid cells for the rest.
/// Computed on read; the fallback cells are never written back.
pub fn resolve_positions(graph: &SchemaGraph) -> BTreeMap<String, Position> {
    let fallback = fallback_grid_positions(&graph.tables);

    graph
        .tables
        .iter()
        .filter_map(|table| {
            graph
                .position(&table.name)
                .or_else(|| fallback.get(&table.name).copied())
                .map(|p| (table.name.clone(), p))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(names: &[&str]) -> Vec<Table> {
        names.iter().map(|n| Table::new(*n)).collect()
    }

    #[test]
    fn test_grid_two_tables() {
        let grid = fallback_grid_positions(&tables(&["users", "orders"]));
        assert_eq!(grid["users"], Position::new(0.0, 0.0, 0.0));
        assert_eq!(grid["orders"], Position::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_grid_row_major() {
        let grid = fallback_grid_positions(&tables(&["a", "b", "c", "d", "e"]));
        // five tables -> three columns
        assert_eq!(grid["c"], Position::new(8.0, 0.0, 0.0));
        assert_eq!(grid["d"], Position::new(0.0, 0.0, 4.0));
        assert_eq!(grid["e"], Position::new(4.0, 0.0, 4.0));
    }

    #[test]
    fn test_grid_deterministic() {
        let input = tables(&["a", "b", "c"]);
        assert_eq!(fallback_grid_positions(&input), fallback_grid_positions(&input));
    }

    #[test]
    fn test_grid_reorder() {
        let forward = fallback_grid_positions(&tables(&["a", "b"]));
        let reversed = fallback_grid_positions(&tables(&["b", "a"]));
        assert_eq!(forward["a"], reversed["b"]);
        assert_eq!(forward["b"], reversed["a"]);
    }

    #[test]
    fn test_grid_empty() {
        assert!(fallback_grid_positions(&[]).is_empty());
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let graph = SchemaGraph {
            tables: tables(&["users", "orders"]),
            positions: Some(BTreeMap::from([(
                "users".to_string(),
                Position::new(-3.0, 1.0, 7.0),
            )])),
            ..Default::default()
        };

        let resolved = resolve_positions(&graph);
        assert_eq!(resolved["users"], Position::new(-3.0, 1.0, 7.0));
        assert_eq!(resolved["orders"], Position::new(4.0, 0.0, 0.0));
        // fallback cells stay out of the document
        assert!(graph.position("orders").is_none());
    }
}
