use crate::layout::PlanarPoint;
use crate::model::Table;
use unicode_width::UnicodeWidthStr;

/// Sizing of table boxes on the ground plane, in scene units.
pub struct FootprintMetrics {
    pub char_width: f64,
    pub row_depth: f64,
    pub padding: f64,
    pub header_depth: f64,
    pub min_width: f64,
    pub min_depth: f64,
}

impl Default for FootprintMetrics {
    fn default() -> Self {
        Self {
            char_width: 0.12,
            row_depth: 0.3,
            padding: 0.4,
            header_depth: 0.6,
            min_width: 2.0,
            min_depth: 1.5,
        }
    }
}

/// Axis-aligned rectangle a table occupies, centered on its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center: PlanarPoint,
    pub width: f64,
    pub depth: f64,
}

impl Footprint {
    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        let dx = (self.center.x - other.center.x).abs();
        let dz = (self.center.z - other.center.z).abs();
        dx < (self.width + other.width) / 2.0 && dz < (self.depth + other.depth) / 2.0
    }
}

impl FootprintMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    pub fn size(&self, table: &Table) -> (f64, f64) {
        let header_width = self.text_width(&table.name);

        let max_col_width = table
            .columns
            .iter()
            .map(|c| self.text_width(&c.name) + self.text_width(&c.typ) + self.char_width * 2.0)
            .fold(0.0, f64::max);

        let width = (header_width.max(max_col_width) + self.padding * 2.0).max(self.min_width);
        let depth = (self.header_depth
            + table.columns.len() as f64 * self.row_depth
            + self.padding * 2.0)
            .max(self.min_depth);

        (width, depth)
    }

    pub fn footprint(&self, table: &Table, center: PlanarPoint) -> Footprint {
        let (width, depth) = self.size(table);
        Footprint {
            center,
            width,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    #[test]
    fn test_ascii_width() {
        let m = FootprintMetrics::default();
        assert!((m.text_width("User") - 4.0 * 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_wide_table_names_get_wider_footprints() {
        let m = FootprintMetrics::default();
        // four CJK characters take eight display cells
        assert!((m.text_width("ユーザー") - 8.0 * m.char_width).abs() < 1e-9);

        let wide = Table::new("顧客注文明細テーブル");
        let narrow = Table::new("order_item");
        assert!(m.size(&wide).0 > m.size(&narrow).0);
    }

    #[test]
    fn test_minimum_size() {
        let m = FootprintMetrics::default();
        let (w, d) = m.size(&Table::new("t"));
        assert_eq!(w, m.min_width);
        assert_eq!(d, m.min_depth);
    }

    #[test]
    fn test_size_grows_with_columns() {
        let m = FootprintMetrics::default();
        let table = Table {
            columns: (0..10)
                .map(|i| Column::new(format!("a_rather_long_column_{}", i), "timestamptz"))
                .collect(),
            ..Table::new("events")
        };
        let (w, d) = m.size(&table);
        assert!(w > m.min_width);
        assert!(d > m.min_depth);
    }

    #[test]
    fn test_overlap() {
        let m = FootprintMetrics::default();
        let a = m.footprint(&Table::new("a"), PlanarPoint::new(0.0, 0.0));
        let near = m.footprint(&Table::new("b"), PlanarPoint::new(1.0, 0.5));
        let touching = m.footprint(&Table::new("b"), PlanarPoint::new(2.0, 0.0));
        let far = m.footprint(&Table::new("b"), PlanarPoint::new(4.0, 0.0));

        assert!(a.overlaps(&near));
        assert!(!a.overlaps(&touching));
        assert!(!a.overlaps(&far));
    }
}
