//! Cell and grid model at the decoder boundary

use calamine::{Data, Range};

/// A single decoded cell value.
///
/// Closed union normalized out of the decoder's dynamic cell types. Nothing
/// past the coercion layer should need to match on this directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
    /// Values the decoder hands over as pre-rendered text: booleans, error
    /// literals, ISO date/duration strings.
    RichText(String),
}

impl CellValue {
    /// Check if the cell is blank
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Render the cell as the string a spreadsheet user would see.
    /// Blank cells have no rendering; integral numbers drop the `.0` tail.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Blank => None,
            CellValue::Text(s) | CellValue::RichText(s) => Some(s.clone()),
            CellValue::Number(n) => Some(n.to_string()),
        }
    }
}

/// Ordered rows of ordered cells, as produced by the spreadsheet decoder.
pub type RawGrid = Vec<Vec<CellValue>>;

/// Convert a calamine range into a dense grid anchored at A1.
///
/// The used range may start below/right of A1; leading rows and columns are
/// padded with blanks so grid indices match sheet positions.
pub fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let Some(start) = range.start() else {
        return Vec::new();
    };

    let lead_rows = start.0 as usize;
    let lead_cols = start.1 as usize;

    let mut grid = Vec::with_capacity(lead_rows + range.height());
    for _ in 0..lead_rows {
        grid.push(Vec::new());
    }

    for row in range.rows() {
        let mut cells = Vec::with_capacity(lead_cols + row.len());
        for _ in 0..lead_cols {
            cells.push(CellValue::Blank);
        }
        for data in row {
            cells.push(convert_cell(data));
        }
        grid.push(cells);
    }

    grid
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Blank,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::RichText(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::RichText(format!("{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::RichText(s.clone()),
        Data::DurationIso(s) => CellValue::RichText(s.clone()),
    }
}

/// Check whether a row has at least one cell with visible content.
pub fn row_has_content(row: &[CellValue]) -> bool {
    row.iter()
        .any(|cell| cell.as_text().is_some_and(|s| !s.trim().is_empty()))
}

/// Get the cell at `idx`, treating out-of-range and unresolved columns as blank.
pub fn cell_at(row: &[CellValue], idx: Option<usize>) -> &CellValue {
    idx.and_then(|i| row.get(i)).unwrap_or(&CellValue::Blank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_renders_without_decimal_tail() {
        assert_eq!(CellValue::Number(123.0).as_text().as_deref(), Some("123"));
        assert_eq!(CellValue::Number(12.5).as_text().as_deref(), Some("12.5"));
    }

    #[test]
    fn test_range_padding_preserves_sheet_positions() {
        // Used range starting at C3 (row 2, col 2)
        let mut range: Range<Data> = Range::new((2, 2), (2, 3));
        range.set_value((2, 2), Data::String("Código".to_string()));
        range.set_value((2, 3), Data::Float(7.0));

        let grid = grid_from_range(&range);
        assert_eq!(grid.len(), 3);
        assert!(grid[0].is_empty());
        assert_eq!(grid[2][0], CellValue::Blank);
        assert_eq!(grid[2][2], CellValue::Text("Código".to_string()));
        assert_eq!(grid[2][3], CellValue::Number(7.0));
    }

    #[test]
    fn test_row_content_detection() {
        assert!(!row_has_content(&[]));
        assert!(!row_has_content(&[
            CellValue::Blank,
            CellValue::Text("   ".to_string())
        ]));
        assert!(row_has_content(&[
            CellValue::Blank,
            CellValue::Number(0.0)
        ]));
    }
}
