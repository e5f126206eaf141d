//! Header-row location inside loosely structured sheets
//!
//! Exported sheets carry titles, filters and blank rows above the real
//! header, at no fixed position. The header row is found by scanning a
//! bounded window for a row whose cells contain a set of marker tokens.

use crate::error::HeaderError;
use crate::grid::RawGrid;

/// Tokens that must all be present in a single row for it to qualify as the
/// header row. Each group is an any-of list of alternative spellings; groups
/// combine as a logical AND.
#[derive(Debug, Clone, Copy)]
pub struct MarkerSet {
    groups: &'static [&'static [&'static str]],
}

/// Markers for the single-sheet clean template.
pub const CLEAN_MARKERS: MarkerSet = MarkerSet {
    groups: &[&["código", "codigo"], &["ramo"], &["precio"]],
};

/// Markers for the sales sheet on the merge path. Some exports drop the
/// gross "Precio" column, so any price-column spelling qualifies.
pub const SALES_MARKERS: MarkerSet = MarkerSet {
    groups: &[
        &["código", "codigo"],
        &["precio", "pr neto", "pr. neto", "precio neto"],
    ],
};

/// Markers for vendor price-list sheets.
pub const VENDOR_MARKERS: MarkerSet = MarkerSet {
    groups: &[&["cod art"], &["estado"], &["descripcion"]],
};

/// A located header row: its index in the grid and its trimmed labels,
/// with trailing empty labels pruned.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
    pub index: usize,
    pub labels: Vec<String>,
}

/// Scan the first `scan_window` rows for the first one satisfying `markers`.
pub fn locate_header(
    grid: &RawGrid,
    markers: &MarkerSet,
    scan_window: usize,
) -> Result<HeaderRow, HeaderError> {
    for (index, row) in grid.iter().take(scan_window).enumerate() {
        let lowered: Vec<String> = row
            .iter()
            .map(|cell| {
                cell.as_text()
                    .map(|s| s.trim().to_lowercase())
                    .unwrap_or_default()
            })
            .collect();

        let satisfied = markers.groups.iter().all(|group| {
            group
                .iter()
                .any(|token| lowered.iter().any(|label| label == token))
        });

        if satisfied {
            let mut labels: Vec<String> = row
                .iter()
                .map(|cell| {
                    cell.as_text()
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default()
                })
                .collect();
            while labels.last().is_some_and(|label| label.is_empty()) {
                labels.pop();
            }
            return Ok(HeaderRow { index, labels });
        }
    }

    Err(HeaderError::NotFound)
}

impl HeaderRow {
    /// Find a column by case-insensitive exact match against alias spellings.
    pub fn find_exact(&self, aliases: &[&str]) -> Option<usize> {
        self.labels.iter().position(|label| {
            let lowered = label.to_lowercase();
            aliases.iter().any(|alias| lowered == *alias)
        })
    }

    /// Find a column whose label starts with `prefix` (case-insensitive).
    pub fn find_prefix(&self, prefix: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|label| label.to_lowercase().starts_with(prefix))
    }

    /// Find a column whose label contains `needle` (case-insensitive).
    pub fn find_contains(&self, needle: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|label| label.to_lowercase().contains(needle))
    }

    /// Accept the column right after `primary` only when it carries a generic
    /// description label. Template convention: a code-like column is followed
    /// unconditionally by its description column, so a `Descripción` anywhere
    /// else in the sheet must not be picked up.
    pub fn description_after(&self, primary: usize) -> Option<usize> {
        let next = primary + 1;
        let label = self.labels.get(next)?.to_lowercase();
        match label.as_str() {
            "descripción" | "descripcion" | "detalle" => Some(next),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    CellValue::Blank
                } else {
                    CellValue::Text((*s).to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_first_qualifying_row_wins() {
        let grid = vec![
            text_row(&["Reporte de ventas"]),
            text_row(&[]),
            text_row(&["Ramo", "Precio"]), // missing código, not a header
            text_row(&["Ramo", "Código", "Descripción", "Precio"]),
            text_row(&["Ramo", "Código", "Descripción", "Precio"]),
        ];

        let header = locate_header(&grid, &CLEAN_MARKERS, 20).unwrap();
        assert_eq!(header.index, 3);
        assert_eq!(header.labels[1], "Código");
    }

    #[test]
    fn test_not_found_within_window() {
        let mut grid = vec![text_row(&["nada"]); 25];
        grid.push(text_row(&["Ramo", "Código", "Precio"]));

        // Header exists at row 25 but the window stops at 20
        assert_eq!(
            locate_header(&grid, &CLEAN_MARKERS, 20),
            Err(HeaderError::NotFound)
        );
        assert!(locate_header(&grid, &CLEAN_MARKERS, 30).is_ok());
    }

    #[test]
    fn test_trailing_empty_labels_pruned() {
        let grid = vec![text_row(&["Código", "Ramo", "Precio", "", "  ", ""])];
        let header = locate_header(&grid, &CLEAN_MARKERS, 20).unwrap();
        assert_eq!(header.labels, vec!["Código", "Ramo", "Precio"]);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let grid = vec![text_row(&["CÓDIGO", "Descripción", "RAMO", "precio"])];
        let header = locate_header(&grid, &CLEAN_MARKERS, 20).unwrap();
        assert_eq!(header.find_exact(&["código", "codigo"]), Some(0));
        assert_eq!(header.find_exact(&["precio"]), Some(3));
        assert_eq!(header.find_exact(&["pr neto", "pr. neto"]), None);
    }

    #[test]
    fn test_description_adjacency_rule() {
        let grid = vec![text_row(&[
            "Código",
            "Descripción",
            "Marca",
            "Bonific.",
            "Descripción", // not adjacent to Marca
            "Ramo",
            "Precio",
        ])];
        let header = locate_header(&grid, &CLEAN_MARKERS, 20).unwrap();

        let codigo = header.find_exact(&["código", "codigo"]).unwrap();
        assert_eq!(header.description_after(codigo), Some(1));

        let marca = header.find_exact(&["marca"]).unwrap();
        assert_eq!(header.description_after(marca), None);
    }

    #[test]
    fn test_prefix_and_contains_lookups() {
        let grid = vec![text_row(&[
            "Código",
            "Ramo",
            "Precio",
            "Bonific.",
            "Margen int Lista 1 (%)",
        ])];
        let header = locate_header(&grid, &CLEAN_MARKERS, 20).unwrap();
        assert_eq!(header.find_prefix("bonific"), Some(3));
        assert_eq!(header.find_contains("margen int lista 1"), Some(4));
    }
}
