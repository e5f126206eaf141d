//! Output workbook serialization via rust_xlsxwriter

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

use crate::clean::CleanDataset;
use crate::grid::{CellValue, RawGrid};
use crate::merge::MergeOutput;

pub const CLEAN_SHEET: &str = "DATASET_LIMPIO";
pub const ENRICHED_SHEET: &str = "VENTAS_ENRIQUECIDAS";
pub const NO_MATCH_SHEET: &str = "NO_MATCH";

fn write_grid(worksheet: &mut Worksheet, grid: &RawGrid) -> Result<()> {
    for (row_idx, row) in grid.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row_idx = row_idx as u32;
            let col_idx = col_idx as u16;
            match cell {
                CellValue::Blank => {}
                CellValue::Text(s) | CellValue::RichText(s) => {
                    worksheet.write_string(row_idx, col_idx, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row_idx, col_idx, *n)?;
                }
            }
        }
    }
    Ok(())
}

/// Write a clean dataset as a single-sheet workbook.
pub fn write_clean<P: AsRef<Path>>(path: P, dataset: &CleanDataset) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name(CLEAN_SHEET)?;
    write_grid(worksheet, &dataset.to_output_grid())?;

    workbook
        .save(path.as_ref())
        .with_context(|| format!("Failed to write workbook: {}", path.as_ref().display()))?;
    Ok(())
}

/// Write a merge result: the enriched sheet, plus the no-match sheet when it
/// has data rows.
pub fn write_merge<P: AsRef<Path>>(path: P, output: &MergeOutput) -> Result<()> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet().set_name(ENRICHED_SHEET)?;
    write_grid(worksheet, &output.enriched)?;

    if output.no_match.len() > 1 {
        let worksheet = workbook.add_worksheet().set_name(NO_MATCH_SHEET)?;
        write_grid(worksheet, &output.no_match)?;
    }

    workbook
        .save(path.as_ref())
        .with_context(|| format!("Failed to write workbook: {}", path.as_ref().display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{MergeStats, SkippedVendor};

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn read_back(path: &Path) -> RawGrid {
        crate::reader::read_grid(path).unwrap()
    }

    #[test]
    fn test_merge_workbook_round_trip() {
        let output = MergeOutput {
            enriched: vec![
                vec![t("Código"), t("MATCH_STATUS")],
                vec![t("A1"), t("MATCH"), CellValue::Number(9.5)],
            ],
            no_match: vec![vec![t("Código"), t("MATCH_STATUS")]],
            skipped_vendors: vec![SkippedVendor {
                index: 0,
                reason: crate::merge::VendorSkipReason::Empty,
            }],
            stats: MergeStats::default(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_merge(&path, &output).unwrap();

        let grid = read_back(&path);
        assert_eq!(grid[0][0], t("Código"));
        assert_eq!(grid[1][1], t("MATCH"));
        assert_eq!(grid[1][2], CellValue::Number(9.5));
    }

    #[test]
    fn test_no_match_sheet_omitted_when_empty() {
        let output = MergeOutput {
            enriched: vec![vec![t("Código")]],
            no_match: vec![vec![t("Código")]], // header only
            skipped_vendors: Vec::new(),
            stats: MergeStats::default(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_merge(&path, &output).unwrap();

        use calamine::Reader;
        let mut workbook = calamine::open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec![ENRICHED_SHEET.to_string()]);
        let _ = workbook.worksheet_range(ENRICHED_SHEET).unwrap();
    }
}
