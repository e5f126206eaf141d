//! Spreadsheet file reading via calamine

use anyhow::{Context, Result};
use calamine::{Reader, open_workbook_auto};
use std::path::Path;

use crate::grid::{RawGrid, grid_from_range};

/// Read the first sheet of a workbook as a raw grid.
///
/// Uploads always carry their data on the first sheet; extra sheets are
/// ignored. The format (xlsx/xls/ods) is detected from the file itself.
pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<RawGrid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("Workbook has no sheets: {}", path.display()))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .with_context(|| format!("Failed to read sheet '{first_sheet}' of {}", path.display()))?;

    Ok(grid_from_range(&range))
}
