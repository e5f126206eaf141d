//! Error taxonomy for the extraction and merge pipelines
//!
//! Structural problems (no header row, a required column missing) abort an
//! operation; per-cell problems never do, they degrade to null fields in
//! coercion.

use thiserror::Error;

/// Header-row location failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("no header row found within the scanned window")]
    NotFound,
}

/// Single-sheet clean-extraction failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CleanError {
    #[error("the file is empty")]
    EmptyGrid,
    #[error("no valid header row detected; the sheet needs 'Ramo', 'Código' and 'Precio' columns")]
    HeaderNotFound,
    #[error("required column '{0}' is missing or misplaced")]
    MissingRequiredColumn(&'static str),
}

/// Sales/vendor merge failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("the sales file is empty")]
    EmptySalesFile,
    #[error("no valid header row found in the sales file; it needs 'Código' and 'Precio' columns")]
    SalesHeaderNotFound,
    #[error("the sales file has no 'Código' column")]
    MissingSalesCodeColumn,
    #[error(
        "none of the vendor files had a usable layout ('Cod Art', 'Estado' and 'Margen int Lista 1' are required)"
    )]
    NoUsableVendorFile,
}
