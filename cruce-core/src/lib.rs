//! cruce-core: spreadsheet cleaning and sales/vendor price reconciliation
//!
//! Two operations make up the public surface:
//!
//! - [`extract_clean_dataset`] turns the raw grid of a sales-report export
//!   into typed rows under the strict template rules.
//! - [`merge_datasets`] cross-references a sales grid with one or more
//!   vendor price-list grids by normalized product code and emits an
//!   enriched output grid plus a no-match subset.
//!
//! Both are pure grid-to-grid functions; file decoding ([`reader`]) and
//! workbook serialization ([`writer`]) are thin adapters around them.

pub mod clean;
pub mod coerce;
pub mod config;
pub mod error;
pub mod grid;
pub mod header;
pub mod key;
pub mod merge;
pub mod reader;
pub mod writer;

pub use clean::{CleanDataset, CleanRow, extract_clean_dataset};
pub use coerce::{SentinelPolicy, coerce_number, coerce_string};
pub use config::MergeConfig;
pub use error::{CleanError, HeaderError, MergeError};
pub use grid::{CellValue, RawGrid};
pub use key::normalize_key;
pub use merge::{
    MatchStatus, MergeOptions, MergeOutput, MergeStats, SkippedVendor, VendorSkipReason,
    merge_datasets,
};
