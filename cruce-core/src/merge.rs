//! Sales/vendor dataset merging
//!
//! Builds a keyed lookup from one or more vendor price-list grids, then
//! walks the sales grid probing the lookup per row and emitting the original
//! row enriched with the vendor's list-1 figures and reconciliation fields.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::coerce::{SentinelPolicy, coerce_number, coerce_string};
use crate::error::MergeError;
use crate::grid::{CellValue, RawGrid, cell_at, row_has_content};
use crate::header::{SALES_MARKERS, VENDOR_MARKERS, locate_header};
use crate::key::normalize_key;

/// Labels appended after the original sales headers, in output order.
pub const DERIVED_HEADERS: [&str; 10] = [
    "EDELORO_ESTADO",
    "LISTA1_MargenInt",
    "LISTA1_PrecioNeto",
    "LISTA1_IVA",
    "LISTA1_PrecioFinal_cIVA",
    "MATCH_STATUS",
    "VENTA_PrecioNetoUnit",
    "LISTA1_TotalNeto",
    "DIF_Unit_vs_LISTA1",
    "DIF_Total_vs_LISTA1",
];

/// Status value marking an active ("habilitado") vendor item.
const ACTIVE_STATUS: &str = "hab.";

/// Vendor sheets intersperse section-separator text rows between products;
/// a "code" longer than this containing a space is one of those.
const MAX_CODE_TEXT_LEN: usize = 20;

/// Tunable knobs of the merge pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Absolute tolerance, in currency units, used to decide whether the
    /// sales sheet's net price is a unit price or a row total.
    pub unit_price_tolerance: f64,
    /// Rows scanned for the sales header.
    pub sales_scan_window: usize,
    /// Rows scanned for each vendor header.
    pub vendor_scan_window: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            unit_price_tolerance: 2.0,
            sales_scan_window: 30,
            vendor_scan_window: 50,
        }
    }
}

/// List-1 figures for one product code, as read from a vendor sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorEntry {
    pub estado: Option<String>,
    pub margen_int: Option<f64>,
    pub precio_neto: Option<f64>,
    pub iva: Option<f64>,
    pub precio_final: Option<f64>,
}

impl VendorEntry {
    fn is_active(&self) -> bool {
        self.estado
            .as_deref()
            .is_some_and(|estado| estado.to_lowercase() == ACTIVE_STATUS)
    }
}

/// Product-code key to vendor entry.
pub type VendorLookup = HashMap<String, VendorEntry>;

/// Insert when the key is absent; an existing non-active entry may be
/// upgraded by an active one, an active entry is never replaced.
fn upsert(lookup: &mut VendorLookup, key: String, entry: VendorEntry) {
    match lookup.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
        }
        Entry::Occupied(mut slot) => {
            if !slot.get().is_active() && entry.is_active() {
                slot.insert(entry);
            }
        }
    }
}

/// Why a vendor file contributed nothing to the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VendorSkipReason {
    /// The grid had no rows at all.
    Empty,
    /// No row satisfied the vendor header markers within the scan window.
    NoHeader,
    /// The "Margen int Lista 1" anchor column was not found.
    NoMarginAnchor,
}

impl fmt::Display for VendorSkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            VendorSkipReason::Empty => "file is empty",
            VendorSkipReason::NoHeader => {
                "no header row with 'Cod Art', 'Estado' and 'Descripcion'"
            }
            VendorSkipReason::NoMarginAnchor => "no 'Margen int Lista 1' column",
        };
        write!(f, "{}", msg)
    }
}

/// A vendor file that was skipped, with its position in the input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedVendor {
    pub index: usize,
    pub reason: VendorSkipReason,
}

/// How a sales row resolved against the vendor lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    Match,
    MatchAnul,
    NoMatch,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Match => "MATCH",
            MatchStatus::MatchAnul => "MATCH_ANUL",
            MatchStatus::NoMatch => "NO_MATCH",
        }
    }
}

/// Partition counts over the emitted sales rows.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub total: usize,
    pub matched: usize,
    pub matched_anul: usize,
    pub no_match: usize,
}

/// Merge result: the enriched grid, the no-match subset, per-file skip
/// diagnostics and partition stats. Both grids start with the combined
/// header row; trailing blank cells are trimmed from every row.
#[derive(Debug)]
pub struct MergeOutput {
    pub enriched: RawGrid,
    pub no_match: RawGrid,
    pub skipped_vendors: Vec<SkippedVendor>,
    pub stats: MergeStats,
}

/// Fold one vendor grid into a lookup, or report why it is unusable.
fn ingest_vendor_grid(
    grid: &RawGrid,
    options: &MergeOptions,
) -> Result<VendorLookup, VendorSkipReason> {
    if grid.is_empty() {
        return Err(VendorSkipReason::Empty);
    }

    let header = locate_header(grid, &VENDOR_MARKERS, options.vendor_scan_window)
        .map_err(|_| VendorSkipReason::NoHeader)?;

    let (Some(cod_col), Some(estado_col)) = (
        header.find_exact(&["cod art"]),
        header.find_exact(&["estado"]),
    ) else {
        return Err(VendorSkipReason::NoHeader);
    };

    let margin_col = header
        .find_contains("margen int lista 1")
        .ok_or(VendorSkipReason::NoMarginAnchor)?;

    // Fixed positional contract: the three columns after the margin anchor
    // are net price, tax and final price for list 1.
    let mut lookup = VendorLookup::new();

    for row in &grid[header.index + 1..] {
        if row.is_empty() {
            continue;
        }

        let code = cell_at(row, Some(cod_col));
        if code.is_blank() {
            continue;
        }
        if let CellValue::Text(s) | CellValue::RichText(s) = code {
            if s.chars().count() > MAX_CODE_TEXT_LEN && s.contains(' ') {
                continue;
            }
        }

        let code_key = normalize_key(code);
        if code_key.is_empty() {
            continue;
        }

        let parse = |offset: usize| {
            coerce_number(cell_at(row, Some(margin_col + offset)), SentinelPolicy::Filter)
        };

        let entry = VendorEntry {
            estado: coerce_string(cell_at(row, Some(estado_col))),
            margen_int: parse(0),
            precio_neto: parse(1),
            iva: parse(2),
            precio_final: parse(3),
        };

        upsert(&mut lookup, code_key, entry);
    }

    Ok(lookup)
}

/// Ingest every vendor grid and fold the per-file lookups in input order.
///
/// Files are independent, so ingestion runs in parallel; the upgrade rule is
/// commutative per key, and the ordered fold keeps the sequential
/// first-entry-wins behavior for ties between active entries.
fn build_vendor_lookup(
    vendor_grids: &[RawGrid],
    options: &MergeOptions,
) -> (VendorLookup, Vec<SkippedVendor>) {
    let per_file: Vec<Result<VendorLookup, VendorSkipReason>> = vendor_grids
        .par_iter()
        .map(|grid| ingest_vendor_grid(grid, options))
        .collect();

    let mut lookup = VendorLookup::new();
    let mut skipped = Vec::new();

    for (index, result) in per_file.into_iter().enumerate() {
        match result {
            Ok(file_lookup) => {
                for (code_key, entry) in file_lookup {
                    upsert(&mut lookup, code_key, entry);
                }
            }
            Err(reason) => skipped.push(SkippedVendor { index, reason }),
        }
    }

    (lookup, skipped)
}

/// Resolve the unit net price of a sales row.
///
/// The sales template is inconsistent about whether "Pr Neto" holds a unit
/// price or a row total; the row's own quantity and total are used to decide,
/// within `tolerance` currency units.
fn sale_net_unit_price(
    pr_neto: Option<f64>,
    importes_netos: Option<f64>,
    cantidad: Option<f64>,
    tolerance: f64,
) -> Option<f64> {
    match (pr_neto, cantidad) {
        (Some(unit), Some(qty)) if qty > 0.0 => {
            if let Some(total) = importes_netos {
                if (unit * qty - total).abs() < tolerance {
                    // Pr Neto already is a unit price
                    return Some(unit);
                }
                if (unit - total).abs() < tolerance && qty > 1.0 {
                    // Pr Neto was mistakenly the row total
                    return Some(total / qty);
                }
                return Some(total / qty);
            }
            Some(unit)
        }
        (Some(unit), _) => Some(unit),
        (None, Some(qty)) if qty > 0.0 => importes_netos.map(|total| total / qty),
        _ => None,
    }
}

fn opt_number(value: Option<f64>) -> CellValue {
    value.map(CellValue::Number).unwrap_or(CellValue::Blank)
}

fn opt_text(value: Option<&str>) -> CellValue {
    value
        .map(|s| CellValue::Text(s.to_string()))
        .unwrap_or(CellValue::Blank)
}

/// Trim wholly-trailing blank cells from every row.
fn trim_trailing_blanks(grid: &mut RawGrid) {
    for row in grid {
        while row.last().is_some_and(|cell| {
            matches!(cell, CellValue::Blank) || matches!(cell, CellValue::Text(s) if s.is_empty())
        }) {
            row.pop();
        }
    }
}

/// Merge a sales grid with one or more vendor price-list grids.
pub fn merge_datasets(
    sales: &RawGrid,
    vendor_grids: &[RawGrid],
    options: &MergeOptions,
) -> Result<MergeOutput, MergeError> {
    if sales.is_empty() {
        return Err(MergeError::EmptySalesFile);
    }

    let header = locate_header(sales, &SALES_MARKERS, options.sales_scan_window)
        .map_err(|_| MergeError::SalesHeaderNotFound)?;
    let cod_col = header
        .find_exact(&["código", "codigo"])
        .ok_or(MergeError::MissingSalesCodeColumn)?;
    let pr_neto_col = header.find_exact(&["pr neto", "pr. neto", "precio neto"]);
    let importes_col = header.find_exact(&["importes netos", "imp netos", "importes netos."]);
    let cantidad_col = header.find_exact(&["cantidades totales", "cant. totales"]);

    let (lookup, skipped_vendors) = build_vendor_lookup(vendor_grids, options);
    if skipped_vendors.len() == vendor_grids.len() {
        return Err(MergeError::NoUsableVendorFile);
    }

    let width = header.labels.len();
    let header_row: Vec<CellValue> = header
        .labels
        .iter()
        .map(|label| CellValue::Text(label.clone()))
        .chain(
            DERIVED_HEADERS
                .iter()
                .map(|label| CellValue::Text((*label).to_string())),
        )
        .collect();

    let mut enriched: RawGrid = vec![header_row.clone()];
    let mut no_match: RawGrid = vec![header_row];
    let mut stats = MergeStats::default();

    for raw in &sales[header.index + 1..] {
        if !row_has_content(raw) {
            continue;
        }

        let code_key = normalize_key(cell_at(raw, Some(cod_col)));
        if code_key.is_empty() {
            // A row without a usable key cannot participate in the cross
            continue;
        }

        let pr_neto = coerce_number(cell_at(raw, pr_neto_col), SentinelPolicy::Filter);
        let importes_netos = coerce_number(cell_at(raw, importes_col), SentinelPolicy::Filter);
        let cantidad = coerce_number(cell_at(raw, cantidad_col), SentinelPolicy::Filter);
        let unit_price = sale_net_unit_price(
            pr_neto,
            importes_netos,
            cantidad,
            options.unit_price_tolerance,
        );

        // Pad/truncate the source row to the header width before appending
        let mut out_row: Vec<CellValue> = raw.iter().take(width).cloned().collect();
        out_row.resize(width, CellValue::Blank);

        stats.total += 1;

        match lookup.get(&code_key) {
            Some(entry) => {
                let status = if entry.is_active() {
                    stats.matched += 1;
                    MatchStatus::Match
                } else {
                    stats.matched_anul += 1;
                    MatchStatus::MatchAnul
                };

                let total_neto = match (entry.precio_neto, cantidad) {
                    (Some(precio), Some(qty)) => Some(precio * qty),
                    _ => None,
                };
                let dif_unit = match (unit_price, entry.precio_neto) {
                    (Some(unit), Some(precio)) => Some(unit - precio),
                    _ => None,
                };
                let dif_total = match (unit_price, cantidad, total_neto) {
                    (Some(unit), Some(qty), Some(total)) => Some(unit * qty - total),
                    _ => None,
                };

                out_row.extend([
                    opt_text(entry.estado.as_deref()),
                    opt_number(entry.margen_int),
                    opt_number(entry.precio_neto),
                    opt_number(entry.iva),
                    opt_number(entry.precio_final),
                    CellValue::Text(status.label().to_string()),
                    opt_number(unit_price),
                    opt_number(total_neto),
                    opt_number(dif_unit),
                    opt_number(dif_total),
                ]);
                enriched.push(out_row);
            }
            None => {
                stats.no_match += 1;
                out_row.extend([
                    CellValue::Blank,
                    CellValue::Blank,
                    CellValue::Blank,
                    CellValue::Blank,
                    CellValue::Blank,
                    CellValue::Text(MatchStatus::NoMatch.label().to_string()),
                    opt_number(unit_price),
                    CellValue::Blank,
                    CellValue::Blank,
                    CellValue::Blank,
                ]);
                enriched.push(out_row.clone());
                no_match.push(out_row);
            }
        }
    }

    trim_trailing_blanks(&mut enriched);
    trim_trailing_blanks(&mut no_match);

    Ok(MergeOutput {
        enriched,
        no_match,
        skipped_vendors,
        stats,
    })
}
