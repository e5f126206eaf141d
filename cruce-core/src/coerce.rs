//! Cell coercion under locale-ambiguous number formats
//!
//! Spreadsheets arrive with European (`1.234,56`) and US (`1,234.56`) number
//! formatting mixed freely, plus currency/percent symbols and placeholder
//! strings in numeric columns. Coercion never fails: a cell that cannot be
//! read as the requested type becomes `None`.

use crate::grid::CellValue;

/// Placeholder strings some vendor sheets carry in numeric columns.
const NUMBER_SENTINELS: [&str; 3] = ["#N/D", "#¡VALOR!", "VALOR CERO"];

/// Whether numeric coercion filters known placeholder strings.
///
/// The vendor/merge path sees exported sheets with `#N/D`-style artifacts;
/// the single-sheet clean path takes values as they come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentinelPolicy {
    #[default]
    Strict,
    Filter,
}

/// Coerce a cell to a trimmed non-empty string.
pub fn coerce_string(value: &CellValue) -> Option<String> {
    let text = value.as_text()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Coerce a cell to a number.
///
/// Already-numeric cells pass through unchanged. Text goes through `$`/`%`
/// stripping, sentinel filtering (per policy) and decimal/thousands separator
/// disambiguation before the final parse. A failed parse yields `None`.
pub fn coerce_number(value: &CellValue, policy: SentinelPolicy) -> Option<f64> {
    if let CellValue::Number(n) = value {
        return Some(*n);
    }

    let text = value.as_text()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if policy == SentinelPolicy::Filter
        && NUMBER_SENTINELS
            .iter()
            .any(|sentinel| sentinel.eq_ignore_ascii_case(trimmed))
    {
        return None;
    }

    let stripped: String = trimmed.chars().filter(|&c| c != '$' && c != '%').collect();
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }

    disambiguate_separators(stripped).parse::<f64>().ok()
}

/// Resolve which of `,` and `.` is the decimal separator.
///
/// - Both present: the rightmost one is the decimal point, the other is a
///   thousands separator and is removed everywhere.
/// - Comma only: a single comma with a one- or two-digit tail is a decimal
///   comma (`12,5`); an exactly-three-digit tail reads as a thousands group
///   (`12,345`), as does anything longer or with multiple commas.
/// - Period only or neither: standard parse rules already apply.
fn disambiguate_separators(s: &str) -> String {
    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');

    match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => {
            if comma > dot {
                // 1.234,56 -> 1234.56
                s.chars()
                    .filter(|&c| c != '.')
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect()
            } else {
                // 1,234.56 -> 1234.56
                s.chars().filter(|&c| c != ',').collect()
            }
        }
        (Some(_), None) => {
            let parts: Vec<&str> = s.split(',').collect();
            if parts.len() == 2 && parts[1].len() < 3 {
                s.replacen(',', ".", 1)
            } else {
                s.chars().filter(|&c| c != ',').collect()
            }
        }
        _ => s.to_string(),
    }
}
