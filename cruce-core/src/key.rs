//! Product-code key normalization for cross-sheet matching

use crate::grid::CellValue;

/// Normalize a raw product-code cell into a matching key.
///
/// Codes arrive as `A-123`, `A 123`, `A.123` or as numbers the decoder
/// rendered with a `.0` tail; all of those must collapse to the same key.
/// An empty result means the row has no usable key.
pub fn normalize_key(value: &CellValue) -> String {
    let Some(text) = value.as_text() else {
        return String::new();
    };

    let trimmed = text.trim();
    let without_tail = trimmed.strip_suffix(".0").unwrap_or(trimmed);

    without_tail
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> String {
        normalize_key(&CellValue::Text(s.to_string()))
    }

    #[test]
    fn test_equivalent_codes_collapse() {
        assert_eq!(key("A-123.0"), key("A123"));
        assert_eq!(key(" A 123 "), "A123");
        assert_eq!(key("A.1-2 3"), "A123");
    }

    #[test]
    fn test_numeric_cells() {
        assert_eq!(normalize_key(&CellValue::Number(123.0)), "123");
        assert_eq!(normalize_key(&CellValue::Number(12.5)), "125");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(normalize_key(&CellValue::Blank), "");
        assert_eq!(key(""), "");
        assert_eq!(key("   "), "");
    }

    #[test]
    fn test_idempotence() {
        for raw in ["A-123.0", "B 9.0", " x.y-z ", "", "1.0.0"] {
            let once = key(raw);
            let twice = normalize_key(&CellValue::Text(once.clone()));
            assert_eq!(once, twice, "normalize_key not idempotent for {raw:?}");
        }
    }
}
