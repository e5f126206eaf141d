//! TOML-backed configuration for the merge pipeline

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::merge::MergeOptions;

/// Optional overrides for [`MergeOptions`], loadable from a TOML file.
///
/// ```toml
/// unit_price_tolerance = 1.5
/// vendor_scan_window = 80
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub unit_price_tolerance: Option<f64>,
    #[serde(default)]
    pub sales_scan_window: Option<usize>,
    #[serde(default)]
    pub vendor_scan_window: Option<usize>,
}

impl MergeConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: MergeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay the configured values on top of the defaults.
    pub fn to_options(&self) -> MergeOptions {
        let defaults = MergeOptions::default();
        MergeOptions {
            unit_price_tolerance: self
                .unit_price_tolerance
                .unwrap_or(defaults.unit_price_tolerance),
            sales_scan_window: self.sales_scan_window.unwrap_or(defaults.sales_scan_window),
            vendor_scan_window: self
                .vendor_scan_window
                .unwrap_or(defaults.vendor_scan_window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_keeps_defaults() {
        let config: MergeConfig = toml::from_str("").unwrap();
        assert_eq!(config.to_options(), MergeOptions::default());
    }

    #[test]
    fn test_partial_override() {
        let config: MergeConfig = toml::from_str("unit_price_tolerance = 0.5\n").unwrap();
        let options = config.to_options();
        assert_eq!(options.unit_price_tolerance, 0.5);
        assert_eq!(
            options.vendor_scan_window,
            MergeOptions::default().vendor_scan_window
        );
    }

    #[test]
    fn test_full_override() {
        let config: MergeConfig = toml::from_str(
            "unit_price_tolerance = 1.5\nsales_scan_window = 10\nvendor_scan_window = 80\n",
        )
        .unwrap();
        let options = config.to_options();
        assert_eq!(options.unit_price_tolerance, 1.5);
        assert_eq!(options.sales_scan_window, 10);
        assert_eq!(options.vendor_scan_window, 80);
    }
}
