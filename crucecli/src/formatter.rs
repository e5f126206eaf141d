//! Terminal and JSON output for the two pipelines

use anyhow::Result;
use colored::*;
use cruce_core::{CleanDataset, MergeOutput};
use std::path::{Path, PathBuf};

/// Print a clean-extraction summary with colors
pub fn print_clean_summary(file: &Path, dataset: &CleanDataset, output: Option<&Path>) {
    println!("{}", format!("Cleaning: {}", file.display()).bold());
    println!(
        "  {} rows extracted ({} physical rows below the header)",
        dataset.rows.len().to_string().green().bold(),
        dataset.total_raw
    );
    if let Some(output) = output {
        println!("{} {}", "✓ Output:".green().bold(), output.display());
    }
}

/// Print the clean dataset as JSON rows
pub fn print_clean_json(dataset: &CleanDataset) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(dataset)?);
    Ok(())
}

/// Print a merge summary: partition counts and skipped vendor files
pub fn print_merge_summary(
    sales: &Path,
    vendors: &[PathBuf],
    merged: &MergeOutput,
    output: &Path,
) {
    println!(
        "{}",
        format!(
            "Merging: {} against {} vendor file(s)",
            sales.display(),
            vendors.len()
        )
        .bold()
    );
    println!();

    let stats = &merged.stats;
    println!("  {:<12} {}", "MATCH".green().bold(), stats.matched);
    println!("  {:<12} {}", "MATCH_ANUL".yellow().bold(), stats.matched_anul);
    println!("  {:<12} {}", "NO_MATCH".red().bold(), stats.no_match);
    println!("  {:<12} {}", "total".bold(), stats.total);

    if !merged.skipped_vendors.is_empty() {
        println!();
        println!("{}", "Skipped vendor files:".yellow().bold());
        for skipped in &merged.skipped_vendors {
            let name = vendors
                .get(skipped.index)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("#{}", skipped.index));
            println!("  {} {} ({})", "⚠".yellow(), name, skipped.reason);
        }
    }

    println!();
    println!("{} {}", "✓ Output:".green().bold(), output.display());
}

/// Print the merge stats and diagnostics as JSON
pub fn print_merge_json(merged: &MergeOutput) -> Result<()> {
    let output = serde_json::json!({
        "stats": merged.stats,
        "skipped_vendors": merged.skipped_vendors,
        "rows": merged.enriched.len().saturating_sub(1),
        "no_match_rows": merged.no_match.len().saturating_sub(1),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
