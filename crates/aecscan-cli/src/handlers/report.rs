use crate::args::OutputFormat;
use crate::output;
use aecscan_runtime::Config;
use aecscan_scanner::{ScanReport, StopFlag, ThreadedScanner};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

/// Inventory a tree and print aggregate statistics; the catalog is not
/// involved.
pub fn handle(config: &Config, root: &Path, format: OutputFormat) -> Result<()> {
    let scanner = ThreadedScanner::new(config.scan_filter(), config.effective_workers());
    let descriptors = scanner.scan(root, &StopFlag::new(), |_| {})?;
    let report = ScanReport::from_descriptors(&descriptors);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if output::color_enabled() {
        println!("{} {}", "Report for".bold(), root.display());
    } else {
        println!("Report for {}", root.display());
    }
    println!(
        "  {} files, {} total, max depth {}",
        report.total_files,
        output::human_bytes(report.total_bytes),
        report.max_depth
    );

    let mut by_count: Vec<_> = report.extension_counts.iter().collect();
    by_count.sort_by(|a, b| b.1.cmp(a.1));
    println!("  By extension:");
    for (extension, count) in by_count.iter().take(15) {
        println!("    {:<8} {}", extension, count);
    }

    if !report.largest_files.is_empty() {
        println!("  Largest files:");
        for (path, size) in &report.largest_files {
            println!("    {:>10}  {}", output::human_bytes(*size), path.display());
        }
    }
    Ok(())
}
