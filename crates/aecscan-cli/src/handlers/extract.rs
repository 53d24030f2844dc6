use crate::args::OutputFormat;
use crate::output;
use aecscan_catalog::Catalog;
use aecscan_runtime::{ExtractEvent, ExtractService};
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn handle(catalog: Catalog, project: &str, force: bool, format: OutputFormat) -> Result<()> {
    let service = ExtractService::new(catalog);
    let plain = format == OutputFormat::Plain;

    let summary = service.run(project, force, |event| {
        if !plain {
            return;
        }
        match event {
            ExtractEvent::Started { total } => println!("Extracting metadata for {} files", total),
            ExtractEvent::FileFailed { path, message } => {
                eprintln!("  failed: {}: {}", path.display(), message)
            }
            _ => {}
        }
    })?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let line = format!(
        "{} processed, {} skipped, {} failed, {} fields written",
        summary.files_processed, summary.files_skipped, summary.files_failed, summary.fields_written
    );
    if output::color_enabled() {
        println!("{} {}", "Extraction complete:".green().bold(), line);
    } else {
        println!("Extraction complete: {}", line);
    }
    Ok(())
}
