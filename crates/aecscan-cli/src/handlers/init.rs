use crate::args::OutputFormat;
use crate::output;
use aecscan_catalog::Catalog;
use aecscan_runtime::structure;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn handle(
    catalog: &Catalog,
    root: &Path,
    project_number: &str,
    project_name: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let sidecar = structure::init_project(root, project_number, project_name)?;
    let canonical = root
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", root.display()))?;
    catalog.upsert_project(project_number, project_name, canonical.to_str())?;

    let report = structure::validate_structure(&canonical)?;

    if format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "project_number": sidecar.project_number,
                "project_name": sidecar.project_name,
                "root": canonical,
                "structure_conforms": report.conforms,
            }))?
        );
        return Ok(());
    }

    if output::color_enabled() {
        println!(
            "{} project {} at {}",
            "Initialized".green().bold(),
            project_number.bold(),
            canonical.display()
        );
    } else {
        println!(
            "Initialized project {} at {}",
            project_number,
            canonical.display()
        );
    }
    println!(
        "  {} top-level directories, sidecar {}",
        structure::STANDARD_STRUCTURE.len(),
        aecscan_scanner::PROJECT_SIDECAR
    );
    Ok(())
}
