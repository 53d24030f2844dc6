use crate::args::OutputFormat;
use crate::output;
use aecscan_catalog::Catalog;
use aecscan_runtime::Config;
use anyhow::Result;
use std::path::Path;

pub fn handle(
    workspace: &Path,
    config: &Config,
    project: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let config_path = Config::config_path(workspace);
    let db_path = config.database_path(workspace);

    // Do not create the catalog as a side effect of asking about it.
    let catalog = if db_path.exists() {
        Some(Catalog::open(&db_path, config.effective_pool_size())?)
    } else {
        None
    };
    let stats = catalog.as_ref().map(|c| c.stats()).transpose()?;

    let breakdown = match (project, &catalog) {
        (Some(number), Some(catalog)) => {
            let record = catalog
                .get_project(number)?
                .ok_or_else(|| anyhow::anyhow!("unknown project: {number}"))?;
            let histograms = catalog.project_histograms(record.id)?;
            Some((record, histograms))
        }
        (Some(number), None) => {
            anyhow::bail!("no catalog yet; cannot report on project {number}")
        }
        (None, _) => None,
    };

    if format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "workspace": workspace,
                "config": config_path,
                "database": db_path,
                "database_exists": stats.is_some(),
                "stats": stats,
                "project": breakdown.as_ref().map(|(record, _)| record),
                "histograms": breakdown.as_ref().map(|(_, histograms)| histograms),
            }))?
        );
        return Ok(());
    }

    println!("Workspace: {}", workspace.display());
    println!(
        "Config:    {} ({})",
        config_path.display(),
        if config_path.exists() { "present" } else { "defaults" }
    );
    println!("Catalog:   {}", db_path.display());

    match stats {
        None => println!("  not created yet; run `aecscan scan`"),
        Some(stats) => {
            println!(
                "  {} projects, {} directories, {} sessions",
                stats.projects, stats.directories, stats.scan_sessions
            );
            println!(
                "  {} active files ({}), {} inactive, {} standard-named",
                stats.active_files,
                output::human_bytes(stats.total_bytes.max(0) as u64),
                stats.inactive_files,
                stats.standard_named_files
            );
            println!("  {} extracted metadata rows", stats.metadata_rows);
        }
    }

    if let Some((record, histograms)) = breakdown {
        println!(
            "Project {} ({})",
            record.project_number, record.status
        );
        println!("  File types:");
        for (extension, count) in &histograms.file_types {
            println!("    {:<12} {}", extension, count);
        }
        if histograms.file_types.is_empty() {
            println!("    (no active files)");
        }
        println!("  Disciplines:");
        for (code, count) in &histograms.disciplines {
            println!("    {:<12} {}", code, count);
        }
        if histograms.disciplines.is_empty() {
            println!("    (none recognized)");
        }
    }
    Ok(())
}
