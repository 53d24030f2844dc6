use crate::args::{OutputFormat, ScanKindArg, StrategyArg};
use crate::output;
use aecscan_catalog::Catalog;
use aecscan_runtime::{Config, ScanEvent, ScanRequest, ScanService, structure};
use aecscan_scanner::StopFlag;
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use owo_colors::OwoColorize;
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub fn handle(
    catalog: Catalog,
    mut config: Config,
    root: &Path,
    project: Option<String>,
    kind: ScanKindArg,
    since: Option<&str>,
    hash: bool,
    single_level: bool,
    strategy: Option<StrategyArg>,
    format: OutputFormat,
) -> Result<()> {
    if hash {
        config.scanner.compute_hashes = true;
    }
    if let Some(strategy) = strategy {
        config.scanner.strategy = strategy.into();
    }

    let (project_number, project_name) = match project {
        Some(number) => (number, None),
        None => {
            let sidecar = structure::load_sidecar(root)?.ok_or_else(|| {
                anyhow::anyhow!(
                    "no --project given and no project sidecar at {}; run `aecscan init` first",
                    root.display()
                )
            })?;
            (sidecar.project_number, sidecar.project_name)
        }
    };

    let request = ScanRequest {
        project_number,
        project_name,
        root: root.to_path_buf(),
        kind: kind.into(),
        recursive: !single_level,
        since: since.map(parse_since).transpose()?,
    };

    let service = ScanService::new(catalog, config);
    let plain = format == OutputFormat::Plain;
    let outcome = service.run(&request, &StopFlag::new(), |event| {
        if plain {
            render_event(&event);
        }
    })?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        let summary = format!(
            "{} scanned, {} added, {} updated, {} removed, {} errors in {:.2}s",
            outcome.files_scanned,
            outcome.files_added,
            outcome.files_updated,
            outcome.files_removed,
            outcome.errors_encountered,
            outcome.scan_time_seconds
        );
        if output::color_enabled() {
            let label = if outcome.success {
                "Scan complete:".green().bold().to_string()
            } else {
                "Scan failed:".red().bold().to_string()
            };
            println!("{} {}", label, summary);
        } else {
            let label = if outcome.success {
                "Scan complete:"
            } else {
                "Scan failed:"
            };
            println!("{} {}", label, summary);
        }
        for error in outcome.errors.iter().take(10) {
            eprintln!("  {}", error);
        }
        if outcome.errors.len() > 10 {
            eprintln!("  ... and {} more", outcome.errors.len() - 10);
        }
    }

    if !outcome.success {
        anyhow::bail!("scan session {:?} failed", outcome.scan_session_id);
    }
    Ok(())
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let chrono::LocalResult::Single(ts) = Utc.from_local_datetime(
            &date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow::anyhow!("invalid --since date '{raw}'"))?,
        ) {
            return Ok(ts);
        }
    }
    anyhow::bail!("unrecognized --since value '{raw}'; use RFC 3339 or YYYY-MM-DD")
}

fn render_event(event: &ScanEvent) {
    match event {
        ScanEvent::Started {
            project_number,
            scan_kind,
        } => println!("Scanning {} ({})", project_number, scan_kind),
        ScanEvent::Counted { total } => println!("  {} files discovered", total),
        ScanEvent::FileError { path, message } => {
            eprintln!("  error: {}: {}", path.display(), message)
        }
        ScanEvent::Reconciling { files, batches } => {
            println!("  reconciling {} files in {} batches", files, batches)
        }
        ScanEvent::FilesRemoved { count } if *count > 0 => {
            println!("  {} catalogued files no longer on disk", count)
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_accepts_both_formats() {
        assert!(parse_since("2024-03-15T12:00:00Z").is_ok());
        assert!(parse_since("2024-03-15").is_ok());
        assert!(parse_since("yesterday").is_err());
    }
}
