use crate::args::OutputFormat;
use aecscan_catalog::Catalog;
use anyhow::Result;

pub fn handle(
    catalog: &Catalog,
    project: Option<&str>,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let project_id = match project {
        Some(number) => {
            let record = catalog
                .get_project(number)?
                .ok_or_else(|| anyhow::anyhow!("unknown project {number}"))?;
            Some(record.id)
        }
        None => None,
    };
    let sessions = catalog.list_scan_sessions(project_id, limit)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No scan sessions recorded");
        return Ok(());
    }

    for session in sessions {
        println!(
            "#{:<5} {:<12} {:<22} {}  scanned {:>5}  +{} ~{} -{}  errors {}",
            session.id,
            session.scan_kind,
            session.status,
            session.started_at,
            session.files_scanned,
            session.files_added,
            session.files_updated,
            session.files_removed,
            session.errors_count,
        );
    }
    Ok(())
}
