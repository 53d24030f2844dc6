use crate::args::OutputFormat;
use aecscan_catalog::Catalog;
use anyhow::Result;

pub fn handle(
    catalog: &Catalog,
    archive: Option<&str>,
    activate: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(project) = archive {
        catalog.set_project_status(project, "archived")?;
        if format == OutputFormat::Plain {
            println!("{} archived", project);
        }
        return Ok(());
    }
    if let Some(project) = activate {
        catalog.set_project_status(project, "active")?;
        if format == OutputFormat::Plain {
            println!("{} active", project);
        }
        return Ok(());
    }

    let projects = catalog.list_projects()?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects catalogued yet; run `aecscan scan` first");
        return Ok(());
    }

    for project in projects {
        println!(
            "{:<12} {:<10} {:<30} {}",
            project.project_number,
            project.status,
            project.project_name.as_deref().unwrap_or("-"),
            project.base_path.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
