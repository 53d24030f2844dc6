use crate::args::{Cli, Commands};
use crate::handlers;
use aecscan_catalog::Catalog;
use aecscan_runtime::{Config, resolve_workspace_path};
use anyhow::Result;
use std::path::Path;

pub fn run(cli: Cli) -> Result<()> {
    let workspace = resolve_workspace_path(cli.data_dir.as_deref())?;
    let config = Config::load_from(&Config::config_path(&workspace))?;

    match cli.command {
        Commands::Init {
            root,
            project,
            name,
        } => {
            let catalog = open_catalog(&config, &workspace)?;
            handlers::init::handle(&catalog, &root, &project, name.as_deref(), cli.format)
        }

        Commands::Scan {
            root,
            project,
            kind,
            since,
            hash,
            single_level,
            strategy,
        } => {
            let catalog = open_catalog(&config, &workspace)?;
            handlers::scan::handle(
                catalog,
                config,
                &root,
                project,
                kind,
                since.as_deref(),
                hash,
                single_level,
                strategy,
                cli.format,
            )
        }

        Commands::Extract { project, force } => {
            let catalog = open_catalog(&config, &workspace)?;
            handlers::extract::handle(catalog, &project, force, cli.format)
        }

        Commands::Report { root } => handlers::report::handle(&config, &root, cli.format),

        Commands::Projects { archive, activate } => {
            let catalog = open_catalog(&config, &workspace)?;
            handlers::projects::handle(
                &catalog,
                archive.as_deref(),
                activate.as_deref(),
                cli.format,
            )
        }

        Commands::Status { project } => {
            handlers::status::handle(&workspace, &config, project.as_deref(), cli.format)
        }

        Commands::Sessions { project, limit } => {
            let catalog = open_catalog(&config, &workspace)?;
            handlers::sessions::handle(&catalog, project.as_deref(), limit, cli.format)
        }
    }
}

fn open_catalog(config: &Config, workspace: &Path) -> Result<Catalog> {
    config.validate()?;
    let db_path = config.database_path(workspace);
    Ok(Catalog::open(&db_path, config.effective_pool_size())?)
}
