use aecscan_runtime::ScanStrategy;
use aecscan_types::ScanKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aecscan")]
#[command(about = "Scan and catalog AEC project directories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Workspace directory for config.toml and catalog.db
    /// (default: $AECSCAN_PATH, then the platform data directory)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ScanKindArg {
    Full,
    Incremental,
    Validation,
}

impl From<ScanKindArg> for ScanKind {
    fn from(arg: ScanKindArg) -> Self {
        match arg {
            ScanKindArg::Full => ScanKind::Full,
            ScanKindArg::Incremental => ScanKind::Incremental,
            ScanKindArg::Validation => ScanKind::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StrategyArg {
    Threaded,
    Concurrent,
}

impl From<StrategyArg> for ScanStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Threaded => ScanStrategy::Threaded,
            StrategyArg::Concurrent => ScanStrategy::Concurrent,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the standard project directory structure and register the project
    Init {
        /// Project root directory
        root: PathBuf,

        /// Project number, e.g. PROJ2024
        #[arg(long)]
        project: String,

        /// Human-readable project name
        #[arg(long)]
        name: Option<String>,
    },

    /// Scan a project tree into the catalog
    Scan {
        /// Root directory to scan
        root: PathBuf,

        /// Project number; defaults to the root's project sidecar
        #[arg(long)]
        project: Option<String>,

        #[arg(long, default_value = "full")]
        kind: ScanKindArg,

        /// Incremental cutoff override (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Compute SHA-256 content hashes while scanning
        #[arg(long)]
        hash: bool,

        /// Only scan files directly under the root, skipping subdirectories
        #[arg(long)]
        single_level: bool,

        /// Override the configured scan strategy
        #[arg(long)]
        strategy: Option<StrategyArg>,
    },

    /// Run content extractors over a project's catalogued files
    Extract {
        #[arg(long)]
        project: String,

        /// Re-extract files that already have metadata
        #[arg(long)]
        force: bool,
    },

    /// Summarize a directory tree without touching the catalog
    Report {
        root: PathBuf,
    },

    /// List catalogued projects, or change one project's status
    Projects {
        /// Mark a project archived without deleting its history
        #[arg(long, value_name = "PROJECT", conflicts_with = "activate")]
        archive: Option<String>,

        /// Mark an archived project active again
        #[arg(long, value_name = "PROJECT")]
        activate: Option<String>,
    },

    /// Show workspace paths and catalog statistics
    Status {
        /// Also show file-type and discipline breakdowns for one project
        #[arg(long)]
        project: Option<String>,
    },

    /// List scan sessions, most recent first
    Sessions {
        /// Restrict to one project number
        #[arg(long)]
        project: Option<String>,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}
