// Orchestration layer: configuration, path policy, project structure,
// and the scan/extract services that tie scanner, parser, and catalog
// together.

pub mod config;
mod error;
mod extract;
mod policy;
mod scan;
pub mod structure;

pub use config::{Config, DatabaseKind, ScanStrategy, resolve_workspace_path};
pub use error::{Error, Result};
pub use extract::{ExtractEvent, ExtractService, ExtractSummary};
pub use policy::PathPolicy;
pub use scan::{ScanEvent, ScanRequest, ScanService};
