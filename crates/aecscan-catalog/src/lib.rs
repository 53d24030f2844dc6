// SQLite catalog for scanned file inventories.
// Stores identity, observation history, and extracted metadata; the
// filesystem itself stays the source of truth.

mod db;
mod error;
mod maintenance;
mod pool;
pub mod queries;
mod records;
mod schema;

// Public API
pub use db::Catalog;
pub use error::{Error, Result};
pub use pool::{ConnectionPool, PooledConnection};
pub use queries::file::FileObservation;
pub use queries::scan_session::SessionTotals;
pub use records::{
    AecMetadataRecord, CatalogStats, DirectoryRecord, FileRecord, FileUpsert, MetadataPayload,
    ProjectHistograms, ProjectRecord, ScanSessionRecord,
};
pub use schema::SCHEMA_VERSION;
