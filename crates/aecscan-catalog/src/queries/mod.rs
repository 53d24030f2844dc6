pub mod directory;
pub mod file;
pub mod metadata;
pub mod project;
pub mod scan_session;
pub mod stats;
