pub mod extract;
pub mod init;
pub mod projects;
pub mod report;
pub mod scan;
pub mod sessions;
pub mod status;
