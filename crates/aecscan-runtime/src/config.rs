use crate::{Error, Result};
use aecscan_scanner::ScanFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolve the workspace data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. AECSCAN_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.aecscan (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Explicit path
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    // Priority 2: AECSCAN_PATH environment variable
    if let Ok(env_path) = std::env::var("AECSCAN_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    // Priority 3: XDG data directory (recommended default)
    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("aecscan"));
    }

    // Priority 4: Fallback to ~/.aecscan (last resort for systems without XDG)
    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".aecscan"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Which scan strategy the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanStrategy {
    #[default]
    Threaded,
    Concurrent,
}

/// Catalog backend kind. Only the embedded SQLite backend exists in this
/// build; `networked` parses so a shared config file round-trips, but
/// validation rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Embedded,
    Networked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub kind: DatabaseKind,
    /// Overrides `<workspace>/catalog.db` when set.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::default(),
            path: None,
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub strategy: ScanStrategy,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,
    #[serde(default = "default_excluded_directories")]
    pub excluded_directories: Vec<String>,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default)]
    pub compute_hashes: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            strategy: ScanStrategy::default(),
            max_workers: default_max_workers(),
            batch_size: default_batch_size(),
            excluded_extensions: default_excluded_extensions(),
            excluded_directories: default_excluded_directories(),
            max_file_size_mb: default_max_file_size_mb(),
            compute_hashes: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    /// Scan roots must live under one of these. Empty means unrestricted.
    #[serde(default)]
    pub allowed_base_paths: Vec<PathBuf>,
}

fn default_pool_size() -> usize {
    4
}
fn default_max_workers() -> usize {
    4
}
fn default_batch_size() -> usize {
    1000
}
fn default_max_file_size_mb() -> u64 {
    500
}
fn default_excluded_extensions() -> Vec<String> {
    [".tmp", ".log", ".bak", ".swp"].map(String::from).to_vec()
}
fn default_excluded_directories() -> Vec<String> {
    ["temp", ".git", "__pycache__", "node_modules"]
        .map(String::from)
        .to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path(workspace: &std::path::Path) -> PathBuf {
        workspace.join("config.toml")
    }

    pub fn database_path(&self, workspace: &std::path::Path) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| workspace.join("catalog.db"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.kind == DatabaseKind::Networked {
            return Err(Error::Config(
                "database.kind = \"networked\" is not supported by this build; use \"embedded\""
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Worker count with the configured value clamped to a sane range.
    pub fn effective_workers(&self) -> usize {
        self.scanner.max_workers.clamp(1, 32)
    }

    pub fn effective_batch_size(&self) -> usize {
        self.scanner.batch_size.clamp(1, 10_000)
    }

    pub fn effective_pool_size(&self) -> usize {
        self.database.pool_size.clamp(1, 16)
    }

    pub fn scan_filter(&self) -> ScanFilter {
        ScanFilter::new(
            self.scanner.excluded_extensions.iter().cloned(),
            self.scanner.excluded_directories.iter().cloned(),
            self.scanner.max_file_size_mb.saturating_mul(1024 * 1024),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.scanner.max_workers, 4);
        assert_eq!(config.scanner.batch_size, 1000);
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.database.kind, DatabaseKind::Embedded);
        assert!(config.paths.allowed_base_paths.is_empty());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new().map_err(Error::Io)?;
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.scanner.max_workers = 8;
        config.paths.allowed_base_paths.push(PathBuf::from("/projects"));

        config.save_to(&config_path)?;
        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.scanner.max_workers, 8);
        assert_eq!(loaded.paths.allowed_base_paths.len(), 1);

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new().map_err(Error::Io)?;
        let config = Config::load_from(&temp_dir.path().join("nonexistent.toml"))?;
        assert_eq!(config.scanner.max_workers, 4);
        Ok(())
    }

    #[test]
    fn test_networked_kind_rejected() {
        let config = Config {
            database: DatabaseConfig {
                kind: DatabaseKind::Networked,
                ..DatabaseConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_worker_clamping() {
        let mut config = Config::default();
        config.scanner.max_workers = 0;
        assert_eq!(config.effective_workers(), 1);
        config.scanner.max_workers = 500;
        assert_eq!(config.effective_workers(), 32);
    }
}
