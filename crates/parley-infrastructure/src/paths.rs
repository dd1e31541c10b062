//! Unified path management for parley configuration and history files.

use parley_core::history::HistoryKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "parley";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for parley.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/parley/            # Config directory
/// └── config.toml              # Service, generation and polling settings
///
/// ~/.local/share/parley/       # Data directory
/// ├── history/
/// │   ├── online.jsonl         # Exchanges with the remote service
/// │   └── offline.jsonl        # Exchanges answered on-device
/// └── logs/
///     └── parley.log.YYYY-MM-DD
/// ```
///
/// With a base override (tests, portable installs) both directories collapse
/// into that base.
#[derive(Debug, Clone, Default)]
pub struct ParleyPaths {
    base: Option<PathBuf>,
}

impl ParleyPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the parley configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the parley data directory.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn history_file(&self, kind: HistoryKind) -> Result<PathBuf, PathError> {
        Ok(self
            .data_dir()?
            .join("history")
            .join(format!("{}.jsonl", kind.file_stem())))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override_collapses_directories() {
        let base = PathBuf::from("/tmp/parley-test");
        let paths = ParleyPaths::new(Some(&base));

        assert_eq!(paths.config_dir().unwrap(), base);
        assert_eq!(paths.config_file().unwrap(), base.join("config.toml"));
        assert_eq!(
            paths.history_file(HistoryKind::Online).unwrap(),
            base.join("history").join("online.jsonl")
        );
        assert_eq!(
            paths.history_file(HistoryKind::Offline).unwrap(),
            base.join("history").join("offline.jsonl")
        );
        assert_eq!(paths.logs_dir().unwrap(), base.join("logs"));
    }
}
