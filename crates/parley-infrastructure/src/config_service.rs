//! Configuration service implementation.
//!
//! Loads `ParleyConfig` from `config.toml` and overlays `PARLEY_*`
//! environment variables on top. The file is optional; a missing file means
//! defaults plus whatever the environment provides.

use parley_core::config::ParleyConfig;
use parley_core::error::{ParleyError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::paths::ParleyPaths;
use crate::storage::AtomicTomlFile;

pub const ENV_API_TOKEN: &str = "PARLEY_API_TOKEN";
pub const ENV_ENDPOINT: &str = "PARLEY_ENDPOINT";
pub const ENV_MODEL_VERSION: &str = "PARLEY_MODEL_VERSION";
pub const ENV_MAX_ATTEMPTS: &str = "PARLEY_MAX_ATTEMPTS";
pub const ENV_POLL_INTERVAL_MS: &str = "PARLEY_POLL_INTERVAL_MS";

/// Configuration service that loads and caches the effective configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<ParleyConfig>>,
    /// Cached effective configuration (file + environment).
    config: Arc<RwLock<Option<ParleyConfig>>>,
}

impl ConfigService {
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Uses `config.toml` in the standard config directory.
    pub fn default_location() -> Result<Self> {
        Self::in_paths(&ParleyPaths::default())
    }

    pub fn in_paths(paths: &ParleyPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| ParleyError::config(format!("Failed to resolve config path: {}", e)))?;
        Ok(Self::with_path(path))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the effective configuration, loading it on first access.
    pub fn get_config(&self) -> Result<ParleyConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|p| p.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_with(|key| std::env::var(key).ok())?;
        *self.config.write().unwrap_or_else(|p| p.into_inner()) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Loads file values and overlays variables from `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<ParleyConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.file.load()?.unwrap_or_default();
        apply_env_overrides(&mut config, lookup)?;
        tracing::debug!("[ConfigService] Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(|p| p.into_inner()) = None;
    }

    /// Writes `config` to the file. Environment overrides are not applied.
    pub fn save(&self, config: &ParleyConfig) -> Result<()> {
        self.file.save(config)?;
        self.invalidate_cache();
        Ok(())
    }

    /// Applies `f` to the stored file contents under a lock.
    pub fn update<F>(&self, f: F) -> Result<ParleyConfig>
    where
        F: FnOnce(&mut ParleyConfig) -> Result<()>,
    {
        let updated = self.file.update(ParleyConfig::default(), f)?;
        self.invalidate_cache();
        Ok(updated)
    }

    /// Writes a default config file unless one exists (or `force` is set).
    ///
    /// Returns `true` if a file was written.
    pub fn init_default(&self, force: bool) -> Result<bool> {
        if !force && self.file.path().exists() {
            return Ok(false);
        }
        self.save(&ParleyConfig::default())?;
        Ok(true)
    }
}

/// Overlays `PARLEY_*` variables onto `config`.
///
/// # Errors
///
/// Returns `ParleyError::Config` if a numeric variable does not parse.
pub fn apply_env_overrides<F>(config: &mut ParleyConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(token) = lookup(ENV_API_TOKEN) {
        config.service.api_token = token;
    }
    if let Some(endpoint) = lookup(ENV_ENDPOINT) {
        config.service.endpoint = endpoint;
    }
    if let Some(version) = lookup(ENV_MODEL_VERSION) {
        config.service.model_version = version;
    }
    if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
        config.polling.max_attempts = parse_env(ENV_MAX_ATTEMPTS, &raw)?;
    }
    if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
        config.polling.interval_ms = parse_env(ENV_POLL_INTERVAL_MS, &raw)?;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ParleyError::config(format!("{} has an invalid value '{}': {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.load_with(env(&[])).unwrap();
        assert_eq!(config, ParleyConfig::default());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        let mut stored = ParleyConfig::default();
        stored.service.model_version = "from-file".into();
        stored.polling.max_attempts = 4;
        service.save(&stored).unwrap();

        let config = service
            .load_with(env(&[
                (ENV_MODEL_VERSION, "from-env"),
                (ENV_API_TOKEN, "r8_token"),
                (ENV_POLL_INTERVAL_MS, "250"),
            ]))
            .unwrap();

        assert_eq!(config.service.model_version, "from-env");
        assert_eq!(config.service.api_token, "r8_token");
        assert_eq!(config.polling.max_attempts, 4);
        assert_eq!(config.polling.interval_ms, 250);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = ParleyConfig::default();
        apply_env_overrides(&mut config, env(&[(ENV_ENDPOINT, "  ")])).unwrap();
        assert_eq!(config.service.endpoint, ParleyConfig::default().service.endpoint);
    }

    #[test]
    fn test_invalid_numeric_env_is_config_error() {
        let mut config = ParleyConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(ENV_MAX_ATTEMPTS, "ten")])).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(ENV_MAX_ATTEMPTS));
    }

    #[test]
    fn test_init_default_does_not_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        assert!(service.init_default(false).unwrap());
        service
            .update(|config| {
                config.service.model_version = "kept".into();
                Ok(())
            })
            .unwrap();
        assert!(!service.init_default(false).unwrap());

        let config = service.load_with(env(&[])).unwrap();
        assert_eq!(config.service.model_version, "kept");
    }
}
