use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::core::{DbError, Result};
use crate::dialect::DialectKind;

pub const DEFAULT_STORAGE_PROVIDER_ID: &str = "Default";
pub const DEFAULT_MAX_SET_COMPARISON_VALUES: usize = 2000;

/// Storage provider configuration
///
/// Mirrors what a provider definition in a mapping setup carries: which
/// provider the factories serve and how commands are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Id of the storage provider the factories build commands for
    pub storage_provider_id: String,

    /// SQL dialect used to quote identifiers and name parameters
    pub dialect: DialectKind,

    /// Parse query statements before building commands from them
    pub validate_query_statements: bool,

    /// Maximum number of values in one `IN (...)` comparison. Larger id
    /// groups are split over several commands.
    pub max_set_comparison_values: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            storage_provider_id: DEFAULT_STORAGE_PROVIDER_ID.to_string(),
            dialect: DialectKind::default(),
            validate_query_statements: true,
            max_set_comparison_values: DEFAULT_MAX_SET_COMPARISON_VALUES,
        }
    }
}

impl ProviderConfig {
    pub fn new(storage_provider_id: &str) -> Self {
        Self {
            storage_provider_id: storage_provider_id.to_string(),
            ..Self::default()
        }
    }

    /// Set the SQL dialect
    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Enable or disable statement validation for queries
    pub fn validate_query_statements(mut self, validate: bool) -> Self {
        self.validate_query_statements = validate;
        self
    }

    /// Set the maximum size of a set comparison
    pub fn max_set_comparison_values(mut self, max: usize) -> Self {
        self.max_set_comparison_values = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_provider_id.trim().is_empty() {
            return Err(DbError::ConfigError(
                "storage_provider_id must not be empty".into(),
            ));
        }
        if self.max_set_comparison_values == 0 {
            return Err(DbError::ConfigError(
                "max_set_comparison_values must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            DbError::IoError(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Writes the configuration as pretty JSON, replacing `path` atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_vec_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| {
            DbError::IoError(format!(
                "Failed to replace config '{}': {}",
                path.display(),
                e.error
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.storage_provider_id, "Default");
        assert_eq!(config.dialect, DialectKind::SqlServer);
        assert!(config.validate_query_statements);
        assert_eq!(config.max_set_comparison_values, 2000);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ProviderConfig::from_json_str(r#"{"storage_provider_id": "Archive", "dialect": "ansi"}"#)
            .unwrap();
        assert_eq!(config.storage_provider_id, "Archive");
        assert_eq!(config.dialect, DialectKind::Ansi);
        assert_eq!(config.max_set_comparison_values, 2000);
    }

    #[test]
    fn test_rejects_zero_set_size() {
        let err = ProviderConfig::from_json_str(r#"{"max_set_comparison_values": 0}"#).unwrap_err();
        assert!(matches!(err, DbError::ConfigError(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("provider.json");
        let config = ProviderConfig::new("Archive")
            .dialect(DialectKind::Ansi)
            .max_set_comparison_values(50)
            .validate_query_statements(false);

        config.save(&path).unwrap();
        assert_eq!(ProviderConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ProviderConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DbError::IoError(_)));
    }
}
