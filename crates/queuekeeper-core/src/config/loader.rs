//! Configuration file loading
//!
//! Reads the local JSON5 config, optionally merges the shared master config
//! beneath it, and validates the result against the config schema.

use super::merge::deep_merge;
use super::validated::ValidatedConfig;
use crate::error::QueueKeeperError;
use crate::result::{Result, ResultExt};
use crate::schema::{SchemaNode, config_schema};
use crate::validate::{ValidationOptions, validate};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the local config, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json5";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`]
pub const CONFIG_PATH_ENV: &str = "QUEUEKEEPER_CONFIG";

/// File name of the shared master config inside the coordination directory
pub const MASTER_CONFIG_FILE: &str = "master-config.json5";

/// Coordination settings as seen before full validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinationSettings {
    pub active: bool,
    pub path: PathBuf,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the local config: `$QUEUEKEEPER_CONFIG` or the default location
    pub fn local_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Read a JSON5 file (comments and trailing commas allowed) into a raw tree
    pub fn read_raw(path: &Path) -> Result<Value> {
        let content =
            fs::read_to_string(path).map_err(|e| QueueKeeperError::io_error(path, e))?;

        let raw: Value = json5::from_str(&content)
            .map_err(|e| QueueKeeperError::parse_error(path, e.to_string()))?;

        tracing::debug!("Read config from: {}", path.display());
        Ok(raw)
    }

    /// Validate a raw tree against the config schema with the pipeline's options
    pub fn validate(raw: &Value) -> Result<ValidatedConfig> {
        Self::validate_with(config_schema(), raw, &ValidationOptions::default())
    }

    /// Validate a raw tree against any schema
    pub fn validate_with(
        schema: &SchemaNode,
        raw: &Value,
        options: &ValidationOptions,
    ) -> Result<ValidatedConfig> {
        let output = validate(schema, raw, options)?;
        Ok(ValidatedConfig::new(output))
    }

    /// Load, merge and validate
    ///
    /// When coordination is enabled the coordination directory is created if
    /// needed and its master config, if any, becomes the base beneath the
    /// local config. Failures touching the coordination directory only cost
    /// the master config; a malformed master config is fatal like a malformed
    /// local one.
    pub fn load(
        local_path: &Path,
        coordination_enabled: bool,
        coordination_dir: &Path,
    ) -> Result<ValidatedConfig> {
        let local = Self::read_raw(local_path)?;

        let merged = if coordination_enabled {
            match Self::read_master(coordination_dir)? {
                Some(master) => {
                    tracing::info!(
                        "Merging master config from {}",
                        coordination_dir.join(MASTER_CONFIG_FILE).display()
                    );
                    deep_merge(master, local)
                }
                None => local,
            }
        } else {
            local
        };

        let config = Self::validate(&merged)?;
        tracing::info!("Loaded config from: {}", local_path.display());
        Ok(config)
    }

    /// Load using the coordination settings found in the local file itself
    pub fn load_file(local_path: &Path) -> Result<ValidatedConfig> {
        let local = Self::read_raw(local_path)?;
        let settings = Self::coordination_settings(&local);
        Self::load(local_path, settings.active, &settings.path)
    }

    /// Coordination settings from a raw local tree, falling back to schema
    /// defaults when the section is absent or invalid (the full validation
    /// pass reports the latter)
    pub fn coordination_settings(raw: &Value) -> CoordinationSettings {
        let section = raw
            .get("coordination")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));

        let resolved = config_schema()
            .field("coordination")
            .and_then(|node| validate(node, &section, &ValidationOptions::default()).ok());

        let active = resolved
            .as_ref()
            .and_then(|v| v.get("active"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let path = resolved
            .as_ref()
            .and_then(|v| v.get("path"))
            .and_then(Value::as_str)
            .unwrap_or("./coordination");

        CoordinationSettings {
            active,
            path: PathBuf::from(path),
        }
    }

    fn read_master(coordination_dir: &Path) -> Result<Option<Value>> {
        let created = fs::create_dir_all(coordination_dir).map_err(|e| {
            QueueKeeperError::coordination_error(format!(
                "cannot create coordination directory {}: {}",
                coordination_dir.display(),
                e
            ))
        });
        if created.recoverable()?.is_none() {
            return Ok(None);
        }

        let master_path = coordination_dir.join(MASTER_CONFIG_FILE);
        if !master_path.is_file() {
            tracing::debug!("No master config at {}", master_path.display());
            return Ok(None);
        }

        // An unreadable master degrades to standalone; malformed syntax stays fatal
        Self::read_raw(&master_path)
            .map_err(|e| match e {
                QueueKeeperError::Io { .. } => {
                    QueueKeeperError::coordination_error(format!("master config skipped: {e}"))
                }
                other => other,
            })
            .recoverable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_raw_accepts_json5() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "config.json5",
            r#"{
                // the account
                account: { username: 'Alice123', },
                /* trailing comma */
                server: { port: 25570, },
            }"#,
        );

        let raw = ConfigLoader::read_raw(&path).unwrap();
        assert_eq!(raw["account"]["username"], "Alice123");
        assert_eq!(raw["server"]["port"], 25570);
    }

    #[test]
    fn test_read_raw_missing_file() {
        let err = ConfigLoader::read_raw(Path::new("does/not/exist.json5")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_read_raw_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "bad.json5", "{ account: ");
        let err = ConfigLoader::read_raw(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_load_without_coordination_ignores_master() {
        let temp_dir = TempDir::new().unwrap();
        let coord = temp_dir.path().join("coord");
        fs::create_dir_all(&coord).unwrap();
        create_temp_config(&coord, MASTER_CONFIG_FILE, "{ queueThreshold: 5 }");
        let local = create_temp_config(
            temp_dir.path(),
            "config.json5",
            "{ account: { username: 'Alice123' } }",
        );

        let config = ConfigLoader::load(&local, false, &coord).unwrap();
        assert_eq!(config.u64_at("queueThreshold"), Some(21));
    }

    #[test]
    fn test_load_creates_coordination_dir() {
        let temp_dir = TempDir::new().unwrap();
        let coord = temp_dir.path().join("shared/coord");
        let local = create_temp_config(
            temp_dir.path(),
            "config.json5",
            "{ account: { username: 'Alice123' } }",
        );

        ConfigLoader::load(&local, true, &coord).unwrap();
        assert!(coord.is_dir());
    }

    #[test]
    fn test_malformed_master_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), MASTER_CONFIG_FILE, "{ oops");
        let local = create_temp_config(
            temp_dir.path(),
            "config.json5",
            "{ account: { username: 'Alice123' } }",
        );

        let err = ConfigLoader::load(&local, true, temp_dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_uncreatable_coordination_dir_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = create_temp_config(temp_dir.path(), "not-a-dir", "");
        let local = create_temp_config(
            temp_dir.path(),
            "config.json5",
            "{ account: { username: 'Alice123' }, queueThreshold: 7 }",
        );

        let config = ConfigLoader::load(&local, true, &blocker.join("coord")).unwrap();
        assert_eq!(config.identity(), "Alice123");
        assert_eq!(config.u64_at("queueThreshold"), Some(7));

        let config = ConfigLoader::load(&local, true, &blocker).unwrap();
        assert_eq!(config.u64_at("queueThreshold"), Some(7));
    }

    #[test]
    fn test_unreadable_master_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(MASTER_CONFIG_FILE), [0xff, 0xfe, 0x00]).unwrap();
        let local = create_temp_config(
            temp_dir.path(),
            "config.json5",
            "{ account: { username: 'Alice123' } }",
        );

        let config = ConfigLoader::load(&local, true, temp_dir.path()).unwrap();
        assert_eq!(config.u64_at("queueThreshold"), Some(21));
    }

    #[test]
    fn test_coordination_settings_defaults() {
        let settings = ConfigLoader::coordination_settings(&serde_json::json!({}));
        assert!(!settings.active);
        assert_eq!(settings.path, PathBuf::from("./coordination"));
    }

    #[test]
    fn test_coordination_settings_from_raw() {
        let settings = ConfigLoader::coordination_settings(&serde_json::json!({
            "coordination": {"active": "true", "path": "/srv/shared"}
        }));
        assert!(settings.active);
        assert_eq!(settings.path, PathBuf::from("/srv/shared"));
    }
}
