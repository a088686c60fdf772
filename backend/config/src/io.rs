//! Config file discovery and loading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::env::resolve_env_vars;
use crate::error::ConfigError;
use crate::schema::CoachConfig;

const CONFIG_FILE_NAME: &str = "coachline.toml";

/// Resolve the Coachline config directory: `~/.coachline/`.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".coachline"))
        .unwrap_or_else(|| PathBuf::from(".coachline"))
}

pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Load and parse a config file, substituting `${VAR}` references from `env`.
///
/// A missing file yields the defaults unless `required` is set.
pub async fn load_config(
    path: &Path,
    env: &HashMap<String, String>,
    required: bool,
) -> Result<CoachConfig, ConfigError> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            debug!(path = %path.display(), "Config file does not exist; using defaults");
            return Ok(CoachConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let parse_err = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let value: toml::Value = toml::from_str(&raw).map_err(parse_err)?;
    let value = resolve_env_vars(&value, env)?;
    let config: CoachConfig = value.try_into().map_err(parse_err)?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_optional_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("none.toml"), &HashMap::new(), false)
            .await
            .unwrap();
        assert_eq!(config, CoachConfig::default());
    }

    #[tokio::test]
    async fn test_missing_required_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("none.toml"), &HashMap::new(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[agent\nagent_id = 1").await.unwrap();
        let err = load_config(&path, &HashMap::new(), true).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_default_path_file_name() {
        assert!(default_config_path().ends_with(".coachline/coachline.toml"));
    }
}
