//! `coachline-config`: runtime configuration for the interview coach.
//!
//! Provides:
//! - Typed config schema (agent credentials, demo pacing, logging)
//! - Optional TOML file with `${ENV_VAR}` substitution
//! - Environment overrides for the agent credentials
//! - Redaction for safe display
//! - Validation

pub mod env;
pub mod error;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, resolve_env_vars, MissingEnvVarError};
pub use error::ConfigError;
pub use io::{config_dir, default_config_path, load_config};
pub use redact::{mask_secret, redacted};
pub use schema::{AgentSection, CoachConfig, DemoSection, LoggingSection};
pub use validation::{validate, ValidationIssue, ValidationReport};

use std::collections::HashMap;
use std::path::Path;

/// Env var that points at an explicit config file.
pub const CONFIG_PATH_VAR: &str = "COACHLINE_CONFIG";

/// A validated config plus the non-fatal issues found while checking it.
///
/// Warnings are returned rather than logged so the caller can report them
/// once its logger is installed.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: CoachConfig,
    pub warnings: Vec<ValidationIssue>,
}

/// Load the config file (if any), substitute env references, apply env
/// overrides, and validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: Option<&Path>) -> Result<PreparedConfig, ConfigError> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_and_prepare_with(path, &env).await
}

/// Same as [`load_and_prepare`] with an explicit environment (useful for testing).
pub async fn load_and_prepare_with(
    path: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<PreparedConfig, ConfigError> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| env.get(CONFIG_PATH_VAR).map(Into::into));
    let file = explicit.clone().unwrap_or_else(default_config_path);

    let mut config = load_config(&file, env, explicit.is_some()).await?;
    apply_env_overrides(&mut config, env)?;

    let report = validate(&config);
    if let Some(first) = report.errors.into_iter().next() {
        return Err(ConfigError::Invalid {
            path: first.path,
            message: first.message,
        });
    }

    Ok(PreparedConfig {
        config,
        warnings: report.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn test_env_only_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("coachline.toml");
        tokio::fs::write(&file, "").await.unwrap();

        let env = env(&[
            ("ELEVENLABS_AGENT_ID", "agent_123"),
            ("ELEVENLABS_API_KEY", "sk_live_abc"),
        ]);
        let config = load_and_prepare_with(Some(&file), &env).await.unwrap().config;
        assert!(config.agent.is_configured());
        assert_eq!(config.agent.agent_id.as_deref(), Some("agent_123"));
    }

    #[tokio::test]
    async fn test_config_path_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        tokio::fs::write(&file, "[logging]\nlevel = \"debug\"\n").await.unwrap();

        let env = env(&[(CONFIG_PATH_VAR, file.to_str().unwrap())]);
        let config = load_and_prepare_with(None, &env).await.unwrap().config;
        assert_eq!(config.logging.level, "debug");
        assert!(!config.agent.is_configured());
    }

    #[tokio::test]
    async fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load_and_prepare_with(Some(&missing), &HashMap::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_file_with_env_reference() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("coachline.toml");
        tokio::fs::write(
            &file,
            r#"
[agent]
agent_id = "agent_from_file"
api_key = "${COACH_TEST_KEY}"

[demo]
time_unit_ms = 250
"#,
        )
        .await
        .unwrap();

        let env = env(&[("COACH_TEST_KEY", "sk_from_env")]);
        let config = load_and_prepare_with(Some(&file), &env).await.unwrap().config;
        assert_eq!(config.agent.api_key.as_deref(), Some("sk_from_env"));
        assert_eq!(config.demo.time_unit_ms, 250);
    }

    #[tokio::test]
    async fn test_half_configured_agent_returns_warning() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("coachline.toml");
        tokio::fs::write(&file, "").await.unwrap();

        let env = env(&[("ELEVENLABS_AGENT_ID", "agent_123")]);
        let prepared = load_and_prepare_with(Some(&file), &env).await.unwrap();
        assert!(!prepared.config.agent.is_configured());
        assert_eq!(prepared.warnings.len(), 1);
        assert_eq!(prepared.warnings[0].path, "agent.api_key");
    }

    #[tokio::test]
    async fn test_invalid_time_unit_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("coachline.toml");
        tokio::fs::write(&file, "[demo]\ntime_unit_ms = 0\n").await.unwrap();

        let err = load_and_prepare_with(Some(&file), &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
