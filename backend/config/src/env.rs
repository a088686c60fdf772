//! Environment variable substitution and overrides.
//!
//! String values in the config file may contain `${VAR_NAME}` references,
//! resolved at load time. Only uppercase `[A-Z_][A-Z0-9_]*` names are
//! matched, and `$${VAR}` escapes to a literal `${VAR}`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use toml::Value;

use crate::error::ConfigError;
use crate::schema::CoachConfig;

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const AGENT_ID_VAR: &str = "ELEVENLABS_AGENT_ID";
pub const API_KEY_VAR: &str = "ELEVENLABS_API_KEY";
pub const BRANCH_ID_VAR: &str = "ELEVENLABS_BRANCH_ID";
pub const TIME_UNIT_VAR: &str = "COACHLINE_TIME_UNIT_MS";
pub const LOG_LEVEL_VAR: &str = "COACHLINE_LOG";
pub const LOG_DIR_VAR: &str = "COACHLINE_LOG_DIR";

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references throughout a parsed TOML tree.
pub fn resolve_env_vars(
    value: &Value,
    env: &HashMap<String, String>,
) -> Result<Value, MissingEnvVarError> {
    substitute_value(value, env, "")
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Table(table) => {
            let mut out = toml::map::Map::new();
            for (k, v) in table {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Table(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let out = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let whole = &caps[0];
        let name = &caps[1];
        if whole.starts_with("$$") {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err),
        None => Ok(out.into_owned()),
    }
}

/// Apply the well-known environment variables on top of the loaded config.
/// Empty variables are treated as unset.
pub fn apply_env_overrides(
    config: &mut CoachConfig,
    env: &HashMap<String, String>,
) -> Result<(), ConfigError> {
    let get = |key: &str| {
        env.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(v) = get(AGENT_ID_VAR) {
        config.agent.agent_id = Some(v);
    }
    if let Some(v) = get(API_KEY_VAR) {
        config.agent.api_key = Some(v);
    }
    if let Some(v) = get(BRANCH_ID_VAR) {
        config.agent.branch_id = Some(v);
    }
    if let Some(v) = get(TIME_UNIT_VAR) {
        config.demo.time_unit_ms = v.parse().map_err(|_| ConfigError::Invalid {
            path: TIME_UNIT_VAR.to_string(),
            message: format!("expected milliseconds, got '{v}'"),
        })?;
    }
    if let Some(v) = get(LOG_LEVEL_VAR) {
        config.logging.level = v;
    }
    if let Some(v) = get(LOG_DIR_VAR) {
        config.logging.dir = Some(v.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn table(src: &str) -> Value {
        toml::from_str(src).unwrap()
    }

    fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
        path.iter()
            .try_fold(value, |v, key| v.get(*key))
            .and_then(Value::as_str)
    }

    #[test]
    fn substitutes_nested_var() {
        let v = table("[agent]\napi_key = \"${XI_KEY}\"\n");
        let out = resolve_env_vars(&v, &env(&[("XI_KEY", "sk_123")])).unwrap();
        assert_eq!(lookup(&out, &["agent", "api_key"]), Some("sk_123"));
    }

    #[test]
    fn error_names_var_and_path() {
        let v = table("[agent]\nagent_id = \"${MISSING_AGENT}\"\n");
        let err = resolve_env_vars(&v, &HashMap::new()).unwrap_err();
        assert_eq!(err.var_name, "MISSING_AGENT");
        assert_eq!(err.config_path, "agent.agent_id");
    }

    #[test]
    fn escaped_reference_kept_literal() {
        let v = table("note = \"cost $${NOT_A_VAR}\"\n");
        let out = resolve_env_vars(&v, &HashMap::new()).unwrap();
        assert_eq!(lookup(&out, &["note"]), Some("cost ${NOT_A_VAR}"));
    }

    #[test]
    fn overrides_ignore_empty_values() {
        let mut config = CoachConfig::default();
        config.agent.agent_id = Some("from_file".into());
        apply_env_overrides(
            &mut config,
            &env(&[(AGENT_ID_VAR, "  "), (API_KEY_VAR, "sk_env"), (TIME_UNIT_VAR, "10")]),
        )
        .unwrap();
        assert_eq!(config.agent.agent_id.as_deref(), Some("from_file"));
        assert_eq!(config.agent.api_key.as_deref(), Some("sk_env"));
        assert_eq!(config.demo.time_unit_ms, 10);
    }

    #[test]
    fn bad_time_unit_is_invalid() {
        let mut config = CoachConfig::default();
        let err = apply_env_overrides(&mut config, &env(&[(TIME_UNIT_VAR, "soon")])).unwrap_err();
        assert!(err.to_string().contains(TIME_UNIT_VAR));
    }
}
