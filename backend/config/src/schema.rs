//! Coachline configuration schema.
//!
//! Every section is optional in the TOML file; missing values fall back to
//! the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    pub agent: AgentSection,
    pub demo: DemoSection,
    pub logging: LoggingSection,
}

/// Credentials for the conversational agent service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub agent_id: Option<String>,
    pub api_key: Option<String>,
    /// Optional routing/branch identifier passed through to the service.
    pub branch_id: Option<String>,
}

impl AgentSection {
    /// Presence check only; the values are never validated for format.
    pub fn is_configured(&self) -> bool {
        present(&self.agent_id) && present(&self.api_key)
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Pacing of the scripted demo responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSection {
    /// Length of one demo "time unit" in milliseconds. The opening line
    /// comes after 2 units, replies after 1 unit.
    pub time_unit_ms: u64,
}

impl Default for DemoSection {
    fn default() -> Self {
        Self { time_unit_ms: 1000 }
    }
}

impl DemoSection {
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for rolling NDJSON log files.
    pub dir: Option<PathBuf>,
    /// Emit JSON on the console layer instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured_requires_both_values() {
        let mut agent = AgentSection::default();
        assert!(!agent.is_configured());

        agent.agent_id = Some("agent_1".into());
        assert!(!agent.is_configured());

        agent.api_key = Some("   ".into());
        assert!(!agent.is_configured());

        agent.api_key = Some("sk_abc".into());
        assert!(agent.is_configured());

        // Branch is optional.
        assert!(agent.branch_id.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CoachConfig = toml::from_str("[agent]\nagent_id = \"a\"\n").unwrap();
        assert_eq!(config.agent.agent_id.as_deref(), Some("a"));
        assert_eq!(config.demo.time_unit_ms, 1000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.demo.time_unit(), Duration::from_secs(1));
    }
}
