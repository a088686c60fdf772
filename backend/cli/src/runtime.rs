//! Wiring from loaded config to a ready-to-spawn coordinator.

use std::sync::Arc;

use coachline_agent::{AgentAdapter, AgentCredentials, ElevenLabsService};
use coachline_config::{config_dir, CoachConfig, ValidationIssue};
use coachline_logging::{LogOutput, LoggerSettings};
use coachline_session::{DemoSimulator, DemoTiming, SessionCoordinator};
use tracing::warn;

use crate::terminal_output::note_warn;

/// Coordinator backed by ElevenLabs. Without credentials the adapter is
/// never asked to connect and the demo simulator answers instead.
pub fn build_coordinator(config: &CoachConfig) -> SessionCoordinator {
    let credentials = AgentCredentials::from(&config.agent);
    let adapter = AgentAdapter::new(credentials, Arc::new(ElevenLabsService::new()));
    let demo = DemoSimulator::with_timing(DemoTiming::new(config.demo.time_unit()));
    SessionCoordinator::new(adapter, demo)
}

/// Interactive commands own the terminal, so they log to files only.
pub fn logger_settings(config: &CoachConfig, console: bool) -> LoggerSettings {
    let dir = config
        .logging
        .dir
        .clone()
        .unwrap_or_else(|| config_dir().join("logs"));

    let output = if console {
        match &config.logging.dir {
            Some(dir) => LogOutput::Both {
                dir: dir.clone(),
                json: config.logging.json,
            },
            None => LogOutput::Console {
                json: config.logging.json,
            },
        }
    } else {
        LogOutput::File { dir }
    };

    LoggerSettings {
        level: config.logging.level.clone(),
        output,
    }
}

/// Surface config warnings on the terminal and in the log. Call after the
/// logger is installed.
pub fn report_config_warnings(warnings: &[ValidationIssue]) {
    for line in warning_lines(warnings) {
        note_warn(&line);
    }
    for warning in warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
}

fn warning_lines(warnings: &[ValidationIssue]) -> Vec<String> {
    warnings
        .iter()
        .map(|w| format!("config {}: {}", w.path, w.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_interactive_logs_to_file() {
        let settings = logger_settings(&CoachConfig::default(), false);
        match settings.output {
            LogOutput::File { dir } => assert!(dir.ends_with("logs")),
            other => panic!("unexpected output {other:?}"),
        }
        assert_eq!(settings.level, "info");
    }

    #[test]
    fn test_console_adds_file_when_dir_set() {
        let mut config = CoachConfig::default();
        config.logging.dir = Some(PathBuf::from("/tmp/coachline-logs"));
        config.logging.json = true;
        assert_eq!(
            logger_settings(&config, true).output,
            LogOutput::Both {
                dir: PathBuf::from("/tmp/coachline-logs"),
                json: true
            }
        );
    }

    #[test]
    fn test_warning_lines_name_the_field() {
        let mut config = CoachConfig::default();
        config.agent.agent_id = Some("agent_1".into());
        config.agent.branch_id = Some("beta".into());
        let report = coachline_config::validate(&config);

        assert_eq!(
            warning_lines(&report.warnings),
            vec![
                "config agent.api_key: not set; running in demo mode".to_string(),
                "config agent.branch_id: ignored without agent credentials".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_unconfigured_build_runs_in_demo_mode() {
        let (handle, _task) = build_coordinator(&CoachConfig::default()).spawn();
        assert!(handle.snapshot().is_demo());
    }
}
