//! Config validation with field paths.

use crate::schema::CoachConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &CoachConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.demo.time_unit_ms == 0 {
        report.error("demo.time_unit_ms", "must be greater than zero");
    }

    let agent = &config.agent;
    let has_id = agent.agent_id.as_deref().is_some_and(|v| !v.trim().is_empty());
    let has_key = agent.api_key.as_deref().is_some_and(|v| !v.trim().is_empty());
    if has_id != has_key {
        let missing = if has_id { "agent.api_key" } else { "agent.agent_id" };
        report.warn(missing, "not set; running in demo mode");
    }
    if agent.branch_id.is_some() && !agent.is_configured() {
        report.warn("agent.branch_id", "ignored without agent credentials");
    }

    report
}
