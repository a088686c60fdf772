use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an interview call is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    #[default]
    Inactive,
    Active,
}

impl CallState {
    pub fn is_active(self) -> bool {
        self == CallState::Active
    }
}

/// What the agent (real or simulated) is currently doing.
/// Only meaningful while the call is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    #[default]
    Idle,
    Speaking,
    Listening,
}

impl ActivityState {
    /// Map the agent service's status vocabulary onto our states.
    /// Anything unrecognized collapses to `Idle`.
    pub fn from_agent_status(status: &str) -> Self {
        match status {
            "speaking" => ActivityState::Speaking,
            "listening" => ActivityState::Listening,
            _ => ActivityState::Idle,
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityState::Idle => "idle",
            ActivityState::Speaking => "speaking",
            ActivityState::Listening => "listening",
        };
        f.write_str(s)
    }
}

/// How the user answers: by voice (handled by the agent service) or by typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Voice,
    Text,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Voice => InputMode::Text,
            InputMode::Text => InputMode::Voice,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Voice => f.write_str("voice"),
            InputMode::Text => f.write_str("text"),
        }
    }
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voice" => Ok(InputMode::Voice),
            "text" => Ok(InputMode::Text),
            other => Err(format!("unknown input mode '{other}' (expected voice or text)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_status_mapping() {
        assert_eq!(ActivityState::from_agent_status("speaking"), ActivityState::Speaking);
        assert_eq!(ActivityState::from_agent_status("listening"), ActivityState::Listening);
        assert_eq!(ActivityState::from_agent_status("idle"), ActivityState::Idle);
        assert_eq!(ActivityState::from_agent_status("thinking"), ActivityState::Idle);
        assert_eq!(ActivityState::from_agent_status("Speaking"), ActivityState::Idle);
    }

    #[test]
    fn test_input_mode_parse_and_toggle() {
        assert_eq!("Text".parse::<InputMode>().unwrap(), InputMode::Text);
        assert_eq!(" voice ".parse::<InputMode>().unwrap(), InputMode::Voice);
        assert!("video".parse::<InputMode>().is_err());
        assert_eq!(InputMode::Voice.toggled(), InputMode::Text);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CallState::default(), CallState::Inactive);
        assert_eq!(ActivityState::default(), ActivityState::Idle);
        assert_eq!(InputMode::default(), InputMode::Voice);
    }
}
