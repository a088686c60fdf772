//! View model
//!
//! Derives everything the screen shows from a `SessionState` snapshot, so
//! the rendering code never makes a decision of its own.

use chrono::{DateTime, Local, Utc};
use coachline_core::{ActivityState, InputMode, SessionState};

pub const DEMO_BANNER: &str =
    "Demo Mode: Configure ElevenLabs credentials to connect your agent.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    /// Local wall-clock time, `HH:MM`.
    pub time: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub demo_banner: Option<&'static str>,
    pub error: Option<String>,
    pub transcript: Vec<TranscriptLine>,
    /// Only shown while a call is active.
    pub status: Option<&'static str>,
    pub input_mode: InputMode,
    pub mode_label: &'static str,
    pub call_active: bool,
    pub call_button: &'static str,
    /// A start or end is in flight; the call button is unresponsive.
    pub call_pending: bool,
    pub input_visible: bool,
    pub draft: String,
    pub send_enabled: bool,
}

impl ViewModel {
    pub fn from_state(state: &SessionState) -> Self {
        let active = state.call.is_active();
        Self {
            demo_banner: state.is_demo().then_some(DEMO_BANNER),
            error: state.error.clone(),
            transcript: state
                .transcript
                .iter()
                .map(|m| TranscriptLine {
                    time: clock_time(m.timestamp()),
                    text: m.text().to_string(),
                })
                .collect(),
            status: active.then(|| status_text(state.activity)),
            input_mode: state.input_mode,
            mode_label: match state.input_mode {
                InputMode::Voice => "Voice Mode",
                InputMode::Text => "Text Mode",
            },
            call_active: active,
            call_button: if active {
                "End Interview Call"
            } else {
                "Start Interview Call"
            },
            call_pending: state.pending.is_some(),
            input_visible: state.input_mode == InputMode::Text && active,
            draft: state.input.clone(),
            send_enabled: !state.input.trim().is_empty(),
        }
    }
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::from_state(&SessionState::new(false))
    }
}

fn status_text(activity: ActivityState) -> &'static str {
    match activity {
        ActivityState::Speaking => "Speaking...",
        ActivityState::Listening => "Listening...",
        ActivityState::Idle => "Ready",
    }
}

pub fn clock_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}
