//! Session Event Logger
//!
//! Structured records of what happened during an interview session
//! (transcript additions, activity changes, errors), emitted through
//! `tracing` under the `session_events` target.

use chrono::{DateTime, Utc};
use coachline_core::{ActivityState, CallState};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_secrets;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    CallChanged { call: CallState },
    ActivityChanged { activity: ActivityState },
    MessageAppended { text: String },
    Error { error_msg: String },
}

#[derive(Debug, Serialize)]
pub struct SessionEventEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: SessionEvent,
}

pub struct SessionEventLogger;

impl SessionEventLogger {
    /// Redact the event's free text and emit it.
    pub fn log_event(session_id: &str, event: SessionEvent) -> SessionEventEntry {
        let event = match event {
            SessionEvent::MessageAppended { text } => SessionEvent::MessageAppended {
                text: redact_secrets(&text),
            },
            SessionEvent::Error { error_msg } => SessionEvent::Error {
                error_msg: redact_secrets(&error_msg),
            },
            other => other,
        };

        let entry = SessionEventEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event,
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "session_events", event = %json, "Session event");
        entry
    }
}
