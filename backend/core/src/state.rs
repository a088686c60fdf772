//! Session state and its transition function.
//!
//! `SessionState::apply` is pure with respect to the outside world: it only
//! mutates the state value and hands back the side effects the coordinator
//! has to carry out (talking to the agent, arming demo timers). This keeps
//! every rule of the call lifecycle testable without a runtime.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::event::AgentEvent;
use crate::message::Transcript;
use crate::types::{ActivityState, CallState, InputMode};
use crate::{CLOSING_LINE, WELCOME_LINE};

/// A call transition that has been requested but not yet resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pending {
    Starting,
    Ending,
}

/// Everything that can move the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// User pressed the call button.
    ToggleCall,
    /// The adapter opened a session.
    SessionOpened,
    /// The adapter failed to open a session.
    SessionOpenFailed(String),
    /// The adapter finished closing (successfully or not).
    SessionClosed,
    SetInputMode(InputMode),
    EditInput(String),
    /// User submitted the draft in the input buffer.
    SendMessage,
    SendFailed(String),
    Agent(AgentEvent),
    DemoOpening { text: String },
    DemoReply { text: String },
    DemoListening,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenSession,
    /// Close the session and report back with `SessionClosed`.
    CloseSession,
    /// Drop the local session handle without notifying anyone.
    DiscardSession,
    SendText(String),
    ScheduleOpening,
    ScheduleDemoReply,
}

/// The full state of one interview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub call: CallState,
    pub activity: ActivityState,
    pub input_mode: InputMode,
    /// Draft text typed by the user, not yet sent.
    pub input: String,
    pub error: Option<String>,
    /// Whether agent credentials are present. Fixed for the session.
    pub configured: bool,
    pub pending: Option<Pending>,
    /// Last agent status reported while the start was pending.
    #[serde(default)]
    pub pending_status: Option<ActivityState>,
    pub transcript: Transcript,
}

impl SessionState {
    pub fn new(configured: bool) -> Self {
        let mut transcript = Transcript::new();
        transcript.append_text(WELCOME_LINE);
        Self {
            call: CallState::Inactive,
            activity: ActivityState::Idle,
            input_mode: InputMode::Voice,
            input: String::new(),
            error: None,
            configured,
            pending: None,
            pending_status: None,
            transcript,
        }
    }

    pub fn is_demo(&self) -> bool {
        !self.configured
    }

    /// True when the text affordance should accept a send.
    pub fn can_send(&self) -> bool {
        self.input_mode == InputMode::Text
            && self.call.is_active()
            && !self.input.trim().is_empty()
    }

    pub fn apply(&mut self, transition: Transition) -> Vec<Effect> {
        match transition {
            Transition::ToggleCall => self.toggle_call(),
            Transition::SessionOpened => {
                if self.pending != Some(Pending::Starting) {
                    // Disconnected before the start resolved; let the handle go.
                    warn!("session opened after start was abandoned");
                    return vec![Effect::DiscardSession];
                }
                self.pending = None;
                self.call = CallState::Active;
                if let Some(activity) = self.pending_status.take() {
                    self.activity = activity;
                }
                vec![]
            }
            Transition::SessionOpenFailed(reason) => {
                self.pending = None;
                self.pending_status = None;
                self.call = CallState::Inactive;
                self.activity = ActivityState::Idle;
                self.error = Some(format!("Failed to start interview: {reason}"));
                vec![]
            }
            Transition::SessionClosed => {
                self.pending = None;
                self.finish_call();
                vec![]
            }
            Transition::SetInputMode(mode) => {
                self.input_mode = mode;
                vec![]
            }
            Transition::EditInput(text) => {
                self.input = text;
                vec![]
            }
            Transition::SendMessage => self.send_message(),
            Transition::SendFailed(reason) => {
                self.error = Some(format!("Failed to send message: {reason}"));
                vec![]
            }
            Transition::Agent(event) => self.agent_event(event),
            Transition::DemoOpening { text } => {
                if self.call.is_active() {
                    self.transcript.append_text(text);
                    self.activity = ActivityState::Listening;
                }
                vec![]
            }
            Transition::DemoReply { text } => {
                if self.call.is_active() {
                    self.activity = ActivityState::Speaking;
                    self.transcript.append_text(text);
                }
                vec![]
            }
            Transition::DemoListening => {
                if self.call.is_active() {
                    self.activity = ActivityState::Listening;
                }
                vec![]
            }
        }
    }

    fn toggle_call(&mut self) -> Vec<Effect> {
        if let Some(pending) = self.pending {
            debug!(?pending, "toggle ignored while a call transition is in flight");
            return vec![];
        }

        match self.call {
            CallState::Inactive => {
                self.error = None;
                // Optimistic: the agent is about to greet.
                self.activity = ActivityState::Speaking;
                if self.configured {
                    self.pending = Some(Pending::Starting);
                    vec![Effect::OpenSession]
                } else {
                    self.call = CallState::Active;
                    vec![Effect::ScheduleOpening]
                }
            }
            CallState::Active => {
                if self.configured {
                    self.pending = Some(Pending::Ending);
                    vec![Effect::CloseSession]
                } else {
                    self.finish_call();
                    vec![]
                }
            }
        }
    }

    fn finish_call(&mut self) {
        self.call = CallState::Inactive;
        self.activity = ActivityState::Idle;
        self.transcript.append_text(CLOSING_LINE);
    }

    fn send_message(&mut self) -> Vec<Effect> {
        if !self.can_send() {
            debug!("send ignored: needs text mode, an active call and a non-empty draft");
            return vec![];
        }

        let text = std::mem::take(&mut self.input);
        if self.configured {
            self.activity = ActivityState::Speaking;
            vec![Effect::SendText(text)]
        } else {
            vec![Effect::ScheduleDemoReply]
        }
    }

    fn agent_event(&mut self, event: AgentEvent) -> Vec<Effect> {
        match event {
            AgentEvent::Connected => vec![],
            // Not gated on Active: the greeting arrives before the start resolves.
            AgentEvent::Message { text } => {
                self.transcript.append_text(text);
                vec![]
            }
            AgentEvent::StatusChanged { status } => {
                let activity = ActivityState::from_agent_status(&status);
                if self.call.is_active() {
                    self.activity = activity;
                } else if self.pending == Some(Pending::Starting) {
                    self.pending_status = Some(activity);
                }
                vec![]
            }
            AgentEvent::Error { message } => {
                self.error = Some(format!("Connection error: {message}"));
                self.activity = ActivityState::Idle;
                vec![]
            }
            AgentEvent::Disconnected => {
                if self.pending == Some(Pending::Starting) {
                    self.pending = None;
                }
                self.pending_status = None;
                self.call = CallState::Inactive;
                self.activity = ActivityState::Idle;
                vec![Effect::DiscardSession]
            }
        }
    }
}
