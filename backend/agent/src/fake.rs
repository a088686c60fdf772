//! In-memory agent service for tests and offline runs.
//!
//! `FakeAgentService` records what it is asked to do, can be told to fail
//! each operation, and lets the caller push events through the callbacks
//! registered by the most recent session.

use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use coachline_core::AgentEvent;

use crate::traits::{
    AgentCallbacks, AgentFailure, AgentMessage, AgentService, AgentSession, SessionParams,
};

#[derive(Default)]
struct FakeState {
    fail_start: Option<String>,
    fail_send: Option<String>,
    fail_end: Option<String>,
    greeting: Option<String>,
    quiet_end: bool,
    params: Vec<SessionParams>,
    sent: Vec<String>,
    ends: usize,
    callbacks: Option<Arc<dyn AgentCallbacks>>,
}

#[derive(Clone, Default)]
pub struct FakeAgentService {
    state: Arc<Mutex<FakeState>>,
}

impl FakeAgentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// On start, report connect and then speak `greeting`, the way a live
    /// agent opens the interview.
    pub fn with_greeting(self, greeting: impl Into<String>) -> Self {
        self.lock().greeting = Some(greeting.into());
        self
    }

    /// Do not emit `on_disconnect` when a session is ended.
    pub fn with_quiet_end(self) -> Self {
        self.lock().quiet_end = true;
        self
    }

    pub fn fail_start(&self, reason: impl Into<String>) {
        self.lock().fail_start = Some(reason.into());
    }

    pub fn fail_send(&self, reason: impl Into<String>) {
        self.lock().fail_send = Some(reason.into());
    }

    pub fn fail_end(&self, reason: impl Into<String>) {
        self.lock().fail_end = Some(reason.into());
    }

    pub fn start_count(&self) -> usize {
        self.lock().params.len()
    }

    pub fn end_count(&self) -> usize {
        self.lock().ends
    }

    pub fn last_params(&self) -> Option<SessionParams> {
        self.lock().params.last().cloned()
    }

    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    /// Deliver `event` to the current session's callbacks.
    /// Returns `false` when no session has registered callbacks yet.
    pub fn emit(&self, event: AgentEvent) -> bool {
        let callbacks = self.lock().callbacks.clone();
        match callbacks {
            Some(cb) => {
                cb.dispatch(event);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AgentService for FakeAgentService {
    fn name(&self) -> &str {
        "fake"
    }

    async fn start_session(
        &self,
        params: SessionParams,
        callbacks: Arc<dyn AgentCallbacks>,
    ) -> Result<Box<dyn AgentSession>> {
        let greeting = {
            let mut state = self.lock();
            state.params.push(params);
            if let Some(reason) = state.fail_start.clone() {
                bail!(reason);
            }
            state.callbacks = Some(Arc::clone(&callbacks));
            state.greeting.clone()
        };

        if let Some(greeting) = greeting {
            callbacks.on_connect();
            callbacks.on_status_change("speaking");
            callbacks.on_message(AgentMessage {
                text: Some(greeting),
            });
            callbacks.on_status_change("listening");
        }

        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
            callbacks,
        }))
    }
}

struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    callbacks: Arc<dyn AgentCallbacks>,
}

impl FakeSession {
    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AgentSession for FakeSession {
    async fn send_user_input(&self, text: &str) -> Result<()> {
        let mut state = self.lock();
        if let Some(reason) = state.fail_send.clone() {
            bail!(reason);
        }
        state.sent.push(text.to_string());
        Ok(())
    }

    async fn end_session(&self) -> Result<()> {
        let (failure, quiet) = {
            let mut state = self.lock();
            state.ends += 1;
            (state.fail_end.clone(), state.quiet_end)
        };
        if let Some(reason) = failure {
            bail!(reason);
        }
        if !quiet {
            self.callbacks.on_disconnect();
        }
        Ok(())
    }
}

/// Callbacks that record every notification as an [`AgentEvent`].
#[derive(Default)]
pub struct RecordingCallbacks {
    events: Mutex<Vec<AgentEvent>>,
}

impl RecordingCallbacks {
    pub fn events(&self) -> Vec<AgentEvent> {
        self.push_lock().clone()
    }

    fn push_lock(&self) -> std::sync::MutexGuard<'_, Vec<AgentEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, event: AgentEvent) {
        self.push_lock().push(event);
    }
}

impl AgentCallbacks for RecordingCallbacks {
    fn on_connect(&self) {
        self.push(AgentEvent::Connected);
    }

    fn on_disconnect(&self) {
        self.push(AgentEvent::Disconnected);
    }

    fn on_message(&self, message: AgentMessage) {
        self.push(AgentEvent::Message {
            text: message.text.unwrap_or_default(),
        });
    }

    fn on_error(&self, error: AgentFailure) {
        self.push(AgentEvent::Error {
            message: error.message,
        });
    }

    fn on_status_change(&self, status: &str) {
        self.push(AgentEvent::StatusChanged {
            status: status.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SessionParams {
        SessionParams {
            agent_id: "agent".into(),
            branch_id: None,
            api_key: "sk".into(),
        }
    }

    #[tokio::test]
    async fn test_greeting_sequence() {
        let service = FakeAgentService::new().with_greeting("Welcome!");
        let callbacks = Arc::new(RecordingCallbacks::default());
        let _session = service.start_session(params(), callbacks.clone()).await.unwrap();

        assert_eq!(
            callbacks.events(),
            vec![
                AgentEvent::Connected,
                AgentEvent::StatusChanged { status: "speaking".into() },
                AgentEvent::Message { text: "Welcome!".into() },
                AgentEvent::StatusChanged { status: "listening".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_end_emits_disconnect_unless_quiet() {
        let service = FakeAgentService::new();
        let callbacks = Arc::new(RecordingCallbacks::default());
        let session = service.start_session(params(), callbacks.clone()).await.unwrap();
        session.end_session().await.unwrap();
        assert_eq!(callbacks.events(), vec![AgentEvent::Disconnected]);

        let quiet = FakeAgentService::new().with_quiet_end();
        let callbacks = Arc::new(RecordingCallbacks::default());
        let session = quiet.start_session(params(), callbacks.clone()).await.unwrap();
        session.end_session().await.unwrap();
        assert!(callbacks.events().is_empty());
    }

    #[tokio::test]
    async fn test_emit_without_session() {
        assert!(!FakeAgentService::new().emit(AgentEvent::Connected));
    }
}
