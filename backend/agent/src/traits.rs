//! Capability set consumed from the agent service.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use coachline_core::AgentEvent;

/// Everything the service needs to open a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub agent_id: String,
    pub branch_id: Option<String>,
    pub api_key: String,
}

/// Payload of `on_message`. Services may emit messages without text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentMessage {
    pub text: Option<String>,
}

/// Payload of `on_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFailure {
    pub message: String,
}

/// The five handler slots a session reports through.
///
/// Handlers are synchronous and must not block: implementations forward
/// the notification and return.
pub trait AgentCallbacks: Send + Sync {
    fn on_connect(&self);
    fn on_disconnect(&self);
    fn on_message(&self, message: AgentMessage);
    fn on_error(&self, error: AgentFailure);
    fn on_status_change(&self, status: &str);

    /// Dispatch an [`AgentEvent`] to the matching handler.
    fn dispatch(&self, event: AgentEvent) {
        match event {
            AgentEvent::Connected => self.on_connect(),
            AgentEvent::Disconnected => self.on_disconnect(),
            AgentEvent::Message { text } => self.on_message(AgentMessage { text: Some(text) }),
            AgentEvent::Error { message } => self.on_error(AgentFailure { message }),
            AgentEvent::StatusChanged { status } => self.on_status_change(&status),
        }
    }
}

/// An external conversational agent service.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Service name for logging (e.g. "elevenlabs").
    fn name(&self) -> &str;

    /// Open a session. Callbacks are registered for the session's lifetime.
    async fn start_session(
        &self,
        params: SessionParams,
        callbacks: Arc<dyn AgentCallbacks>,
    ) -> Result<Box<dyn AgentSession>>;
}

/// A live session handle.
#[async_trait]
pub trait AgentSession: Send + Sync {
    async fn send_user_input(&self, text: &str) -> Result<()>;
    async fn end_session(&self) -> Result<()>;
}
