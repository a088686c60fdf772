//! Single point of contact with the agent service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use coachline_core::CoachError;
use tracing::{debug, error, info, warn};

use crate::credentials::AgentCredentials;
use crate::traits::{
    AgentCallbacks, AgentFailure, AgentMessage, AgentService, AgentSession, SessionParams,
};

/// Owns at most one session with the agent service.
///
/// Explicitly constructed and handed to the coordinator, so tests can swap
/// the service for a fake.
pub struct AgentAdapter {
    credentials: AgentCredentials,
    service: Arc<dyn AgentService>,
    session: Option<Box<dyn AgentSession>>,
    connected: Arc<AtomicBool>,
}

impl AgentAdapter {
    pub fn new(credentials: AgentCredentials, service: Arc<dyn AgentService>) -> Self {
        Self {
            credentials,
            service,
            session: None,
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Last-known connection flag: set by `on_connect`, cleared by
    /// `on_disconnect` and by ending the session.
    pub fn connection_status(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Open a session, registering `callbacks` for its lifetime.
    ///
    /// Fails with `Configuration` when credentials are missing and with
    /// `State` when a session is already open.
    pub async fn start_session(
        &mut self,
        callbacks: Arc<dyn AgentCallbacks>,
    ) -> Result<(), CoachError> {
        let (Some(agent_id), Some(api_key)) =
            (self.credentials.agent_id(), self.credentials.api_key())
        else {
            return Err(CoachError::Configuration(
                "missing agent credentials (agent id and api key are required)".to_string(),
            ));
        };
        if self.session.is_some() {
            return Err(CoachError::session_already_active());
        }

        let params = SessionParams {
            agent_id: agent_id.to_string(),
            branch_id: self.credentials.branch_id().map(str::to_string),
            api_key: api_key.to_string(),
        };

        info!(service = self.service.name(), agent_id = %params.agent_id, "Starting agent session");

        let tracked = Arc::new(TrackedCallbacks {
            inner: callbacks,
            connected: Arc::clone(&self.connected),
        });

        match self.service.start_session(params, tracked).await {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to start agent session");
                Err(CoachError::Connection(format!("{e:#}")))
            }
        }
    }

    /// Forward user text verbatim to the open session.
    pub async fn send_text(&self, text: &str) -> Result<(), CoachError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(CoachError::no_active_session)?;

        session.send_user_input(text).await.map_err(|e| {
            error!(error = %e, "Failed to send text to agent");
            CoachError::Connection(format!("{e:#}"))
        })
    }

    /// Close the session. Closure errors are logged and swallowed; the local
    /// handle and connected flag are dropped regardless.
    pub async fn end_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match session.end_session().await {
            Ok(()) => info!("Agent session ended"),
            Err(e) => warn!(error = %e, "Error ending agent session"),
        }
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Drop the local handle without asking the service to close. Used when
    /// the service already tore the session down.
    pub fn discard_session(&mut self) {
        if self.session.take().is_some() {
            debug!("Discarded agent session handle");
        }
        self.connected.store(false, Ordering::SeqCst);
    }
}

/// Keeps the connection flag current and logs every callback before
/// handing it to the caller's handlers.
struct TrackedCallbacks {
    inner: Arc<dyn AgentCallbacks>,
    connected: Arc<AtomicBool>,
}

impl AgentCallbacks for TrackedCallbacks {
    fn on_connect(&self) {
        info!("Connected to agent");
        self.connected.store(true, Ordering::SeqCst);
        self.inner.on_connect();
    }

    fn on_disconnect(&self) {
        info!("Disconnected from agent");
        self.connected.store(false, Ordering::SeqCst);
        self.inner.on_disconnect();
    }

    fn on_message(&self, message: AgentMessage) {
        debug!(has_text = message.text.is_some(), "Agent message");
        self.inner.on_message(message);
    }

    fn on_error(&self, error: AgentFailure) {
        error!(message = %error.message, "Agent error");
        self.inner.on_error(error);
    }

    fn on_status_change(&self, status: &str) {
        debug!(status, "Agent status changed");
        self.inner.on_status_change(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeAgentService, RecordingCallbacks};
    use coachline_core::AgentEvent;

    fn configured(service: &FakeAgentService) -> AgentAdapter {
        AgentAdapter::new(
            AgentCredentials::new("agent_1", "sk_test").with_branch("main"),
            Arc::new(service.clone()),
        )
    }

    #[tokio::test]
    async fn test_start_requires_credentials() {
        let service = FakeAgentService::new();
        let mut adapter = AgentAdapter::new(AgentCredentials::default(), Arc::new(service.clone()));
        assert!(!adapter.is_configured());

        let err = adapter
            .start_session(Arc::new(RecordingCallbacks::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Configuration(_)));
        assert_eq!(service.start_count(), 0);
        assert!(!adapter.has_session());
    }

    #[tokio::test]
    async fn test_start_passes_params_through() {
        let service = FakeAgentService::new();
        let mut adapter = configured(&service);
        adapter
            .start_session(Arc::new(RecordingCallbacks::default()))
            .await
            .unwrap();

        let params = service.last_params().unwrap();
        assert_eq!(params.agent_id, "agent_1");
        assert_eq!(params.api_key, "sk_test");
        assert_eq!(params.branch_id.as_deref(), Some("main"));
        assert!(adapter.has_session());
    }

    #[tokio::test]
    async fn test_second_start_rejected() {
        let service = FakeAgentService::new();
        let mut adapter = configured(&service);
        let callbacks = Arc::new(RecordingCallbacks::default());
        adapter.start_session(callbacks.clone()).await.unwrap();

        let err = adapter.start_session(callbacks).await.unwrap_err();
        assert!(matches!(err, CoachError::State(_)));
        assert_eq!(service.start_count(), 1);
    }

    #[tokio::test]
    async fn test_start_failure_propagates_as_connection_error() {
        let service = FakeAgentService::new();
        service.fail_start("agent not found");
        let mut adapter = configured(&service);

        let err = adapter
            .start_session(Arc::new(RecordingCallbacks::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Connection(ref m) if m.contains("agent not found")));
        assert!(!adapter.has_session());
    }

    #[tokio::test]
    async fn test_send_without_session_is_state_error() {
        let service = FakeAgentService::new();
        let adapter = configured(&service);
        let err = adapter.send_text("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "state error: no active session");
    }

    #[tokio::test]
    async fn test_send_forwards_verbatim() {
        let service = FakeAgentService::new();
        let mut adapter = configured(&service);
        adapter
            .start_session(Arc::new(RecordingCallbacks::default()))
            .await
            .unwrap();

        adapter.send_text("  I enjoy debugging  ").await.unwrap();
        assert_eq!(service.sent(), vec!["  I enjoy debugging  ".to_string()]);

        service.fail_send("socket closed");
        let err = adapter.send_text("again").await.unwrap_err();
        assert!(matches!(err, CoachError::Connection(_)));
    }

    #[tokio::test]
    async fn test_connection_flag_follows_callbacks() {
        let service = FakeAgentService::new();
        let mut adapter = configured(&service);
        let callbacks = Arc::new(RecordingCallbacks::default());
        adapter.start_session(callbacks.clone()).await.unwrap();
        assert!(!adapter.connection_status());

        assert!(service.emit(AgentEvent::Connected));
        assert!(adapter.connection_status());

        assert!(service.emit(AgentEvent::Disconnected));
        assert!(!adapter.connection_status());
        assert_eq!(
            callbacks.events(),
            vec![AgentEvent::Connected, AgentEvent::Disconnected]
        );
    }

    #[tokio::test]
    async fn test_end_swallows_errors_and_clears_state() {
        let service = FakeAgentService::new();
        service.fail_end("already closed");
        let mut adapter = configured(&service);
        adapter
            .start_session(Arc::new(RecordingCallbacks::default()))
            .await
            .unwrap();
        service.emit(AgentEvent::Connected);

        adapter.end_session().await;
        assert!(!adapter.has_session());
        assert!(!adapter.connection_status());
        assert_eq!(service.end_count(), 1);

        // No session: no-op.
        adapter.end_session().await;
        assert_eq!(service.end_count(), 1);
    }

    #[tokio::test]
    async fn test_discard_does_not_call_service() {
        let service = FakeAgentService::new();
        let mut adapter = configured(&service);
        adapter
            .start_session(Arc::new(RecordingCallbacks::default()))
            .await
            .unwrap();

        adapter.discard_session();
        assert!(!adapter.has_session());
        assert_eq!(service.end_count(), 0);
    }
}
