use thiserror::Error;

/// Top-level error type for the Coachline runtime.
#[derive(Debug, Error)]
pub enum CoachError {
    /// Agent credentials are missing. Gates the client into demo mode
    /// rather than surfacing as a hard failure.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The agent service refused to start a session or to accept input.
    #[error("connection error: {0}")]
    Connection(String),

    /// An operation was attempted in a state that does not allow it.
    #[error("state error: {0}")]
    State(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoachError {
    pub fn no_active_session() -> Self {
        CoachError::State("no active session".to_string())
    }

    pub fn session_already_active() -> Self {
        CoachError::State("session already active".to_string())
    }

    /// Message without the category prefix, as shown in the error banner.
    pub fn detail(&self) -> String {
        match self {
            CoachError::Configuration(m) | CoachError::Connection(m) | CoachError::State(m) => {
                m.clone()
            }
            CoachError::Other(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = CoachError::Connection("socket closed".into());
        assert_eq!(err.to_string(), "connection error: socket closed");
        assert_eq!(err.detail(), "socket closed");
    }

    #[test]
    fn test_state_constructors() {
        assert_eq!(
            CoachError::no_active_session().to_string(),
            "state error: no active session"
        );
        assert!(matches!(
            CoachError::session_already_active(),
            CoachError::State(_)
        ));
    }

    #[test]
    fn test_from_anyhow() {
        let err: CoachError = anyhow::anyhow!("boom").into();
        assert_eq!(err.detail(), "boom");
    }
}
