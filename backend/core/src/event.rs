use serde::{Deserialize, Serialize};

/// An inbound notification from the agent service, one variant per callback slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    Connected,
    Disconnected,
    Message { text: String },
    Error { message: String },
    StatusChanged { status: String },
}

impl AgentEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            AgentEvent::Connected => "connected",
            AgentEvent::Disconnected => "disconnected",
            AgentEvent::Message { .. } => "message",
            AgentEvent::Error { .. } => "error",
            AgentEvent::StatusChanged { .. } => "status_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tag() {
        let event = AgentEvent::StatusChanged {
            status: "speaking".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["status"], "speaking");
        assert_eq!(event.kind(), "status_changed");
    }
}
