use coachline_agent::{AgentCallbacks, AgentFailure, AgentMessage};
use coachline_core::AgentEvent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::coordinator::Signal;

/// Turns agent notifications into coordinator signals tagged with the call
/// generation they belong to. Never blocks: the channel is unbounded.
pub(crate) struct ForwardingCallbacks {
    tx: UnboundedSender<Signal>,
    generation: u64,
}

impl ForwardingCallbacks {
    pub(crate) fn new(tx: UnboundedSender<Signal>, generation: u64) -> Self {
        Self { tx, generation }
    }

    fn forward(&self, event: AgentEvent) {
        let kind = event.kind();
        let signal = Signal::Agent {
            generation: self.generation,
            event,
        };
        if self.tx.send(signal).is_err() {
            trace!(kind, "Coordinator gone, dropping agent event");
        }
    }
}

impl AgentCallbacks for ForwardingCallbacks {
    fn on_connect(&self) {
        self.forward(AgentEvent::Connected);
    }

    fn on_disconnect(&self) {
        self.forward(AgentEvent::Disconnected);
    }

    fn on_message(&self, message: AgentMessage) {
        // Text-less messages carry nothing for the transcript.
        if let Some(text) = message.text {
            self.forward(AgentEvent::Message { text });
        }
    }

    fn on_error(&self, error: AgentFailure) {
        self.forward(AgentEvent::Error {
            message: error.message,
        });
    }

    fn on_status_change(&self, status: &str) {
        self.forward(AgentEvent::StatusChanged {
            status: status.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_events_carry_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let callbacks = ForwardingCallbacks::new(tx, 3);
        callbacks.on_connect();
        callbacks.on_message(AgentMessage { text: None });
        callbacks.on_status_change("listening");

        match rx.try_recv().unwrap() {
            Signal::Agent { generation, event } => {
                assert_eq!(generation, 3);
                assert_eq!(event, AgentEvent::Connected);
            }
            _ => panic!("expected agent signal"),
        }
        match rx.try_recv().unwrap() {
            Signal::Agent { event, .. } => assert_eq!(
                event,
                AgentEvent::StatusChanged {
                    status: "listening".into()
                }
            ),
            _ => panic!("expected agent signal"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_harmless() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ForwardingCallbacks::new(tx, 0).on_disconnect();
    }
}
