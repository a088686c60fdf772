pub mod error;
pub mod event;
pub mod message;
pub mod state;
pub mod types;

pub use error::CoachError;
pub use event::AgentEvent;
pub use message::{Message, Transcript};
pub use state::{Effect, Pending, SessionState, Transition};
pub use types::{ActivityState, CallState, InputMode};

/// Line the coach greets with when the page first loads.
pub const WELCOME_LINE: &str =
    "Hello! I'm your AI Interview Coach. Ready to start your practice session?";

/// Line appended to the transcript whenever a call ends.
pub const CLOSING_LINE: &str = "Interview session ended. Thank you for practicing!";
