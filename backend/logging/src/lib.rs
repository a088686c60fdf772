//! Structured logging for Coachline.
//!
//! Handles subscriber setup (console or rolling NDJSON files), secret
//! redaction, and the session event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{SessionEvent, SessionEventEntry, SessionEventLogger};
pub use logger::{LogGuard, LogOutput, LoggerSettings, init_logger};
pub use redact::redact_secrets;
