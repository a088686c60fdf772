//! Coachline agent integration
//!
//! The adapter between the session coordinator and an external
//! conversational agent service: credential gating, session lifecycle,
//! connection tracking, and the callback surface.

pub mod adapter;
pub mod credentials;
pub mod elevenlabs;
pub mod fake;
pub mod traits;

pub use adapter::AgentAdapter;
pub use credentials::AgentCredentials;
pub use elevenlabs::ElevenLabsService;
pub use fake::FakeAgentService;
pub use traits::{
    AgentCallbacks, AgentFailure, AgentMessage, AgentService, AgentSession, SessionParams,
};
