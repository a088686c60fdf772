//! Coachline session coordination
//!
//! The coordinator task that owns the interview state, drives the agent
//! adapter, and falls back to the scripted demo responder when no agent
//! credentials are configured.

mod callbacks;
pub mod coordinator;
pub mod demo;

pub use coordinator::{CoordinatorHandle, SessionCoordinator};
pub use demo::{DemoScript, DemoSimulator, DemoStep, DemoTiming};
