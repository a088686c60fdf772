//! Scripted stand-in for the agent when no credentials are configured.
//!
//! Purely timer driven: an opening line two time units after the call
//! starts, and for every user message a canned reply after one unit
//! followed by a return to listening one and a half units later.

use std::time::Duration;

use coachline_core::Transition;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tokio::task::JoinHandle;
use tracing::debug;

pub const OPENING_LINE: &str = "Great! Let's begin. Tell me about yourself and your background.";

pub const DEFAULT_RESPONSES: [&str; 4] = [
    "That's interesting. Can you elaborate on that experience?",
    "Good point. How would you handle a challenging situation in that role?",
    "Tell me more about your approach to problem-solving.",
    "What motivates you in your professional life?",
];

/// Pacing of the simulator, expressed in one base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoTiming {
    pub unit: Duration,
}

impl DemoTiming {
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }

    pub fn opening_delay(&self) -> Duration {
        self.unit * 2
    }

    pub fn reply_delay(&self) -> Duration {
        self.unit
    }

    pub fn listen_delay(&self) -> Duration {
        self.unit * 3 / 2
    }
}

impl Default for DemoTiming {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Lines the simulator speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoScript {
    opening: String,
    responses: Vec<String>,
}

impl DemoScript {
    /// Returns `None` if `responses` is empty.
    pub fn new(opening: impl Into<String>, responses: Vec<String>) -> Option<Self> {
        if responses.is_empty() {
            return None;
        }
        Some(Self {
            opening: opening.into(),
            responses,
        })
    }

    pub fn opening(&self) -> &str {
        &self.opening
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

impl Default for DemoScript {
    fn default() -> Self {
        Self {
            opening: OPENING_LINE.to_string(),
            responses: DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One scripted beat delivered back to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoStep {
    Opening(String),
    Reply(String),
    Listening,
}

impl DemoStep {
    pub fn into_transition(self) -> Transition {
        match self {
            DemoStep::Opening(text) => Transition::DemoOpening { text },
            DemoStep::Reply(text) => Transition::DemoReply { text },
            DemoStep::Listening => Transition::DemoListening,
        }
    }
}

pub struct DemoSimulator {
    timing: DemoTiming,
    script: DemoScript,
    rng: Box<dyn RngCore + Send>,
    timers: Vec<JoinHandle<()>>,
}

impl DemoSimulator {
    pub fn new(timing: DemoTiming, script: DemoScript, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            timing,
            script,
            rng,
            timers: Vec::new(),
        }
    }

    /// Default script with an entropy-seeded generator.
    pub fn with_timing(timing: DemoTiming) -> Self {
        Self::new(timing, DemoScript::default(), Box::new(StdRng::from_entropy()))
    }

    pub fn timing(&self) -> DemoTiming {
        self.timing
    }

    /// Uniform, independent draw from the response pool.
    pub fn pick_response(&mut self) -> String {
        let idx = self.rng.gen_range(0..self.script.responses.len());
        self.script.responses[idx].clone()
    }

    pub fn schedule_opening<F>(&mut self, deliver: F)
    where
        F: Fn(DemoStep) + Send + 'static,
    {
        let delay = self.timing.opening_delay();
        let line = self.script.opening.clone();
        debug!(?delay, "Demo opening scheduled");
        self.track(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            deliver(DemoStep::Opening(line));
        }));
    }

    pub fn schedule_reply<F>(&mut self, deliver: F)
    where
        F: Fn(DemoStep) + Send + 'static,
    {
        let reply = self.pick_response();
        let timing = self.timing;
        debug!(delay = ?timing.reply_delay(), "Demo reply scheduled");
        self.track(tokio::spawn(async move {
            tokio::time::sleep(timing.reply_delay()).await;
            deliver(DemoStep::Reply(reply));
            tokio::time::sleep(timing.listen_delay()).await;
            deliver(DemoStep::Listening);
        }));
    }

    /// Number of timers still running.
    pub fn pending_timers(&mut self) -> usize {
        self.timers.retain(|t| !t.is_finished());
        self.timers.len()
    }

    /// Stop every scheduled beat. Used on teardown.
    pub fn cancel_all(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.timers.retain(|t| !t.is_finished());
        self.timers.push(handle);
    }
}

impl Drop for DemoSimulator {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
