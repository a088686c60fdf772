//! Session coordinator: the single owner of `SessionState`.
//!
//! User commands, agent callbacks, demo timers and adapter results all
//! arrive as messages on one task, so state changes are applied strictly
//! one at a time. Adapter calls run on a separate worker task that
//! processes jobs in submission order; their outcomes come back as
//! signals.
//!
//! Every call start and end bumps a generation counter. Signals carry the
//! generation they were issued under and are dropped once it is stale,
//! which keeps a late reply or timer from an earlier call out of the
//! current one.

use std::sync::Arc;

use coachline_agent::{AgentAdapter, AgentCallbacks};
use coachline_core::{
    ActivityState, AgentEvent, CallState, CoachError, Effect, InputMode, SessionState,
    Transition,
};
use coachline_logging::{SessionEvent, SessionEventLogger};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::callbacks::ForwardingCallbacks;
use crate::demo::{DemoSimulator, DemoStep};

/// Internal messages feeding the coordinator loop.
pub(crate) enum Signal {
    Agent {
        generation: u64,
        event: AgentEvent,
    },
    Demo {
        generation: u64,
        step: DemoStep,
    },
    /// Outcome of an adapter job.
    Resolved {
        generation: u64,
        transition: Transition,
    },
}

enum Command {
    Apply(Transition),
    Shutdown,
}

enum AdapterJob {
    Open {
        callbacks: Arc<dyn AgentCallbacks>,
        generation: u64,
    },
    Send {
        text: String,
        generation: u64,
    },
    Close {
        generation: u64,
    },
    Discard,
    Shutdown,
}

impl AdapterJob {
    fn kind(&self) -> &'static str {
        match self {
            AdapterJob::Open { .. } => "open",
            AdapterJob::Send { .. } => "send",
            AdapterJob::Close { .. } => "close",
            AdapterJob::Discard => "discard",
            AdapterJob::Shutdown => "shutdown",
        }
    }
}

/// Cloneable front end to a running coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SessionState>,
}

impl CoordinatorHandle {
    pub fn toggle_call(&self) -> Result<(), CoachError> {
        self.apply(Transition::ToggleCall)
    }

    pub fn set_input_mode(&self, mode: InputMode) -> Result<(), CoachError> {
        self.apply(Transition::SetInputMode(mode))
    }

    /// Replace the draft in the input buffer.
    pub fn edit_input(&self, text: impl Into<String>) -> Result<(), CoachError> {
        self.apply(Transition::EditInput(text.into()))
    }

    /// Send whatever is in the input buffer.
    pub fn submit(&self) -> Result<(), CoachError> {
        self.apply(Transition::SendMessage)
    }

    /// Put `text` in the input buffer and send it.
    pub fn send_message(&self, text: impl Into<String>) -> Result<(), CoachError> {
        self.edit_input(text)?;
        self.submit()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every published state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Stop the coordinator, ending any open agent session.
    pub fn shutdown(&self) -> Result<(), CoachError> {
        self.commands.send(Command::Shutdown).map_err(|_| stopped())
    }

    fn apply(&self, transition: Transition) -> Result<(), CoachError> {
        self.commands
            .send(Command::Apply(transition))
            .map_err(|_| stopped())
    }
}

fn stopped() -> CoachError {
    CoachError::State("session coordinator has stopped".to_string())
}

pub struct SessionCoordinator {
    adapter: AgentAdapter,
    demo: DemoSimulator,
    session_id: String,
}

impl SessionCoordinator {
    pub fn new(adapter: AgentAdapter, demo: DemoSimulator) -> Self {
        Self {
            adapter,
            demo,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Start the event loop on the current runtime.
    ///
    /// The loop exits on `shutdown` or once every handle is dropped.
    pub fn spawn(self) -> (CoordinatorHandle, JoinHandle<()>) {
        let state = SessionState::new(self.adapter.is_configured());
        let (state_tx, state_rx) = watch::channel(state.clone());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let handle = CoordinatorHandle {
            commands: command_tx,
            state: state_rx,
        };
        let task = tokio::spawn(self.run(state, state_tx, command_rx));
        (handle, task)
    }

    async fn run(
        self,
        state: SessionState,
        state_tx: watch::Sender<SessionState>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        let (signal_tx, mut signals) = mpsc::unbounded_channel();
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(adapter_worker(self.adapter, job_rx, signal_tx.clone()));

        info!(
            session_id = %self.session_id,
            demo = state.is_demo(),
            "Session coordinator started"
        );

        let mut core = Core {
            session_id: self.session_id,
            state,
            state_tx,
            generation: 0,
            demo: self.demo,
            jobs: job_tx,
            signals: signal_tx,
        };

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Apply(transition)) => core.step(transition),
                    Some(Command::Shutdown) | None => break,
                },
                Some(signal) = signals.recv() => core.handle_signal(signal),
            }
        }

        core.demo.cancel_all();
        core.submit(AdapterJob::Shutdown);
        if let Err(e) = worker.await {
            error!(error = %e, "Adapter worker panicked");
        }
        info!(session_id = %core.session_id, "Session coordinator stopped");
    }
}

/// Loop-owned state.
struct Core {
    session_id: String,
    state: SessionState,
    state_tx: watch::Sender<SessionState>,
    generation: u64,
    demo: DemoSimulator,
    jobs: mpsc::UnboundedSender<AdapterJob>,
    signals: mpsc::UnboundedSender<Signal>,
}

/// Fields compared before and after a transition to derive session events.
struct Observed {
    call: CallState,
    activity: ActivityState,
    messages: usize,
    error: Option<String>,
}

impl Core {
    fn handle_signal(&mut self, signal: Signal) {
        let (generation, transition) = match signal {
            Signal::Agent { generation, event } => (generation, Transition::Agent(event)),
            Signal::Demo { generation, step } => (generation, step.into_transition()),
            Signal::Resolved {
                generation,
                transition,
            } => (generation, transition),
        };
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                ?transition,
                "Dropping stale signal"
            );
            return;
        }
        self.step(transition);
    }

    fn step(&mut self, transition: Transition) {
        let before = self.observe();
        let effects = self.state.apply(transition);

        if before.call.is_active() && !self.state.call.is_active() {
            self.demo.cancel_all();
            self.generation += 1;
        }
        for effect in effects {
            self.run_effect(effect);
        }
        self.publish(before);
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::OpenSession => {
                self.generation += 1;
                let callbacks = Arc::new(ForwardingCallbacks::new(
                    self.signals.clone(),
                    self.generation,
                ));
                self.submit(AdapterJob::Open {
                    callbacks,
                    generation: self.generation,
                });
            }
            Effect::CloseSession => {
                self.generation += 1;
                self.submit(AdapterJob::Close {
                    generation: self.generation,
                });
            }
            Effect::DiscardSession => self.submit(AdapterJob::Discard),
            Effect::SendText(text) => self.submit(AdapterJob::Send {
                text,
                generation: self.generation,
            }),
            Effect::ScheduleOpening => {
                self.generation += 1;
                let deliver = demo_sink(self.signals.clone(), self.generation);
                self.demo.schedule_opening(deliver);
            }
            Effect::ScheduleDemoReply => {
                let deliver = demo_sink(self.signals.clone(), self.generation);
                self.demo.schedule_reply(deliver);
            }
        }
    }

    fn submit(&self, job: AdapterJob) {
        let kind = job.kind();
        if self.jobs.send(job).is_err() {
            error!(kind, "Adapter worker is gone, job dropped");
        }
    }

    fn observe(&self) -> Observed {
        Observed {
            call: self.state.call,
            activity: self.state.activity,
            messages: self.state.transcript.len(),
            error: self.state.error.clone(),
        }
    }

    fn publish(&mut self, before: Observed) {
        let id = self.session_id.as_str();
        let state = &self.state;

        if state.call != before.call {
            SessionEventLogger::log_event(id, SessionEvent::CallChanged { call: state.call });
        }
        if state.activity != before.activity {
            SessionEventLogger::log_event(
                id,
                SessionEvent::ActivityChanged {
                    activity: state.activity,
                },
            );
        }
        for message in state.transcript.iter().skip(before.messages) {
            SessionEventLogger::log_event(
                id,
                SessionEvent::MessageAppended {
                    text: message.text().to_string(),
                },
            );
        }
        if state.error != before.error {
            if let Some(error_msg) = &state.error {
                warn!(error = %error_msg, "Session error");
                SessionEventLogger::log_event(
                    id,
                    SessionEvent::Error {
                        error_msg: error_msg.clone(),
                    },
                );
            }
        }

        self.state_tx.send_if_modified(|current| {
            if *current == *state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
    }
}

fn demo_sink(tx: mpsc::UnboundedSender<Signal>, generation: u64) -> impl Fn(DemoStep) + Send {
    move |step| {
        let _ = tx.send(Signal::Demo { generation, step });
    }
}

/// Runs adapter calls one at a time, in the order they were submitted.
async fn adapter_worker(
    mut adapter: AgentAdapter,
    mut jobs: mpsc::UnboundedReceiver<AdapterJob>,
    signals: mpsc::UnboundedSender<Signal>,
) {
    let resolve = |generation: u64, transition: Transition| {
        let _ = signals.send(Signal::Resolved {
            generation,
            transition,
        });
    };

    while let Some(job) = jobs.recv().await {
        match job {
            AdapterJob::Open {
                callbacks,
                generation,
            } => {
                if adapter.has_session() {
                    // Left behind by a start that finished after its call was abandoned.
                    warn!("Ending leftover agent session before starting a new one");
                    adapter.end_session().await;
                }
                match adapter.start_session(callbacks).await {
                    Ok(()) => resolve(generation, Transition::SessionOpened),
                    Err(e) => resolve(generation, Transition::SessionOpenFailed(e.detail())),
                }
            }
            AdapterJob::Send { text, generation } => {
                if let Err(e) = adapter.send_text(&text).await {
                    resolve(generation, Transition::SendFailed(e.detail()));
                }
            }
            AdapterJob::Close { generation } => {
                adapter.end_session().await;
                resolve(generation, Transition::SessionClosed);
            }
            AdapterJob::Discard => adapter.discard_session(),
            AdapterJob::Shutdown => {
                adapter.end_session().await;
                break;
            }
        }
    }
    debug!("Adapter worker exited");
}
