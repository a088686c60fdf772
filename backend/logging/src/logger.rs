//! Structured Logger
//!
//! Wraps `tracing` to provide console output or rolling NDJSON files,
//! with environment-based level control.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// Human-readable (or JSON) lines on stderr.
    Console { json: bool },
    /// Daily-rotated NDJSON files under the directory. Used by the TUI so
    /// log lines never land on the alternate screen.
    File { dir: PathBuf },
    /// Both console and file.
    Both { dir: PathBuf, json: bool },
}

#[derive(Debug, Clone)]
pub struct LoggerSettings {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    pub output: LogOutput,
}

/// Keeps the non-blocking file writer flushing until dropped.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the global subscriber. Safe to call more than once; later
/// calls are ignored by `try_init`.
pub fn init_logger(settings: &LoggerSettings) -> LogGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let (console_json, dir) = match &settings.output {
        LogOutput::Console { json } => (Some(*json), None),
        LogOutput::File { dir } => (None, Some(dir.clone())),
        LogOutput::Both { dir, json } => (Some(*json), Some(dir.clone())),
    };

    let console_layer = console_json.map(|json| {
        let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
        if json {
            layer.json().boxed()
        } else {
            layer.with_ansi(true).boxed()
        }
    });

    let mut guard = None;
    let file_layer = dir.map(|dir| {
        // Writes NDJSON to `<dir>/coachline.log.YYYY-MM-DD`.
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "coachline.log");
        let (writer, worker) = tracing_appender::non_blocking(appender);
        guard = Some(worker);
        fmt::layer().json().with_writer(writer).with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LogGuard { _file: guard }
}
