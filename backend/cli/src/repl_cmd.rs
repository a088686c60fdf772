//! CLI Repl Command
//!
//! Drives a session from stdin, one line at a time, printing transcript
//! additions as they arrive.

use std::io;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use coachline_core::{InputMode, SessionState};
use coachline_session::CoordinatorHandle;
use coachline_tui::ViewModel;

use crate::terminal_output::{note_error, note_info, note_warn, stream_write, DIM, RESET};

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    ToggleCall,
    Mode(InputMode),
    Quit,
    Send(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Some(ReplCommand::Send(line.trim_end_matches(['\r', '\n']).to_string())));
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("call"), None) => Ok(Some(ReplCommand::ToggleCall)),
        (Some("quit"), None) => Ok(Some(ReplCommand::Quit)),
        (Some("mode"), Some(mode)) => mode.parse().map(|m| Some(ReplCommand::Mode(m))),
        (Some("mode"), None) => Err("usage: /mode voice|text".to_string()),
        _ => Err(format!("unknown command '/{rest}' (try /call, /mode, /quit)")),
    }
}

/// What has already been printed, so each change is shown once.
#[derive(Default)]
struct Printed {
    messages: usize,
    status: Option<&'static str>,
    error: Option<String>,
    banner: bool,
}

impl Printed {
    fn catch_up(&mut self, state: &SessionState) {
        let view = ViewModel::from_state(state);

        if let (Some(banner), false) = (view.demo_banner, self.banner) {
            note_warn(banner);
            self.banner = true;
        }
        for line in view.transcript.iter().skip(self.messages) {
            println!("{DIM}[{}]{RESET} {}", line.time, line.text);
        }
        self.messages = view.transcript.len();

        if view.status != self.status {
            if let Some(status) = view.status {
                println!("{DIM}({status}){RESET}");
            }
            self.status = view.status;
        }
        if view.error != self.error {
            if let Some(error) = &view.error {
                note_error(error);
            }
            self.error = view.error;
        }
    }
}

pub async fn run(handle: &CoordinatorHandle) -> Result<()> {
    note_info("Commands: /call to start or end, /mode voice|text, /quit. Anything else is sent.");

    let mut states = handle.subscribe();
    let mut printed = Printed::default();
    printed.catch_up(&states.borrow_and_update());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                printed.catch_up(&state);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Quit)) => break,
                    Ok(Some(ReplCommand::ToggleCall)) => handle.toggle_call()?,
                    Ok(Some(ReplCommand::Mode(mode))) => {
                        handle.set_input_mode(mode)?;
                        println!("{DIM}({mode} mode){RESET}");
                    }
                    Ok(Some(ReplCommand::Send(text))) => {
                        let state = handle.snapshot();
                        if state.input_mode == InputMode::Text && state.call.is_active() {
                            handle.send_message(text)?;
                        } else {
                            note_warn("Start a call with /call and switch to /mode text to send answers.");
                        }
                    }
                    Err(message) => note_error(&message),
                }
                prompt()?;
            }
        }
    }
    Ok(())
}

fn prompt() -> io::Result<()> {
    stream_write(&mut io::stdout(), "> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_line("/call"), Ok(Some(ReplCommand::ToggleCall)));
        assert_eq!(parse_line("  /quit "), Ok(Some(ReplCommand::Quit)));
        assert_eq!(
            parse_line("/mode text"),
            Ok(Some(ReplCommand::Mode(InputMode::Text)))
        );
        assert_eq!(
            parse_line("/mode VOICE"),
            Ok(Some(ReplCommand::Mode(InputMode::Voice)))
        );
    }

    #[test]
    fn test_bad_commands_are_errors() {
        assert!(parse_line("/mode").is_err());
        assert!(parse_line("/mode shout").is_err());
        assert!(parse_line("/hangup").is_err());
    }

    #[test]
    fn test_other_lines_are_sent() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(
            parse_line("I led the migration\n"),
            Ok(Some(ReplCommand::Send("I led the migration".into())))
        );
    }

    #[test]
    fn test_catch_up_tracks_progress() {
        let mut state = SessionState::new(false);
        let mut printed = Printed::default();
        printed.catch_up(&state);
        assert_eq!(printed.messages, 1);
        assert!(printed.banner);

        state.apply(coachline_core::Transition::ToggleCall);
        printed.catch_up(&state);
        assert_eq!(printed.status, Some("Speaking..."));

        state.error = Some("Connection error: boom".into());
        printed.catch_up(&state);
        assert_eq!(printed.error.as_deref(), Some("Connection error: boom"));
    }
}
