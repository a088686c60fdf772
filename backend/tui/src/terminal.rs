//! Terminal loop
//!
//! Owns the raw-mode terminal, and redraws whenever a key arrives or the
//! coordinator publishes a new state.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use coachline_session::CoordinatorHandle;
use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::app::AppState;
use crate::input::handle_key_event;
use crate::render::draw_ui;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive UI until the user quits or the coordinator stops.
pub async fn run_ui(handle: CoordinatorHandle) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let outcome = event_loop(&mut terminal, &handle).await;
    restore_terminal(&mut terminal)?;
    outcome
}

async fn event_loop(terminal: &mut Term, handle: &CoordinatorHandle) -> Result<()> {
    let mut states = handle.subscribe();
    let mut app = AppState::new(&states.borrow_and_update());
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| draw_ui(f, &app.view))?;

        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    warn!("Coordinator stopped, leaving UI");
                    break;
                }
                app.sync(&states.borrow_and_update());
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = handle_key_event(key, &app.view) {
                        if let Err(e) = app.apply(action, handle) {
                            warn!(error = %e, "UI action not delivered");
                            break;
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                None => break,
            },
        }

        if app.should_quit {
            info!("User quit the UI");
            break;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}
