//! TUI App State
//!
//! Holds the latest view and the locally edited draft, and forwards UI
//! actions to the session coordinator.

use coachline_core::{CoachError, SessionState};
use coachline_session::CoordinatorHandle;

use crate::input::UiAction;
use crate::view::ViewModel;

pub struct AppState {
    pub view: ViewModel,
    /// Authoritative copy of the draft. Key presses edit this one so that
    /// fast typing never races a lagging snapshot.
    draft: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(state: &SessionState) -> Self {
        let mut app = Self {
            view: ViewModel::from_state(state),
            draft: state.input.clone(),
            should_quit: false,
        };
        app.overlay_draft();
        app
    }

    /// Rebuild the view from a fresh snapshot.
    pub fn sync(&mut self, state: &SessionState) {
        self.view = ViewModel::from_state(state);
        self.overlay_draft();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn apply(&mut self, action: UiAction, handle: &CoordinatorHandle) -> Result<(), CoachError> {
        match action {
            UiAction::Quit => {
                self.should_quit = true;
                Ok(())
            }
            UiAction::ToggleCall => handle.toggle_call(),
            UiAction::SwitchMode(mode) => handle.set_input_mode(mode),
            UiAction::Edit(text) => {
                self.draft = text.clone();
                self.overlay_draft();
                handle.edit_input(text)
            }
            UiAction::Submit => {
                self.draft.clear();
                self.overlay_draft();
                handle.submit()
            }
        }
    }

    fn overlay_draft(&mut self) {
        self.view.draft = self.draft.clone();
        self.view.send_enabled = !self.draft.trim().is_empty();
    }
}
