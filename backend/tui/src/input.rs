//! Keyboard Input Handler
//!
//! Maps crossterm key events onto UI actions. Pure: the caller applies the
//! returned action to the coordinator.

use coachline_core::InputMode;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::view::ViewModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ToggleCall,
    SwitchMode(InputMode),
    /// Replace the draft with this text.
    Edit(String),
    Submit,
    Quit,
}

/// Resolve one key press against the current view.
pub fn handle_key_event(key: KeyEvent, view: &ViewModel) -> Option<UiAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => Some(UiAction::Quit),
        KeyCode::Esc => Some(UiAction::Quit),
        KeyCode::Char('t') if ctrl => (!view.call_pending).then_some(UiAction::ToggleCall),
        KeyCode::Tab => Some(UiAction::SwitchMode(view.input_mode.toggled())),
        KeyCode::Enter if view.input_visible && view.send_enabled => Some(UiAction::Submit),
        KeyCode::Backspace if view.input_visible => {
            let mut draft = view.draft.clone();
            draft.pop().map(|_| UiAction::Edit(draft))
        }
        KeyCode::Char(c) if view.input_visible && !ctrl => {
            let mut draft = view.draft.clone();
            draft.push(c);
            Some(UiAction::Edit(draft))
        }
        _ => None,
    }
}
