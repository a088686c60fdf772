//! Terminal user interface for Coachline.
//!
//! Exposes the ratatui front end behind `coachline ui`.

pub mod app;
pub mod input;
pub mod render;
pub mod terminal;
pub mod view;

pub use app::AppState;
pub use input::{UiAction, handle_key_event};
pub use render::draw_ui;
pub use terminal::run_ui;
pub use view::ViewModel;
