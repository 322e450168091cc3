//! Terminal chat widget.
//!
//! Renders one `ChatSession` with Ratatui: a launcher while closed, and a
//! transcript, quick-action bar and compose box once open.

mod actions;
mod app;
mod compose;
mod help;
mod log_pane;
mod theme;
mod transcript;
mod ui;

pub use app::run;
pub use log_pane::LogRing;
