//! Ratatui front-end: a show picker plus the two-pane setlist builder.
//!
//! The builder mirrors a pointer drag with the keyboard. Space picks up the
//! selected song, the arrow keys move the drop target across both panes (the
//! top row of each pane stands for the pane itself), and Space or Enter drops.
//! Esc puts the song back untouched. The share dialog only opens once every
//! slot of the setlist is filled.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
