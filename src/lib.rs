//! Core library surface for the Setlist Sequence TUI application.
//!
//! A fan picks an artist's show, moves songs from the bank into a setlist of
//! bounded size, orders them, and exports the finished setlist as a share
//! card. The setlist rules live in [`engine`]; everything else feeds it
//! (catalog, session) or presents it (ui, export).
pub mod assets;
pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod export;
pub mod gesture;
pub mod logging;
pub mod models;
pub mod session;
pub mod theme;
pub mod ui;

/// Persistence entry points used by `main.rs` to open the preference store.
pub use db::{data_dir, ensure_schema};

pub use catalog::{Catalog, CatalogError};
pub use engine::{DropOutcome, SetlistEngine};
pub use gesture::DragGesture;
pub use models::{Song, SongId};
pub use session::{load_show, SessionState};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
