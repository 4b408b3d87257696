//! Persistence module split across logical submodules. The only persisted
//! state is a handful of per-user preference flags.

mod connection;
mod preferences;

pub use connection::{data_dir, ensure_schema, ensure_schema_at};
pub use preferences::{
    get_flag, has_seen_drag_helper, mark_drag_helper_seen, set_flag, DRAG_HELPER_SEEN,
};
