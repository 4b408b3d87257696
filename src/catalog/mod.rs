//! Static song/show catalog split across logical submodules: the document
//! loader and the lookup helpers used when a show is opened.

mod document;
mod lookup;

use std::path::PathBuf;

use thiserror::Error;

pub use document::{Catalog, BUNDLED_CATALOG};
pub use lookup::ResolvedShow;

/// Failures while reading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog")]
    Parse(#[from] serde_json::Error),
    #[error("show {show_id} of artist {artist_id} lists song {song_id} more than once")]
    DuplicateSong {
        artist_id: String,
        show_id: String,
        song_id: String,
    },
    #[error("show {show_id} of artist {artist_id} uses the reserved id {song_id} for a song")]
    ReservedSongId {
        artist_id: String,
        show_id: String,
        song_id: String,
    },
    /// Neither the requested show nor a default one exists.
    #[error("no show is available (requested {artist_id:?}/{show_id:?})")]
    Unavailable {
        artist_id: Option<String>,
        show_id: Option<String>,
    },
}
