//! Share export of a completed setlist.
//!
//! The export only reads the session: it clones the ordered songs and the
//! show metadata into an [`ExportPayload`] and hands that to an [`Exporter`].
//! A failed export is reported to the caller for a retry and never touches
//! the setlist.

mod card;
mod glyphs;
mod json;
mod png;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::assets::CandidateChain;
use crate::models::{ColorTheme, Song, SongDuration};
use crate::session::SessionState;
use crate::theme::Palette;

pub use card::CardExporter;
pub use json::JsonExporter;
pub use png::{PngExporter, IMAGE_HEIGHT, IMAGE_WIDTH};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("setlist is not complete yet ({placed}/{max_songs} songs)")]
    Incomplete { placed: usize, max_songs: usize },
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize setlist")]
    Encode(#[from] serde_json::Error),
    #[error("failed to encode share image")]
    Image(#[from] image::ImageError),
}

/// Ordered setlist plus show metadata, detached from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub artist_name: String,
    #[serde(skip)]
    pub artist_slug: String,
    pub date: String,
    pub venue: String,
    pub tour_name: String,
    #[serde(skip)]
    pub is_date_range: bool,
    pub color_theme: ColorTheme,
    #[serde(skip)]
    pub palette: Palette,
    pub gradient: String,
    pub songs: Vec<Song>,
    pub total_duration: SongDuration,
    pub logo: Option<PathBuf>,
    pub background: Option<PathBuf>,
}

impl ExportPayload {
    pub fn from_session(session: &SessionState) -> Self {
        let songs: Vec<Song> = session
            .engine
            .setlist_songs()
            .into_iter()
            .cloned()
            .collect();
        Self {
            artist_name: session.info.artist_name.clone(),
            artist_slug: session.info.artist_slug.clone(),
            date: session.info.date.clone(),
            venue: session.info.venue.clone(),
            tour_name: session.info.tour_name.clone(),
            is_date_range: session.info.is_date_range,
            color_theme: session.theme.clone(),
            palette: session.palette,
            gradient: session.palette.gradient_css(),
            total_duration: songs.iter().map(|song| song.duration).sum(),
            songs,
            logo: None,
            background: None,
        }
    }

    /// Attach artwork found beneath `asset_root`. When neither chain
    /// resolves, renderers use the gradient instead.
    pub fn with_assets(mut self, asset_root: &Path) -> Self {
        self.logo = CandidateChain::logo(&self.artist_slug).resolve_in(asset_root);
        self.background = CandidateChain::background(&self.artist_slug).resolve_in(asset_root);
        self
    }
}

/// A share format.
pub trait Exporter {
    /// Short name shown in the UI.
    fn label(&self) -> &'static str;

    fn file_name(&self, payload: &ExportPayload) -> String;

    fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, ExportError>;

    /// Render and write into `out_dir`, returning the written path.
    fn export(&self, payload: &ExportPayload, out_dir: &Path) -> Result<PathBuf, ExportError> {
        let rendered = self.render(payload)?;
        fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;
        let path = out_dir.join(self.file_name(payload));
        fs::write(&path, rendered).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Export the session's setlist once it is complete.
pub fn export_session(
    session: &SessionState,
    exporter: &dyn Exporter,
    out_dir: &Path,
    asset_root: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let engine = &session.engine;
    if !engine.is_complete() {
        return Err(ExportError::Incomplete {
            placed: engine.setlist().len(),
            max_songs: engine.max_songs(),
        });
    }

    let mut payload = session.export_payload();
    if let Some(root) = asset_root {
        payload = payload.with_assets(root);
    }

    match exporter.export(&payload, out_dir) {
        Ok(path) => {
            info!(format = exporter.label(), path = %path.display(), "setlist exported");
            Ok(path)
        }
        Err(err) => {
            warn!(format = exporter.label(), error = %err, "setlist export failed");
            Err(err)
        }
    }
}
