use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::CatalogError;
use crate::engine::{BANK_CONTAINER, SETLIST_CONTAINER};
use crate::models::Artist;

/// Catalog compiled into the binary so the app works without any files.
pub const BUNDLED_CATALOG: &str = include_str!("../../data/artists.json");

/// Root of the catalog document: every artist with their shows and song
/// pools. Artist and show order is significant, the first show of the first
/// artist is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub artists: Vec<Artist>,
}

impl Catalog {
    /// Parse the catalog shipped with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load a catalog document from disk, e.g. when overriding the bundled
    /// data with `--catalog`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&contents)?;
        info!(path = %path.display(), artists = catalog.artists.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Song ids must be unique within a show since the setlist refers to
    /// songs by id alone. The pane container ids are never song ids.
    fn validate(&self) -> Result<(), CatalogError> {
        for artist in &self.artists {
            for show in &artist.shows {
                let mut seen = HashSet::new();
                for song in &show.songs {
                    if matches!(song.id.as_str(), SETLIST_CONTAINER | BANK_CONTAINER) {
                        return Err(CatalogError::ReservedSongId {
                            artist_id: artist.id.clone(),
                            show_id: show.id.clone(),
                            song_id: song.id.to_string(),
                        });
                    }
                    if !seen.insert(song.id.as_str()) {
                        return Err(CatalogError::DuplicateSong {
                            artist_id: artist.id.clone(),
                            show_id: show.id.clone(),
                            song_id: song.id.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
