use tracing::warn;

use super::{Catalog, CatalogError};
use crate::models::{Artist, Show, Song};

/// A show picked out of the catalog together with the artist that plays it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedShow<'a> {
    pub artist: &'a Artist,
    pub show: &'a Show,
    /// `true` when the requested pair was missing and the default was used.
    pub fell_back: bool,
}

impl Catalog {
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn artist_by_id(&self, artist_id: &str) -> Option<&Artist> {
        self.artists.iter().find(|artist| artist.id == artist_id)
    }

    /// Shows for an artist; empty when the artist is unknown.
    pub fn shows_for_artist(&self, artist_id: &str) -> &[Show] {
        self.artist_by_id(artist_id)
            .map(|artist| artist.shows.as_slice())
            .unwrap_or(&[])
    }

    pub fn show_by_id(&self, artist_id: &str, show_id: &str) -> Option<&Show> {
        self.shows_for_artist(artist_id)
            .iter()
            .find(|show| show.id == show_id)
    }

    pub fn songs_for_show(&self, artist_id: &str, show_id: &str) -> &[Song] {
        self.show_by_id(artist_id, show_id)
            .map(|show| show.songs.as_slice())
            .unwrap_or(&[])
    }

    /// First show of the first artist. Only that artist is considered: when
    /// it has no shows there is no default at all.
    pub fn default_artist_and_show(&self) -> Option<(&Artist, &Show)> {
        let artist = self.artists.first()?;
        let show = artist.shows.first()?;
        Some((artist, show))
    }

    /// Pick the show for `(artist_id, show_id)`. The exact pair is used only
    /// when both ids are given and match; anything else falls back to the
    /// default show, and an empty catalog is reported as unavailable.
    pub fn resolve(
        &self,
        artist_id: Option<&str>,
        show_id: Option<&str>,
    ) -> Result<ResolvedShow<'_>, CatalogError> {
        if let (Some(artist_id), Some(show_id)) = (artist_id, show_id) {
            if let Some(artist) = self.artist_by_id(artist_id) {
                if let Some(show) = artist.shows.iter().find(|show| show.id == show_id) {
                    return Ok(ResolvedShow {
                        artist,
                        show,
                        fell_back: false,
                    });
                }
            }
        }

        match self.default_artist_and_show() {
            Some((artist, show)) => {
                if artist_id.is_some() || show_id.is_some() {
                    warn!(
                        requested_artist = artist_id.unwrap_or_default(),
                        requested_show = show_id.unwrap_or_default(),
                        artist = %artist.id,
                        show = %show.id,
                        "requested show not found, using default"
                    );
                }
                Ok(ResolvedShow {
                    artist,
                    show,
                    fell_back: true,
                })
            }
            None => Err(CatalogError::Unavailable {
                artist_id: artist_id.map(str::to_string),
                show_id: show_id.map(str::to_string),
            }),
        }
    }
}
