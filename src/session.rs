//! Everything the front-end needs about the show being edited, created in one
//! place when navigation picks an artist/show pair.

use tracing::info;

use crate::catalog::{Catalog, CatalogError};
use crate::engine::SetlistEngine;
use crate::export::ExportPayload;
use crate::models::ColorTheme;
use crate::theme::Palette;

/// Display metadata of the loaded show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInfo {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_slug: String,
    pub show_id: String,
    pub date: String,
    pub venue: String,
    /// Empty when the catalog has no tour name.
    pub tour_name: String,
    pub is_date_range: bool,
}

/// Session state for one loaded show. The engine is the only mutable part
/// and is only changed through its own operations.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub info: ShowInfo,
    pub theme: ColorTheme,
    pub palette: Palette,
    pub engine: SetlistEngine,
    /// The requested show was missing and the catalog default was loaded.
    pub fell_back: bool,
}

impl SessionState {
    pub fn export_payload(&self) -> ExportPayload {
        ExportPayload::from_session(self)
    }
}

/// Resolve `(artist_id, show_id)` through the catalog fallback rules and start
/// an empty setlist for it.
pub fn load_show(
    catalog: &Catalog,
    artist_id: Option<&str>,
    show_id: Option<&str>,
) -> Result<SessionState, CatalogError> {
    let resolved = catalog.resolve(artist_id, show_id)?;
    let artist = resolved.artist;
    let show = resolved.show;

    let theme = artist.color_theme.clone().unwrap_or_default();
    let palette = Palette::resolve(&theme);
    let engine = SetlistEngine::new(show.songs.clone(), show.max_songs());

    info!(
        artist = %artist.id,
        show = %show.id,
        songs = show.songs.len(),
        max_songs = engine.max_songs(),
        fell_back = resolved.fell_back,
        "show loaded"
    );

    Ok(SessionState {
        info: ShowInfo {
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            artist_slug: artist.slug(),
            show_id: show.id.clone(),
            date: show.date.clone(),
            venue: show.venue.clone(),
            tour_name: show.tour_name.clone().unwrap_or_default(),
            is_date_range: show.is_date_range(),
        },
        theme,
        palette,
        engine,
        fell_back: resolved.fell_back,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_MAX_SONGS;

    #[test]
    fn loads_requested_show_with_metadata() {
        let catalog = Catalog::bundled().unwrap();
        let session = load_show(&catalog, Some("the-night-owls"), Some("chicago-2025")).unwrap();
        assert_eq!(session.info.artist_name, "The Night Owls");
        assert_eq!(session.info.artist_slug, "the-night-owls");
        assert_eq!(session.info.venue, "Metro, Chicago");
        assert_eq!(session.info.tour_name, "");
        assert_eq!(session.engine.max_songs(), 5);
        assert!(session.engine.setlist().is_empty());
        assert!(!session.fell_back);
    }

    #[test]
    fn missing_theme_and_capacity_use_defaults() {
        let catalog = Catalog::bundled().unwrap();
        let session = load_show(&catalog, Some("ember-avenue"), Some("austin-2025")).unwrap();
        assert_eq!(session.theme, ColorTheme::default());
        assert_eq!(session.palette, Palette::default());
        assert_eq!(session.engine.max_songs(), DEFAULT_MAX_SONGS);
    }

    #[test]
    fn unknown_show_falls_back_to_default() {
        let catalog = Catalog::bundled().unwrap();
        let session = load_show(&catalog, Some("ember-avenue"), Some("nowhere")).unwrap();
        let (artist, show) = catalog.default_artist_and_show().unwrap();
        assert_eq!(session.info.artist_id, artist.id);
        assert_eq!(session.info.show_id, show.id);
        assert!(session.fell_back);
    }

    #[test]
    fn empty_catalog_is_unavailable() {
        let err = load_show(&Catalog::default(), None, None).unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable { .. }));
    }
}
