//! Domain models that mirror the catalog document and get passed throughout
//! the engine, the export pipeline and the TUI. The types stay light-weight
//! data holders so other layers can focus on state transitions and
//! presentation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Capacity used when a show does not name its own `maxSongs`.
pub const DEFAULT_MAX_SONGS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a song inside one show. Drag gestures and the setlist refer
/// to songs exclusively through this type.
pub struct SongId(String);

impl SongId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SongId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SongId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Rejected duration text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid song duration {0:?}, expected mm:ss or whole seconds")]
pub struct DurationError(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
/// Song length in whole seconds. The catalog writes it either as `"3:45"`
/// (optionally `"1:02:03"`) or as a bare number of seconds.
pub struct SongDuration(u32);

impl SongDuration {
    pub fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> u32 {
        self.0
    }

    /// Human total used in the setlist summary: `1h 4m` past an hour,
    /// otherwise `12m 5s`.
    pub fn summary(self) -> String {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let secs = self.0 % 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m {secs}s")
        }
    }
}

/// Totals saturate at `u32::MAX` seconds.
impl std::iter::Sum for SongDuration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(0u32, |total, d| total.saturating_add(d.0)))
    }
}

impl fmt::Display for SongDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let secs = self.0 % 60;
        if hours > 0 {
            write!(f, "{hours}:{minutes:02}:{secs:02}")
        } else {
            write!(f, "{minutes}:{secs:02}")
        }
    }
}

impl FromStr for SongDuration {
    type Err = DurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || DurationError(raw.to_string());
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }

        let mut total: u32 = 0;
        for (idx, part) in parts.iter().enumerate() {
            let value: u32 = part.trim().parse().map_err(|_| invalid())?;
            // Every component after the first is a base-60 digit.
            if idx > 0 && value >= 60 {
                return Err(invalid());
            }
            total = total
                .checked_mul(60)
                .and_then(|t| t.checked_add(value))
                .ok_or_else(invalid)?;
        }
        Ok(Self(total))
    }
}

impl Serialize for SongDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SongDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ok(Self(secs)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Immutable catalog entry. The engine only ever reads these.
pub struct Song {
    pub id: SongId,
    /// Title displayed in both panes and on the share card.
    pub title: String,
    /// Performing artist as printed under the title.
    pub artist: String,
    pub duration: SongDuration,
}

impl Song {
    /// Compose a `Title - Artist` string that gracefully omits the hyphen if
    /// the artist is blank.
    pub fn display_title(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Tailwind-style colour classes carried by an artist entry. `primary` holds
/// the gradient pair (`"from-red-500 to-pink-600"`), `secondary` a single
/// accent colour class.
pub struct ColorTheme {
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            primary: "from-indigo-600 to-purple-600".to_string(),
            secondary: "indigo-600".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One concert (or a tour leg written as a date range) with its song pool.
pub struct Show {
    pub id: String,
    pub date: String,
    pub venue: String,
    #[serde(default)]
    pub tour_name: Option<String>,
    #[serde(default)]
    pub max_songs: Option<usize>,
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl Show {
    /// Capacity for this show. A missing or zero value falls back to the
    /// default, mirroring how the catalog has always been interpreted.
    pub fn max_songs(&self) -> usize {
        match self.max_songs {
            Some(max) if max > 0 => max,
            _ => DEFAULT_MAX_SONGS,
        }
    }

    /// Date ranges (`"Jun 1 - Jun 9"`) describe a tour leg rather than a
    /// single venue night.
    pub fn is_date_range(&self) -> bool {
        self.date.contains('-')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color_theme: Option<ColorTheme>,
    #[serde(default)]
    pub shows: Vec<Show>,
}

impl Artist {
    /// Lower-cased name with whitespace runs collapsed to `-`. Used for asset
    /// lookups and export file names.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!("3:45".parse::<SongDuration>().unwrap().as_secs(), 225);
        assert_eq!("0:07".parse::<SongDuration>().unwrap().as_secs(), 7);
        assert_eq!("1:02:03".parse::<SongDuration>().unwrap().as_secs(), 3723);
        assert_eq!("240".parse::<SongDuration>().unwrap().as_secs(), 240);
    }

    #[test]
    fn rejects_malformed_durations() {
        assert!("".parse::<SongDuration>().is_err());
        assert!("3:75".parse::<SongDuration>().is_err());
        assert!("a:10".parse::<SongDuration>().is_err());
        assert!("1:2:3:4".parse::<SongDuration>().is_err());
    }

    #[test]
    fn duration_accepts_number_or_text_in_json() {
        let song: Song = serde_json::from_str(
            r#"{"id":"s1","title":"Opener","artist":"Band","duration":"4:05"}"#,
        )
        .unwrap();
        assert_eq!(song.duration.as_secs(), 245);

        let song: Song = serde_json::from_str(
            r#"{"id":"s2","title":"Closer","artist":"Band","duration":190}"#,
        )
        .unwrap();
        assert_eq!(song.duration.to_string(), "3:10");
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let total: SongDuration = [SongDuration::from_secs(u32::MAX), SongDuration::from_secs(60)]
            .into_iter()
            .sum();
        assert_eq!(total.as_secs(), u32::MAX);
    }

    #[test]
    fn summary_switches_to_hours() {
        assert_eq!(SongDuration::from_secs(725).summary(), "12m 5s");
        assert_eq!(SongDuration::from_secs(3840).summary(), "1h 4m");
    }

    #[test]
    fn show_capacity_defaults_when_missing_or_zero() {
        let mut show = Show {
            id: "x".into(),
            date: "May 1".into(),
            venue: "Hall".into(),
            tour_name: None,
            max_songs: None,
            songs: Vec::new(),
        };
        assert_eq!(show.max_songs(), DEFAULT_MAX_SONGS);
        show.max_songs = Some(0);
        assert_eq!(show.max_songs(), DEFAULT_MAX_SONGS);
        show.max_songs = Some(10);
        assert_eq!(show.max_songs(), 10);
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(slugify("Harbor  Lights"), "harbor-lights");
        assert_eq!(slugify(" The Night Owls "), "the-night-owls");
    }
}
