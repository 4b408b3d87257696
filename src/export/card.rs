use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{ExportError, ExportPayload, Exporter};

/// Inner width of the share card, in characters.
const CARD_WIDTH: usize = 44;

/// Boxed plain-text share card, sized to paste into a post or a chat.
pub struct CardExporter;

impl Exporter for CardExporter {
    fn label(&self) -> &'static str {
        "share card"
    }

    fn file_name(&self, payload: &ExportPayload) -> String {
        format!("{}-setlist.txt", payload.artist_slug)
    }

    fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, ExportError> {
        Ok(self.card_text(payload).into_bytes())
    }
}

impl CardExporter {
    /// The boxed card as text. Also shown as the share dialog preview.
    pub fn card_text(&self, payload: &ExportPayload) -> String {
        let mut lines = Vec::new();
        lines.push(centered(&payload.artist_name.to_uppercase()));
        if !payload.tour_name.is_empty() {
            lines.push(centered(&payload.tour_name));
        }
        lines.push(centered(&payload.date));
        if !payload.is_date_range && !payload.venue.is_empty() {
            lines.push(centered(&payload.venue));
        }
        lines.push(String::new());
        lines.push(centered("MY SETLIST"));
        lines.push(String::new());

        for (idx, song) in payload.songs.iter().enumerate() {
            lines.push(song_row(idx + 1, &song.title, &song.duration.to_string()));
        }

        lines.push(String::new());
        lines.push(centered(&format!(
            "{} songs · {}",
            payload.songs.len(),
            payload.total_duration.summary()
        )));

        let artwork = match (&payload.background, &payload.logo) {
            (Some(background), _) => format!("art: {}", background.display()),
            (None, Some(logo)) => format!("logo: {}", logo.display()),
            (None, None) => payload.gradient.clone(),
        };

        let mut card = String::new();
        card.push('╔');
        card.push_str(&"═".repeat(CARD_WIDTH + 2));
        card.push_str("╗\n");
        for line in lines {
            card.push_str("║ ");
            card.push_str(&fit(&line));
            card.push_str(" ║\n");
        }
        card.push('╚');
        card.push_str(&"═".repeat(CARD_WIDTH + 2));
        card.push_str("╝\n");
        card.push_str(&artwork);
        card.push('\n');
        card
    }
}

/// Pad or cut `text` to exactly the card width, in terminal columns.
fn fit(text: &str) -> String {
    let cut = truncate(text, CARD_WIDTH);
    let pad = CARD_WIDTH.saturating_sub(cut.width());
    format!("{cut}{}", " ".repeat(pad))
}

fn centered(text: &str) -> String {
    let len = text.width();
    if len >= CARD_WIDTH {
        return text.to_string();
    }
    let left = (CARD_WIDTH - len) / 2;
    format!("{}{text}", " ".repeat(left))
}

/// `" 1. Title          3:42"`, truncating long titles.
fn song_row(number: usize, title: &str, duration: &str) -> String {
    let prefix = format!("{number:>2}. ");
    let room = CARD_WIDTH
        .saturating_sub(prefix.width())
        .saturating_sub(duration.width() + 1);
    let title = truncate(title, room);
    let pad = room.saturating_sub(title.width());
    format!("{prefix}{title}{} {duration}", " ".repeat(pad))
}

/// Longest prefix of `text` that fits in `columns`, ending in `…` when cut.
/// A wide character that would straddle the limit is dropped whole.
fn truncate(text: &str, columns: usize) -> String {
    if text.width() <= columns {
        return text.to_string();
    }
    let budget = columns.saturating_sub(1);
    let mut used = 0;
    let mut cut = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut.push(ch);
    }
    if columns > 0 {
        cut.push('…');
    }
    cut
}
