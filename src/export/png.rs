use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::warn;

use super::glyphs::{draw_text, fit_text, text_width, GLYPH_HEIGHT};
use super::{ExportError, ExportPayload, Exporter};
use crate::theme::Rgb;

/// Portrait story format.
pub const IMAGE_WIDTH: u32 = 1080;
pub const IMAGE_HEIGHT: u32 = 1920;

const MARGIN: u32 = 64;
const TITLE_SCALE: u32 = 8;
const DATE_SCALE: u32 = 5;
const DETAIL_SCALE: u32 = 4;
const ROW_SCALE: u32 = 4;
const MAX_ROW_HEIGHT: u32 = 88;
/// Vertical band reserved below the song list for the totals and logo.
const FOOTER_BAND: u32 = 300;
const LOGO_BOX: (u32, u32) = (360, 160);

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const MUTED: Rgba<u8> = Rgba([226, 232, 240, 255]);
const ROW_TINT: Rgb = Rgb::new(255, 255, 255);

/// Shareable story image: artist artwork or the theme gradient behind the
/// show header and the numbered songs.
pub struct PngExporter;

impl Exporter for PngExporter {
    fn label(&self) -> &'static str {
        "story image (PNG)"
    }

    fn file_name(&self, payload: &ExportPayload) -> String {
        format!("{}-setlist.png", payload.artist_slug)
    }

    fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, ExportError> {
        let image = self.draw(payload);
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

impl PngExporter {
    /// Paint the card without encoding it.
    pub fn draw(&self, payload: &ExportPayload) -> RgbaImage {
        let mut image = match payload.background.as_deref().and_then(load_background) {
            Some(background) => background,
            None => gradient_background(payload),
        };
        darken_edges(&mut image);

        let mut y = MARGIN;
        let title = format!("{}'s Setlist", payload.artist_name);
        y = draw_centered(&mut image, y, &title, TITLE_SCALE, WHITE) + 40;
        y = draw_centered(&mut image, y, &payload.date, DATE_SCALE, WHITE) + 24;
        let location = if payload.is_date_range {
            &payload.tour_name
        } else {
            &payload.venue
        };
        if !location.is_empty() {
            y = draw_centered(&mut image, y, location, DETAIL_SCALE, MUTED);
        }
        y += 72;

        let rows = payload.songs.len().max(1) as u32;
        let room = IMAGE_HEIGHT.saturating_sub(y + FOOTER_BAND);
        let row_height = (room / rows).min(MAX_ROW_HEIGHT);
        let scale = if row_height >= MAX_ROW_HEIGHT {
            ROW_SCALE
        } else {
            (row_height / (GLYPH_HEIGHT + 5)).clamp(1, ROW_SCALE)
        };
        let text_top = row_height.saturating_sub(GLYPH_HEIGHT * scale) / 2;

        for (index, song) in payload.songs.iter().enumerate() {
            let top = y + index as u32 * row_height;
            let band = (MARGIN, top + 4, IMAGE_WIDTH - 2 * MARGIN, row_height.saturating_sub(8));
            shade_rect(&mut image, band, ROW_TINT, 0.12);

            let duration = song.duration.to_string();
            let duration_width = text_width(&duration, scale);
            let duration_x = IMAGE_WIDTH - MARGIN - 24 - duration_width;
            let number = format!("{:>2}. ", index + 1);
            let title_room =
                duration_x.saturating_sub(MARGIN + 48 + text_width(&number, scale));
            let line = format!("{number}{}", fit_text(&song.title, title_room, scale));
            draw_text(&mut image, MARGIN + 24, top + text_top, &line, scale, WHITE);
            draw_text(&mut image, duration_x, top + text_top, &duration, scale, MUTED);
        }

        let footer_top = y + rows * row_height + 48;
        let totals = format!(
            "{} songs · {}",
            payload.songs.len(),
            payload.total_duration.summary()
        );
        let after_totals =
            draw_centered(&mut image, footer_top, &totals, DETAIL_SCALE, MUTED) + 40;

        if let Some(logo) = payload.logo.as_deref().and_then(load_logo) {
            let x = (IMAGE_WIDTH - logo.width()) / 2;
            let y = after_totals.min(IMAGE_HEIGHT.saturating_sub(logo.height() + 24));
            imageops::overlay(&mut image, &logo, i64::from(x), i64::from(y));
        }
        image
    }
}

/// Draw one centred line, shrinking then cutting it to the margins.
/// Returns the y just below the drawn line.
fn draw_centered(image: &mut RgbaImage, y: u32, text: &str, scale: u32, color: Rgba<u8>) -> u32 {
    let max_width = IMAGE_WIDTH - 2 * MARGIN;
    let mut scale = scale;
    while scale > 2 && text_width(text, scale) > max_width {
        scale -= 1;
    }
    let line = fit_text(text, max_width, scale);
    let x = (IMAGE_WIDTH - text_width(&line, scale)) / 2;
    draw_text(image, x, y, &line, scale, color);
    y + GLYPH_HEIGHT * scale
}

/// The theme gradient left to right, with a secondary-colour glow in the
/// upper left whose position depends on the artist name.
fn gradient_background(payload: &ExportPayload) -> RgbaImage {
    let palette = payload.palette;
    let seed = payload.artist_name.chars().map(u32::from).sum::<u32>() % 100;
    let glow_x = IMAGE_WIDTH as f32 * (25 + seed % 30) as f32 / 100.0;
    let glow_y = IMAGE_HEIGHT as f32 * (20 + seed % 40) as f32 / 100.0;
    let glow_radius = IMAGE_WIDTH as f32 * 0.6;

    RgbaImage::from_fn(IMAGE_WIDTH, IMAGE_HEIGHT, |x, y| {
        let t = x as f32 / (IMAGE_WIDTH - 1) as f32;
        let base = mix(palette.gradient_from, palette.gradient_to, t);
        let dx = x as f32 - glow_x;
        let dy = y as f32 - glow_y;
        let distance = (dx * dx + dy * dy).sqrt() / glow_radius;
        let glow = (1.0 - distance).max(0.0) * 0.2;
        let Rgb { r, g, b } = mix(base, palette.secondary, glow);
        Rgba([r, g, b, 255])
    })
}

/// Cover-fit the artwork and dim it to 70% over black.
fn load_background(path: &Path) -> Option<RgbaImage> {
    let artwork = match image::open(path) {
        Ok(artwork) => artwork.to_rgba8(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "background unreadable, using gradient");
            return None;
        }
    };
    let (width, height) = artwork.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let scale = f64::max(
        f64::from(IMAGE_WIDTH) / f64::from(width),
        f64::from(IMAGE_HEIGHT) / f64::from(height),
    );
    let scaled_width = ((f64::from(width) * scale).ceil() as u32).max(IMAGE_WIDTH);
    let scaled_height = ((f64::from(height) * scale).ceil() as u32).max(IMAGE_HEIGHT);
    let scaled = imageops::resize(&artwork, scaled_width, scaled_height, FilterType::Triangle);
    let left = (scaled_width - IMAGE_WIDTH) / 2;
    let top = (scaled_height - IMAGE_HEIGHT) / 2;
    let mut cover = imageops::crop_imm(&scaled, left, top, IMAGE_WIDTH, IMAGE_HEIGHT).to_image();
    for pixel in cover.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = (f32::from(*channel) * 0.7) as u8;
        }
        pixel.0[3] = 255;
    }
    Some(cover)
}

/// Logo scaled down to fit its box, aspect ratio kept.
fn load_logo(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(logo) => Some(
            logo.resize(LOGO_BOX.0, LOGO_BOX.1, FilterType::Triangle)
                .to_rgba8(),
        ),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "logo unreadable, skipping");
            None
        }
    }
}

/// Black overlay: 70% at the top and bottom edges, 30% through the middle.
fn darken_edges(image: &mut RgbaImage) {
    let height = image.height().max(1) as f32;
    for (_, y, pixel) in image.enumerate_pixels_mut() {
        let t = y as f32 / height;
        let alpha = if t < 0.3 {
            0.7 - (t / 0.3) * 0.3
        } else if t < 0.7 {
            0.4 - ((t - 0.3) / 0.4) * 0.1
        } else {
            0.3 + ((t - 0.7) / 0.3) * 0.4
        };
        for channel in pixel.0.iter_mut().take(3) {
            *channel = (f32::from(*channel) * (1.0 - alpha)) as u8;
        }
    }
}

/// Blend `color` over the `(x, y, width, height)` rectangle.
fn shade_rect(image: &mut RgbaImage, rect: (u32, u32, u32, u32), color: Rgb, alpha: f32) {
    let (x, y, width, height) = rect;
    let (max_x, max_y) = image.dimensions();
    for py in y..(y + height).min(max_y) {
        for px in x..(x + width).min(max_x) {
            let pixel = image.get_pixel_mut(px, py);
            let current = Rgb {
                r: pixel.0[0],
                g: pixel.0[1],
                b: pixel.0[2],
            };
            let Rgb { r, g, b } = mix(current, color, alpha);
            *pixel = Rgba([r, g, b, pixel.0[3]]);
        }
    }
}

fn mix(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Rgb {
        r: channel(from.r, to.r),
        g: channel(from.g, to.g),
        b: channel(from.b, to.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorTheme, Song, SongDuration, SongId};
    use crate::theme::Palette;

    fn payload(songs: usize) -> ExportPayload {
        let songs: Vec<Song> = (0..songs)
            .map(|n| Song {
                id: SongId::from(format!("hl-{n:02}").as_str()),
                title: format!("Low Tide Lanterns {n}"),
                artist: "Harbor Lights".into(),
                duration: SongDuration::from_secs(222),
            })
            .collect();
        ExportPayload {
            artist_name: "Harbor Lights".into(),
            artist_slug: "harbor-lights".into(),
            date: "August 14, 2025".into(),
            venue: "Crystal Ballroom, Portland".into(),
            tour_name: "Tides Tour".into(),
            is_date_range: false,
            color_theme: ColorTheme::default(),
            palette: Palette::default(),
            gradient: Palette::default().gradient_css(),
            total_duration: songs.iter().map(|s| s.duration).sum(),
            songs,
            logo: None,
            background: None,
        }
    }

    #[test]
    fn encodes_a_portrait_png() {
        let bytes = PngExporter.render(&payload(7)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (IMAGE_WIDTH, IMAGE_HEIGHT));
        assert_eq!(PngExporter.file_name(&payload(7)), "harbor-lights-setlist.png");
    }

    #[test]
    fn gradient_runs_from_theme_start_to_end() {
        let image = PngExporter.draw(&payload(3));
        let middle = IMAGE_HEIGHT / 2;
        let left = image.get_pixel(0, middle);
        let right = image.get_pixel(IMAGE_WIDTH - 1, middle);
        // indigo-600 leans blue on the left, purple-600 leans red on the right.
        assert!(left.0[2] > left.0[0]);
        assert!(right.0[0] > left.0[0]);
    }

    #[test]
    fn many_songs_stay_inside_the_image() {
        let image = PngExporter.draw(&payload(40));
        assert_eq!(image.dimensions(), (IMAGE_WIDTH, IMAGE_HEIGHT));
    }

    #[test]
    fn unreadable_artwork_falls_back_to_gradient() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("harbor-lights.jpg");
        std::fs::write(&broken, b"not an image").unwrap();

        let mut with_broken = payload(3);
        with_broken.background = Some(broken.clone());
        with_broken.logo = Some(broken);
        assert_eq!(PngExporter.draw(&with_broken), PngExporter.draw(&payload(3)));
    }

    #[test]
    fn background_artwork_replaces_gradient() {
        let dir = tempfile::tempdir().unwrap();
        let art = dir.path().join("harbor-lights.png");
        RgbaImage::from_pixel(40, 30, Rgba([0, 200, 0, 255]))
            .save(&art)
            .unwrap();

        let mut with_art = payload(3);
        with_art.background = Some(art);
        let image = PngExporter.draw(&with_art);
        let pixel = image.get_pixel(0, IMAGE_HEIGHT / 2);
        assert!(pixel.0[1] > pixel.0[0] && pixel.0[1] > pixel.0[2]);
    }
}
