//! Resolution of the catalog's Tailwind-style colour classes into concrete
//! colours for the terminal header and the share card.

use std::fmt;

use crate::models::ColorTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Parse `hsl(h,s%,l%)` with hue in degrees.
    pub fn from_hsl_css(text: &str) -> Option<Self> {
        let inner = text
            .trim()
            .strip_prefix("hsl(")?
            .strip_suffix(')')?;
        let mut parts = inner.split(',').map(|p| p.trim().trim_end_matches('%'));
        let h: f64 = parts.next()?.parse().ok()?;
        let s: f64 = parts.next()?.parse().ok()?;
        let l: f64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::from_hsl(h, s / 100.0, l / 100.0))
    }

    fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r1), to_u8(g1), to_u8(b1))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

const INDIGO_600: Rgb = Rgb::new(0x4f, 0x46, 0xe5);
const PURPLE_600: Rgb = Rgb::new(0x93, 0x33, 0xea);

/// Tailwind names the catalog is known to use.
const NAMED: &[(&str, Rgb)] = &[
    ("indigo-600", INDIGO_600),
    ("purple-600", PURPLE_600),
    ("red-500", Rgb::new(0xef, 0x44, 0x44)),
    ("red-600", Rgb::new(0xdc, 0x26, 0x26)),
    ("red-700", Rgb::new(0xb9, 0x1c, 0x1c)),
    ("red-900", Rgb::new(0x7f, 0x1d, 0x1d)),
    ("gray-900", Rgb::new(0x11, 0x18, 0x27)),
    ("yellow-600", Rgb::new(0xca, 0x8a, 0x04)),
    ("yellow-800", Rgb::new(0x85, 0x4d, 0x0e)),
    ("pink-600", Rgb::new(0xdb, 0x27, 0x77)),
    ("blue-500", Rgb::new(0x3b, 0x82, 0xf6)),
];

/// Resolve one colour token: a known Tailwind name, or an arbitrary value in
/// brackets (`[#0029ff]`, `[hsl(199,41%,52%)]`).
pub fn resolve_color(token: &str) -> Option<Rgb> {
    let token = token.trim();
    if let Some(custom) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return Rgb::from_hex(custom).or_else(|| Rgb::from_hsl_css(custom));
    }
    NAMED
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, rgb)| *rgb)
}

/// Concrete colours for one artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub gradient_from: Rgb,
    pub gradient_to: Rgb,
    pub secondary: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            gradient_from: INDIGO_600,
            gradient_to: PURPLE_600,
            secondary: INDIGO_600,
        }
    }
}

impl Palette {
    /// Both gradient ends must be present for the pair to count; otherwise
    /// the default gradient is used. Unknown individual colours fall back to
    /// their default end.
    pub fn resolve(theme: &ColorTheme) -> Self {
        let defaults = Self::default();
        let classes: Vec<&str> = theme.primary.split_whitespace().collect();
        let from = classes.iter().find_map(|c| c.strip_prefix("from-"));
        let to = classes.iter().find_map(|c| c.strip_prefix("to-"));

        let (gradient_from, gradient_to) = match (from, to) {
            (Some(from), Some(to)) => (
                resolve_color(from).unwrap_or(defaults.gradient_from),
                resolve_color(to).unwrap_or(defaults.gradient_to),
            ),
            _ => (defaults.gradient_from, defaults.gradient_to),
        };

        Self {
            gradient_from,
            gradient_to,
            secondary: resolve_color(&theme.secondary).unwrap_or(defaults.secondary),
        }
    }

    pub fn gradient_css(&self) -> String {
        format!(
            "linear-gradient(to right, {}, {})",
            self.gradient_from, self.gradient_to
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(primary: &str, secondary: &str) -> ColorTheme {
        ColorTheme {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }

    #[test]
    fn default_theme_is_indigo_to_purple() {
        let palette = Palette::resolve(&ColorTheme::default());
        assert_eq!(
            palette.gradient_css(),
            "linear-gradient(to right, #4f46e5, #9333ea)"
        );
        assert_eq!(palette.secondary.to_string(), "#4f46e5");
    }

    #[test]
    fn named_classes_resolve() {
        let palette = Palette::resolve(&theme("from-gray-900 to-red-900", "red-700"));
        assert_eq!(palette.gradient_from.to_string(), "#111827");
        assert_eq!(palette.gradient_to.to_string(), "#7f1d1d");
        assert_eq!(palette.secondary.to_string(), "#b91c1c");
    }

    #[test]
    fn custom_hsl_and_hex_values_resolve() {
        let palette = Palette::resolve(&theme(
            "from-[hsl(0,100%,50%)] to-[#0029FF]",
            "[hsl(120,100%,25%)]",
        ));
        assert_eq!(palette.gradient_from, Rgb::new(255, 0, 0));
        assert_eq!(palette.gradient_to, Rgb::new(0x00, 0x29, 0xff));
        assert_eq!(palette.secondary, Rgb::new(0, 128, 0));
    }

    #[test]
    fn incomplete_gradient_uses_default_pair() {
        let palette = Palette::resolve(&theme("from-red-500", "unknown-400"));
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn unknown_gradient_end_falls_back_individually() {
        let palette = Palette::resolve(&theme("from-teal-300 to-pink-600", ""));
        assert_eq!(palette.gradient_from, INDIGO_600);
        assert_eq!(palette.gradient_to.to_string(), "#db2777");
    }

    #[test]
    fn hsl_grey_has_equal_channels() {
        let grey = Rgb::from_hsl_css("hsl(199,0%,50%)").unwrap();
        assert_eq!(grey, Rgb::new(128, 128, 128));
    }
}
