//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::color::{BlockColor, PALETTE_SIZE};
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Block and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Block colours in palette order: red, green, blue, violet.
    pub blocks: [Color; PALETTE_SIZE],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Hints and empty slots.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark()
    }
}

/// One Dark hex values, also the fallback for keys a theme file leaves out.
const ONEDARK_BLOCKS: [Color; PALETTE_SIZE] = [
    Color::Rgb(0xE0, 0x6C, 0x75),
    Color::Rgb(0x98, 0xC3, 0x79),
    Color::Rgb(0x61, 0xAF, 0xEF),
    Color::Rgb(0xC6, 0x78, 0xDD),
];
const ONEDARK_BG: Color = Color::Rgb(0x31, 0x35, 0x3F);
const ONEDARK_DIV: Color = Color::Rgb(0x3F, 0x44, 0x4F);
const ONEDARK_FG: Color = Color::Rgb(0xAB, 0xB2, 0xBF);
const ONEDARK_TITLE: Color = Color::Rgb(0xE5, 0xC0, 0x7B);
const ONEDARK_INACTIVE: Color = Color::Rgb(0x5C, 0x63, 0x70);

/// Theme keys tried, in order, for each block colour.
const BLOCK_KEYS: [&[&str]; PALETTE_SIZE] = [
    &["cpu_end", "temp_end"],
    &["mem_box", "cpu_start"],
    &["cpu_box"],
    &["net_box"],
];

impl Theme {
    pub fn onedark() -> Self {
        Self {
            blocks: ONEDARK_BLOCKS,
            bg: ONEDARK_BG,
            div_line: ONEDARK_DIV,
            main_fg: ONEDARK_FG,
            title: ONEDARK_TITLE,
            inactive_fg: ONEDARK_INACTIVE,
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark if path is None or the file does not exist.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::onedark(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override block colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.blocks = [
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                ];
            }
            crate::Palette::Colorblind => {
                // Blue/orange axis with teal and magenta; no red/green pair.
                self.blocks = [
                    Color::Rgb(0xEE, 0x77, 0x33),
                    Color::Rgb(0x00, 0x99, 0x88),
                    Color::Rgb(0x00, 0x77, 0xBB),
                    Color::Rgb(0xEE, 0x33, 0x77),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let blocks = std::array::from_fn(|i| {
            BLOCK_KEYS[i]
                .iter()
                .find_map(|k| get(k))
                .unwrap_or(ONEDARK_BLOCKS[i])
        });
        Self {
            blocks,
            bg: get("meter_bg").unwrap_or(ONEDARK_BG),
            div_line: get("div_line").unwrap_or(ONEDARK_DIV),
            main_fg: get("main_fg").unwrap_or(ONEDARK_FG),
            title: get("title").unwrap_or(ONEDARK_TITLE),
            inactive_fg: get("inactive_fg").unwrap_or(ONEDARK_INACTIVE),
        }
    }

    #[inline]
    pub fn block(&self, color: BlockColor) -> Color {
        self.blocks[color.index()]
    }

    /// Block colour at half brightness, for the block still growing in.
    pub fn dimmed(&self, color: BlockColor) -> Color {
        match self.block(color) {
            Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
            other => other,
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.starts_with('#'))
        .filter_map(|l| l.strip_prefix("theme["))
        .filter_map(|rest| {
            let (key, rest) = rest.split_once(']')?;
            let (_, value) = rest.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!value.is_empty()).then(|| (key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_from_map_falls_back_per_key() {
        let map = parse_theme_file(
            "# comment\ntheme[cpu_box]=\"#010203\"\ntheme[temp_end]='#FFFFFF'\n",
        );
        let theme = Theme::from_map(&map);
        assert_eq!(theme.block(BlockColor::Blue), Color::Rgb(1, 2, 3));
        assert_eq!(theme.block(BlockColor::Red), Color::Rgb(255, 255, 255));
        assert_eq!(theme.block(BlockColor::Green), ONEDARK_BLOCKS[1]);
        assert_eq!(theme.bg, ONEDARK_BG);
    }

    #[test]
    fn test_dimmed_halves_channels() {
        let theme = Theme::onedark();
        assert_eq!(theme.dimmed(BlockColor::Red), Color::Rgb(0x70, 0x36, 0x3A));
    }
}
