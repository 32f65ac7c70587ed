use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Clone, Debug, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: Palette,
}

/// Colours used by the typing, result and high-score screens, parsed from
/// `#rrggbb` strings when the theme is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Palette {
    #[serde(deserialize_with = "hex_color")]
    pub bg: Color,
    #[serde(deserialize_with = "hex_color")]
    pub fg: Color,
    #[serde(deserialize_with = "hex_color")]
    pub correct: Color,
    #[serde(deserialize_with = "hex_color")]
    pub incorrect: Color,
    #[serde(deserialize_with = "hex_color")]
    pub pending: Color,
    #[serde(deserialize_with = "hex_color")]
    pub cursor_bg: Color,
    #[serde(deserialize_with = "hex_color")]
    pub cursor_fg: Color,
    #[serde(deserialize_with = "hex_color")]
    pub accent: Color,
    #[serde(deserialize_with = "hex_color")]
    pub header_bg: Color,
    #[serde(deserialize_with = "hex_color")]
    pub warning: Color,
}

pub fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

fn hex_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_hex(&s).ok_or_else(|| D::Error::custom(format!("invalid colour {s:?}, expected #rrggbb")))
}

fn user_theme_path(name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| {
        dir.join("keystride")
            .join("themes")
            .join(format!("{name}.toml"))
    })
}

impl Theme {
    /// A theme file in the user's config dir shadows a bundled one.
    pub fn load(name: &str) -> Option<Self> {
        user_theme_path(name)
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|content| toml::from_str(&content).ok())
            .or_else(|| Self::bundled(name))
    }

    fn bundled(name: &str) -> Option<Self> {
        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        toml::from_str(std::str::from_utf8(&file.data).ok()?).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::bundled(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "terminal".to_string(),
            colors: Palette {
                bg: Color::Reset,
                fg: Color::Reset,
                correct: Color::Green,
                incorrect: Color::Red,
                pending: Color::DarkGray,
                cursor_bg: Color::White,
                cursor_fg: Color::Black,
                accent: Color::Cyan,
                header_bg: Color::DarkGray,
                warning: Color::Yellow,
            },
        })
    }
}
