use std::str::FromStr;

use thiserror::Error;

/// Errors produced when parsing a [`Color`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("unknown color name: {0}")]
    UnknownName(String),
    #[error("invalid hex color: {0}")]
    InvalidHex(String),
}

/// Linear RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const RED: Color = Color::from_hex(0xFF0000);
    pub const GREEN: Color = Color::from_hex(0x008000);
    pub const BLUE: Color = Color::from_hex(0x0000FF);

    fn named(name: &str) -> Option<Self> {
        let hex = match name {
            "black" => 0x000000,
            "white" => 0xFFFFFF,
            "red" => 0xFF0000,
            "green" => 0x008000,
            "blue" => 0x0000FF,
            "yellow" => 0xFFFF00,
            "orange" => 0xFFA500,
            "purple" => 0x800080,
            "cyan" | "aqua" => 0x00FFFF,
            "magenta" | "fuchsia" => 0xFF00FF,
            "gray" | "grey" => 0x808080,
            "pink" => 0xFFC0CB,
            "teal" => 0x008080,
            "navy" => 0x000080,
            "transparent" => return Some(Self::TRANSPARENT),
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }

    fn parse_hex(digits: &str) -> Option<Self> {
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        // #rgb expands each digit: "f" -> "ff"
        let short = |i: usize| channel(&digits[i..=i].repeat(2));

        match digits.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Some(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parse a named color (`"blue"`) or a hex color (`#rgb`, `#rrggbb`,
    /// `#rrggbbaa`). Names are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(digits) = s.strip_prefix('#') {
            return Self::parse_hex(digits).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }

        Self::named(&s.to_ascii_lowercase()).ok_or_else(|| ColorParseError::UnknownName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgb() {
        let color = Color::rgb(0.5, 0.6, 0.7);
        assert_eq!(color.r, 0.5);
        assert_eq!(color.g, 0.6);
        assert_eq!(color.b, 0.7);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex(0xFF0000);
        assert_eq!(color, Color::RED);
        assert_eq!(Color::from_hex(0x0000FF), Color::BLUE);
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default(), Color::TRANSPARENT);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!("blue".parse::<Color>(), Ok(Color::BLUE));
        assert_eq!("Red".parse::<Color>(), Ok(Color::RED));
        assert_eq!(" green ".parse::<Color>(), Ok(Color::GREEN));
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#00f".parse::<Color>(), Ok(Color::BLUE));
        assert_eq!("#ff0000".parse::<Color>(), Ok(Color::RED));
        assert_eq!("#FFFFFF00".parse::<Color>(), Ok(Color::WHITE.with_alpha(0.0)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Color>(), Err(ColorParseError::Empty));
        assert_eq!(
            "bleu".parse::<Color>(),
            Err(ColorParseError::UnknownName("bleu".to_string()))
        );
        assert_eq!(
            "#12345".parse::<Color>(),
            Err(ColorParseError::InvalidHex("#12345".to_string()))
        );
        assert_eq!(
            "#gg0000".parse::<Color>(),
            Err(ColorParseError::InvalidHex("#gg0000".to_string()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ColorParseError::UnknownName("bleu".into()).to_string(),
            "unknown color name: bleu"
        );
    }
}
