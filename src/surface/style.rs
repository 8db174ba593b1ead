/// Pen colors and stroke styles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Narrowest brush the surface accepts, in logical pixels
pub const MIN_STROKE_WIDTH: f32 = 1.0;
/// Widest brush the surface accepts, in logical pixels
pub const MAX_STROKE_WIDTH: f32 = 50.0;
/// Brush width used when nothing else was chosen
pub const DEFAULT_STROKE_WIDTH: f32 = 10.0;

/// A straight (non-premultiplied) RGBA pen color
///
/// Parses from a handful of CSS names and from `#rgb`, `#rrggbb` and
/// `#rrggbbaa` hex notation.
///
/// ```
/// use scribblegen::PenColor;
///
/// let c: PenColor = "#ff8000".parse().unwrap();
/// assert_eq!(c, PenColor::rgba(255, 128, 0, 255));
/// assert_eq!("white".parse::<PenColor>().unwrap(), PenColor::WHITE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PenColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PenColor {
    pub const BLACK: PenColor = PenColor::rgba(0, 0, 0, 255);
    pub const WHITE: PenColor = PenColor::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: PenColor = PenColor::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for PenColor {
    fn default() -> Self {
        PenColor::BLACK
    }
}

impl FromStr for PenColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let named = match s.to_ascii_lowercase().as_str() {
            "black" => Some(PenColor::BLACK),
            "white" => Some(PenColor::WHITE),
            "red" => Some(PenColor::rgba(255, 0, 0, 255)),
            "green" => Some(PenColor::rgba(0, 128, 0, 255)),
            "blue" => Some(PenColor::rgba(0, 0, 255, 255)),
            "transparent" => Some(PenColor::TRANSPARENT),
            _ => None,
        };
        if let Some(c) = named {
            return Ok(c);
        }

        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| Error::ConfigError(format!("Unknown pen color '{}'", s)))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::ConfigError(format!("Invalid hex color '{}'", s)));
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
        let parsed = match hex.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(255)),
            6 => (byte(0), byte(2), byte(4), Ok(255)),
            8 => (byte(0), byte(2), byte(4), byte(6)),
            _ => return Err(Error::ConfigError(format!("Invalid hex color '{}'", s))),
        };
        match parsed {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(PenColor::rgba(r, g, b, a)),
            _ => Err(Error::ConfigError(format!("Invalid hex color '{}'", s))),
        }
    }
}

impl fmt::Display for PenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for PenColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PenColor> for String {
    fn from(c: PenColor) -> Self {
        c.to_string()
    }
}

/// Pen configuration applied to strokes that start after it is set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    pub color: PenColor,
    /// Brush diameter in logical pixels
    #[serde(default = "default_width")]
    pub width: f32,
}

fn default_width() -> f32 {
    DEFAULT_STROKE_WIDTH
}

impl DrawStyle {
    /// Build a style, clamping the width into the supported brush range
    pub fn new(color: PenColor, width: f32) -> Self {
        Self {
            color,
            width: clamp_width(width),
        }
    }

    /// Copy of this style with a different brush width
    pub fn with_width(self, width: f32) -> Self {
        Self::new(self.color, width)
    }

    /// Copy of this style with a different color
    pub fn with_color(self, color: PenColor) -> Self {
        Self { color, ..self }
    }

    pub(crate) fn normalized(self) -> Self {
        Self::new(self.color, self.width)
    }
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: PenColor::BLACK,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

fn clamp_width(width: f32) -> f32 {
    if width.is_finite() {
        width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
    } else {
        DEFAULT_STROKE_WIDTH
    }
}
