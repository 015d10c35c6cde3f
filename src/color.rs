//! Class color codec.
//!
//! Semantic classes are identified by the RGB color that paints them in the
//! label rasters. A color has two textual forms: the comma-separated key
//! used by the class specification and the presence index (`"255,0,0"`),
//! and a lowercase hex string for swatch rendering (`"#ff0000"`).

use std::fmt;
use std::str::FromStr;

use crate::error::ViewerError;

/// An 8-bit RGB class color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl ClassColor {
    /// Create a class color from RGB channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as a lowercase `#rrggbb` hex string.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Canonical key form: `"r,g,b"` without spaces.
impl fmt::Display for ClassColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Parse `"r,g,b"` with optional whitespace around each channel.
///
/// Exactly three channels are required and each must be an integer in
/// 0-255. Anything else is a [`ViewerError::Format`].
impl FromStr for ClassColor {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut channels = [0u8; 3];
        let mut parts = s.split(',');
        for channel in &mut channels {
            let part = parts.next().ok_or_else(|| {
                ViewerError::format(format!(
                    "class color '{s}' must have three comma-separated channels"
                ))
            })?;
            *channel = part.trim().parse().map_err(|_| {
                ViewerError::format(format!(
                    "class color '{s}': channel '{}' is not an integer in 0-255",
                    part.trim()
                ))
            })?;
        }
        if parts.next().is_some() {
            return Err(ViewerError::format(format!(
                "class color '{s}' has more than three channels"
            )));
        }
        let [r, g, b] = channels;
        Ok(Self { r, g, b })
    }
}

impl From<[u8; 3]> for ClassColor {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl From<ClassColor> for [u8; 3] {
    fn from(color: ClassColor) -> Self {
        [color.r, color.g, color.b]
    }
}

impl From<image::Rgb<u8>> for ClassColor {
    fn from(pixel: image::Rgb<u8>) -> Self {
        Self::new(pixel[0], pixel[1], pixel[2])
    }
}
