use std::fmt::{Display, Error, Formatter};

use image::Rgba;
use serde::{Deserialize, Serialize};

use super::error::{RenderError, RenderResult};

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let lvl = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(lvl)
    }
}

// Color
//------------------------------------------------------------------------------

/// A CSS color string together with its parsed RGBA value.
///
/// Markup producing backends emit the original string, pixel backends use the
/// parsed value.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Color {
    css: String,
    rgba: Rgba<u8>,
}

impl Color {
    pub fn parse(css: &str) -> RenderResult<Self> {
        let trimmed = css.trim();
        let rgba = match trimmed.to_ascii_lowercase().as_str() {
            "black" => Rgba([0, 0, 0, 255]),
            "white" => Rgba([255, 255, 255, 255]),
            "transparent" => Rgba([0, 0, 0, 0]),
            hex if hex.starts_with('#') => Self::parse_hex(&hex[1..])
                .ok_or_else(|| RenderError::InvalidColor(css.to_string()))?,
            _ => return Err(RenderError::InvalidColor(css.to_string())),
        };
        Ok(Self { css: trimmed.to_string(), rgba })
    }

    fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
            4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
            6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.css
    }

    pub fn rgba(&self) -> Rgba<u8> {
        self.rgba
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        f.write_str(&self.css)
    }
}


// Palette
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Palette {
    pub dark: Color,
    pub light: Color,
}

impl Palette {
    pub fn new(dark: &str, light: &str) -> RenderResult<Self> {
        Ok(Self { dark: Color::parse(dark)?, light: Color::parse(light)? })
    }

    pub fn select(&self, is_dark: bool) -> &Color {
        if is_dark {
            &self.dark
        } else {
            &self.light
        }
    }
}
