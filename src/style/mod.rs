//! # Style Values
//!
//! Colors and text styles attached to every draw call. A style is a plain
//! immutable value passed alongside each instruction; the canvas never keeps
//! a "current font" or "current fill" between calls.

use serde::Serialize;

use crate::font::StandardFont;

/// An RGB color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// CSS `whitesmoke` (#F5F5F5).
    pub const WHITE_SMOKE: Color = Color::rgb(0.961, 0.961, 0.961);
    /// CSS `darkslategray` (#2F4F4F).
    pub const DARK_SLATE: Color = Color::rgb(0.184, 0.310, 0.310);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Horizontal anchoring of a text run relative to its x coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
}

/// Everything needed to draw a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
    pub align: TextAlign,
}

impl TextStyle {
    pub const fn regular(size: f64) -> Self {
        Self {
            font: StandardFont::Helvetica,
            size,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }

    pub const fn bold(size: f64) -> Self {
        Self {
            font: StandardFont::HelveticaBold,
            size,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }

    pub const fn right(self) -> Self {
        Self {
            align: TextAlign::Right,
            ..self
        }
    }

    pub const fn colored(self, color: Color) -> Self {
        Self { color, ..self }
    }
}
