//! # Font Management
//!
//! The invoice template only uses the standard PDF fonts, which need no
//! embedding: the PDF references them by name and every viewer ships them.
//! What layout does need is their glyph advance widths, so right-aligned text
//! and wrapped paragraphs land where a viewer will draw them.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use serde::Serialize;

/// The standard PDF fonts used by the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
        }
    }
}

/// Text measurement with real glyph metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        Self
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: StandardFont, font_size: f64) -> f64 {
        font.metrics().char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font: StandardFont, font_size: f64) -> f64 {
        font.metrics().measure_string(text, font_size)
    }
}
