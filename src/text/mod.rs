//! # Text Layout
//!
//! Greedy line breaking over UAX#14 break opportunities, measured with the
//! standard font metrics. This is the paragraph-flow measurement the table
//! composer relies on for wrapped description cells.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::{FontContext, StandardFont};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text on this line, trailing whitespace removed.
    pub text: String,
    /// Width of `text` in points.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Entry `i` is the opportunity *before* `char[i]`. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields byte offsets of the start of the next segment.
    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx > 0 && char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_breaking_space(ch: char) -> bool {
    ch.is_whitespace() && !is_newline(ch)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextLayout {
    fonts: FontContext,
}

impl TextLayout {
    pub fn new() -> Self {
        Self {
            fonts: FontContext::new(),
        }
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// Breaks at the last allowed opportunity before the overflowing
    /// character; a single word wider than the line is split mid-word.
    /// Always returns at least one line.
    pub fn break_into_lines(
        &self,
        text: &str,
        max_width: f64,
        font: StandardFont,
        font_size: f64,
    ) -> Vec<BrokenLine> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    self.fonts.char_width(ch, font, font_size)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break: Option<usize> = None;
        // Set after a wrap: whitespace at the head of the new line is dropped.
        let mut skipping = false;

        for i in 0..chars.len() {
            match break_opps[i] {
                Some(BreakOpportunity::Mandatory) => {
                    lines.push(self.make_line(&chars[line_start..i], &widths[line_start..i]));
                    line_start = i;
                    line_width = 0.0;
                    last_break = None;
                    skipping = false;
                }
                // A break before char[i] ends the line at char[i-1].
                Some(BreakOpportunity::Allowed) => last_break = Some(i),
                None => {}
            }

            if skipping {
                if is_breaking_space(chars[i]) {
                    line_start = i + 1;
                    continue;
                }
                skipping = false;
            }

            if line_width + widths[i] > max_width && line_start < i {
                let break_at = match last_break {
                    Some(bp) if bp > line_start => bp,
                    _ => i,
                };
                lines.push(self.make_line(
                    &chars[line_start..break_at],
                    &widths[line_start..break_at],
                ));
                line_start = break_at;
                while line_start <= i && is_breaking_space(chars[line_start]) {
                    line_start += 1;
                }
                last_break = None;
                if line_start > i {
                    line_width = 0.0;
                    skipping = true;
                    continue;
                }
                line_width = widths[line_start..i].iter().sum();
            }

            line_width += widths[i];
        }

        if line_start < chars.len() || lines.is_empty() {
            lines.push(self.make_line(&chars[line_start..], &widths[line_start..]));
        }
        lines
    }

    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut end = chars.len();
        while end > 0 && (chars[end - 1].is_whitespace()) {
            end -= 1;
        }
        BrokenLine {
            text: chars[..end].iter().collect(),
            width: widths[..end].iter().sum(),
        }
    }

    /// Width of a single unwrapped run.
    pub fn measure_width(&self, text: &str, font: StandardFont, font_size: f64) -> f64 {
        self.fonts.measure_string(text, font, font_size)
    }
}
