//! Advance widths for the standard Helvetica faces, in 1/1000 em, taken from
//! the Adobe Font Metrics files shipped with every PDF viewer.

/// Width table for one standard font.
#[derive(Debug)]
pub struct StandardFontMetrics {
    /// Widths for the printable ASCII range, starting at U+0020.
    ascii_widths: [u16; 95],
    /// Width used for characters outside the table.
    default_width: u16,
}

impl StandardFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let units = match ch as u32 {
            cp @ 0x20..=0x7E => self.ascii_widths[(cp - 0x20) as usize],
            0x20AC => 556, // Euro sign
            _ => self.default_width,
        };
        units as f64 / 1000.0 * font_size
    }

    /// Measure a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

#[rustfmt::skip]
pub static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    ascii_widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0'..'9'
        278, 278, 584, 584, 584, 556, 1015,                                             // ':'..'@'
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N'..'Z'
        278, 278, 278, 469, 556, 333,                                                   // '['..'`'
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a'..'m'
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n'..'z'
        334, 260, 334, 584,                                                             // '{'..'~'
    ],
    default_width: 556,
};

#[rustfmt::skip]
pub static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    ascii_widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    default_width: 611,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_are_tabular() {
        let one = HELVETICA.char_width('1', 10.0);
        let eight = HELVETICA.char_width('8', 10.0);
        assert_eq!(one, eight);
        assert!((one - 5.56).abs() < 1e-9);
    }

    #[test]
    fn test_table_lookup_positions() {
        assert!((HELVETICA.char_width('A', 1000.0) - 667.0).abs() < 1e-9);
        assert!((HELVETICA.char_width('z', 1000.0) - 500.0).abs() < 1e-9);
        assert!((HELVETICA.char_width('~', 1000.0) - 584.0).abs() < 1e-9);
        assert!((HELVETICA_BOLD.char_width('m', 1000.0) - 889.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_chars_use_default() {
        assert!((HELVETICA.char_width('\u{4E2D}', 1000.0) - 556.0).abs() < 1e-9);
        assert!((HELVETICA.char_width('€', 1000.0) - 556.0).abs() < 1e-9);
    }
}
