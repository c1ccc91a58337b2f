//! Standard Type1 fonts and their metrics
//!
//! Only the base-14 Helvetica faces are used, so nothing is embedded.
//! Widths are in 1/1000 em for WinAnsi codes 32..=126.

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for bytes outside the ASCII table
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub const ALL: [StandardFont; 2] = [StandardFont::Helvetica, StandardFont::HelveticaBold];

    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name of the font in page resources
    pub fn resource_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one encoded byte, in 1/1000 em
    pub fn byte_width(self, byte: u8) -> u16 {
        match byte {
            32..=126 => self.widths()[(byte - 32) as usize],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Width of `text` at `size_pt`, in points
    pub fn text_width(self, text: &str, size_pt: f64) -> f64 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|b| u32::from(self.byte_width(b)))
            .sum();
        f64::from(units) * size_pt / 1000.0
    }
}

/// Encode text for a WinAnsi-encoded standard font. Characters with no
/// WinAnsi code become `?`; control characters become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' | '\n' | '\r' => b' ',
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(StandardFont::Helvetica.byte_width(b' '), 278);
        assert_eq!(StandardFont::Helvetica.byte_width(b'W'), 944);
        assert_eq!(StandardFont::HelveticaBold.byte_width(b'a'), 556);
        assert_eq!(StandardFont::Helvetica.byte_width(b'~'), 584);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w10 = StandardFont::Helvetica.text_width("Name", 10.0);
        let w20 = StandardFont::Helvetica.text_width("Name", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
        assert!(StandardFont::HelveticaBold.text_width("Name", 10.0) > w10);
    }

    #[test]
    fn test_encoding() {
        assert_eq!(encode_win_ansi("Zoë – 5€"), b"Zo\xeb \x96 5\x80".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
