//! Standard-14 Helvetica faces: metrics for width measurement and WinAnsi
//! encoding for content streams. Nothing is embedded.

/// The faces the report draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::HelveticaOblique];

    pub fn regular_or_bold(bold: bool) -> Font {
        if bold {
            Font::HelveticaBold
        } else {
            Font::Helvetica
        }
    }

    /// PostScript name written as `/BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::HelveticaOblique => "F3",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            // The oblique face shares the upright metrics.
            Font::Helvetica | Font::HelveticaOblique => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one WinAnsi byte in 1000-units.
    fn byte_width_1000(self, byte: u8) -> f32 {
        match byte {
            32..=126 => self.widths()[(byte - 32) as usize] as f32,
            0x85 => 1000.0, // ellipsis
            0x91 | 0x92 => if self == Font::HelveticaBold { 278.0 } else { 222.0 },
            0x93 | 0x94 => if self == Font::HelveticaBold { 500.0 } else { 333.0 },
            0x95 => 350.0,
            0x96 => 556.0,
            0x97 => 1000.0,
            0xA0 => 278.0,
            _ => 556.0,
        }
    }

    /// Rendered width of `text` at `size` points.
    pub fn string_width(self, text: &str, size: f32) -> f32 {
        to_winansi_bytes(text)
            .iter()
            .filter(|&&b| b >= 32)
            .map(|&b| self.byte_width_1000(b))
            .sum::<f32>()
            * size
            / 1000.0
    }
}

/// Helvetica AFM widths for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0..9
    278, 278, 584, 584, 584, 556, 1015,                                             // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N..Z
    278, 278, 278, 469, 556, 333,                                                   // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n..z
    334, 260, 334, 584,                                                             // {..~
];

/// Helvetica-Bold AFM widths for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Map a single Unicode char to its WinAnsi byte, if it has one.
fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0000..=0x007F => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF `Str`
/// encoding. Characters outside the code page become `?`.
pub fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().map(|c| char_to_winansi(c).unwrap_or(b'?')).collect()
}
