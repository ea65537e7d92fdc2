use std::fmt;
use std::str::FromStr;

use crate::{color::TextColors, TextError};

/// Font identifiers as they appear in `FONT` control codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FontId {
    Small = 0,
    Normal = 1,
    Short = 2,
    ShortCopy1 = 3,
    ShortCopy2 = 4,
    ShortCopy3 = 5,
    Braille = 6,
    Narrow = 7,
    SmallNarrow = 8,
    Bold = 9,
}

impl FontId {
    pub const ALL: [FontId; 10] = [
        FontId::Small,
        FontId::Normal,
        FontId::Short,
        FontId::ShortCopy1,
        FontId::ShortCopy2,
        FontId::ShortCopy3,
        FontId::Braille,
        FontId::Narrow,
        FontId::SmallNarrow,
        FontId::Bold,
    ];

    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            FontId::Small => "small",
            FontId::Normal => "normal",
            FontId::Short => "short",
            FontId::ShortCopy1 => "short-copy-1",
            FontId::ShortCopy2 => "short-copy-2",
            FontId::ShortCopy3 => "short-copy-3",
            FontId::Braille => "braille",
            FontId::Narrow => "narrow",
            FontId::SmallNarrow => "small-narrow",
            FontId::Bold => "bold",
        }
    }

    pub fn descriptor(self) -> &'static FontDescriptor {
        &FONTS[self as usize]
    }

    pub fn face(self) -> FontFace {
        self.descriptor().face
    }

    pub fn attribute(self, attribute: FontAttribute) -> u8 {
        let d = self.descriptor();
        match attribute {
            FontAttribute::MaxLetterWidth => d.max_letter_width,
            FontAttribute::MaxLetterHeight => d.max_letter_height,
            FontAttribute::LetterSpacing => d.letter_spacing,
            FontAttribute::LineSpacing => d.line_spacing,
            FontAttribute::ColorForeground => d.colors.fg,
            FontAttribute::ColorBackground => d.colors.bg,
            FontAttribute::ColorShadow => d.colors.shadow,
        }
    }

    /// Size of the menu cursor drawn next to text in this font.
    pub fn cursor_size(self) -> (u8, u8) {
        self.descriptor().cursor_size
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontId {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Ok(n) = wanted.parse::<u8>() {
            return FontId::from_byte(n).ok_or_else(|| TextError::UnknownFont(s.to_string()));
        }
        FontId::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| TextError::UnknownFont(s.to_string()))
    }
}

/// Glyph decoder family. The short copies share the short face.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFace {
    Small,
    Normal,
    Short,
    Narrow,
    SmallNarrow,
    Braille,
    Bold,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FontAttribute {
    MaxLetterWidth,
    MaxLetterHeight,
    LetterSpacing,
    LineSpacing,
    ColorForeground,
    ColorBackground,
    ColorShadow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontDescriptor {
    pub face: FontFace,
    pub max_letter_width: u8,
    pub max_letter_height: u8,
    pub letter_spacing: u8,
    pub line_spacing: u8,
    pub colors: TextColors,
    pub cursor_size: (u8, u8),
}

const fn font(
    face: FontFace,
    max_letter_width: u8,
    max_letter_height: u8,
    line_spacing: u8,
    cursor_size: (u8, u8),
) -> FontDescriptor {
    FontDescriptor {
        face,
        max_letter_width,
        max_letter_height,
        letter_spacing: 0,
        line_spacing,
        colors: TextColors::new(2, 1, 3),
        cursor_size,
    }
}

/// Indexed by [`FontId`].
pub static FONTS: [FontDescriptor; 10] = [
    font(FontFace::Small, 5, 12, 0, (8, 12)),
    font(FontFace::Normal, 6, 16, 0, (8, 15)),
    font(FontFace::Short, 6, 14, 0, (8, 14)),
    font(FontFace::Short, 6, 14, 0, (8, 14)),
    font(FontFace::Short, 6, 14, 0, (8, 14)),
    font(FontFace::Short, 6, 14, 0, (8, 14)),
    font(FontFace::Braille, 8, 16, 8, (8, 16)),
    font(FontFace::Narrow, 5, 16, 0, (8, 15)),
    font(FontFace::SmallNarrow, 5, 8, 0, (8, 8)),
    FontDescriptor {
        face: FontFace::Bold,
        max_letter_width: 8,
        max_letter_height: 8,
        letter_spacing: 0,
        line_spacing: 0,
        colors: TextColors::new(1, 2, 15),
        cursor_size: (0, 0),
    },
];
