//! Text colors and the half-row expansion table used to turn 2bpp glyph
//! rows into 4bpp tile rows.

use log::trace;

pub const TEXT_COLOR_TRANSPARENT: u8 = 0;
pub const TEXT_COLOR_WHITE: u8 = 1;
pub const TEXT_COLOR_DARK_GRAY: u8 = 2;
pub const TEXT_COLOR_LIGHT_GRAY: u8 = 3;
pub const TEXT_COLOR_RED: u8 = 4;
pub const TEXT_COLOR_LIGHT_RED: u8 = 5;
pub const TEXT_COLOR_GREEN: u8 = 6;
pub const TEXT_COLOR_LIGHT_GREEN: u8 = 7;
pub const TEXT_COLOR_BLUE: u8 = 8;
pub const TEXT_COLOR_LIGHT_BLUE: u8 = 9;

/// Palette indices a printer draws with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextColors {
    pub fg: u8,
    pub bg: u8,
    pub shadow: u8,
}

impl TextColors {
    pub const fn new(fg: u8, bg: u8, shadow: u8) -> Self {
        Self { fg, bg, shadow }
    }
}

const LOOKUP_LEN: usize = 81; // 3^4 color combinations per half row

// Maps a 2bpp byte (four pixels, first pixel in the top bits) to its index
// in the expansion table. The value 3 is drawn as background.
const fn half_row_offsets() -> [u8; 256] {
    const M: [u8; 4] = [0, 1, 2, 0];
    let mut out = [0u8; 256];
    let mut b = 0;
    while b < 256 {
        out[b] = M[b >> 6] * 27 + M[(b >> 4) & 3] * 9 + M[(b >> 2) & 3] * 3 + M[b & 3];
        b += 1;
    }
    out
}

static HALF_ROW_OFFSETS: [u8; 256] = half_row_offsets();

/// Expansion table keyed by the last applied color triple.
///
/// Each printer context owns one, so independent slots never clobber
/// each other's colors.
#[derive(Clone, Debug)]
pub struct ColorLookup {
    colors: TextColors,
    table: [u16; LOOKUP_LEN],
    generations: u32,
}

impl ColorLookup {
    pub fn new(colors: TextColors) -> Self {
        let mut lookup = Self {
            colors,
            table: [0; LOOKUP_LEN],
            generations: 0,
        };
        lookup.generate();
        lookup
    }

    pub fn colors(&self) -> TextColors {
        self.colors
    }

    /// Number of times the table has been built.
    pub fn generations(&self) -> u32 {
        self.generations
    }

    /// Applies a color triple. Returns `true` if the table was rebuilt.
    pub fn set(&mut self, colors: TextColors) -> bool {
        if colors == self.colors {
            return false;
        }
        self.colors = colors;
        self.generate();
        true
    }

    fn generate(&mut self) {
        let TextColors { fg, bg, shadow } = self.colors;
        let palette = [bg as u16 & 0xF, fg as u16 & 0xF, shadow as u16 & 0xF];
        for (i, entry) in self.table.iter_mut().enumerate() {
            *entry = palette[i / 27] // leftmost pixel, low nibble
                | palette[(i / 9) % 3] << 4
                | palette[(i / 3) % 3] << 8
                | palette[i % 3] << 12;
        }
        self.generations += 1;
        trace!(
            "color lookup regenerated: fg={} bg={} shadow={}",
            fg, bg, shadow
        );
    }

    /// Expands one 8-pixel 2bpp row into a 4bpp row (pixel 0 in the low nibble).
    pub fn expand_row(&self, row: u16) -> u32 {
        let left = self.table[HALF_ROW_OFFSETS[(row >> 8) as usize] as usize] as u32;
        let right = self.table[HALF_ROW_OFFSETS[(row & 0xFF) as usize] as usize] as u32;
        right << 16 | left
    }

    /// Decompresses an 8-row tile into 32 bytes of 4bpp tile data.
    pub fn decompress_tile(&self, rows: &[u16], dest: &mut [u8]) {
        for (row, out) in rows.iter().take(8).zip(dest.chunks_exact_mut(4)) {
            out.copy_from_slice(&self.expand_row(*row).to_le_bytes());
        }
    }
}
