use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::trace;

use crate::{
    color::ColorLookup,
    error::{Result, TextError},
    font::FontFace,
    surface::TileBitmap,
};

/// Bytes in a decoded glyph: four 8×8 4bpp tiles forming a 16×16 box.
pub const GLYPH_BUFFER_LEN: usize = 128;
pub const MAX_GLYPH_WIDTH: u8 = 16;

/// The glyph most recently decoded for a printer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Advance width in pixels
    pub width: u8,
    /// Cell height in pixels
    pub height: u8,
    pixels: [u8; GLYPH_BUFFER_LEN],
}

impl Default for Glyph {
    fn default() -> Self {
        Self::blank()
    }
}

impl Glyph {
    pub const fn blank() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: [0; GLYPH_BUFFER_LEN],
        }
    }

    /// Tiles in order top-left, top-right, bottom-left, bottom-right.
    pub fn pixels(&self) -> &[u8; GLYPH_BUFFER_LEN] {
        &self.pixels
    }

    pub fn bitmap(&self) -> TileBitmap<'_> {
        TileBitmap::new(&self.pixels, 16, 16)
    }

    pub fn pixel(&self, x: u16, y: u16) -> u8 {
        self.bitmap().pixel(x, y)
    }

    fn reset(&mut self) {
        *self = Self::blank();
    }

    fn tile_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.pixels[index * 32..(index + 1) * 32]
    }
}

/// How glyph codes map to tile offsets inside a sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SheetLayout {
    /// 32 rows per glyph, one glyph after another.
    Latin,
    /// 16 single-tile-wide cells per sheet row, bottom halves 0x80 rows later.
    Cells8,
    /// 8 double-tile-wide cells per sheet row, bottom halves 0x80 rows later.
    Cells16,
}

impl SheetLayout {
    /// Row offsets of the top-left, top-right, bottom-left and bottom-right tiles.
    pub fn tile_offsets(self, code: u16) -> [usize; 4] {
        let code = code as usize;
        match self {
            SheetLayout::Latin => {
                let base = 0x20 * code;
                [base, base + 0x8, base + 0x10, base + 0x18]
            }
            SheetLayout::Cells8 => {
                let base = 0x100 * (code >> 4) + 0x8 * (code & 0xF);
                [base, base + 0x8, base + 0x80, base + 0x88]
            }
            SheetLayout::Cells16 => {
                let base = 0x100 * (code >> 3) + 0x10 * (code & 0x7);
                [base, base + 0x8, base + 0x80, base + 0x88]
            }
        }
    }

    fn wide(self) -> bool {
        !matches!(self, SheetLayout::Cells8)
    }

    fn rows_for(self, count: usize) -> usize {
        match self {
            SheetLayout::Latin => count * 0x20,
            SheetLayout::Cells8 => count.div_ceil(16) * 0x100,
            SheetLayout::Cells16 => count.div_ceil(8) * 0x100,
        }
    }
}

/// Identifies one binary glyph table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SheetId {
    SmallLatin,
    SmallJapanese,
    NormalLatin,
    NormalJapanese,
    ShortLatin,
    ShortJapanese,
    NarrowLatin,
    SmallNarrowLatin,
    Braille,
    Bold,
}

impl SheetId {
    pub const ALL: [SheetId; 10] = [
        SheetId::SmallLatin,
        SheetId::SmallJapanese,
        SheetId::NormalLatin,
        SheetId::NormalJapanese,
        SheetId::ShortLatin,
        SheetId::ShortJapanese,
        SheetId::NarrowLatin,
        SheetId::SmallNarrowLatin,
        SheetId::Braille,
        SheetId::Bold,
    ];

    pub fn layout(self) -> SheetLayout {
        match self {
            SheetId::SmallLatin
            | SheetId::NormalLatin
            | SheetId::ShortLatin
            | SheetId::NarrowLatin
            | SheetId::SmallNarrowLatin => SheetLayout::Latin,
            SheetId::ShortJapanese => SheetLayout::Cells16,
            SheetId::SmallJapanese | SheetId::NormalJapanese | SheetId::Braille | SheetId::Bold => {
                SheetLayout::Cells8
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SheetId::SmallLatin => "small-latin",
            SheetId::SmallJapanese => "small-japanese",
            SheetId::NormalLatin => "normal-latin",
            SheetId::NormalJapanese => "normal-japanese",
            SheetId::ShortLatin => "short-latin",
            SheetId::ShortJapanese => "short-japanese",
            SheetId::NarrowLatin => "narrow-latin",
            SheetId::SmallNarrowLatin => "small-narrow-latin",
            SheetId::Braille => "braille",
            SheetId::Bold => "bold",
        }
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SheetId {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        SheetId::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| TextError::Parse(format!("unknown glyph sheet {s:?}")))
    }
}

/// Packed 2bpp glyph rows plus an optional per-glyph width table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphSheet {
    rows: Vec<u16>,
    widths: Vec<u8>,
}

impl GlyphSheet {
    pub fn new(rows: Vec<u16>) -> Self {
        Self {
            rows,
            widths: Vec::new(),
        }
    }

    pub fn with_widths(mut self, widths: Vec<u8>) -> Self {
        self.widths = widths;
        self
    }

    /// Parses little-endian row words.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(TextError::InvalidSheet(format!(
                "odd byte length {}",
                bytes.len()
            )));
        }
        let rows = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self::new(rows))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// Builds a sheet from a pixel function returning 2bpp values
    /// (0 background, 1 foreground, 2 shadow) for `(code, x, y)`.
    pub fn build(
        layout: SheetLayout,
        count: usize,
        mut pixel: impl FnMut(u16, u16, u16) -> u8,
    ) -> Self {
        let mut rows = vec![0u16; layout.rows_for(count)];
        for code in 0..count as u16 {
            for (tile, offset) in layout.tile_offsets(code).into_iter().enumerate() {
                let (tx, ty) = ((tile as u16 % 2) * 8, (tile as u16 / 2) * 8);
                if tx > 0 && !layout.wide() {
                    continue;
                }
                for r in 0..8u16 {
                    let mut line = [0u8; 8];
                    for (i, p) in line.iter_mut().enumerate() {
                        *p = pixel(code, tx + i as u16, ty + r);
                    }
                    rows[offset + r as usize] = Self::encode_row(line);
                }
            }
        }
        Self::new(rows)
    }

    /// Packs eight 2bpp pixel values, first pixel in the top bits.
    pub fn encode_row(pixels: [u8; 8]) -> u16 {
        pixels
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, p)| acc | ((*p as u16 & 3) << (14 - 2 * i)))
    }

    pub fn rows(&self) -> &[u16] {
        &self.rows
    }

    pub fn width(&self, code: u16) -> Option<u8> {
        self.widths.get(code as usize).copied()
    }

    fn tile(&self, offset: usize) -> Option<&[u16]> {
        self.rows.get(offset..offset + 8)
    }
}

struct CellFormat {
    sheet: SheetId,
    height: u8,
    fixed_width: Option<u8>,
}

fn cell_format(face: FontFace, secondary: bool) -> CellFormat {
    let cell = |sheet, height, fixed_width| CellFormat {
        sheet,
        height,
        fixed_width,
    };
    match (face, secondary) {
        (FontFace::Small, true) => cell(SheetId::SmallJapanese, 12, Some(8)),
        (FontFace::Small, false) => cell(SheetId::SmallLatin, 13, None),
        (FontFace::Normal, true) => cell(SheetId::NormalJapanese, 15, Some(8)),
        (FontFace::Normal, false) => cell(SheetId::NormalLatin, 15, None),
        (FontFace::Short, true) => cell(SheetId::ShortJapanese, 14, None),
        (FontFace::Short, false) => cell(SheetId::ShortLatin, 14, None),
        (FontFace::Narrow, true) => cell(SheetId::NormalJapanese, 15, Some(8)),
        (FontFace::Narrow, false) => cell(SheetId::NarrowLatin, 15, None),
        (FontFace::SmallNarrow, true) => cell(SheetId::SmallJapanese, 12, Some(8)),
        (FontFace::SmallNarrow, false) => cell(SheetId::SmallNarrowLatin, 12, None),
        (FontFace::Braille, _) => cell(SheetId::Braille, 16, Some(8)),
        (FontFace::Bold, _) => cell(SheetId::Bold, 12, Some(8)),
    }
}

/// All glyph tables available to printers and the width calculator.
#[derive(Clone, Debug, Default)]
pub struct GlyphStore {
    sheets: HashMap<SheetId, GlyphSheet>,
    keypad_icons: Option<Vec<u8>>,
}

impl GlyphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: SheetId, sheet: GlyphSheet) {
        self.sheets.insert(id, sheet);
    }

    pub fn with_sheet(mut self, id: SheetId, sheet: GlyphSheet) -> Self {
        self.insert(id, sheet);
        self
    }

    pub fn sheet(&self, id: SheetId) -> Option<&GlyphSheet> {
        self.sheets.get(&id)
    }

    /// Sets the keypad icon sheet: 4bpp tiles, 16 tiles (128 px) per row.
    pub fn set_keypad_icons(&mut self, tiles: Vec<u8>) {
        self.keypad_icons = Some(tiles);
    }

    pub fn keypad_icons(&self) -> Option<TileBitmap<'_>> {
        self.keypad_icons.as_deref().map(|data| {
            let rows = (data.len() / 32).div_ceil(16) as u16;
            TileBitmap::new(data, 128, rows * 8)
        })
    }

    /// Advance width of `code`; 0 for codes the tables do not cover.
    pub fn glyph_width(&self, face: FontFace, code: u16, secondary: bool) -> u32 {
        let cell = cell_format(face, secondary);
        match cell.fixed_width {
            Some(w) => w as u32,
            None => self
                .sheet(cell.sheet)
                .and_then(|s| s.width(code))
                .map_or(0, |w| w.min(MAX_GLYPH_WIDTH) as u32),
        }
    }

    /// Decodes `code` into `glyph` using the colors in `lookup`.
    ///
    /// Tiles missing from the sheet stay blank.
    pub fn decode(
        &self,
        face: FontFace,
        code: u16,
        secondary: bool,
        lookup: &ColorLookup,
        glyph: &mut Glyph,
    ) {
        glyph.reset();
        let cell = cell_format(face, secondary);
        glyph.width = self.glyph_width(face, code, secondary) as u8;
        glyph.height = cell.height;
        let Some(sheet) = self.sheet(cell.sheet) else {
            trace!("no {} sheet loaded, glyph {code:#x} left blank", cell.sheet);
            return;
        };
        let offsets = cell.sheet.layout().tile_offsets(code);
        let wide = glyph.width > 8;
        let tall = glyph.height > 8;
        for (tile, offset) in offsets.into_iter().enumerate() {
            let needed = match tile {
                0 => true,
                1 => wide,
                2 => tall,
                _ => wide && tall,
            };
            if !needed {
                continue;
            }
            if let Some(rows) = sheet.tile(offset) {
                lookup.decompress_tile(rows, glyph.tile_mut(tile));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TextColors;

    fn lookup() -> ColorLookup {
        ColorLookup::new(TextColors::new(2, 1, 3))
    }

    #[test]
    fn encode_row_puts_first_pixel_in_top_bits() {
        assert_eq!(GlyphSheet::encode_row([1, 0, 2, 3, 0, 0, 0, 1]), 0x4B01);
    }

    #[test]
    fn from_bytes_rejects_odd_length() {
        assert!(GlyphSheet::from_bytes(&[1, 2, 3]).is_err());
        let sheet = GlyphSheet::from_bytes(&[0x01, 0x4B]).unwrap();
        assert_eq!(sheet.rows(), &[0x4B01]);
    }

    #[test]
    fn latin_glyph_uses_width_table_and_right_tiles_when_wide() {
        let sheet = GlyphSheet::build(SheetLayout::Latin, 2, |code, x, _| {
            if code == 1 && x == 12 {
                1
            } else {
                0
            }
        })
        .with_widths(vec![4, 14]);
        let store = GlyphStore::new().with_sheet(SheetId::NormalLatin, sheet);
        let mut glyph = Glyph::blank();
        store.decode(FontFace::Normal, 1, false, &lookup(), &mut glyph);
        assert_eq!((glyph.width, glyph.height), (14, 15));
        assert_eq!(glyph.pixel(12, 0), 2);
        assert_eq!(glyph.pixel(12, 14), 2);
        assert_eq!(glyph.pixel(0, 0), 1);

        store.decode(FontFace::Normal, 0, false, &lookup(), &mut glyph);
        assert_eq!(glyph.width, 4);
        // right tiles are not decoded for narrow glyphs
        assert_eq!(glyph.pixel(12, 0), 0);
    }

    #[test]
    fn logographic_cells_are_addressed_by_row_and_column() {
        let sheet = GlyphSheet::build(SheetLayout::Cells8, 0x20, |code, x, y| {
            (code == 0x13 && x == 0 && y == 9) as u8
        });
        let offsets = SheetLayout::Cells8.tile_offsets(0x13);
        assert_eq!(offsets[0], 0x100 + 0x18);
        assert_eq!(offsets[2], 0x100 + 0x18 + 0x80);
        let store = GlyphStore::new().with_sheet(SheetId::SmallJapanese, sheet);
        let mut glyph = Glyph::blank();
        store.decode(FontFace::Small, 0x13, true, &lookup(), &mut glyph);
        assert_eq!((glyph.width, glyph.height), (8, 12));
        assert_eq!(glyph.pixel(0, 9), 2);
        assert_eq!(glyph.pixel(0, 8), 1);
    }

    #[test]
    fn short_cells_are_two_tiles_wide() {
        assert_eq!(SheetLayout::Cells16.tile_offsets(0x0B), [0x130, 0x138, 0x1B0, 0x1B8]);
        assert_eq!(SheetLayout::Cells16.tile_offsets(0x09)[0], 0x110);
        assert_eq!(SheetLayout::Cells16.tile_offsets(0x08)[0], 0x100);

        let marks = [(3, 2), (12, 5), (1, 12), (14, 13)];
        let sheet = GlyphSheet::build(SheetLayout::Cells16, 0x10, |code, x, y| {
            (code == 0x0B && marks.contains(&(x, y))) as u8
        });
        let mut widths = vec![0u8; 0x10];
        widths[0x0B] = 15;
        let store = GlyphStore::new().with_sheet(SheetId::ShortJapanese, sheet.with_widths(widths));
        let mut glyph = Glyph::blank();
        store.decode(FontFace::Short, 0x0B, true, &lookup(), &mut glyph);
        assert_eq!((glyph.width, glyph.height), (15, 14));
        for (x, y) in marks {
            assert_eq!(glyph.pixel(x, y), 2, "mark at ({x}, {y})");
        }
        assert_eq!(glyph.pixel(4, 2), 1);
        assert_eq!(glyph.pixel(13, 13), 1);
        assert_eq!(store.glyph_width(FontFace::Short, 0x0B, true), 15);
    }

    #[test]
    fn sample_short_secondary_glyph_fills_all_four_tiles() {
        let store = crate::test_support::sample_store();
        let mut glyph = Glyph::blank();
        store.decode(FontFace::Short, 0x0B, true, &lookup(), &mut glyph);
        assert_eq!((glyph.width, glyph.height), (10, 14));
        // top left, top right, bottom left, bottom right
        assert_eq!(glyph.pixel(1, 2), 2);
        assert_eq!(glyph.pixel(2, 2), 1);
        assert_eq!(glyph.pixel(8, 1), 2);
        assert_eq!(glyph.pixel(8, 2), 1);
        assert_eq!(glyph.pixel(1, 10), 2);
        assert_eq!(glyph.pixel(2, 10), 1);
        assert_eq!(glyph.pixel(8, 9), 2);
        assert_eq!(glyph.pixel(8, 10), 1);
        // outside the inset box
        assert_eq!(glyph.pixel(9, 1), 1);
        assert_eq!(glyph.pixel(8, 11), 1);
    }

    #[test]
    fn missing_data_decodes_blank() {
        let store = GlyphStore::new();
        let mut glyph = Glyph::blank();
        store.decode(FontFace::Narrow, 0x41, false, &lookup(), &mut glyph);
        assert_eq!(glyph.width, 0);
        assert!(glyph.pixels().iter().all(|b| *b == 0));
        assert_eq!(store.glyph_width(FontFace::Narrow, 0x41, true), 8);
    }

    #[test]
    fn sheet_names_round_trip() {
        for id in SheetId::ALL {
            assert_eq!(id.name().parse::<SheetId>().unwrap(), id);
        }
    }
}
