//! Renders a stream into a strip of 8×16 tile columns for menus that place
//! glyphs as raw tiles instead of printing into a window.

use crate::{
    color::{
        ColorLookup, TextColors, TEXT_COLOR_LIGHT_GRAY, TEXT_COLOR_TRANSPARENT, TEXT_COLOR_WHITE,
    },
    control::{Control, StreamCursor, Token},
    font::{FontFace, FontId},
    glyph::{Glyph, GlyphStore},
};

/// Bytes per glyph in a strip: the top and bottom tile of the left column.
pub const STRIP_GLYPH_LEN: usize = 64;

pub const STRIP_COLORS: TextColors = TextColors::new(
    TEXT_COLOR_WHITE,
    TEXT_COLOR_TRANSPARENT,
    TEXT_COLOR_LIGHT_GRAY,
);

/// Renders every glyph of `stream` in `font` and concatenates the left
/// 8×16 column of each.
///
/// Only [`FontId::Bold`] keeps its own face; every other font draws with
/// the normal logographic cells. Color controls apply, positioning and
/// timing controls are skipped.
pub fn render_bold_strip(store: &GlyphStore, font: FontId, stream: &[u8]) -> Vec<u8> {
    let mut lookup = ColorLookup::new(STRIP_COLORS);
    let mut colors = STRIP_COLORS;
    let mut font = font;
    let mut glyph = Glyph::blank();
    let mut out = Vec::new();
    for token in StreamCursor::new(stream).tokens() {
        match token {
            Token::Control(Control::Color(fg)) => colors.fg = fg,
            Token::Control(Control::Highlight(bg)) => colors.bg = bg,
            Token::Control(Control::Shadow(shadow)) => colors.shadow = shadow,
            Token::Control(Control::ColorHighlightShadow { fg, bg, shadow }) => {
                colors = TextColors::new(fg, bg, shadow)
            }
            Token::Control(Control::Font(id)) => {
                if let Some(f) = FontId::from_byte(id) {
                    font = f;
                }
                continue;
            }
            Token::Glyph(code) => {
                let (face, secondary) = match font {
                    FontId::Bold => (FontFace::Bold, false),
                    _ => (FontFace::Normal, true),
                };
                store.decode(face, code as u16, secondary, &lookup, &mut glyph);
                let pixels = glyph.pixels();
                out.extend_from_slice(&pixels[..32]);
                out.extend_from_slice(&pixels[64..96]);
                continue;
            }
            _ => continue,
        }
        lookup.set(colors);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::{GlyphSheet, SheetId, SheetLayout};

    #[test]
    fn each_glyph_adds_one_column() {
        let bold = GlyphSheet::build(SheetLayout::Cells8, 16, |code, _, y| {
            (code == 2 && y == 9) as u8
        });
        let store = GlyphStore::new().with_sheet(SheetId::Bold, bold);
        let strip = render_bold_strip(&store, FontId::Bold, &[1, 2, 0xFE, 0xFF]);
        assert_eq!(strip.len(), 2 * STRIP_GLYPH_LEN);
        // background is transparent
        assert!(strip[..STRIP_GLYPH_LEN].iter().all(|b| *b == 0));
        // row 9 sits in the bottom tile, second row
        assert_eq!(&strip[STRIP_GLYPH_LEN + 32 + 4..STRIP_GLYPH_LEN + 32 + 8], &[0x11; 4]);
    }

    #[test]
    fn color_controls_recolor_following_glyphs() {
        let bold = GlyphSheet::build(SheetLayout::Cells8, 16, |_, _, _| 1);
        let store = GlyphStore::new().with_sheet(SheetId::Bold, bold);
        let strip = render_bold_strip(&store, FontId::Bold, &[1, 0xFC, 0x01, 5, 1, 0xFF]);
        assert_eq!(strip[0], 0x11);
        assert_eq!(strip[STRIP_GLYPH_LEN], 0x55);
    }
}
