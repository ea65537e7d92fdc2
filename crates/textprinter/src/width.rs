//! Measures the on-screen width of a control stream without rendering it.

use std::collections::HashMap;

use log::trace;

use crate::{
    control::{Control, StreamCursor, Token, TokenTrace, EOS},
    font::{FontFace, FontId},
    glyph::GlyphStore,
    icons::keypad_icon_width,
};

/// Lines considered by [`fixed_width_string_width`].
pub const FIXED_WIDTH_MAX_LINES: usize = 8;

/// Supplies the text substituted for placeholder and dynamic markers.
///
/// Returned text is a glyph stream; it ends at the slice end or at the
/// first end marker.
pub trait Placeholders {
    fn placeholder(&self, id: u8) -> Option<&[u8]>;

    fn dynamic(&self, _id: u8) -> Option<&[u8]> {
        None
    }
}

/// Resolves every placeholder to nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPlaceholders;

impl Placeholders for NoPlaceholders {
    fn placeholder(&self, _id: u8) -> Option<&[u8]> {
        None
    }
}

/// Placeholder text kept in maps, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct PlaceholderTable {
    placeholders: HashMap<u8, Vec<u8>>,
    dynamic: HashMap<u8, Vec<u8>>,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_placeholder(&mut self, id: u8, text: Vec<u8>) {
        self.placeholders.insert(id, text);
    }

    pub fn set_dynamic(&mut self, id: u8, text: Vec<u8>) {
        self.dynamic.insert(id, text);
    }
}

impl Placeholders for PlaceholderTable {
    fn placeholder(&self, id: u8) -> Option<&[u8]> {
        self.placeholders.get(&id).map(Vec::as_slice)
    }

    fn dynamic(&self, id: u8) -> Option<&[u8]> {
        self.dynamic.get(&id).map(Vec::as_slice)
    }
}

/// Width of `stream` in `font`.
///
/// `letter_spacing` overrides the font's default spacing; `None` keeps the
/// default and lets `FONT` controls change it.
pub fn string_width(
    store: &GlyphStore,
    font: FontId,
    stream: &[u8],
    letter_spacing: Option<u8>,
) -> u32 {
    StringWidth::new(store, font)
        .letter_spacing(letter_spacing)
        .measure(stream)
}

/// Configurable width measurement.
pub struct StringWidth<'a> {
    store: &'a GlyphStore,
    font: FontId,
    letter_spacing: Option<u8>,
    placeholders: &'a dyn Placeholders,
}

struct Measure {
    face: FontFace,
    spacing: u32,
    min_spacing: u32,
    secondary: bool,
    size: u32,
    size_max: u32,
}

impl Measure {
    fn advance(&mut self, w: u32, next: u8) {
        if self.min_spacing > 0 {
            self.size += self.min_spacing.max(w);
        } else {
            self.size += w;
            if self.secondary && next != EOS {
                self.size += self.spacing;
            }
        }
    }
}

impl<'a> StringWidth<'a> {
    pub fn new(store: &'a GlyphStore, font: FontId) -> Self {
        Self {
            store,
            font,
            letter_spacing: None,
            placeholders: &NoPlaceholders,
        }
    }

    pub fn letter_spacing(mut self, spacing: Option<u8>) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn placeholders(mut self, placeholders: &'a dyn Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn measure(&self, stream: &[u8]) -> u32 {
        self.run(stream, |_| {})
    }

    /// Measures and records every token read, for comparison with a
    /// printer's trace of the same stream.
    pub fn measure_traced(&self, stream: &[u8]) -> (u32, Vec<TokenTrace>) {
        let mut traces = Vec::new();
        let width = self.run(stream, |t| traces.push(t));
        (width, traces)
    }

    fn run(&self, stream: &[u8], mut on_token: impl FnMut(TokenTrace)) -> u32 {
        let mut m = Measure {
            face: self.font.face(),
            spacing: self
                .letter_spacing
                .unwrap_or(self.font.descriptor().letter_spacing) as u32,
            min_spacing: 0,
            secondary: false,
            size: 0,
            size_max: 0,
        };
        let mut cursor = StreamCursor::new(stream);
        loop {
            let (token, t) = cursor.read();
            on_token(t);
            match token {
                Token::End => break,
                Token::Newline => {
                    m.size_max = m.size_max.max(m.size);
                    m.size = 0;
                }
                Token::Placeholder(id) => {
                    self.substitute(&mut m, self.placeholders.placeholder(id), cursor.peek())
                }
                Token::Dynamic(id) => {
                    self.substitute(&mut m, self.placeholders.dynamic(id), cursor.peek())
                }
                Token::PromptClear | Token::PromptScroll => {}
                Token::KeypadIcon(id) => m.advance(keypad_icon_width(id), cursor.peek()),
                Token::Control(control) => match control {
                    Control::Font(id) => {
                        if let Some(font) = FontId::from_byte(id) {
                            m.face = font.face();
                            if self.letter_spacing.is_none() {
                                m.spacing = font.descriptor().letter_spacing as u32;
                            }
                        }
                    }
                    Control::Clear(n) => m.size += n as u32,
                    Control::Skip(n) => m.size = n as u32,
                    Control::ClearTo(n) => m.size = m.size.max(n as u32),
                    Control::MinLetterSpacing(n) => m.min_spacing = n as u32,
                    Control::Japanese => m.secondary = true,
                    Control::English => m.secondary = false,
                    _ => {
                        if let Some(code) = token.glyph_code() {
                            let w = self.store.glyph_width(m.face, code, m.secondary);
                            m.advance(w, cursor.peek());
                        }
                    }
                },
                Token::ExtraSymbol(_) | Token::Glyph(_) => {
                    if let Some(code) = token.glyph_code() {
                        let w = self.store.glyph_width(m.face, code, m.secondary);
                        m.advance(w, cursor.peek());
                    }
                }
            }
        }
        let width = m.size.max(m.size_max);
        trace!("string width in {}: {width}", self.font);
        width
    }

    fn substitute(&self, m: &mut Measure, text: Option<&[u8]>, next: u8) {
        let Some(text) = text else {
            return;
        };
        for &b in text.iter().take_while(|b| **b != EOS) {
            let w = self.store.glyph_width(m.face, b as u16, m.secondary);
            m.advance(w, next);
        }
    }
}

/// Width of `stream` assuming every visible cell is `max_letter_width`
/// wide: `(max_letter_width + letter_spacing) * widest line`, counting at
/// most [`FIXED_WIDTH_MAX_LINES`] lines.
pub fn fixed_width_string_width(font: FontId, stream: &[u8], letter_spacing: u8) -> u32 {
    let mut lines = [0u32; FIXED_WIDTH_MAX_LINES];
    let mut line = 0;
    let mut cells = 0u32;
    for token in StreamCursor::new(stream).tokens() {
        match token {
            Token::Newline | Token::End => {
                if let Some(slot) = lines.get_mut(line) {
                    *slot = cells;
                }
                cells = 0;
                line += 1;
            }
            Token::Glyph(_) | Token::ExtraSymbol(_) | Token::KeypadIcon(_) => cells += 1,
            _ => {}
        }
    }
    let widest = lines.iter().copied().max().unwrap_or(0);
    (font.descriptor().max_letter_width as u32 + letter_spacing as u32) * widest
}
