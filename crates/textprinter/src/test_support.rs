//! In-memory host and synthetic glyph data.
//!
//! Used by the tests, the benchmark and the command line renderer; none of
//! it is needed to embed the printer.

use std::collections::HashMap;

use crate::{
    glyph::{GlyphSheet, GlyphStore, SheetId, SheetLayout},
    host::{Audio, Compositor, FlushMode, Input, WindowId},
    surface::{Rect, TileBitmap, TileBuffer},
};

/// Window buffers plus a log of the flushes and scrolls they received.
#[derive(Clone, Debug, Default)]
pub struct MemoryCompositor {
    windows: HashMap<WindowId, TileBuffer>,
    pub flushes: Vec<(WindowId, FlushMode)>,
    pub scrolls: Vec<(WindowId, u16)>,
}

impl MemoryCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window(&mut self, window: WindowId, width_tiles: u8, height_tiles: u8) {
        self.windows
            .insert(window, TileBuffer::new(width_tiles, height_tiles));
    }

    pub fn window(&self, window: WindowId) -> Option<&TileBuffer> {
        self.windows.get(&window)
    }
}

impl Compositor for MemoryCompositor {
    fn window_size(&self, window: WindowId) -> (u16, u16) {
        self.windows
            .get(&window)
            .map_or((0, 0), |buf| (buf.width(), buf.height()))
    }

    fn blit(
        &mut self,
        window: WindowId,
        src: &TileBitmap<'_>,
        src_rect: Rect,
        dest: (u16, u16),
        color_key: Option<u8>,
    ) {
        if let Some(buf) = self.windows.get_mut(&window) {
            buf.blit(src, src_rect, dest, color_key);
        }
    }

    fn fill_rect(&mut self, window: WindowId, rect: Rect, color: u8) {
        if let Some(buf) = self.windows.get_mut(&window) {
            buf.fill_rect(rect, color);
        }
    }

    fn fill(&mut self, window: WindowId, color: u8) {
        if let Some(buf) = self.windows.get_mut(&window) {
            buf.fill(color);
        }
    }

    fn scroll_up(&mut self, window: WindowId, rows: u16, fill: u8) {
        self.scrolls.push((window, rows));
        if let Some(buf) = self.windows.get_mut(&window) {
            buf.scroll_up(rows, fill);
        }
    }

    fn flush(&mut self, window: WindowId, mode: FlushMode) {
        self.flushes.push((window, mode));
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    SoundEffect(u16),
    Music(u16),
    PauseMusic,
    ResumeMusic,
}

/// A host whose input and audio state tests set directly.
#[derive(Clone, Debug, Default)]
pub struct TestHost {
    pub compositor: MemoryCompositor,
    pub pressed: bool,
    pub held: bool,
    pub sound_effect_playing: bool,
    pub audio: Vec<AudioEvent>,
}

impl TestHost {
    /// A host with one window of `width_tiles × height_tiles`.
    pub fn with_window(window: WindowId, width_tiles: u8, height_tiles: u8) -> Self {
        let mut host = Self::default();
        host.compositor.add_window(window, width_tiles, height_tiles);
        host
    }

    pub fn window(&self, window: WindowId) -> Option<&TileBuffer> {
        self.compositor.window(window)
    }
}

impl Compositor for TestHost {
    fn window_size(&self, window: WindowId) -> (u16, u16) {
        self.compositor.window_size(window)
    }

    fn blit(
        &mut self,
        window: WindowId,
        src: &TileBitmap<'_>,
        src_rect: Rect,
        dest: (u16, u16),
        color_key: Option<u8>,
    ) {
        self.compositor.blit(window, src, src_rect, dest, color_key);
    }

    fn fill_rect(&mut self, window: WindowId, rect: Rect, color: u8) {
        self.compositor.fill_rect(window, rect, color);
    }

    fn fill(&mut self, window: WindowId, color: u8) {
        self.compositor.fill(window, color);
    }

    fn scroll_up(&mut self, window: WindowId, rows: u16, fill: u8) {
        self.compositor.scroll_up(window, rows, fill);
    }

    fn flush(&mut self, window: WindowId, mode: FlushMode) {
        self.compositor.flush(window, mode);
    }
}

impl Audio for TestHost {
    fn play_sound_effect(&mut self, id: u16) {
        self.audio.push(AudioEvent::SoundEffect(id));
    }

    fn play_music(&mut self, id: u16) {
        self.audio.push(AudioEvent::Music(id));
    }

    fn pause_music(&mut self) {
        self.audio.push(AudioEvent::PauseMusic);
    }

    fn resume_music(&mut self) {
        self.audio.push(AudioEvent::ResumeMusic);
    }

    fn is_sound_effect_playing(&self) -> bool {
        self.sound_effect_playing
    }
}

impl Input for TestHost {
    fn acknowledge_pressed(&self) -> bool {
        self.pressed
    }

    fn acknowledge_held(&self) -> bool {
        self.held
    }
}

/// Advance width of `code` in the sample Latin sheets.
///
/// Upper case letters and digits are 6 wide, `i`, `l` and space 3, other
/// lower case letters 5, everything else 4.
pub fn sample_width(code: u16) -> u8 {
    match code {
        0x00 | 0xDD | 0xE0 => 3,
        0xA1..=0xAA | 0xBB..=0xD4 => 6,
        0xD5..=0xEE => 5,
        _ => 4,
    }
}

fn latin_sheet() -> GlyphSheet {
    let count = 0x200;
    let widths: Vec<u8> = (0..count as u16).map(sample_width).collect();
    GlyphSheet::build(SheetLayout::Latin, count, |code, x, y| {
        let w = sample_width(code) as u16;
        if code == 0 || x >= w || !(2..12).contains(&y) {
            0
        } else if x + 1 == w {
            2
        } else {
            ((x + y + code) % 3 != 0) as u8
        }
    })
    .with_widths(widths)
}

/// Checkerboard cells inset by one pixel, `width` pixels wide.
fn cell_sheet(layout: SheetLayout, width: u16) -> GlyphSheet {
    GlyphSheet::build(layout, 0x100, |code, x, y| {
        ((1..width - 1).contains(&x) && (1..11).contains(&y) && (x ^ y ^ code) & 1 == 0) as u8
    })
}

/// A store with every sheet filled with recognizable synthetic glyphs and
/// a keypad icon sheet of solid red tiles.
pub fn sample_store() -> GlyphStore {
    let mut store = GlyphStore::new();
    for id in [
        SheetId::SmallLatin,
        SheetId::NormalLatin,
        SheetId::ShortLatin,
        SheetId::NarrowLatin,
        SheetId::SmallNarrowLatin,
    ] {
        store.insert(id, latin_sheet());
    }
    for id in [
        SheetId::SmallJapanese,
        SheetId::NormalJapanese,
        SheetId::Braille,
        SheetId::Bold,
    ] {
        store.insert(id, cell_sheet(SheetLayout::Cells8, 8));
    }
    store.insert(
        SheetId::ShortJapanese,
        cell_sheet(SheetLayout::Cells16, 10).with_widths(vec![10; 0x100]),
    );
    store.set_keypad_icons(vec![0x44; 48 * 32]);
    store
}
