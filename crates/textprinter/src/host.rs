//! Collaborators the printer drives but does not own.

use crate::surface::{Rect, TileBitmap};

/// Number of printer slots (one per window).
pub const MAX_WINDOWS: usize = 32;

/// Sound played when a prompt is acknowledged.
pub const SE_SELECT: u16 = 5;

/// Handle of a destination window; always below [`MAX_WINDOWS`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u8);

impl WindowId {
    pub fn new(id: u8) -> Option<Self> {
        ((id as usize) < MAX_WINDOWS).then_some(Self(id))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What part of a window a flush uploads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlushMode {
    /// Layout (tilemap) changed.
    Map,
    /// Pixel data changed.
    Gfx,
    Full,
}

pub trait Compositor {
    /// Window size in pixels.
    fn window_size(&self, window: WindowId) -> (u16, u16);
    fn blit(
        &mut self,
        window: WindowId,
        src: &TileBitmap<'_>,
        src_rect: Rect,
        dest: (u16, u16),
        color_key: Option<u8>,
    );
    fn fill_rect(&mut self, window: WindowId, rect: Rect, color: u8);
    fn fill(&mut self, window: WindowId, color: u8);
    fn scroll_up(&mut self, window: WindowId, rows: u16, fill: u8);
    fn flush(&mut self, window: WindowId, mode: FlushMode);
}

pub trait Audio {
    fn play_sound_effect(&mut self, id: u16);
    fn play_music(&mut self, id: u16);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn is_sound_effect_playing(&self) -> bool;
}

pub trait Input {
    /// Acknowledge button went down this tick.
    fn acknowledge_pressed(&self) -> bool;
    fn acknowledge_held(&self) -> bool;
}

/// Everything a printer step may call into.
pub trait Host: Compositor + Audio + Input {}

impl<T: Compositor + Audio + Input> Host for T {}
