//! Keypad icons and the prompt down arrow.

use once_cell::sync::Lazy;

use crate::{
    glyph::GlyphStore,
    host::{Compositor, FlushMode, WindowId},
    surface::{Rect, TileBuffer},
};

pub const KEYPAD_A_BUTTON: u8 = 0x00;
pub const KEYPAD_B_BUTTON: u8 = 0x01;
pub const KEYPAD_L_BUTTON: u8 = 0x02;
pub const KEYPAD_R_BUTTON: u8 = 0x03;
pub const KEYPAD_START_BUTTON: u8 = 0x04;
pub const KEYPAD_SELECT_BUTTON: u8 = 0x05;
pub const KEYPAD_DPAD_UP: u8 = 0x06;
pub const KEYPAD_DPAD_DOWN: u8 = 0x07;
pub const KEYPAD_DPAD_LEFT: u8 = 0x08;
pub const KEYPAD_DPAD_RIGHT: u8 = 0x09;
pub const KEYPAD_DPAD_UPDOWN: u8 = 0x0A;
pub const KEYPAD_DPAD_LEFTRIGHT: u8 = 0x0B;
pub const KEYPAD_DPAD_NONE: u8 = 0x0C;

/// Placement of one icon inside the keypad icon sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeypadIcon {
    pub name: &'static str,
    /// First tile of the icon; the sheet is 16 tiles wide.
    pub tile_offset: u16,
    pub width: u8,
    pub height: u8,
}

const fn icon(name: &'static str, tile_offset: u16, width: u8) -> KeypadIcon {
    KeypadIcon {
        name,
        tile_offset,
        width,
        height: 12,
    }
}

/// Indexed by keypad icon id.
pub static KEYPAD_ICONS: [KeypadIcon; 13] = [
    icon("A_BUTTON", 0x00, 8),
    icon("B_BUTTON", 0x01, 8),
    icon("L_BUTTON", 0x02, 16),
    icon("R_BUTTON", 0x04, 16),
    icon("START_BUTTON", 0x06, 24),
    icon("SELECT_BUTTON", 0x09, 24),
    icon("DPAD_UP", 0x0C, 8),
    icon("DPAD_DOWN", 0x0D, 8),
    icon("DPAD_LEFT", 0x0E, 8),
    icon("DPAD_RIGHT", 0x0F, 8),
    icon("DPAD_UPDOWN", 0x20, 8),
    icon("DPAD_LEFTRIGHT", 0x21, 8),
    icon("DPAD_NONE", 0x22, 8),
];

pub fn keypad_icon(id: u8) -> Option<&'static KeypadIcon> {
    KEYPAD_ICONS.get(id as usize)
}

pub fn keypad_icon_by_name(name: &str) -> Option<u8> {
    KEYPAD_ICONS
        .iter()
        .position(|icon| icon.name.eq_ignore_ascii_case(name))
        .map(|i| i as u8)
}

/// Advance width of a keypad icon; unknown ids are 0 wide.
pub fn keypad_icon_width(id: u8) -> u32 {
    keypad_icon(id).map_or(0, |icon| icon.width as u32)
}

/// Blits keypad icon `id` at `(x, y)` and returns its width.
///
/// Nothing is drawn without an icon sheet, but the width is still reported
/// so the cursor keeps advancing the same way the width calculator does.
pub fn draw_keypad_icon(
    host: &mut impl Compositor,
    store: &GlyphStore,
    window: WindowId,
    id: u8,
    x: u16,
    y: u16,
) -> u8 {
    let Some(icon) = keypad_icon(id) else {
        return 0;
    };
    if let Some(sheet) = store.keypad_icons() {
        let src = Rect::new(
            (icon.tile_offset % 16) * 8,
            (icon.tile_offset / 16) * 8,
            icon.width as u16,
            icon.height as u16,
        );
        host.blit(window, &sheet, src, (x, y), None);
    }
    icon.width
}

/// Vertical offsets of the four arrow animation frames.
pub const DOWN_ARROW_FRAMES: [u16; 4] = [0, 1, 2, 1];
/// Ticks between arrow frames.
pub const DOWN_ARROW_DELAY: u8 = 8;

const DOWN_ARROW: [&str; 24] = [
    "........",
    "........",
    "........",
    "........",
    "22222223",
    ".2222233",
    "..22233.",
    "...233..",
    "....3...",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
    "........",
];

fn arrow_tiles(pattern: &[&str], recolor: impl Fn(u8) -> u8) -> TileBuffer {
    let mut buf = TileBuffer::new(1, (pattern.len() / 8) as u8);
    for (y, row) in pattern.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let color = ch.to_digit(16).map_or(0, |d| recolor(d as u8));
            buf.set_pixel(x as u16, y as u16, color);
        }
    }
    buf
}

static DOWN_ARROW_TILES: Lazy<TileBuffer> = Lazy::new(|| arrow_tiles(&DOWN_ARROW, |c| c));

static DARK_DOWN_ARROW_TILES: Lazy<TileBuffer> = Lazy::new(|| {
    arrow_tiles(&DOWN_ARROW, |c| match c {
        2 => 1,
        3 => 2,
        other => other,
    })
});

pub fn down_arrow_tiles(alternate: bool) -> &'static TileBuffer {
    if alternate {
        &DARK_DOWN_ARROW_TILES
    } else {
        &DOWN_ARROW_TILES
    }
}

/// Animation counters of a bobbing down arrow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DownArrowAnim {
    pub delay: u8,
    pub frame: u8,
}

impl DownArrowAnim {
    /// Draws the current frame into the 8×16 cell at `(x, y)` once the delay
    /// runs out. Returns `true` if anything was drawn; flushing is left to
    /// the caller.
    pub fn tick(
        &mut self,
        host: &mut impl Compositor,
        window: WindowId,
        (x, y): (u16, u16),
        bg: u8,
        alternate: bool,
    ) -> bool {
        if self.delay != 0 {
            self.delay -= 1;
            return false;
        }
        host.fill_rect(window, Rect::new(x, y, 8, 16), bg);
        self.blit_frame(host, window, (x, y), alternate);
        true
    }

    fn blit_frame(
        &mut self,
        host: &mut impl Compositor,
        window: WindowId,
        dest: (u16, u16),
        alternate: bool,
    ) {
        let src_y = DOWN_ARROW_FRAMES[(self.frame & 3) as usize];
        host.blit(
            window,
            &down_arrow_tiles(alternate).as_bitmap(),
            Rect::new(0, src_y, 8, 16),
            dest,
            Some(0),
        );
        self.delay = DOWN_ARROW_DELAY;
        self.frame = (self.frame + 1) & 3;
    }
}

/// Menu-style arrow: drawn two pixels above `y`; with `erase_only` the cell
/// is cleared without redrawing the arrow.
pub fn draw_down_arrow(
    host: &mut impl Compositor,
    window: WindowId,
    (x, y): (u16, u16),
    bg: u8,
    erase_only: bool,
    alternate: bool,
    anim: &mut DownArrowAnim,
) {
    if anim.delay != 0 {
        anim.delay -= 1;
        return;
    }
    host.fill_rect(window, Rect::new(x, y, 8, 16), bg);
    if erase_only {
        return;
    }
    anim.blit_frame(host, window, (x, y.saturating_sub(2)), alternate);
    host.flush(window, FlushMode::Gfx);
}
