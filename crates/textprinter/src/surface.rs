//! 4bpp tile bitmaps.
//!
//! Pixel data is stored the way tile hardware expects it: the bitmap is cut
//! into 8×8 tiles of 32 bytes laid out row-major, each pixel is a nibble and
//! the left pixel of a pair sits in the low nibble.

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

fn nibble_index(width: u16, x: u16, y: u16) -> (usize, u32) {
    let tiles_per_row = (width as usize).div_ceil(8);
    let (x, y) = (x as usize, y as usize);
    let tile = (y / 8) * tiles_per_row + x / 8;
    let byte = tile * 32 + (y % 8) * 4 + (x % 8) / 2;
    (byte, (x as u32 & 1) * 4)
}

/// Borrowed read-only tile bitmap.
#[derive(Copy, Clone, Debug)]
pub struct TileBitmap<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> TileBitmap<'a> {
    pub fn new(data: &'a [u8], width: u16, height: u16) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Color index at `(x, y)`; 0 outside the bitmap or its data.
    pub fn pixel(&self, x: u16, y: u16) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let (byte, shift) = nibble_index(self.width, x, y);
        self.data.get(byte).map_or(0, |b| (b >> shift) & 0xF)
    }
}

/// Owned tile buffer backing one window.
#[derive(Clone, Debug)]
pub struct TileBuffer {
    data: Vec<u8>,
    width: u16,
    height: u16,
}

impl TileBuffer {
    /// Creates a buffer of `width_tiles × height_tiles` 8×8 tiles.
    pub fn new(width_tiles: u8, height_tiles: u8) -> Self {
        let tiles = width_tiles as usize * height_tiles as usize;
        Self {
            data: vec![0; tiles * 32],
            width: width_tiles as u16 * 8,
            height: height_tiles as u16 * 8,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bitmap(&self) -> TileBitmap<'_> {
        TileBitmap::new(&self.data, self.width, self.height)
    }

    pub fn pixel(&self, x: u16, y: u16) -> u8 {
        self.as_bitmap().pixel(x, y)
    }

    /// Returns `false` when the pixel is out of bounds.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: u8) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte, shift) = nibble_index(self.width, x, y);
        let b = &mut self.data[byte];
        *b = (*b & !(0xF << shift)) | ((color & 0xF) << shift);
        true
    }

    pub fn fill(&mut self, color: u8) {
        let c = color & 0xF;
        self.data.fill(c << 4 | c);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: u8) {
        let x_end = rect.x.saturating_add(rect.width).min(self.width);
        let y_end = rect.y.saturating_add(rect.height).min(self.height);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Copies `src_rect` of `src` to `(dest_x, dest_y)`, skipping source
    /// pixels equal to `color_key`.
    pub fn blit(
        &mut self,
        src: &TileBitmap<'_>,
        src_rect: Rect,
        dest: (u16, u16),
        color_key: Option<u8>,
    ) {
        for dy in 0..src_rect.height {
            for dx in 0..src_rect.width {
                let color = src.pixel(src_rect.x + dx, src_rect.y + dy);
                if color_key == Some(color) {
                    continue;
                }
                self.set_pixel(dest.0.saturating_add(dx), dest.1.saturating_add(dy), color);
            }
        }
    }

    /// Moves every row up by `rows`, filling the exposed rows with `fill`.
    pub fn scroll_up(&mut self, rows: u16, fill: u8) {
        for y in 0..self.height {
            let src_y = y.saturating_add(rows);
            for x in 0..self.width {
                let color = if src_y < self.height {
                    self.pixel(x, src_y)
                } else {
                    fill
                };
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Renders the buffer as one hex digit per pixel, `.` for color 0.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                match self.pixel(x, y) {
                    0 => out.push('.'),
                    c => out.push(char::from_digit(c as u32, 16).unwrap_or('?')),
                }
            }
            out.push('\n');
        }
        out
    }
}
