//! textprinter: incremental tile text printer.
//! Control-stream interpreter, 2bpp glyph decoding, string width measurement.

pub mod bold;
pub mod charmap;
mod color;
mod config;
pub mod control;
mod error;
mod font;
mod glyph;
mod host;
pub mod icons;
mod pool;
mod printer;
mod surface;
pub mod width;

pub use color::{
    ColorLookup, TextColors, TEXT_COLOR_BLUE, TEXT_COLOR_DARK_GRAY, TEXT_COLOR_GREEN,
    TEXT_COLOR_LIGHT_BLUE, TEXT_COLOR_LIGHT_GRAY, TEXT_COLOR_LIGHT_GREEN, TEXT_COLOR_LIGHT_RED,
    TEXT_COLOR_RED, TEXT_COLOR_TRANSPARENT, TEXT_COLOR_WHITE,
};
pub use config::{ScrollSpeed, TextConfig};
pub use error::{Result, TextError};
pub use font::{FontAttribute, FontDescriptor, FontFace, FontId, FONTS};
pub use glyph::{Glyph, GlyphSheet, GlyphStore, SheetId, SheetLayout, GLYPH_BUFFER_LEN};
pub use host::{Audio, Compositor, FlushMode, Host, Input, WindowId, MAX_WINDOWS, SE_SELECT};
pub use pool::{
    render_immediate, AddOutcome, ImmediateOutcome, PrintMode, PrinterCallback, TextPrinters,
    IMMEDIATE_STEP_LIMIT,
};
pub use printer::{PrinterContext, PrinterTemplate, PromptCounters, RenderState, Signal};
pub use surface::{Rect, TileBitmap, TileBuffer};
pub use width::{fixed_width_string_width, string_width, StringWidth};

// Test utilities
pub mod test_support;
