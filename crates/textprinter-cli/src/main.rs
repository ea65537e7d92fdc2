use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use textprinter::{
    charmap, fixed_width_string_width, render_immediate, test_support::sample_store, FontId,
    GlyphSheet, GlyphStore, PrinterContext, PrinterTemplate, ScrollSpeed, SheetId, TextConfig,
    WindowId, FONTS,
};

use crate::console::{hex_string, parse_hex, window_to_string};
mod console;

#[derive(Parser)]
#[command(name = "textprinter", about = "Tile text printer toolkit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(clap::Args)]
struct GlyphArgs {
    /// Replace a glyph sheet with raw little-endian rows: `normal-latin=font.bin`
    #[arg(long = "sheet", value_name = "NAME=PATH")]
    sheets: Vec<String>,
    /// Per-glyph width table for a sheet: `normal-latin=widths.bin`
    #[arg(long = "widths", value_name = "NAME=PATH")]
    widths: Vec<String>,
    /// Keypad icon sheet (4bpp tiles, 16 per row)
    #[arg(long)]
    keypad: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Encode markup into a control stream (hex)
    Encode {
        #[arg(short, long)]
        text: String,
    },
    /// Decode a hex control stream back into markup
    Decode {
        #[arg(long)]
        hex: String,
    },
    /// List the font registry
    Fonts,
    /// Measure the width of markup in pixels
    Measure {
        #[arg(short, long, default_value = "normal")]
        font: FontId,
        #[arg(short, long)]
        text: String,
        /// Override the font's letter spacing
        #[arg(long)]
        spacing: Option<u8>,
        /// Treat every glyph as max-width
        #[arg(long)]
        fixed: bool,
        #[command(flatten)]
        glyphs: GlyphArgs,
    },
    /// Print markup into a window and dump the result
    Render {
        #[arg(short, long, default_value = "normal")]
        font: FontId,
        #[arg(short, long)]
        text: String,
        /// Window width in tiles
        #[arg(long, default_value = "24")]
        width: u8,
        /// Window height in tiles
        #[arg(long, default_value = "4")]
        height: u8,
        /// Hold the acknowledge button so prompts pass
        #[arg(long)]
        held: bool,
        #[arg(long)]
        auto_scroll: bool,
        #[arg(long, default_value = "mid")]
        scroll_speed: ScrollSpeed,
        #[arg(long)]
        alternate_arrow: bool,
        /// Colored terminal output instead of hex digits
        #[arg(long)]
        ansi: bool,
        #[command(flatten)]
        glyphs: GlyphArgs,
    },
}

fn split_assignment(arg: &str) -> Result<(SheetId, PathBuf)> {
    let (name, path) = arg
        .split_once('=')
        .with_context(|| format!("expected NAME=PATH, got {arg:?}"))?;
    Ok((name.parse()?, PathBuf::from(path)))
}

fn load_store(args: &GlyphArgs) -> Result<GlyphStore> {
    let mut store = sample_store();
    for arg in &args.sheets {
        let (id, path) = split_assignment(arg)?;
        let sheet =
            GlyphSheet::from_file(&path).with_context(|| format!("loading {}", path.display()))?;
        store.insert(id, sheet);
    }
    for arg in &args.widths {
        let (id, path) = split_assignment(arg)?;
        let widths = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let sheet = store.sheet(id).cloned().unwrap_or_default();
        store.insert(id, sheet.with_widths(widths));
    }
    if let Some(path) = &args.keypad {
        let icons = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        store.set_keypad_icons(icons);
    }
    Ok(store)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Cmd::Encode { text } => {
            println!("{}", hex_string(&charmap::encode(&text)?));
        }
        Cmd::Decode { hex } => {
            println!("{}", charmap::decode(&parse_hex(&hex)?));
        }
        Cmd::Fonts => {
            println!("id  name           face         width height spacing line  fg bg shadow");
            for (id, d) in FontId::ALL.iter().zip(FONTS.iter()) {
                println!(
                    "{:<3} {:<14} {:<12} {:>5} {:>6} {:>7} {:>4} {:>3} {:>2} {:>6}",
                    *id as u8,
                    id.name(),
                    format!("{:?}", d.face),
                    d.max_letter_width,
                    d.max_letter_height,
                    d.letter_spacing,
                    d.line_spacing,
                    d.colors.fg,
                    d.colors.bg,
                    d.colors.shadow
                );
            }
        }
        Cmd::Measure {
            font,
            text,
            spacing,
            fixed,
            glyphs,
        } => {
            let stream = charmap::encode(&text)?;
            let width = if fixed {
                let spacing = spacing.unwrap_or(font.descriptor().letter_spacing);
                fixed_width_string_width(font, &stream, spacing)
            } else {
                let store = load_store(&glyphs)?;
                textprinter::string_width(&store, font, &stream, spacing)
            };
            println!("{width}");
        }
        Cmd::Render {
            font,
            text,
            width,
            height,
            held,
            auto_scroll,
            scroll_speed,
            alternate_arrow,
            ansi,
            glyphs,
        } => {
            let store = load_store(&glyphs)?;
            let stream = charmap::encode(&text)?;
            let window = WindowId::new(0).context("window 0")?;
            let mut host = textprinter::test_support::TestHost::with_window(window, width, height);
            host.pressed = held;
            host.held = held;
            let config = TextConfig {
                auto_scroll,
                scroll_speed,
                alternate_down_arrow: alternate_arrow,
                ..TextConfig::default()
            };
            let mut ctx = PrinterContext::new(PrinterTemplate::new(window, font, &stream), 0);
            let outcome = render_immediate(&mut ctx, &mut host, &store, &config);
            if !outcome.finished {
                eprintln!(
                    "stopped after {} renders; prompts need --held or --auto-scroll",
                    outcome.renders
                );
            }
            let buf = host.window(window).context("window buffer missing")?;
            print!("{}", window_to_string(buf, ansi));
            eprintln!("cursor {:?}", outcome.cursor);
        }
    }
    Ok(())
}
