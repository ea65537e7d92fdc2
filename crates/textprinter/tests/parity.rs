use pretty_assertions::assert_eq;
use textprinter::{
    charmap,
    test_support::{sample_store, TestHost},
    AddOutcome, FlushMode, FontId, GlyphStore, PrintMode, PrinterContext, PrinterTemplate, Signal,
    StringWidth, TextConfig, TextPrinters, WindowId, IMMEDIATE_STEP_LIMIT,
};

fn window() -> WindowId {
    WindowId::new(1).unwrap()
}

/// Renders `stream` to completion with the acknowledge button held and
/// returns the printer's token trace.
fn printer_trace(
    store: &GlyphStore,
    font: FontId,
    stream: &[u8],
) -> Vec<textprinter::control::TokenTrace> {
    let mut host = TestHost::with_window(window(), 16, 8);
    host.pressed = true;
    host.held = true;
    let config = TextConfig::default();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), font, stream), 0);
    ctx.enable_trace();
    let mut finished = false;
    for _ in 0..100_000 {
        if ctx.render(&mut host, store, &config) == Signal::Finish {
            finished = true;
            break;
        }
    }
    assert!(finished, "printer did not finish");
    ctx.take_trace()
}

fn assert_same_walk(store: &GlyphStore, font: FontId, stream: &[u8]) {
    let (_, measured) = StringWidth::new(store, font).measure_traced(stream);
    assert_eq!(printer_trace(store, font, stream), measured);
}

struct Lcg(u64);

impl Lcg {
    fn next_byte(&mut self) -> u8 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u8
    }
}

#[test]
fn printer_and_measure_consume_every_opcode_alike() {
    let store = sample_store();
    let stream = charmap::encode(concat!(
        "{COLOR 4}{HIGHLIGHT 6}{SHADOW 7}{COLOR_HIGHLIGHT_SHADOW 1 2 3}{PALETTE 1}",
        "{FONT 0}A{RESET_FONT}{PAUSE 1}{PAUSE_UNTIL_PRESS}{WAIT_SE}{PLAY_BGM 3}",
        "{ESCAPE 5}{SHIFT_RIGHT 2}{SHIFT_DOWN 2}{FILL_WINDOW}{PLAY_SE 1}{CLEAR 3}",
        "{SKIP 4}{CLEAR_TO 9}{MIN_LETTER_SPACING 7}{JPN}AB{ENG}{PAUSE_MUSIC}",
        "{RESUME_MUSIC}{A_BUTTON}{EXTRA 2}{PLAYER}{DYNAMIC 1}{0xFC}{0x40}",
        "\\pC\\lD\nE"
    ))
    .unwrap();
    assert_same_walk(&store, FontId::Normal, &stream);
}

#[test]
fn printer_and_measure_agree_on_random_streams() {
    let store = sample_store();
    let mut rng = Lcg(0x5EED);
    for _ in 0..200 {
        let mut stream: Vec<u8> = (0..48).map(|_| rng.next_byte()).collect();
        stream.push(0xFF);
        for font in [FontId::Normal, FontId::Short, FontId::Bold] {
            assert_same_walk(&store, font, &stream);
        }
    }
}

#[test]
fn unterminated_stream_finishes() {
    let store = sample_store();
    let trace = printer_trace(&store, FontId::Normal, &[0xBB, 0xFC, 0x01]);
    assert_eq!(trace.len(), 3);
    assert_eq!(trace[1].len, 3);
    assert_eq!(trace[2].lead, 0xFF);
}

#[test]
fn queued_and_immediate_produce_the_same_window() {
    let store = sample_store();
    let config = TextConfig::default();
    let stream = charmap::encode(
        "{COLOR 4}Hello\n{SHIFT_RIGHT 3}{HIGHLIGHT 6}World{CLEAR 4}{MIN_LETTER_SPACING 9}il",
    )
    .unwrap();
    let template = PrinterTemplate::new(window(), FontId::Normal, &stream).at(2, 1);

    let mut queued_host = TestHost::with_window(window(), 16, 8);
    let mut queued = PrinterContext::new(template, 0);
    while queued.render(&mut queued_host, &store, &config) != Signal::Finish {}

    let mut immediate_host = TestHost::with_window(window(), 16, 8);
    let mut immediate = PrinterContext::new(template, 0);
    let outcome =
        textprinter::render_immediate(&mut immediate, &mut immediate_host, &store, &config);

    assert!(outcome.finished);
    let t = queued.template();
    assert_eq!(outcome.cursor, (t.current_x, t.current_y));
    assert_eq!(outcome.colors, queued.colors());
    assert_eq!(
        immediate_host.window(window()).unwrap().to_text(),
        queued_host.window(window()).unwrap().to_text()
    );
}

#[test]
fn immediate_print_stops_at_render_limit() {
    let store = sample_store();
    let config = TextConfig::default();
    let mut host = TestHost::with_window(window(), 16, 8);
    let stream = charmap::encode("{PAUSE_UNTIL_PRESS}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    let outcome = textprinter::render_immediate(&mut ctx, &mut host, &store, &config);
    assert_eq!(outcome.renders, IMMEDIATE_STEP_LIMIT);
    assert!(!outcome.finished);
    assert_eq!(outcome.cursor, (0, 0));
}

#[test]
fn immediate_print_flushes_once() {
    let store = sample_store();
    let mut host = TestHost::with_window(window(), 16, 8);
    host.pressed = true;
    let stream = charmap::encode("A\\pB\\lC").unwrap();
    let mut printers = TextPrinters::new(&store, TextConfig::default());
    let outcome = printers.add_printer(
        &mut host,
        PrinterTemplate::new(window(), FontId::Normal, &stream),
        PrintMode::Immediate,
        None,
    );
    let AddOutcome::Immediate(outcome) = outcome else {
        panic!("expected an immediate print");
    };
    assert!(outcome.finished);
    assert_eq!(host.compositor.flushes, vec![(window(), FlushMode::Gfx)]);
    assert!(!printers.is_active(window()));
}
