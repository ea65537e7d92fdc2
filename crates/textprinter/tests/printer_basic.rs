use pretty_assertions::assert_eq;
use textprinter::{
    charmap, string_width,
    test_support::{sample_store, sample_width, AudioEvent, TestHost},
    FontId, GlyphStore, PrinterContext, PrinterTemplate, RenderState, Signal, TextColors,
    TextConfig, WindowId,
};

fn window() -> WindowId {
    WindowId::new(0).unwrap()
}

fn host() -> TestHost {
    TestHost::with_window(window(), 8, 4)
}

fn renders(
    ctx: &mut PrinterContext<'_>,
    host: &mut TestHost,
    store: &GlyphStore,
    n: usize,
) -> Vec<Signal> {
    let config = TextConfig::default();
    (0..n).map(|_| ctx.render(host, store, &config)).collect()
}

#[test]
fn prints_one_glyph_per_tick() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("Hi").unwrap();
    assert_eq!(sample_width(stream[0] as u16), 6);
    assert_eq!(sample_width(stream[1] as u16), 3);

    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 3),
        vec![Signal::Print, Signal::Print, Signal::Finish]
    );
    assert_eq!(ctx.template().current_x, 9);

    let buf = host.window(window()).unwrap();
    // right column of the sample glyph is shadow, the rest fg or bg
    assert_eq!(buf.pixel(5, 2), 3);
    assert_eq!(buf.pixel(0, 0), 1);
    assert_eq!(buf.pixel(9, 0), 0);
}

#[test]
fn color_change_regenerates_lookup_once() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{COLOR 5}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(ctx.lookup().generations(), 1);

    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Print]);
    assert_eq!(ctx.lookup().generations(), 2);
    assert_eq!(ctx.colors(), TextColors::new(5, 1, 3));
    assert_eq!(host.window(window()).unwrap().pixel(1, 2), 5);

    assert_eq!(
        string_width(&store, FontId::Normal, &stream, None),
        sample_width(0xBB) as u32
    );
}

#[test]
fn same_color_twice_does_not_regenerate() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{COLOR 2}{SHADOW 3}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    renders(&mut ctx, &mut host, &store, 2);
    assert_eq!(ctx.lookup().generations(), 1);
}

#[test]
fn newline_returns_to_line_origin() {
    let store = sample_store();
    let mut host = host();
    let config = TextConfig::default();
    let stream = charmap::encode("{SHIFT_RIGHT 20}A\nB").unwrap();
    let template = PrinterTemplate::new(window(), FontId::Normal, &stream).at(4, 2);
    let mut ctx = PrinterContext::new(template, 0);

    assert_eq!(ctx.render(&mut host, &store, &config), Signal::Print);
    assert_eq!(ctx.template().current_x, 30);
    assert_eq!(ctx.step(&mut host, &store, &config), Signal::Repeat);
    assert_eq!((ctx.template().current_x, ctx.template().current_y), (4, 18));
    assert_eq!(ctx.render(&mut host, &store, &config), Signal::Print);
    assert_eq!(ctx.template().current_x, 10);
}

#[test]
fn minimum_letter_spacing_pads_narrow_glyphs() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{MIN_LETTER_SPACING 8}iA").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);

    renders(&mut ctx, &mut host, &store, 1);
    assert_eq!(ctx.template().current_x, 8);
    renders(&mut ctx, &mut host, &store, 1);
    assert_eq!(ctx.template().current_x, 16);
    // the gap after "i" was cleared to the background color
    assert_eq!(host.window(window()).unwrap().pixel(4, 3), 1);
    assert_eq!(string_width(&store, FontId::Normal, &stream, None), 16);
}

#[test]
fn minimum_letter_spacing_below_glyph_width_has_no_effect() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{MIN_LETTER_SPACING 4}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    renders(&mut ctx, &mut host, &store, 1);
    assert_eq!(ctx.template().current_x, 6);
}

#[test]
fn clear_codes_print_only_positive_spans() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{CLEAR 0}{CLEAR 5}").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 2),
        vec![Signal::Print, Signal::Finish]
    );
    assert_eq!(ctx.template().current_x, 5);
    assert_eq!(host.window(window()).unwrap().pixel(4, 15), 1);

    let stream = charmap::encode("A{CLEAR_TO 4}{CLEAR_TO 10}").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 3),
        vec![Signal::Print, Signal::Print, Signal::Finish]
    );
    assert_eq!(ctx.template().current_x, 10);
}

#[test]
fn transparent_background_is_not_cleared() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{CLEAR 5}").unwrap();
    let template = PrinterTemplate::new(window(), FontId::Normal, &stream)
        .with_colors(TextColors::new(2, 0, 3));
    let mut ctx = PrinterContext::new(template, 0);
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Print]);
    assert_eq!(host.window(window()).unwrap().pixel(0, 0), 0);
}

#[test]
fn skip_and_shift_are_relative_to_origin() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("AB{SKIP 3}{SHIFT_DOWN 5}").unwrap();
    let template = PrinterTemplate::new(window(), FontId::Normal, &stream).at(2, 1);
    let mut ctx = PrinterContext::new(template, 0);
    renders(&mut ctx, &mut host, &store, 3);
    assert_eq!((ctx.template().current_x, ctx.template().current_y), (5, 6));
}

#[test]
fn pause_counts_down() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{PAUSE 2}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 5),
        vec![
            Signal::Update,
            Signal::Update,
            Signal::Update,
            Signal::Print,
            Signal::Finish
        ]
    );
}

#[test]
fn pause_until_press_waits_for_acknowledge() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{PAUSE_UNTIL_PRESS}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);

    assert_eq!(
        renders(&mut ctx, &mut host, &store, 2),
        vec![Signal::Update, Signal::Update]
    );
    assert!(matches!(ctx.state(), RenderState::Wait(_)));
    host.pressed = true;
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Update]);
    assert_eq!(ctx.state(), RenderState::HandleChar);
    assert_eq!(host.audio, vec![AudioEvent::SoundEffect(textprinter::SE_SELECT)]);
    host.pressed = false;
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Print]);
}

#[test]
fn wait_sound_effect_polls_audio() {
    let store = sample_store();
    let mut host = host();
    host.sound_effect_playing = true;
    let stream = charmap::encode("{WAIT_SE}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 2),
        vec![Signal::Update, Signal::Update]
    );
    host.sound_effect_playing = false;
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 2),
        vec![Signal::Update, Signal::Print]
    );
}

#[test]
fn audio_controls_reach_the_host() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{PLAY_BGM 0x1A2}{PLAY_SE 7}{PAUSE_MUSIC}{RESUME_MUSIC}").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Finish]);
    assert_eq!(
        host.audio,
        vec![
            AudioEvent::Music(0x1A2),
            AudioEvent::SoundEffect(7),
            AudioEvent::PauseMusic,
            AudioEvent::ResumeMusic
        ]
    );
}

#[test]
fn per_character_delay_and_speed_up() {
    let store = sample_store();
    let stream = charmap::encode("AB").unwrap();

    let mut host = host();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 2);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 4),
        vec![Signal::Print, Signal::Update, Signal::Update, Signal::Print]
    );

    let mut host = self::host();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 2);
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Print]);
    host.pressed = true;
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Update]);
    assert!(ctx.is_sped_up());
    host.pressed = false;
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Print]);
}

#[test]
fn keypad_icon_advances_by_icon_width() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{START_BUTTON}A").unwrap();
    let template = PrinterTemplate::new(window(), FontId::Normal, &stream).with_spacing(1, 0);
    let mut ctx = PrinterContext::new(template, 0);
    assert_eq!(renders(&mut ctx, &mut host, &store, 1), vec![Signal::Print]);
    assert_eq!(ctx.template().current_x, 25);
    let buf = host.window(window()).unwrap();
    assert_eq!(buf.pixel(0, 0), 4);
    assert_eq!(buf.pixel(23, 11), 4);
    assert_eq!(buf.pixel(0, 12), 0);
}

#[test]
fn extended_glyphs_and_font_switches() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{EXTRA 3}{ESCAPE 3}{FONT 200}A{FONT 9}A{RESET_FONT}A").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);

    renders(&mut ctx, &mut host, &store, 2);
    assert_eq!(ctx.template().current_x, 8);
    renders(&mut ctx, &mut host, &store, 1);
    assert_eq!(ctx.decode_font(), FontId::Normal);
    assert_eq!(ctx.template().current_x, 14);
    renders(&mut ctx, &mut host, &store, 1);
    assert_eq!(ctx.decode_font(), FontId::Bold);
    assert_eq!(ctx.template().current_x, 22);
    // RESET_FONT leaves the switched font in place
    renders(&mut ctx, &mut host, &store, 1);
    assert_eq!(ctx.decode_font(), FontId::Bold);
    assert_eq!(ctx.template().current_x, 30);
    assert_eq!(string_width(&store, FontId::Normal, &stream, None), 30);
}

#[test]
fn secondary_script_adds_letter_spacing() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("{JPN}AA{ENG}A").unwrap();
    let template = PrinterTemplate::new(window(), FontId::Normal, &stream).with_spacing(1, 0);
    let mut ctx = PrinterContext::new(template, 0);
    renders(&mut ctx, &mut host, &store, 1);
    assert!(ctx.secondary_script());
    assert_eq!(ctx.template().current_x, 9);
    renders(&mut ctx, &mut host, &store, 2);
    assert_eq!(ctx.template().current_x, 24);
}

#[test]
fn fill_window_resets_cursor() {
    let store = sample_store();
    let mut host = host();
    let stream = charmap::encode("AB{FILL_WINDOW}").unwrap();
    let template = PrinterTemplate::new(window(), FontId::Normal, &stream).at(2, 3);
    let mut ctx = PrinterContext::new(template, 0);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 3),
        vec![Signal::Print, Signal::Print, Signal::Finish]
    );
    assert_eq!((ctx.template().current_x, ctx.template().current_y), (2, 3));
    let buf = host.window(window()).unwrap();
    assert_eq!(buf.pixel(63, 31), 1);
    assert_eq!(buf.pixel(5, 5), 1);
}

#[test]
fn glyphs_are_clipped_to_the_window() {
    let store = sample_store();
    let mut host = TestHost::with_window(window(), 1, 1);
    let stream = charmap::encode("AA").unwrap();
    let mut ctx = PrinterContext::new(PrinterTemplate::new(window(), FontId::Normal, &stream), 0);
    assert_eq!(
        renders(&mut ctx, &mut host, &store, 3),
        vec![Signal::Print, Signal::Print, Signal::Finish]
    );
    assert_eq!(ctx.template().current_x, 12);
}
