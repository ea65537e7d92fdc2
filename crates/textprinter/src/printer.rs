//! The resumable printer state machine.
//!
//! A [`PrinterContext`] walks one control stream. Every call to
//! [`PrinterContext::step`] performs a single state transition and reports
//! what happened through a [`Signal`]; [`PrinterContext::render`] repeats
//! steps until something externally visible happens.

use log::{debug, trace};

use crate::{
    color::{ColorLookup, TextColors},
    config::TextConfig,
    control::{Control, StreamCursor, Token, TokenTrace, EXTENDED_GLYPH_BASE},
    font::FontId,
    glyph::{Glyph, GlyphStore},
    host::{FlushMode, Host, WindowId, SE_SELECT},
    icons::{draw_keypad_icon, DownArrowAnim},
    surface::Rect,
};

/// Ticks an auto-scrolling prompt waits before advancing.
pub const AUTO_SCROLL_DELAY: u8 = 49;
/// Per-character delay used while auto-scrolling.
pub const AUTO_SCROLL_TEXT_DELAY: u8 = 3;

/// Where and how a stream is printed.
#[derive(Copy, Clone, Debug)]
pub struct PrinterTemplate<'s> {
    pub stream: StreamCursor<'s>,
    pub window: WindowId,
    pub font: FontId,
    /// Line origin
    pub x: u16,
    pub y: u16,
    pub current_x: u16,
    pub current_y: u16,
    pub letter_spacing: u8,
    pub line_spacing: u8,
    pub colors: TextColors,
}

impl<'s> PrinterTemplate<'s> {
    /// A template at the window origin using the font's default spacing
    /// and colors.
    pub fn new(window: WindowId, font: FontId, stream: &'s [u8]) -> Self {
        let d = font.descriptor();
        Self {
            stream: StreamCursor::new(stream),
            window,
            font,
            x: 0,
            y: 0,
            current_x: 0,
            current_y: 0,
            letter_spacing: d.letter_spacing,
            line_spacing: d.line_spacing,
            colors: d.colors,
        }
    }

    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.x = x;
        self.y = y;
        self.current_x = x;
        self.current_y = y;
        self
    }

    pub fn with_colors(mut self, colors: TextColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_spacing(mut self, letter_spacing: u8, line_spacing: u8) -> Self {
        self.letter_spacing = letter_spacing;
        self.line_spacing = line_spacing;
        self
    }

    fn line_height(&self) -> u16 {
        self.font.descriptor().max_letter_height as u16 + self.line_spacing as u16
    }
}

/// Outcome of one state transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Nothing visible happened, step again right away.
    Repeat,
    /// Internal state changed, no new pixels.
    Update,
    /// Pixels were written; the window should be flushed.
    Print,
    /// The stream is complete.
    Finish,
}

/// Counters of a prompt that waits for acknowledgment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptCounters {
    pub arrow: DownArrowAnim,
    pub auto_scroll_delay: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    HandleChar,
    /// Waiting for acknowledgment without an arrow.
    Wait(PromptCounters),
    /// Waiting with an arrow, then clearing the window.
    Clear(PromptCounters),
    /// Waiting with an arrow, then scrolling one line.
    ScrollStart(PromptCounters),
    Scroll { remaining: u16 },
    WaitSoundEffect,
    Pause { ticks: u8 },
}

/// Interpreter state of one active printer.
#[derive(Clone, Debug)]
pub struct PrinterContext<'s> {
    template: PrinterTemplate<'s>,
    state: RenderState,
    speed: u8,
    delay: u8,
    decode_font: FontId,
    secondary_script: bool,
    min_letter_spacing: u8,
    sped_up: bool,
    suppress_flush: bool,
    lookup: ColorLookup,
    glyph: Glyph,
    trace: Option<Vec<TokenTrace>>,
}

impl<'s> PrinterContext<'s> {
    /// `speed` is the number of idle ticks between characters.
    pub fn new(template: PrinterTemplate<'s>, speed: u8) -> Self {
        Self {
            state: RenderState::HandleChar,
            speed,
            delay: 0,
            decode_font: template.font,
            secondary_script: false,
            min_letter_spacing: 0,
            sped_up: false,
            suppress_flush: false,
            lookup: ColorLookup::new(template.colors),
            glyph: Glyph::blank(),
            trace: None,
            template,
        }
    }

    pub fn template(&self) -> &PrinterTemplate<'s> {
        &self.template
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn colors(&self) -> TextColors {
        self.template.colors
    }

    pub fn lookup(&self) -> &ColorLookup {
        &self.lookup
    }

    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    pub fn decode_font(&self) -> FontId {
        self.decode_font
    }

    pub fn secondary_script(&self) -> bool {
        self.secondary_script
    }

    pub fn min_letter_spacing(&self) -> u8 {
        self.min_letter_spacing
    }

    pub fn is_sped_up(&self) -> bool {
        self.sped_up
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Skips window flushes the state machine would otherwise issue itself.
    pub fn set_suppress_flush(&mut self, suppress: bool) {
        self.suppress_flush = suppress;
    }

    /// Starts recording every token read from the stream.
    pub fn enable_trace(&mut self) {
        self.trace.get_or_insert_with(Vec::new);
    }

    pub fn take_trace(&mut self) -> Vec<TokenTrace> {
        self.trace.take().unwrap_or_default()
    }

    /// Steps until a signal other than [`Signal::Repeat`].
    pub fn render(
        &mut self,
        host: &mut impl Host,
        store: &GlyphStore,
        config: &TextConfig,
    ) -> Signal {
        loop {
            let signal = self.step(host, store, config);
            if signal != Signal::Repeat {
                return signal;
            }
        }
    }

    /// Performs one state transition.
    pub fn step(
        &mut self,
        host: &mut impl Host,
        store: &GlyphStore,
        config: &TextConfig,
    ) -> Signal {
        match self.state {
            RenderState::HandleChar => self.handle_char(host, store, config),
            RenderState::Wait(mut counters) => {
                if self.prompt_acknowledged(host, config, &mut counters, false) {
                    self.state = RenderState::HandleChar;
                } else {
                    self.state = RenderState::Wait(counters);
                }
                Signal::Update
            }
            RenderState::Clear(mut counters) => {
                if self.prompt_acknowledged(host, config, &mut counters, true) {
                    let t = &mut self.template;
                    host.fill(t.window, t.colors.bg);
                    t.current_x = t.x;
                    t.current_y = t.y;
                    self.state = RenderState::HandleChar;
                } else {
                    self.state = RenderState::Clear(counters);
                }
                Signal::Update
            }
            RenderState::ScrollStart(mut counters) => {
                if self.prompt_acknowledged(host, config, &mut counters, true) {
                    self.clear_down_arrow(host);
                    let remaining = self.template.line_height();
                    self.template.current_x = self.template.x;
                    self.state = RenderState::Scroll { remaining };
                } else {
                    self.state = RenderState::ScrollStart(counters);
                }
                Signal::Update
            }
            RenderState::Scroll { remaining } => {
                if remaining == 0 {
                    self.state = RenderState::HandleChar;
                } else {
                    let rows = config.scroll_speed.rows_per_tick().min(remaining);
                    host.scroll_up(self.template.window, rows, self.template.colors.bg);
                    self.flush(host);
                    self.state = RenderState::Scroll {
                        remaining: remaining - rows,
                    };
                }
                Signal::Update
            }
            RenderState::WaitSoundEffect => {
                if !host.is_sound_effect_playing() {
                    self.state = RenderState::HandleChar;
                }
                Signal::Update
            }
            RenderState::Pause { ticks } => {
                if ticks != 0 {
                    self.state = RenderState::Pause { ticks: ticks - 1 };
                } else {
                    self.delay = 0;
                    self.state = RenderState::HandleChar;
                }
                Signal::Update
            }
        }
    }

    fn handle_char(
        &mut self,
        host: &mut impl Host,
        store: &GlyphStore,
        config: &TextConfig,
    ) -> Signal {
        if self.sped_up && host.acknowledge_held() {
            self.delay = 0;
        } else if self.delay != 0 && self.speed != 0 {
            self.delay -= 1;
            if config.can_speed_up && host.acknowledge_pressed() {
                self.sped_up = true;
                self.delay = 0;
            }
            return Signal::Update;
        }

        self.delay = if config.auto_scroll {
            AUTO_SCROLL_TEXT_DELAY
        } else {
            self.speed
        };

        let (token, t) = self.template.stream.read();
        trace!("window {:?}: {token:?} at {}", self.template.window, t.offset);
        if let Some(traces) = self.trace.as_mut() {
            traces.push(t);
        }

        match token {
            Token::End => {
                debug!("printer in window {:?} finished", self.template.window);
                Signal::Finish
            }
            Token::Newline => {
                self.template.current_x = self.template.x;
                let line_height = self.template.line_height();
                self.template.current_y = self.template.current_y.saturating_add(line_height);
                Signal::Repeat
            }
            Token::Placeholder(_) | Token::Dynamic(_) => Signal::Repeat,
            Token::PromptClear => {
                self.state = RenderState::Clear(PromptCounters::default());
                Signal::Update
            }
            Token::PromptScroll => {
                self.state = RenderState::ScrollStart(PromptCounters::default());
                Signal::Update
            }
            Token::KeypadIcon(id) => {
                let t = &mut self.template;
                let width = draw_keypad_icon(host, store, t.window, id, t.current_x, t.current_y);
                self.glyph.width = width;
                t.current_x = t.current_x.saturating_add(width as u16 + t.letter_spacing as u16);
                Signal::Print
            }
            Token::Control(control) => self.handle_control(control, host, store),
            Token::Glyph(b) => self.print_glyph(b as u16, host, store),
            Token::ExtraSymbol(b) => self.print_glyph(EXTENDED_GLYPH_BASE + b as u16, host, store),
        }
    }

    fn handle_control(
        &mut self,
        control: Control,
        host: &mut impl Host,
        store: &GlyphStore,
    ) -> Signal {
        let t = &mut self.template;
        match control {
            Control::Color(fg) => {
                t.colors.fg = fg;
                self.lookup.set(t.colors);
            }
            Control::Highlight(bg) => {
                t.colors.bg = bg;
                self.lookup.set(t.colors);
            }
            Control::Shadow(shadow) => {
                t.colors.shadow = shadow;
                self.lookup.set(t.colors);
            }
            Control::ColorHighlightShadow { fg, bg, shadow } => {
                t.colors = TextColors::new(fg, bg, shadow);
                self.lookup.set(t.colors);
            }
            Control::Palette(_) => {}
            Control::Font(id) => {
                if let Some(font) = FontId::from_byte(id) {
                    self.decode_font = font;
                }
            }
            Control::ResetFont => {}
            Control::Pause(ticks) => {
                self.state = RenderState::Pause { ticks };
            }
            Control::PauseUntilPress => {
                self.state = RenderState::Wait(PromptCounters::default());
                return Signal::Update;
            }
            Control::WaitSoundEffect => {
                self.state = RenderState::WaitSoundEffect;
                return Signal::Update;
            }
            Control::PlayMusic(id) => host.play_music(id),
            Control::PlaySoundEffect(id) => host.play_sound_effect(id),
            Control::PauseMusic => host.pause_music(),
            Control::ResumeMusic => host.resume_music(),
            Control::Escape(b) => {
                return self.print_glyph(EXTENDED_GLYPH_BASE + b as u16, host, store);
            }
            Control::ShiftRight(n) => t.current_x = t.x.saturating_add(n as u16),
            Control::ShiftDown(n) => t.current_y = t.y.saturating_add(n as u16),
            Control::FillWindow => {
                host.fill(t.window, t.colors.bg);
                t.current_x = t.x;
                t.current_y = t.y;
            }
            Control::Clear(n) => {
                if n > 0 {
                    self.clear_span(host, n as u16);
                    self.template.current_x = self.template.current_x.saturating_add(n as u16);
                    return Signal::Print;
                }
            }
            Control::Skip(n) => t.current_x = t.x.saturating_add(n as u16),
            Control::ClearTo(n) => {
                let target = t.x.saturating_add(n as u16);
                if target > t.current_x {
                    let span = target - t.current_x;
                    self.clear_span(host, span);
                    self.template.current_x = self.template.current_x.saturating_add(span);
                    return Signal::Print;
                }
            }
            Control::MinLetterSpacing(n) => self.min_letter_spacing = n,
            Control::Japanese => self.secondary_script = true,
            Control::English => self.secondary_script = false,
            Control::Unknown(code) => trace!("ignoring unknown control {code:#04x}"),
        }
        Signal::Repeat
    }

    fn print_glyph(&mut self, code: u16, host: &mut impl Host, store: &GlyphStore) -> Signal {
        store.decode(
            self.decode_font.face(),
            code,
            self.secondary_script,
            &self.lookup,
            &mut self.glyph,
        );
        self.copy_glyph_to_window(host);

        let width = self.glyph.width as u16;
        if self.min_letter_spacing > 0 {
            self.template.current_x = self.template.current_x.saturating_add(width);
            let min = self.min_letter_spacing as u16;
            if min > width {
                let span = min - width;
                self.clear_span(host, span);
                self.template.current_x = self.template.current_x.saturating_add(span);
            }
        } else if self.secondary_script {
            self.template.current_x = self.template
                .current_x
                .saturating_add(width + self.template.letter_spacing as u16);
        } else {
            self.template.current_x = self.template.current_x.saturating_add(width);
        }
        Signal::Print
    }

    fn copy_glyph_to_window(&self, host: &mut impl Host) {
        let t = &self.template;
        let (window_width, window_height) = host.window_size(t.window);
        let width = window_width.saturating_sub(t.current_x).min(self.glyph.width as u16);
        let height = window_height.saturating_sub(t.current_y).min(self.glyph.height as u16);
        if width == 0 || height == 0 {
            return;
        }
        host.blit(
            t.window,
            &self.glyph.bitmap(),
            Rect::new(0, 0, width, height),
            (t.current_x, t.current_y),
            Some(0),
        );
    }

    /// Fills `width` pixels at the cursor with the background color, one
    /// glyph tall. Transparent backgrounds are left alone.
    fn clear_span(&self, host: &mut impl Host, width: u16) {
        let t = &self.template;
        if t.colors.bg == 0 {
            return;
        }
        let height = match self.glyph.height {
            0 => t.font.descriptor().max_letter_height,
            h => h,
        };
        host.fill_rect(
            t.window,
            Rect::new(t.current_x, t.current_y, width, height as u16),
            t.colors.bg,
        );
    }

    fn prompt_acknowledged(
        &self,
        host: &mut impl Host,
        config: &TextConfig,
        counters: &mut PromptCounters,
        with_arrow: bool,
    ) -> bool {
        if config.auto_scroll {
            if counters.auto_scroll_delay == AUTO_SCROLL_DELAY {
                return true;
            }
            counters.auto_scroll_delay += 1;
            return false;
        }
        if with_arrow {
            let t = &self.template;
            let drawn = counters.arrow.tick(
                host,
                t.window,
                (t.current_x, t.current_y),
                t.colors.bg,
                config.alternate_down_arrow,
            );
            if drawn {
                self.flush(host);
            }
        }
        if host.acknowledge_pressed() {
            host.play_sound_effect(SE_SELECT);
            return true;
        }
        false
    }

    fn clear_down_arrow(&self, host: &mut impl Host) {
        let t = &self.template;
        host.fill_rect(t.window, Rect::new(t.current_x, t.current_y, 8, 16), t.colors.bg);
        self.flush(host);
    }

    fn flush(&self, host: &mut impl Host) {
        if !self.suppress_flush {
            host.flush(self.template.window, FlushMode::Gfx);
        }
    }
}
