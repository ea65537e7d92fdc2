//! Fixed pool of printer slots, one per window.

use log::{debug, warn};

use crate::{
    color::TextColors,
    config::TextConfig,
    font::FontId,
    glyph::GlyphStore,
    host::{FlushMode, Host, WindowId, MAX_WINDOWS},
    printer::{PrinterContext, PrinterTemplate, Signal},
};

/// Most renders an immediate print performs before giving up.
pub const IMMEDIATE_STEP_LIMIT: usize = 0x400;

/// How a newly added printer is driven.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrintMode {
    /// Advanced by [`TextPrinters::run_printers`]; `speed` is the number of
    /// ticks per character. A speed of 0 prints immediately.
    Queued { speed: u8 },
    /// Rendered to completion at once, then flushed.
    Immediate,
    /// Rendered to completion at once without flushing.
    ImmediateNoFlush,
}

/// Notified after every tick that returned [`Signal::Print`] or [`Signal::Update`].
pub type PrinterCallback<'s> = Box<dyn FnMut(&PrinterTemplate<'s>, Signal) + 's>;

/// Result of rendering a stream in one go.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImmediateOutcome {
    pub renders: usize,
    /// `false` when [`IMMEDIATE_STEP_LIMIT`] was reached first.
    pub finished: bool,
    pub cursor: (u16, u16),
    pub colors: TextColors,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Queued,
    Immediate(ImmediateOutcome),
}

/// Renders `context` until it finishes or the render limit is reached.
/// Window flushes from the state machine are suppressed.
pub fn render_immediate(
    context: &mut PrinterContext<'_>,
    host: &mut impl Host,
    store: &GlyphStore,
    config: &TextConfig,
) -> ImmediateOutcome {
    context.set_suppress_flush(true);
    let mut renders = 0;
    let mut finished = false;
    while renders < IMMEDIATE_STEP_LIMIT {
        renders += 1;
        if context.render(host, store, config) == Signal::Finish {
            finished = true;
            break;
        }
    }
    if !finished {
        warn!(
            "immediate print in window {:?} stopped after {} renders",
            context.template().window,
            IMMEDIATE_STEP_LIMIT
        );
    }
    let t = context.template();
    ImmediateOutcome {
        renders,
        finished,
        cursor: (t.current_x, t.current_y),
        colors: t.colors,
    }
}

struct Slot<'s> {
    context: PrinterContext<'s>,
    callback: Option<PrinterCallback<'s>>,
}

/// The printer slots plus the glyph data and settings they share.
pub struct TextPrinters<'s> {
    store: &'s GlyphStore,
    config: TextConfig,
    slots: Vec<Option<Slot<'s>>>,
    disabled: bool,
}

impl<'s> TextPrinters<'s> {
    pub fn new(store: &'s GlyphStore, config: TextConfig) -> Self {
        Self {
            store,
            config,
            slots: (0..MAX_WINDOWS).map(|_| None).collect(),
            disabled: false,
        }
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TextConfig {
        &mut self.config
    }

    /// Starts printing `template` into its window, replacing any printer
    /// already active there. Adding a printer re-enables the pool.
    pub fn add_printer(
        &mut self,
        host: &mut impl Host,
        template: PrinterTemplate<'s>,
        mode: PrintMode,
        callback: Option<PrinterCallback<'s>>,
    ) -> AddOutcome {
        let window = template.window;
        self.disabled = false;
        match mode {
            PrintMode::Queued { speed } if speed > 0 => {
                debug!("queued printer in window {window:?} at speed {speed}");
                let context = PrinterContext::new(template, speed - 1);
                self.slots[window.index()] = Some(Slot { context, callback });
                AddOutcome::Queued
            }
            _ => {
                self.slots[window.index()] = None;
                let mut context = PrinterContext::new(template, 0);
                let outcome = render_immediate(&mut context, host, self.store, &self.config);
                if mode != PrintMode::ImmediateNoFlush {
                    host.flush(window, FlushMode::Gfx);
                }
                debug!(
                    "immediate printer in window {window:?}: {} renders, finished={}",
                    outcome.renders, outcome.finished
                );
                AddOutcome::Immediate(outcome)
            }
        }
    }

    /// Builds a template from `font`'s defaults and adds it.
    #[allow(clippy::too_many_arguments)]
    pub fn add_printer_parameterized(
        &mut self,
        host: &mut impl Host,
        window: WindowId,
        font: FontId,
        stream: &'s [u8],
        (x, y): (u16, u16),
        mode: PrintMode,
        callback: Option<PrinterCallback<'s>>,
    ) -> AddOutcome {
        let template = PrinterTemplate::new(window, font, stream).at(x, y);
        self.add_printer(host, template, mode, callback)
    }

    /// Advances every active printer by one tick.
    pub fn run_printers(&mut self, host: &mut impl Host) {
        if self.disabled {
            return;
        }
        for index in 0..self.slots.len() {
            let Some(slot) = self.slots[index].as_mut() else {
                continue;
            };
            let signal = slot.context.render(host, self.store, &self.config);
            match signal {
                Signal::Print | Signal::Update => {
                    if signal == Signal::Print {
                        host.flush(slot.context.template().window, FlushMode::Gfx);
                    }
                    if let Some(callback) = slot.callback.as_mut() {
                        callback(slot.context.template(), signal);
                    }
                }
                Signal::Finish => self.slots[index] = None,
                Signal::Repeat => {}
            }
        }
    }

    pub fn is_active(&self, window: WindowId) -> bool {
        self.slots[window.index()].is_some()
    }

    pub fn context(&self, window: WindowId) -> Option<&PrinterContext<'s>> {
        self.slots[window.index()].as_ref().map(|slot| &slot.context)
    }

    pub fn deactivate(&mut self, window: WindowId) {
        self.slots[window.index()] = None;
    }

    pub fn deactivate_all(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// While disabled, [`run_printers`](Self::run_printers) does nothing.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}
