//! Marquee registry and stepper for lines wider than their viewport.

use core::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use heapless::{String, Vec};
use log::{debug, trace};

use crate::{
    bidi::Classifier,
    config::{
        ConfigError, SCROLL_LINE_BYTES, SCROLLABLE_LINES, ScrollConfig, VISUAL_BUFFER_CHARS,
    },
    display::Display,
    font::FontProvider,
    lcd::Lcd,
    viewport::ViewportId,
};

/// Custom repaint of one scrolling line.
pub type ScrollFn<D, F, C> = fn(&mut Lcd<D, F, C>, &ScrollLine);

/// How a line is repainted on each step.
pub enum Redraw<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    /// Erase the line rectangle and draw the stored text at the offset.
    Text,
    Custom(ScrollFn<D, F, C>),
}

impl<D, F, C> Clone for Redraw<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, F, C> Copy for Redraw<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
}

impl<D, F, C> fmt::Debug for Redraw<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// One registered marquee line, identified by `(x, y, viewport)`.
#[derive(Clone, Debug)]
pub struct ScrollLine {
    pub(crate) text: String<SCROLL_LINE_BYTES>,
    pub(crate) text_width: i32,
    pub(crate) offset: i32,
    pub(crate) direction: Direction,
    pub(crate) bidir: bool,
    pub(crate) start_tick: u32,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) viewport: ViewportId,
    pub(crate) user_data: u32,
}

impl ScrollLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_width(&self) -> i32 {
        self.text_width
    }

    /// Pixel columns currently scrolled off the left edge.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the line bounces between its ends instead of wrapping.
    pub fn bounces(&self) -> bool {
        self.bidir
    }

    /// Tick at which the line moves next.
    pub fn start_tick(&self) -> u32 {
        self.start_tick
    }

    /// Viewport-relative `(x, y, width, height)` repainted each step.
    pub fn rect(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn viewport(&self) -> ViewportId {
        self.viewport
    }

    pub fn user_data(&self) -> u32 {
        self.user_data
    }

    /// Advances one step, re-arming the pause when an end is reached.
    fn advance(&mut self, config: &ScrollConfig, now: u32) {
        match self.direction {
            Direction::Forward => self.offset += config.step,
            Direction::Backward => self.offset -= config.step,
        }

        let mut at_end = false;
        if self.bidir {
            let max = (self.text_width - self.width).max(0);
            if self.offset <= 0 {
                self.offset = 0;
                self.direction = Direction::Forward;
                at_end = true;
            } else if self.offset >= max {
                self.offset = max;
                self.direction = Direction::Backward;
                at_end = true;
            }
        } else if self.offset >= self.text_width {
            self.offset = 0;
            at_end = true;
        }

        if at_end {
            self.start_tick = now.wrapping_add(config.end_pause_ticks);
        }
    }
}

/// Registry insert failed because the line limit is reached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegistryFull;

struct Entry<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    line: ScrollLine,
    redraw: Redraw<D, F, C>,
}

/// Registered lines in registration order.
pub(crate) struct ScrollRegistry<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    entries: Vec<Entry<D, F, C>, SCROLLABLE_LINES>,
}

impl<D, F, C> ScrollRegistry<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn find(&self, x: i32, y: i32, viewport: ViewportId) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.line.x == x && entry.line.y == y && entry.line.viewport == viewport
        })
    }

    fn insert(&mut self, entry: Entry<D, F, C>, limit: usize) -> Result<(), RegistryFull> {
        if self.entries.len() >= limit {
            return Err(RegistryFull);
        }
        self.entries.push(entry).map_err(|_| RegistryFull)
    }

    /// Drops lines of `viewport` whose rectangle overlaps the given one.
    /// Returns how many were removed.
    fn stop_rect(&mut self, viewport: ViewportId, x: i32, y: i32, width: i32, height: i32) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            let line = &entry.line;
            let overlaps = x < line.x + line.width
                && x + width > line.x
                && y < line.y + line.height
                && y + height > line.y;
            line.viewport != viewport || !overlaps
        });
        before - self.entries.len()
    }

    fn stop_viewport(&mut self, viewport: ViewportId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.line.viewport != viewport);
        before - self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn lines(&self) -> impl Iterator<Item = &ScrollLine> {
        self.entries.iter().map(|entry| &entry.line)
    }
}

/// Monotonic tick counter driving [`Lcd::pump`].
pub trait TickSource {
    fn now(&self) -> u32;
}

/// Counter bumped from a timer interrupt.
impl TickSource for AtomicU32 {
    fn now(&self) -> u32 {
        self.load(Ordering::Relaxed)
    }
}

/// `true` while `now` has not reached `deadline`, across wraparound.
fn tick_before(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) < 0
}

impl<D, F, C> Lcd<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    pub fn scroll_config(&self) -> ScrollConfig {
        self.scroll_config
    }

    /// Replaces the tuning; an invalid config leaves the old one in place.
    pub fn set_scroll_config(&mut self, config: ScrollConfig) -> Result<(), ConfigError> {
        self.scroll_config = config.validate()?;
        Ok(())
    }

    pub fn scroll_lines(&self) -> impl Iterator<Item = &ScrollLine> {
        self.scroll.lines()
    }

    pub fn scroll_line_count(&self) -> usize {
        self.scroll.len()
    }

    /// Sets the tick new lines count their start delay from. [`Self::step`]
    /// keeps it current.
    pub fn set_tick(&mut self, now: u32) {
        self.tick = now;
    }

    /// Draws `text` at cell `(col, row)` and registers it for scrolling when
    /// it overflows the viewport.
    pub fn put_scrolling(
        &mut self,
        col: i32,
        row: i32,
        pixel_skip: i32,
        text: &str,
        redraw: Redraw<D, F, C>,
        user_data: u32,
    ) {
        self.puts_scroll_worker(col, row, pixel_skip, text, true, redraw, user_data);
    }

    /// Pixel-positioned variant; without a redraw the text is drawn once.
    pub fn putsxy_scroll_func(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        redraw: Option<Redraw<D, F, C>>,
        pixel_skip: i32,
    ) {
        match redraw {
            Some(redraw) => self.puts_scroll_worker(x, y, pixel_skip, text, false, redraw, 0),
            None => self.putsxyofs(x, y, pixel_skip, text),
        }
    }

    pub fn puts_scroll(&mut self, col: i32, row: i32, text: &str) {
        self.put_scrolling(col, row, 0, text, Redraw::Text, 0);
    }

    #[allow(clippy::too_many_arguments)]
    fn puts_scroll_worker(
        &mut self,
        x: i32,
        y: i32,
        pixel_skip: i32,
        text: &str,
        linebased: bool,
        redraw: Redraw<D, F, C>,
        user_data: u32,
    ) {
        if text.is_empty() {
            return;
        }

        let vp = self.vp();
        let (x, y) = if linebased {
            let (cell_w, cell_h) = self.cell_size();
            (x * cell_w, y * cell_h)
        } else {
            (x, y)
        };
        if y >= vp.height {
            return;
        }

        let width = vp.width - x;
        let height = self.fonts.height(vp.font);
        let viewport = self.active_id();
        let stored = truncate_text(text);

        let existing = self
            .scroll
            .find(x, y, viewport)
            .filter(|&index| self.scroll.entries[index].line.text == stored);

        if existing.is_none() {
            self.scroll_stop_viewport_rect(viewport, x, y, width, height);
            self.putsxyofs(x, y, pixel_skip, text);
        }

        let (text_width, _) = self.string_size(&stored);
        if x + text_width <= vp.width {
            return;
        }

        let limit = i32::from(self.scroll_config.bidir_limit);
        let bidir = limit != 0 && text_width < vp.width * (100 + limit) / 100;

        match existing {
            Some(index) => {
                let entry = &mut self.scroll.entries[index];
                entry.line.text = stored;
                entry.line.text_width = text_width;
                entry.line.bidir = bidir;
                entry.line.user_data = user_data;
                entry.redraw = redraw;
            }
            None => {
                let line = ScrollLine {
                    text: stored,
                    text_width,
                    offset: pixel_skip,
                    direction: Direction::Forward,
                    bidir,
                    start_tick: self.tick.wrapping_add(self.scroll_config.delay_ticks),
                    x,
                    y,
                    width,
                    height,
                    viewport,
                    user_data,
                };

                let limit = self.scroll_config.max_lines;
                if self.scroll.insert(Entry { line, redraw }, limit).is_err() {
                    debug!("scroll registry full ({limit} lines), drawing static: x={x} y={y}");
                }
            }
        }
    }

    /// Advances every due line one step and repaints it.
    pub fn step(&mut self, now: u32) {
        self.tick = now;
        let config = self.scroll_config;
        let previous = self.current;

        let mut index = 0;
        while index < self.scroll.len() {
            let entry = &mut self.scroll.entries[index];
            index += 1;
            if tick_before(now, entry.line.start_tick) {
                continue;
            }

            entry.line.advance(&config, now);
            let line = entry.line.clone();
            let redraw = entry.redraw;
            trace!(
                "scroll step: x={} y={} offset={}",
                line.x, line.y, line.offset
            );

            self.activate(line.viewport);
            match redraw {
                Redraw::Text => self.scroll_fn(&line),
                Redraw::Custom(redraw) => redraw(self, &line),
            }
            self.update_viewport_rect(line.x, line.y, line.width, line.height);
        }

        self.activate(previous);
    }

    /// [`Self::step`] at the source's current tick.
    pub fn pump<T: TickSource + ?Sized>(&mut self, ticks: &T) {
        self.step(ticks.now());
    }

    /// Built-in text repaint, usable from custom redraws.
    pub fn scroll_fn(&mut self, line: &ScrollLine) {
        self.erase_rect(line.x, line.y, line.width, line.height);
        self.putsxyofs(line.x, line.y, line.offset, &line.text);
    }

    /// Stops lines of `viewport` overlapping a viewport-relative rectangle.
    pub fn scroll_stop_viewport_rect(
        &mut self,
        viewport: ViewportId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        let removed = self.scroll.stop_rect(viewport, x, y, width, height);
        if removed > 0 {
            trace!("stopped {removed} scroll lines in rect x={x} y={y} w={width} h={height}");
        }
    }

    pub fn scroll_stop_viewport(&mut self, viewport: ViewportId) {
        let removed = self.scroll.stop_viewport(viewport);
        if removed > 0 {
            trace!("stopped {removed} scroll lines of {viewport:?}");
        }
    }

    pub fn scroll_stop(&mut self) {
        self.scroll.clear();
    }
}

/// Copies `text` into a line buffer, cutting at a character boundary and
/// at the number of characters one layout pass can draw.
fn truncate_text(text: &str) -> String<SCROLL_LINE_BYTES> {
    let mut out = String::new();
    for ch in text.chars().take(VISUAL_BUFFER_CHARS) {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests;
