//! Display context: active viewport, clipping, and primitive helpers.

use log::{debug, warn};

use crate::{
    bidi::Classifier,
    config::ScrollConfig,
    display::{Display, DrawMode, Pattern},
    font::{FontId, FontProvider},
    scroll::ScrollRegistry,
    viewport::{Viewport, ViewportError, ViewportId, ViewportTable},
};

/// Everything one physical display needs to render text: the panel, its
/// fonts, the bidi tables, the viewport table and the scroll registry.
pub struct Lcd<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    pub(crate) display: D,
    pub(crate) fonts: F,
    pub(crate) classifier: C,
    pub(crate) viewports: ViewportTable,
    pub(crate) current: ViewportId,
    pub(crate) scroll: ScrollRegistry<D, F, C>,
    pub(crate) scroll_config: ScrollConfig,
    pub(crate) tick: u32,
}

/// Rectangle after viewport/display clipping, in absolute pixels.
///
/// `skip_x`/`skip_y` are the columns/rows trimmed from the top-left.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Clipped {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) skip_x: i32,
    pub(crate) skip_y: i32,
}

impl<D, F, C> Lcd<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    pub fn new(mut display: D, fonts: F, classifier: C) -> Self {
        let default = Viewport::full(display.size());
        display.set_draw_mode(default.drawmode);

        Self {
            display,
            fonts,
            classifier,
            viewports: ViewportTable::new(default),
            current: ViewportId::DEFAULT,
            scroll: ScrollRegistry::new(),
            scroll_config: ScrollConfig::default(),
            tick: 0,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn fonts(&self) -> &F {
        &self.fonts
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Releases the owned display, fonts and classifier.
    pub fn release(self) -> (D, F, C) {
        (self.display, self.fonts, self.classifier)
    }

    // Viewport table.

    pub fn add_viewport(&mut self, viewport: Viewport) -> Result<ViewportId, ViewportError> {
        self.viewports.insert(viewport)
    }

    /// Removes a viewport, stopping its scroll lines. The default viewport
    /// becomes active if the removed one was.
    pub fn remove_viewport(&mut self, id: ViewportId) -> Result<Viewport, ViewportError> {
        let removed = self.viewports.remove(id)?;
        self.scroll_stop_viewport(id);
        if self.current == id {
            self.set_viewport(None);
        }
        Ok(removed)
    }

    pub fn viewport(&self, id: ViewportId) -> Option<&Viewport> {
        self.viewports.get(id)
    }

    /// Mutable access to a stored viewport. Changes to the active one reach
    /// the display on the next `set_viewport`.
    pub fn viewport_mut(&mut self, id: ViewportId) -> Option<&mut Viewport> {
        self.viewports.get_mut(id)
    }

    // Active viewport.

    /// Makes `id` active, or the default viewport for `None` and unknown ids.
    pub fn set_viewport(&mut self, id: Option<ViewportId>) {
        self.activate(id.unwrap_or(ViewportId::DEFAULT));

        let vp = self.vp();
        if vp.exceeds(self.display.size()) {
            if D::CLIPS {
                debug!(
                    "viewport out of bounds, clipping: x={} y={} w={} h={}",
                    vp.x, vp.y, vp.width, vp.height
                );
            } else {
                warn!(
                    "viewport out of bounds: x={} y={} w={} h={}",
                    vp.x, vp.y, vp.width, vp.height
                );
            }
        }
    }

    /// Switches viewports and pushes their draw state to the panel without
    /// the bounds diagnostics.
    pub(crate) fn activate(&mut self, id: ViewportId) {
        self.current = self.viewports.resolve(id).0;

        let vp = self.vp();
        self.display.set_draw_mode(vp.drawmode);
        if D::DEPTH > 1 {
            self.display.set_foreground(vp.fg_pattern);
            self.display.set_background(vp.bg_pattern);
        }
    }

    /// Active viewport and whether it is the default one.
    pub fn get_viewport(&self) -> (ViewportId, &Viewport, bool) {
        let (id, vp) = self.viewports.resolve(self.current);
        (id, vp, id == ViewportId::DEFAULT)
    }

    pub(crate) fn active_id(&self) -> ViewportId {
        self.viewports.resolve(self.current).0
    }

    /// Copy of the active viewport.
    pub(crate) fn vp(&self) -> Viewport {
        *self.viewports.resolve(self.current).1
    }

    fn active_mut(&mut self) -> Option<&mut Viewport> {
        let id = self.active_id();
        self.viewports.get_mut(id)
    }

    pub fn set_drawmode(&mut self, mode: DrawMode) {
        if let Some(vp) = self.active_mut() {
            vp.drawmode = mode;
        }
        self.display.set_draw_mode(mode);
    }

    pub fn drawmode(&self) -> DrawMode {
        self.vp().drawmode
    }

    pub fn set_foreground(&mut self, pattern: Pattern) {
        if let Some(vp) = self.active_mut() {
            vp.fg_pattern = pattern;
        }
        if D::DEPTH > 1 {
            self.display.set_foreground(pattern);
        }
    }

    pub fn set_background(&mut self, pattern: Pattern) {
        if let Some(vp) = self.active_mut() {
            vp.bg_pattern = pattern;
        }
        if D::DEPTH > 1 {
            self.display.set_background(pattern);
        }
    }

    pub fn set_font(&mut self, font: FontId) {
        if let Some(vp) = self.active_mut() {
            vp.font = font;
        }
    }

    // Whole-viewport helpers.

    pub fn draw_border_viewport(&mut self) {
        let vp = self.vp();
        self.draw_rect(0, 0, vp.width, vp.height);
    }

    pub fn fill_viewport(&mut self) {
        let vp = self.vp();
        self.fill_rect(0, 0, vp.width, vp.height);
    }

    /// Fills the viewport with its background and stops its scroll lines.
    pub fn clear_viewport(&mut self) {
        let vp = self.vp();
        self.clear_viewport_rect(0, 0, vp.width, vp.height);
    }

    /// Fills a viewport-relative rectangle with the background and stops
    /// scroll lines crossing it.
    pub fn clear_viewport_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.erase_rect(x, y, width, height);
        let id = self.active_id();
        self.scroll_stop_viewport_rect(id, x, y, width, height);
    }

    /// Clears the whole panel and stops all scrolling.
    pub fn clear_display(&mut self) {
        let size = self.display.size();
        let mode = self.display.draw_mode();
        self.display
            .set_draw_mode(DrawMode::SOLID | DrawMode::INVERSEVID);
        self.display.fill_rect(0, 0, size.width, size.height);
        self.display.set_draw_mode(mode);
        self.scroll_stop();
    }

    pub(crate) fn erase_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let mode = self.display.draw_mode();
        self.display
            .set_draw_mode(DrawMode::SOLID | DrawMode::INVERSEVID);
        self.fill_rect(x, y, width, height);
        self.display.set_draw_mode(mode);
    }

    // Flush requests.

    pub fn update(&mut self) {
        let size = self.display.size();
        self.display.update_rect(0, 0, size.width, size.height);
    }

    pub fn update_viewport(&mut self) {
        let vp = self.vp();
        self.display.update_rect(vp.x, vp.y, vp.width, vp.height);
    }

    pub fn update_viewport_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let vp = self.vp();
        self.display.update_rect(vp.x + x, vp.y + y, width, height);
    }

    // Viewport-relative primitives.

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if let Some(clip) = self.clip(x, y, width, height) {
            self.display
                .fill_rect(clip.x, clip.y, clip.width, clip.height);
        }
    }

    pub fn hline(&mut self, x1: i32, x2: i32, y: i32) {
        let (left, right) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        self.fill_rect(left, y, right - left + 1, 1);
    }

    pub fn vline(&mut self, x: i32, y1: i32, y2: i32) {
        let (top, bottom) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        self.fill_rect(x, top, 1, bottom - top + 1);
    }

    /// Rectangle outline.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }

        let right = x + width - 1;
        let bottom = y + height - 1;
        self.hline(x, right, y);
        if height > 1 {
            self.hline(x, right, bottom);
        }
        if height > 2 {
            self.vline(x, y + 1, bottom - 1);
            if width > 1 {
                self.vline(right, y + 1, bottom - 1);
            }
        }
    }

    /// Mono bitmap fragment at viewport-relative `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn mono_bitmap_part(
        &mut self,
        src: &[u8],
        src_x: i32,
        src_y: i32,
        stride: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        if let Some(clip) = self.clip(x, y, width, height) {
            self.display.mono_bitmap_part(
                src,
                src_x + clip.skip_x,
                src_y + clip.skip_y,
                stride,
                clip.x,
                clip.y,
                clip.width,
                clip.height,
            );
        }
    }

    /// Clips a viewport-relative rectangle to the active viewport, and to
    /// the panel when the display declares `CLIPS`.
    pub(crate) fn clip(&self, x: i32, y: i32, width: i32, height: i32) -> Option<Clipped> {
        let vp = self.vp();
        let (x, width, skip_x) = clip_span(x, width, vp.width)?;
        let (y, height, skip_y) = clip_span(y, height, vp.height)?;

        let mut clipped = Clipped {
            x: vp.x + x,
            y: vp.y + y,
            width,
            height,
            skip_x,
            skip_y,
        };

        if D::CLIPS {
            let size = self.display.size();
            let (x, width, dx) = clip_span(clipped.x, clipped.width, size.width)?;
            let (y, height, dy) = clip_span(clipped.y, clipped.height, size.height)?;
            clipped = Clipped {
                x,
                y,
                width,
                height,
                skip_x: clipped.skip_x + dx,
                skip_y: clipped.skip_y + dy,
            };
        }

        Some(clipped)
    }
}

/// Clips `[start, start + len)` to `[0, limit)`; returns the new start,
/// length, and how much was cut from the front.
fn clip_span(start: i32, len: i32, limit: i32) -> Option<(i32, i32, i32)> {
    let mut start = start;
    let mut len = len;
    let mut skip = 0;

    if start < 0 {
        skip = -start;
        len += start;
        start = 0;
    }
    if start + len > limit {
        len = limit - start;
    }

    (len > 0 && start < limit).then_some((start, len, skip))
}
