use core::ops::Deref;

use heapless::Vec;

use super::{Display, DrawMode, Pattern, Size, mono_bit};

const CALL_LOG: usize = 256;

/// One primitive call as received by [`MockDisplay`], in absolute pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawCall {
    Fill {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        mode: DrawMode,
    },
    Bitmap {
        src_x: i32,
        src_y: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        mode: DrawMode,
    },
    Update {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// No-hardware display keeping pixels in memory and logging every call.
///
/// The call log holds the first 256 calls; later ones only touch pixels.
#[derive(Clone, Debug)]
pub struct MockDisplay<const W: usize, const H: usize> {
    pixels: [[bool; W]; H],
    mode: DrawMode,
    foreground: Pattern,
    background: Pattern,
    calls: Vec<DrawCall, CALL_LOG>,
}

impl<const W: usize, const H: usize> Default for MockDisplay<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> MockDisplay<W, H> {
    pub const fn new() -> Self {
        Self {
            pixels: [[false; W]; H],
            mode: DrawMode::SOLID,
            foreground: Pattern(0),
            background: Pattern(0),
            calls: Vec::new(),
        }
    }

    /// Reads a pixel; `None` outside the panel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        if x < 0 || y < 0 || x as usize >= W || y as usize >= H {
            return None;
        }
        Some(self.pixels[y as usize][x as usize])
    }

    pub fn pixels(&self) -> &[[bool; W]; H] {
        &self.pixels
    }

    /// Number of foreground pixels inside a rectangle.
    pub fn count_on(&self, x: i32, y: i32, width: i32, height: i32) -> usize {
        let mut count = 0;
        for py in y..y + height {
            for px in x..x + width {
                if self.pixel(px, py) == Some(true) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn bitmap_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Bitmap { .. }))
    }

    pub fn foreground(&self) -> Pattern {
        self.foreground
    }

    pub fn background(&self) -> Pattern {
        self.background
    }

    fn record(&mut self, call: DrawCall) {
        let _ = self.calls.push(call);
    }

    fn blend(&mut self, x: i32, y: i32, bit: bool) {
        if x < 0 || y < 0 || x as usize >= W || y as usize >= H {
            return;
        }

        let dst = &mut self.pixels[y as usize][x as usize];
        if let Some(value) = self.mode.apply(bit, *dst) {
            *dst = value;
        }
    }
}

impl<const W: usize, const H: usize> Display for MockDisplay<W, H> {
    fn size(&self) -> Size {
        Size::new(W as i32, H as i32)
    }

    fn set_draw_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    fn draw_mode(&self) -> DrawMode {
        self.mode
    }

    fn set_foreground(&mut self, pattern: Pattern) {
        self.foreground = pattern;
    }

    fn set_background(&mut self, pattern: Pattern) {
        self.background = pattern;
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(DrawCall::Fill {
            x,
            y,
            width,
            height,
            mode: self.mode,
        });

        for py in y..y + height {
            for px in x..x + width {
                self.blend(px, py, true);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn mono_bitmap_part(
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
        if width <= 0 || height <= 0 {
            return;
        }

        self.record(DrawCall::Bitmap {
            src_x,
            src_y,
            x,
            y,
            width,
            height,
            mode: self.mode,
        });

        for row in 0..height {
            for col in 0..width {
                let bit = mono_bit(src, stride, src_x + col, src_y + row);
                self.blend(x + col, y + row, bit);
            }
        }
    }

    fn update_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(DrawCall::Update {
            x,
            y,
            width,
            height,
        });
    }
}

/// [`MockDisplay`] that declares `CLIPS`, so the context trims every draw
/// to the panel before it arrives.
#[derive(Clone, Debug, Default)]
pub struct ClippingDisplay<const W: usize, const H: usize>(pub MockDisplay<W, H>);

impl<const W: usize, const H: usize> Deref for ClippingDisplay<W, H> {
    type Target = MockDisplay<W, H>;

    fn deref(&self) -> &MockDisplay<W, H> {
        &self.0
    }
}

impl<const W: usize, const H: usize> Display for ClippingDisplay<W, H> {
    const CLIPS: bool = true;

    fn size(&self) -> Size {
        self.0.size()
    }

    fn set_draw_mode(&mut self, mode: DrawMode) {
        self.0.set_draw_mode(mode);
    }

    fn draw_mode(&self) -> DrawMode {
        self.0.draw_mode()
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.0.fill_rect(x, y, width, height);
    }

    #[allow(clippy::too_many_arguments)]
    fn mono_bitmap_part(
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
        self.0
            .mono_bitmap_part(src, src_x, src_y, stride, x, y, width, height);
    }

    fn update_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.0.update_rect(x, y, width, height);
    }
}
