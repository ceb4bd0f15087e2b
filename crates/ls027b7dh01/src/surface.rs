//! `marquee-core` display backed by the panel framebuffer.

use embedded_hal::{digital::OutputPin, spi::SpiDevice};
use marquee_core::{
    Display, DrawMode, Size,
    display::mono_bit,
};

use crate::{
    Error, FrameBuffer, Ls027,
    protocol::{HEIGHT, WIDTH},
};

const LINE_WORDS: usize = HEIGHT.div_ceil(32);

/// Set of panel rows, 0-based.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct LineSet([u32; LINE_WORDS]);

impl LineSet {
    fn insert(&mut self, row: usize) {
        self.0[row / 32] |= 1 << (row % 32);
    }

    fn remove(&mut self, row: usize) -> bool {
        let had = self.contains(row);
        self.0[row / 32] &= !(1 << (row % 32));
        had
    }

    fn contains(&self, row: usize) -> bool {
        self.0[row / 32] & (1 << (row % 32)) != 0
    }

    fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..HEIGHT).filter(|&row| self.contains(row))
    }

    fn clear(&mut self) {
        self.0 = [0; LINE_WORDS];
    }
}

/// Framebuffer drawing surface with line tracking.
///
/// Drawing marks rows as changed; `update_rect` promotes changed rows in
/// its range to pending, and [`Surface::flush`] sends pending rows.
#[derive(Clone, Default)]
pub struct Surface {
    frame: FrameBuffer,
    mode: DrawMode,
    changed: LineSet,
    pending: LineSet,
}

impl Surface {
    pub const fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            mode: DrawMode::SOLID,
            changed: LineSet([0; LINE_WORDS]),
            pending: LineSet([0; LINE_WORDS]),
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Releases the framebuffer.
    pub fn release(self) -> FrameBuffer {
        self.frame
    }

    /// Rows waiting for [`Surface::flush`], 0-based.
    pub fn pending_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.pending.iter()
    }

    /// Queues every row, e.g. after the panel was cleared out of band.
    pub fn invalidate(&mut self) {
        for row in 0..HEIGHT {
            self.pending.insert(row);
        }
        self.changed.clear();
    }

    /// Writes pending rows to the panel. Returns how many were sent.
    pub fn flush<SPI, DISP, EXTCOM>(
        &mut self,
        driver: &mut Ls027<SPI, DISP, EXTCOM>,
    ) -> Result<usize, Error<SPI::Error, DISP::Error, EXTCOM::Error>>
    where
        SPI: SpiDevice<u8>,
        DISP: OutputPin,
        EXTCOM: OutputPin,
    {
        let count = self.pending.len();
        if count == 0 {
            return Ok(0);
        }

        let frame = &self.frame;
        driver.write_lines(self.pending.iter().filter_map(|row| {
            let line = row as u16 + 1;
            frame.line(line).map(|data| (line, data))
        }))?;

        self.pending.clear();
        Ok(count)
    }

    fn blend(&mut self, x: i32, y: i32, bit: bool) {
        if x < 0 || y < 0 {
            return;
        }

        let (x, y) = (x as usize, y as usize);
        let Some(dst) = self.frame.pixel(x, y) else {
            return;
        };

        if let Some(value) = self.mode.apply(bit, dst) {
            if value != dst && self.frame.set_pixel(x, y, value) {
                self.changed.insert(y);
            }
        }
    }
}

/// Clamps `[start, start + len)` to `[0, limit)`.
fn span(start: i32, len: i32, limit: usize) -> Option<(usize, usize)> {
    let from = start.max(0);
    let to = (start + len).min(limit as i32);
    (from < to).then_some((from as usize, to as usize))
}

impl Display for Surface {
    const CLIPS: bool = true;

    fn size(&self) -> Size {
        Size::new(WIDTH as i32, HEIGHT as i32)
    }

    fn set_draw_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    fn draw_mode(&self) -> DrawMode {
        self.mode
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let (Some((x0, x1)), Some((y0, y1))) = (span(x, width, WIDTH), span(y, height, HEIGHT))
        else {
            return;
        };

        // SOLID fills write whole bytes; other modes go pixel by pixel.
        if self.mode.base() == DrawMode::SOLID {
            let on = !self.mode.is_inverse();
            for row in y0..y1 {
                if self.frame.fill_span(row, x0, x1, on) {
                    self.changed.insert(row);
                }
            }
            return;
        }

        for row in y0..y1 {
            for col in x0..x1 {
                self.blend(col as i32, row as i32, true);
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
        for dy in 0..height {
            for dx in 0..width {
                let bit = mono_bit(src, stride, src_x + dx, src_y + dy);
                self.blend(x + dx, y + dy, bit);
            }
        }
    }

    fn update_rect(&mut self, _x: i32, y: i32, _width: i32, height: i32) {
        let Some((y0, y1)) = span(y, height, HEIGHT) else {
            return;
        };

        for row in y0..y1 {
            if self.changed.remove(row) {
                self.pending.insert(row);
            }
        }
    }
}
