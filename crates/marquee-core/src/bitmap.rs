//! Mono bitmaps and nine-segment tiling.

use crate::{bidi::Classifier, display::Display, font::FontProvider, lcd::Lcd};

/// Mono bitmap in the display's paged column format; the stride is `width`.
#[derive(Clone, Copy, Debug)]
pub struct Bitmap<'a> {
    pub data: &'a [u8],
    pub width: i32,
    pub height: i32,
}

impl<'a> Bitmap<'a> {
    pub const fn new(data: &'a [u8], width: i32, height: i32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

impl<D, F, C> Lcd<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    /// Draws the `width x height` part of `bitmap` at `(src_x, src_y)` to
    /// viewport-relative `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn bmp_part(
        &mut self,
        bitmap: &Bitmap<'_>,
        src_x: i32,
        src_y: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        self.mono_bitmap_part(
            bitmap.data,
            src_x,
            src_y,
            bitmap.width,
            x,
            y,
            width,
            height,
        );
    }

    pub fn bmp(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32) {
        self.bmp_part(bitmap, 0, 0, x, y, bitmap.width, bitmap.height);
    }

    /// Stretches `bitmap` over `width x height` at `(x, y)` by splitting it
    /// into a 3x3 grid: corners are copied once, edges and center repeat.
    pub fn nine_segment_bmp(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32, width: i32, height: i32) {
        let seg_w = bitmap.width / 3;
        let seg_h = bitmap.height / 3;
        if seg_w <= 0 || seg_h <= 0 {
            return;
        }

        let right_src = bitmap.width - seg_w;
        let bottom_src = bitmap.height - seg_h;
        let right = x + width - seg_w;
        let bottom = y + height - seg_h;

        // Edge and center tiles stop short of the corners.
        let mut dx = seg_w;
        while dx < width - seg_w {
            let w = seg_w.min(width - seg_w - dx);
            self.bmp_part(bitmap, seg_w, 0, x + dx, y, w, seg_h);
            self.bmp_part(bitmap, seg_w, bottom_src, x + dx, bottom, w, seg_h);
            dx += seg_w;
        }

        let mut dy = seg_h;
        while dy < height - seg_h {
            let h = seg_h.min(height - seg_h - dy);
            self.bmp_part(bitmap, 0, seg_h, x, y + dy, seg_w, h);
            self.bmp_part(bitmap, right_src, seg_h, right, y + dy, seg_w, h);
            dy += seg_h;
        }

        let mut dy = seg_h;
        while dy < height - seg_h {
            let h = seg_h.min(height - seg_h - dy);
            let mut dx = seg_w;
            while dx < width - seg_w {
                let w = seg_w.min(width - seg_w - dx);
                self.bmp_part(bitmap, seg_w, seg_h, x + dx, y + dy, w, h);
                dx += seg_w;
            }
            dy += seg_h;
        }

        self.bmp_part(bitmap, 0, 0, x, y, seg_w, seg_h);
        self.bmp_part(bitmap, right_src, 0, right, y, seg_w, seg_h);
        self.bmp_part(bitmap, 0, bottom_src, x, bottom, seg_w, seg_h);
        self.bmp_part(bitmap, right_src, bottom_src, right, bottom, seg_w, seg_h);
    }
}
