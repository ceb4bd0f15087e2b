//! Font provider interface and the built-in pixel font.

mod pixel;

pub use pixel::PixelFont;

use core::ops::Deref;

/// Handle of a loaded font, stored per viewport.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FontId(pub u8);

impl FontId {
    pub const SYSTEM: Self = Self(0);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GlyphFormat {
    /// Column-major 8-row pages, see [`crate::display::Display::mono_bitmap_part`].
    Mono,
    /// One coverage byte per pixel, row-major.
    Alpha,
}

/// Bitmap of one code point; `width` is also the advance.
#[derive(Clone, Copy, Debug)]
pub struct Glyph<'a> {
    pub bits: &'a [u8],
    pub width: i32,
    pub height: i32,
    pub format: GlyphFormat,
}

/// Glyph storage and metrics.
pub trait FontProvider {
    /// Pins (`true`) or releases (`false`) a font's glyph tables so that a
    /// reload cannot invalidate bitmaps borrowed during a layout pass.
    fn lock(&self, _font: FontId, _locked: bool) {}

    fn width(&self, font: FontId, ch: char) -> i32;
    fn height(&self, font: FontId) -> i32;
    fn glyph(&self, font: FontId, ch: char) -> Glyph<'_>;

    /// Average character cell `(width, height)` used by line-based calls.
    fn cell_size(&self, font: FontId) -> (i32, i32);
}

/// Keeps a font locked for the lifetime of the guard.
pub struct FontLock<'a, F: FontProvider + ?Sized> {
    fonts: &'a F,
    font: FontId,
}

impl<'a, F: FontProvider + ?Sized> FontLock<'a, F> {
    pub fn new(fonts: &'a F, font: FontId) -> Self {
        fonts.lock(font, true);
        Self { fonts, font }
    }

    pub fn font(&self) -> FontId {
        self.font
    }
}

impl<F: FontProvider + ?Sized> Deref for FontLock<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.fonts
    }
}

impl<F: FontProvider + ?Sized> Drop for FontLock<'_, F> {
    fn drop(&mut self) {
        self.fonts.lock(self.font, false);
    }
}
