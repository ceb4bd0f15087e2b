//! Primitive drawing substrate implemented once per physical display.

pub mod mock;

use core::ops::BitOr;

/// Pixel combination rule used by fills and bitmap draws.
///
/// The low two bits select which source pixels are written; `INVERSEVID`
/// swaps the roles of set and clear source bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DrawMode(u8);

impl DrawMode {
    /// Set source bits invert the destination, clear bits leave it.
    pub const COMPLEMENT: Self = Self(0);
    /// Clear source bits are written as background.
    pub const BG: Self = Self(1);
    /// Set source bits are written as foreground.
    pub const FG: Self = Self(2);
    /// Both foreground and background are written.
    pub const SOLID: Self = Self(3);
    /// Modifier flag: swap foreground and background.
    pub const INVERSEVID: Self = Self(4);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_inverse(self) -> bool {
        self.0 & Self::INVERSEVID.0 != 0
    }

    /// Mode without the inverse-video flag.
    pub const fn base(self) -> Self {
        Self(self.0 & Self::SOLID.0)
    }

    /// Computes the new destination pixel for one source bit.
    ///
    /// `true` is foreground, `false` is background. Returns `None` when the
    /// destination is left untouched.
    pub fn apply(self, src_bit: bool, dst: bool) -> Option<bool> {
        let bit = src_bit != self.is_inverse();
        let base = self.base();

        if base == Self::COMPLEMENT {
            return bit.then_some(!dst);
        }

        if bit {
            (base.0 & Self::FG.0 != 0).then_some(true)
        } else {
            (base.0 & Self::BG.0 != 0).then_some(false)
        }
    }
}

impl Default for DrawMode {
    fn default() -> Self {
        Self::SOLID
    }
}

impl BitOr for DrawMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Native color value for displays deeper than 1bpp.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pattern(pub u32);

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Physical display primitives.
///
/// Coordinates are absolute display pixels. Callers clip to the active
/// viewport first; when `CLIPS` is false the implementation may receive
/// rectangles partially outside its bounds and must ignore those pixels.
pub trait Display {
    /// Bits per pixel. Patterns are only applied when this is above 1.
    const DEPTH: u8 = 1;
    /// Whether viewports extending past the panel are clipped to it.
    const CLIPS: bool = false;

    fn size(&self) -> Size;

    fn set_draw_mode(&mut self, mode: DrawMode);
    fn draw_mode(&self) -> DrawMode;

    fn set_foreground(&mut self, _pattern: Pattern) {}
    fn set_background(&mut self, _pattern: Pattern) {}

    /// Fills a rectangle as if drawing an all-set mono bitmap.
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Draws `width x height` pixels of a mono bitmap starting at
    /// `(src_x, src_y)` in the source.
    ///
    /// Source layout is column-major in 8-row pages, LSB on top, `stride`
    /// bytes per page.
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
    );

    /// Anti-aliased glyph fragment, one byte of coverage per pixel.
    /// Only color builds provide glyphs in this format.
    #[allow(clippy::too_many_arguments)]
    fn alpha_bitmap_part(
        &mut self,
        _src: &[u8],
        _src_x: i32,
        _src_y: i32,
        _stride: i32,
        _x: i32,
        _y: i32,
        _width: i32,
        _height: i32,
    ) {
    }

    /// Pushes a changed region to the panel.
    fn update_rect(&mut self, _x: i32, _y: i32, _width: i32, _height: i32) {}
}

/// Reads one pixel from a column-major paged mono bitmap.
pub fn mono_bit(src: &[u8], stride: i32, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 || x >= stride {
        return false;
    }

    let index = (y / 8) as usize * stride as usize + x as usize;
    src.get(index).is_some_and(|byte| byte & (1u8 << (y % 8)) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_writes_both_colors() {
        assert_eq!(DrawMode::SOLID.apply(true, false), Some(true));
        assert_eq!(DrawMode::SOLID.apply(false, true), Some(false));
    }

    #[test]
    fn fg_only_leaves_clear_bits_alone() {
        assert_eq!(DrawMode::FG.apply(true, false), Some(true));
        assert_eq!(DrawMode::FG.apply(false, true), None);
    }

    #[test]
    fn bg_only_writes_background_for_clear_bits() {
        assert_eq!(DrawMode::BG.apply(false, true), Some(false));
        assert_eq!(DrawMode::BG.apply(true, false), None);
    }

    #[test]
    fn complement_inverts_under_set_bits() {
        assert_eq!(DrawMode::COMPLEMENT.apply(true, false), Some(true));
        assert_eq!(DrawMode::COMPLEMENT.apply(true, true), Some(false));
        assert_eq!(DrawMode::COMPLEMENT.apply(false, true), None);
    }

    #[test]
    fn inverse_solid_fill_clears_to_background() {
        let mode = DrawMode::SOLID | DrawMode::INVERSEVID;
        assert_eq!(mode.apply(true, true), Some(false));
        assert_eq!(mode.apply(false, false), Some(true));
    }

    #[test]
    fn mono_bit_reads_paged_columns() {
        // Two columns, 10 rows: page 0 then page 1.
        let src = [0b0000_0001, 0b1000_0000, 0b0000_0010, 0b0000_0000];
        assert!(mono_bit(&src, 2, 0, 0));
        assert!(mono_bit(&src, 2, 1, 7));
        assert!(mono_bit(&src, 2, 0, 9));
        assert!(!mono_bit(&src, 2, 1, 9));
        assert!(!mono_bit(&src, 2, 5, 20));
    }
}
