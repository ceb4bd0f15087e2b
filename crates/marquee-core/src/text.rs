//! Text layout: alignment, bidi order, diacritic compositing and pixel skip.

use core::fmt::{self, Write};

use heapless::String;

use crate::{
    bidi::{Classifier, VisualBuffer},
    config::FORMAT_BUFFER_BYTES,
    display::{Display, DrawMode},
    font::{FontId, FontLock, FontProvider, GlyphFormat},
    lcd::Lcd,
    viewport::Alignment,
};

/// Cursor state for one layout pass.
#[derive(Clone, Copy, Debug, Default)]
struct Cursor {
    x: i32,
    /// Columns still to be skipped before the first visible pixel.
    skip: i32,
    /// LTR runs: width of the last base glyph, diacritics center on it.
    last_base_width: i32,
    /// RTL runs: width of the upcoming base glyph, cached until that glyph.
    rtl_next_base_width: i32,
}

impl<D, F, C> Lcd<D, F, C>
where
    D: Display,
    F: FontProvider,
    C: Classifier,
{
    /// Draws `text` at pixel `(x, y)` of the active viewport, skipping the
    /// first `ofs` pixel columns of the rendered line.
    pub fn putsxyofs(&mut self, x: i32, y: i32, ofs: i32, text: &str) {
        let vp = self.vp();
        let fonts = FontLock::new(&self.fonts, vp.font);
        if text.is_empty() {
            return;
        }
        let font = fonts.font();

        let mut x = x;
        let mut ofs = ofs;

        // Alignment only applies to text that fits; overflowing text is laid
        // out from the left so scroll offsets move it the same way.
        if vp.alignment != Alignment::Left {
            let width = text_width(&*fonts, &self.classifier, font, text);
            match vp.alignment {
                Alignment::Center if width + x <= vp.width => {
                    x = ((vp.width - width) / 2 + x).max(0);
                }
                Alignment::Right if width + x <= vp.width => {
                    x = vp.width - width - x + ofs;
                    ofs = 0;
                }
                _ => {}
            }
        }

        let mut visual = VisualBuffer::new();
        self.classifier.reorder_to_visual(text, &mut visual);

        let mut cursor = Cursor {
            x,
            skip: ofs,
            ..Cursor::default()
        };

        for (index, &ch) in visual.iter().enumerate() {
            if cursor.x >= vp.width {
                break;
            }

            let class = self.classifier.classify(ch);
            let width = fonts.width(font, ch);

            let base_width = if class.rtl {
                if class.diacritic {
                    if cursor.rtl_next_base_width == 0 {
                        cursor.rtl_next_base_width = visual[index + 1..]
                            .iter()
                            .find(|next| !self.classifier.is_diacritic(**next))
                            .map_or(0, |next| fonts.width(font, *next));
                    }
                    cursor.rtl_next_base_width
                } else {
                    cursor.rtl_next_base_width = 0;
                    width
                }
            } else {
                if !class.diacritic {
                    cursor.last_base_width = width;
                }
                cursor.last_base_width
            };

            if cursor.skip > width {
                cursor.skip -= width;
                continue;
            }

            let glyph = fonts.glyph(font, ch);
            let base_ofs = if class.diacritic {
                (base_width - width) / 2
            } else {
                0
            };

            // Diacritics are OR-ed onto the base glyph.
            let restore = class.diacritic.then(|| {
                let mode = self.display.draw_mode();
                self.display.set_draw_mode(DrawMode::FG);
                mode
            });

            if let Some(clip) = self.clip(cursor.x + base_ofs, y, width - cursor.skip, glyph.height)
            {
                let src_x = cursor.skip + clip.skip_x;
                match glyph.format {
                    GlyphFormat::Mono => self.display.mono_bitmap_part(
                        glyph.bits,
                        src_x,
                        clip.skip_y,
                        glyph.width,
                        clip.x,
                        clip.y,
                        clip.width,
                        clip.height,
                    ),
                    GlyphFormat::Alpha => self.display.alpha_bitmap_part(
                        glyph.bits,
                        src_x,
                        clip.skip_y,
                        glyph.width,
                        clip.x,
                        clip.y,
                        clip.width,
                        clip.height,
                    ),
                }
            }

            if let Some(mode) = restore {
                self.display.set_draw_mode(mode);
            }

            if let Some(&next) = visual.get(index + 1) {
                let next_class = self.classifier.classify(next);
                // LTR: advance unless an LTR diacritic follows.
                // RTL: advance past every base glyph.
                if (class.rtl && !class.diacritic)
                    || (!class.rtl && (!next_class.diacritic || next_class.rtl))
                {
                    cursor.x += base_width - cursor.skip;
                    cursor.skip = 0;
                }
            }
        }
    }

    pub fn putsxy(&mut self, x: i32, y: i32, text: &str) {
        self.putsxyofs(x, y, 0, text);
    }

    /// Formatted [`Self::putsxy`]; output past 256 bytes is dropped.
    pub fn putsxyf(&mut self, x: i32, y: i32, args: fmt::Arguments<'_>) {
        let text = format_truncated::<FORMAT_BUFFER_BYTES>(args);
        self.putsxy(x, y, &text);
    }

    /// Draws `text` at character cell `(col, row)` of the active font.
    pub fn puts(&mut self, col: i32, row: i32, text: &str) {
        let (cell_w, cell_h) = self.cell_size();
        self.putsxyofs(col * cell_w, row * cell_h, 0, text);
    }

    /// Formatted [`Self::puts`].
    pub fn putsf(&mut self, col: i32, row: i32, args: fmt::Arguments<'_>) {
        let text = format_truncated::<FORMAT_BUFFER_BYTES>(args);
        self.puts(col, row, &text);
    }

    /// Rendered `(width, height)` of `text` in the active font. Diacritics
    /// add no width.
    pub fn string_size(&self, text: &str) -> (i32, i32) {
        let font = self.vp().font;
        let fonts = FontLock::new(&self.fonts, font);
        (
            text_width(&*fonts, &self.classifier, font, text),
            fonts.height(font),
        )
    }

    /// Average character cell of the active font.
    pub fn cell_size(&self) -> (i32, i32) {
        self.fonts.cell_size(self.vp().font)
    }
}

fn text_width<F, C>(fonts: &F, classifier: &C, font: FontId, text: &str) -> i32
where
    F: FontProvider + ?Sized,
    C: Classifier,
{
    text.chars()
        .filter(|ch| !classifier.is_diacritic(*ch))
        .map(|ch| fonts.width(font, ch))
        .sum()
}

/// `fmt::Write` sink that stops at the first character that does not fit.
struct TruncatingWriter<'a, const N: usize> {
    out: &'a mut String<N>,
    full: bool,
}

impl<const N: usize> Write for TruncatingWriter<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }

        for ch in s.chars() {
            if self.out.push(ch).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

/// Formats into a bounded buffer, truncating at a character boundary.
pub fn format_truncated<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut out = String::new();
    let mut writer = TruncatingWriter {
        out: &mut out,
        full: false,
    };
    let _ = writer.write_fmt(args);
    out
}
