//! Fixed-metric font and a Hebrew-aware classifier for layout tests.

use core::cell::Cell;

use crate::{
    bidi::{CharClass, Classifier, VisualBuffer},
    display::mock::MockDisplay,
    font::{FontId, FontProvider, Glyph, GlyphFormat},
    lcd::Lcd,
};

pub(crate) const CELL: i32 = 8;
pub(crate) const MARK_WIDTH: i32 = 2;

static INK: [u8; CELL as usize] = [0xFF; CELL as usize];

fn is_mark(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036F}' | '\u{0591}'..='\u{05C7}')
}

fn is_hebrew(ch: char) -> bool {
    matches!(ch, '\u{0590}'..='\u{05FF}')
}

/// Every glyph is a solid block: 8 px wide, marks 2 px. Counts lock depth.
#[derive(Default)]
pub(crate) struct BlockFont {
    pub(crate) locks: Cell<i32>,
    pub(crate) max_locks: Cell<i32>,
}

impl FontProvider for BlockFont {
    fn lock(&self, _font: FontId, locked: bool) {
        let depth = self.locks.get() + if locked { 1 } else { -1 };
        self.locks.set(depth);
        self.max_locks.set(self.max_locks.get().max(depth));
    }

    fn width(&self, _font: FontId, ch: char) -> i32 {
        if is_mark(ch) { MARK_WIDTH } else { CELL }
    }

    fn height(&self, _font: FontId) -> i32 {
        CELL
    }

    fn glyph(&self, font: FontId, ch: char) -> Glyph<'_> {
        let width = self.width(font, ch);
        Glyph {
            bits: &INK[..width as usize],
            width,
            height: CELL,
            format: GlyphFormat::Mono,
        }
    }

    fn cell_size(&self, _font: FontId) -> (i32, i32) {
        (CELL, CELL)
    }
}

/// Reverses each run of Hebrew code points, marks included.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct HebrewClassifier;

impl Classifier for HebrewClassifier {
    fn reorder_to_visual(&self, text: &str, out: &mut VisualBuffer) {
        out.clear();
        let mut run = VisualBuffer::new();
        for ch in text.chars() {
            if is_hebrew(ch) {
                let _ = run.push(ch);
                continue;
            }
            flush_reversed(&mut run, out);
            let _ = out.push(ch);
        }
        flush_reversed(&mut run, out);
    }

    fn classify(&self, ch: char) -> CharClass {
        CharClass {
            diacritic: is_mark(ch),
            rtl: is_hebrew(ch),
        }
    }
}

fn flush_reversed(run: &mut VisualBuffer, out: &mut VisualBuffer) {
    // Marks end up before their base, as UAX #9 leaves them.
    for &ch in run.iter().rev() {
        let _ = out.push(ch);
    }
    run.clear();
}

pub(crate) type BlockLcd<const W: usize, const H: usize> =
    Lcd<MockDisplay<W, H>, BlockFont, HebrewClassifier>;

pub(crate) fn block_lcd<const W: usize, const H: usize>() -> BlockLcd<W, H> {
    Lcd::new(MockDisplay::new(), BlockFont::default(), HebrewClassifier)
}
