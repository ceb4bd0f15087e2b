//! Writing-direction and diacritic classification.

use heapless::Vec;

use crate::config::VISUAL_BUFFER_CHARS;

/// Code points of one line in left-to-right draw order.
pub type VisualBuffer = Vec<char, VISUAL_BUFFER_CHARS>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CharClass {
    /// Combining mark drawn over a base glyph without its own advance.
    pub diacritic: bool,
    /// Belongs to a right-to-left script.
    pub rtl: bool,
}

/// Bidi reordering and diacritic tables.
pub trait Classifier {
    /// Writes `text` into `out` in visual order. Code points beyond the
    /// buffer capacity are dropped.
    fn reorder_to_visual(&self, text: &str, out: &mut VisualBuffer);

    fn classify(&self, ch: char) -> CharClass;

    fn is_diacritic(&self, ch: char) -> bool {
        self.classify(ch).diacritic
    }
}

/// Left-to-right only classifier: logical order is visual order and the
/// Combining Diacritical Marks block is treated as diacritics.
#[derive(Clone, Copy, Debug, Default)]
pub struct LtrClassifier;

impl Classifier for LtrClassifier {
    fn reorder_to_visual(&self, text: &str, out: &mut VisualBuffer) {
        out.clear();
        for ch in text.chars() {
            if out.push(ch).is_err() {
                break;
            }
        }
    }

    fn classify(&self, ch: char) -> CharClass {
        CharClass {
            diacritic: matches!(ch, '\u{0300}'..='\u{036F}'),
            rtl: false,
        }
    }
}

#[cfg(feature = "unicode-bidi")]
pub use self::unicode::UnicodeClassifier;

#[cfg(feature = "unicode-bidi")]
mod unicode {
    use unicode_bidi::{BidiClass, BidiInfo, bidi_class};

    use super::{CharClass, Classifier, VisualBuffer};

    /// UAX #9 classifier backed by `unicode-bidi` data tables.
    ///
    /// Non-spacing marks are diacritics; `R` and `AL` classes are RTL.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct UnicodeClassifier;

    impl Classifier for UnicodeClassifier {
        fn reorder_to_visual(&self, text: &str, out: &mut VisualBuffer) {
            out.clear();
            let info = BidiInfo::new(text, None);

            for para in &info.paragraphs {
                let line = info.reorder_line(para, para.range.clone());
                for ch in line.chars() {
                    // Paragraph separators are not drawable.
                    if ch == '\n' || ch == '\r' {
                        continue;
                    }
                    if out.push(ch).is_err() {
                        return;
                    }
                }
            }
        }

        fn classify(&self, ch: char) -> CharClass {
            let class = bidi_class(ch);
            CharClass {
                diacritic: class == BidiClass::NSM,
                rtl: matches!(class, BidiClass::R | BidiClass::AL),
            }
        }
    }

}
