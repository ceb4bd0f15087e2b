use super::{FontId, FontProvider, Glyph, GlyphFormat};

const GLYPH_COLS: usize = 5;
const GLYPH_HEIGHT: i32 = 8;
const SPACE_ADVANCE: usize = 3;
const BLANK: [u8; GLYPH_COLS + 1] = [0; GLYPH_COLS + 1];
const REPLACEMENT: [u8; GLYPH_COLS + 1] = [0x00, 0x00, 0x5F, 0x00, 0x00, 0x00];

/// 5x7 glyphs, one byte per column, bit 0 on top. The sixth column is the
/// blank spacing column so trimmed slices carry their own gap.
static GLYPHS: &[(char, [u8; GLYPH_COLS + 1])] = &[
    ('A', [0x7E, 0x11, 0x11, 0x11, 0x7E, 0x00]),
    ('B', [0x7F, 0x49, 0x49, 0x49, 0x36, 0x00]),
    ('C', [0x3E, 0x41, 0x41, 0x41, 0x22, 0x00]),
    ('D', [0x7F, 0x41, 0x41, 0x22, 0x1C, 0x00]),
    ('E', [0x7F, 0x49, 0x49, 0x49, 0x41, 0x00]),
    ('F', [0x7F, 0x09, 0x09, 0x09, 0x01, 0x00]),
    ('G', [0x3E, 0x41, 0x49, 0x49, 0x7A, 0x00]),
    ('H', [0x7F, 0x08, 0x08, 0x08, 0x7F, 0x00]),
    ('I', [0x00, 0x41, 0x7F, 0x41, 0x00, 0x00]),
    ('J', [0x20, 0x40, 0x41, 0x3F, 0x01, 0x00]),
    ('K', [0x7F, 0x08, 0x14, 0x22, 0x41, 0x00]),
    ('L', [0x7F, 0x40, 0x40, 0x40, 0x40, 0x00]),
    ('M', [0x7F, 0x02, 0x0C, 0x02, 0x7F, 0x00]),
    ('N', [0x7F, 0x04, 0x08, 0x10, 0x7F, 0x00]),
    ('O', [0x3E, 0x41, 0x41, 0x41, 0x3E, 0x00]),
    ('P', [0x7F, 0x09, 0x09, 0x09, 0x06, 0x00]),
    ('Q', [0x3E, 0x41, 0x51, 0x21, 0x5E, 0x00]),
    ('R', [0x7F, 0x09, 0x19, 0x29, 0x46, 0x00]),
    ('S', [0x46, 0x49, 0x49, 0x49, 0x31, 0x00]),
    ('T', [0x01, 0x01, 0x7F, 0x01, 0x01, 0x00]),
    ('U', [0x3F, 0x40, 0x40, 0x40, 0x3F, 0x00]),
    ('V', [0x1F, 0x20, 0x40, 0x20, 0x1F, 0x00]),
    ('W', [0x7F, 0x20, 0x18, 0x20, 0x7F, 0x00]),
    ('X', [0x63, 0x14, 0x08, 0x14, 0x63, 0x00]),
    ('Y', [0x03, 0x04, 0x78, 0x04, 0x03, 0x00]),
    ('Z', [0x61, 0x51, 0x49, 0x45, 0x43, 0x00]),
    ('a', [0x20, 0x54, 0x54, 0x54, 0x78, 0x00]),
    ('b', [0x7F, 0x48, 0x44, 0x44, 0x38, 0x00]),
    ('c', [0x38, 0x44, 0x44, 0x44, 0x20, 0x00]),
    ('d', [0x38, 0x44, 0x44, 0x48, 0x7F, 0x00]),
    ('e', [0x38, 0x54, 0x54, 0x54, 0x18, 0x00]),
    ('f', [0x08, 0x7E, 0x09, 0x01, 0x02, 0x00]),
    ('g', [0x08, 0x14, 0x54, 0x54, 0x3C, 0x00]),
    ('h', [0x7F, 0x08, 0x04, 0x04, 0x78, 0x00]),
    ('i', [0x00, 0x44, 0x7D, 0x40, 0x00, 0x00]),
    ('j', [0x20, 0x40, 0x44, 0x3D, 0x00, 0x00]),
    ('k', [0x7F, 0x10, 0x28, 0x44, 0x00, 0x00]),
    ('l', [0x00, 0x41, 0x7F, 0x40, 0x00, 0x00]),
    ('m', [0x7C, 0x04, 0x18, 0x04, 0x78, 0x00]),
    ('n', [0x7C, 0x08, 0x04, 0x04, 0x78, 0x00]),
    ('o', [0x38, 0x44, 0x44, 0x44, 0x38, 0x00]),
    ('p', [0x7C, 0x14, 0x14, 0x14, 0x08, 0x00]),
    ('q', [0x08, 0x14, 0x14, 0x18, 0x7C, 0x00]),
    ('r', [0x7C, 0x08, 0x04, 0x04, 0x08, 0x00]),
    ('s', [0x48, 0x54, 0x54, 0x54, 0x20, 0x00]),
    ('t', [0x04, 0x3F, 0x44, 0x40, 0x20, 0x00]),
    ('u', [0x3C, 0x40, 0x40, 0x20, 0x7C, 0x00]),
    ('v', [0x1C, 0x20, 0x40, 0x20, 0x1C, 0x00]),
    ('w', [0x3C, 0x40, 0x30, 0x40, 0x3C, 0x00]),
    ('x', [0x44, 0x28, 0x10, 0x28, 0x44, 0x00]),
    ('y', [0x0C, 0x50, 0x50, 0x50, 0x3C, 0x00]),
    ('z', [0x44, 0x64, 0x54, 0x4C, 0x44, 0x00]),
    ('0', [0x3E, 0x51, 0x49, 0x45, 0x3E, 0x00]),
    ('1', [0x00, 0x42, 0x7F, 0x40, 0x00, 0x00]),
    ('2', [0x42, 0x61, 0x51, 0x49, 0x46, 0x00]),
    ('3', [0x21, 0x41, 0x45, 0x4B, 0x31, 0x00]),
    ('4', [0x18, 0x14, 0x12, 0x7F, 0x10, 0x00]),
    ('5', [0x27, 0x45, 0x45, 0x45, 0x39, 0x00]),
    ('6', [0x3C, 0x4A, 0x49, 0x49, 0x30, 0x00]),
    ('7', [0x01, 0x71, 0x09, 0x05, 0x03, 0x00]),
    ('8', [0x36, 0x49, 0x49, 0x49, 0x36, 0x00]),
    ('9', [0x06, 0x49, 0x49, 0x29, 0x1E, 0x00]),
    ('.', [0x00, 0x60, 0x60, 0x00, 0x00, 0x00]),
    (',', [0x00, 0x80, 0x60, 0x00, 0x00, 0x00]),
    (';', [0x00, 0x80, 0x66, 0x00, 0x00, 0x00]),
    ('/', [0x20, 0x10, 0x08, 0x04, 0x02, 0x00]),
    ('<', [0x08, 0x14, 0x22, 0x41, 0x00, 0x00]),
    ('>', [0x00, 0x41, 0x22, 0x14, 0x08, 0x00]),
    ('[', [0x00, 0x7F, 0x41, 0x41, 0x00, 0x00]),
    (']', [0x00, 0x41, 0x41, 0x7F, 0x00, 0x00]),
    ('-', [0x08, 0x08, 0x08, 0x08, 0x08, 0x00]),
    (':', [0x00, 0x36, 0x36, 0x00, 0x00, 0x00]),
    // Combining marks sit on rows 0-1, above lowercase x-height.
    ('\u{0300}', [0x00, 0x01, 0x02, 0x00, 0x00, 0x00]),
    ('\u{0301}', [0x00, 0x00, 0x02, 0x01, 0x00, 0x00]),
    ('\u{0302}', [0x00, 0x02, 0x01, 0x02, 0x00, 0x00]),
    ('\u{0308}', [0x00, 0x01, 0x00, 0x01, 0x00, 0x00]),
];

/// Proportional 5x7 bitmap font usable on 1bpp panels.
///
/// Every [`FontId`] maps to the same face.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelFont;

impl PixelFont {
    pub const fn new() -> Self {
        Self
    }

    fn columns(ch: char) -> &'static [u8] {
        if ch == ' ' {
            return &BLANK[..SPACE_ADVANCE];
        }

        let columns = lookup(ch)
            .or_else(|| lookup(normalize_glyph_char(ch)))
            .unwrap_or(&REPLACEMENT);

        let mut left = GLYPH_COLS;
        let mut right = 0usize;
        for (col, bits) in columns[..GLYPH_COLS].iter().enumerate() {
            if *bits != 0 {
                left = left.min(col);
                right = right.max(col);
            }
        }

        if left > right {
            return &BLANK[..2];
        }

        // Trimmed ink plus the trailing blank column.
        &columns[left..right + 2]
    }
}

impl FontProvider for PixelFont {
    fn width(&self, _font: FontId, ch: char) -> i32 {
        Self::columns(ch).len() as i32
    }

    fn height(&self, _font: FontId) -> i32 {
        GLYPH_HEIGHT
    }

    fn glyph(&self, _font: FontId, ch: char) -> Glyph<'_> {
        let bits = Self::columns(ch);
        Glyph {
            bits,
            width: bits.len() as i32,
            height: GLYPH_HEIGHT,
            format: GlyphFormat::Mono,
        }
    }

    fn cell_size(&self, _font: FontId) -> (i32, i32) {
        (GLYPH_COLS as i32 + 1, GLYPH_HEIGHT)
    }
}

fn lookup(ch: char) -> Option<&'static [u8; GLYPH_COLS + 1]> {
    GLYPHS
        .iter()
        .find(|(glyph_char, _)| *glyph_char == ch)
        .map(|(_, columns)| columns)
}

fn normalize_glyph_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        '’' | '‘' | '‚' | '‛' | 'ʼ' | 'ʻ' | '´' | '`' => '\'',
        '“' | '”' | '„' | '‟' => '"',
        '‐' | '‑' | '‒' | '–' | '—' | '―' => '-',
        '…' => '.',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_are_trimmed_with_one_spacing_column() {
        let font = PixelFont::new();
        // 'I' only inks columns 1..=3.
        let glyph = font.glyph(FontId::SYSTEM, 'I');
        assert_eq!(glyph.width, 4);
        assert_eq!(glyph.bits, &[0x41, 0x7F, 0x41, 0x00]);
        assert_eq!(font.width(FontId::SYSTEM, 'A'), 6);
    }

    #[test]
    fn space_has_fixed_advance() {
        assert_eq!(PixelFont.width(FontId::SYSTEM, ' '), 3);
    }

    #[test]
    fn accented_letters_fall_back_to_base_glyph() {
        let font = PixelFont::new();
        assert_eq!(
            font.glyph(FontId::SYSTEM, 'é').bits,
            font.glyph(FontId::SYSTEM, 'e').bits
        );
    }

    #[test]
    fn unknown_code_points_use_replacement() {
        let font = PixelFont::new();
        assert_eq!(font.glyph(FontId::SYSTEM, '\u{2603}').bits, &[0x5F, 0x00]);
    }

    #[test]
    fn combining_marks_have_narrow_glyphs() {
        let font = PixelFont::new();
        assert_eq!(font.width(FontId::SYSTEM, '\u{0301}'), 3);
    }
}
