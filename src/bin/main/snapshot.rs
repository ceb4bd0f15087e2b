use heapless::String;
use ls027b7dh01::FrameBuffer;

const MAX_COLUMNS: usize = 160;

/// ASCII rows of a framebuffer region, `#` for set pixels. Columns past
/// 160 are cut.
pub fn rows(
    frame: &FrameBuffer,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = String<MAX_COLUMNS>> + '_ {
    (y..y + height).map(move |row| {
        let mut line = String::new();
        for col in x..x + width.min(MAX_COLUMNS) {
            let ch = if frame.pixel(col, row) == Some(true) {
                '#'
            } else {
                '.'
            };
            let _ = line.push(ch);
        }
        line
    })
}
