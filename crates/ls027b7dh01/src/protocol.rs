//! Wire-level protocol helpers for LS027B7DH01.

/// Panel width in pixels.
pub const WIDTH: usize = 400;
/// Panel height in pixels.
pub const HEIGHT: usize = 240;
/// Number of bytes in one display line.
pub const LINE_BYTES: usize = WIDTH / 8;
/// Total framebuffer size in bytes.
pub const BUFFER_SIZE: usize = LINE_BYTES * HEIGHT;

/// Packet size for a one-line write command.
///
/// Layout:
/// - 1 byte mode + dummy
/// - 1 byte gate address
/// - 50 bytes pixel payload
/// - 2 bytes transfer dummy
pub const WRITE_LINE_PACKET_SIZE: usize = 1 + 1 + LINE_BYTES + 2;

/// Bytes one line occupies in a multi-line write: address, payload and the
/// trailing dummy byte.
pub const LINE_FRAME_SIZE: usize = 1 + LINE_BYTES + 1;

/// Lines sent per SPI transaction by multi-line writes.
pub const MAX_BATCH_LINES: usize = 8;

/// Packet size for a full multi-line batch.
pub const MULTI_LINE_PACKET_SIZE: usize = 1 + MAX_BATCH_LINES * LINE_FRAME_SIZE + 1;

/// Packet size for all-clear.
///
/// Layout:
/// - 1 byte mode + dummy
/// - >=13 dummy bits (sent as 2 bytes)
pub const CLEAR_PACKET_SIZE: usize = 3;

#[inline]
const fn mode_byte(m0: bool, m1: bool, m2: bool) -> u8 {
    ((m0 as u8) << 7) | ((m1 as u8) << 6) | ((m2 as u8) << 5)
}

/// Builds a wire address byte (`AG0..AG7`) for line 1..=240.
///
/// Returns `None` for invalid line numbers.
#[inline]
pub fn encode_line_address(line: u16) -> Option<u8> {
    if !(1..=HEIGHT as u16).contains(&line) {
        return None;
    }

    Some((line as u8).reverse_bits())
}

/// Builds the all-clear command packet.
#[inline]
pub fn build_clear_packet(m1_high: bool) -> [u8; CLEAR_PACKET_SIZE] {
    [mode_byte(false, m1_high, true), 0x00, 0x00]
}

/// Builds a one-line update command packet.
///
/// Returns `None` when `line` is out of range.
#[inline]
pub fn build_write_line_packet(
    line: u16,
    line_data: &[u8; LINE_BYTES],
    m1_high: bool,
) -> Option<[u8; WRITE_LINE_PACKET_SIZE]> {
    let address = encode_line_address(line)?;

    let mut packet = [0u8; WRITE_LINE_PACKET_SIZE];
    packet[0] = mode_byte(true, m1_high, false);
    packet[1] = address;
    packet[2..2 + LINE_BYTES].copy_from_slice(line_data);

    Some(packet)
}

/// Encodes a multi-line update into `out`: the mode byte, one frame per
/// line, then the closing dummy byte. Returns the packet length.
///
/// Returns `None` for an invalid line or when `out` is too short.
pub fn encode_multi_line<'a, I>(lines: I, m1_high: bool, out: &mut [u8]) -> Option<usize>
where
    I: IntoIterator<Item = (u16, &'a [u8; LINE_BYTES])>,
{
    *out.first_mut()? = mode_byte(true, m1_high, false);
    let mut len = 1;

    for (line, data) in lines {
        let frame = out.get_mut(len..len + LINE_FRAME_SIZE)?;
        frame[0] = encode_line_address(line)?;
        frame[1..1 + LINE_BYTES].copy_from_slice(data);
        frame[LINE_FRAME_SIZE - 1] = 0x00;
        len += LINE_FRAME_SIZE;
    }

    *out.get_mut(len)? = 0x00;
    Some(len + 1)
}
