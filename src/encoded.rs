//! Masked game-settings string decoding
//!
//! The game-settings region of the logical stream is stored obfuscated so
//! that it contains no zero bytes. Every 8th byte of the region is a mask
//! byte: its bits record, for each of the following seven data bytes,
//! whether that byte is stored verbatim (bit set) or incremented by one
//! (bit clear). The region ends at the first zero byte read.
//!
//! The terminator check applies to every byte read, including bytes in a
//! mask position; a zero there ends the region too. That matches the
//! behavior observed in real containers, where the decoded region never
//! lands a zero on a mask slot.

use crate::buffer::ByteCursor;
use crate::error::Result;

/// Decode the obfuscated span starting at the cursor's current position.
///
/// Consumes the stream and returns a new one in which the span is replaced
/// by its decoded form followed by a single zero terminator. Bytes before
/// the span and after its terminator are carried over unchanged, and the
/// returned cursor is positioned at the start of the decoded span, so the
/// caller continues reading decoded content transparently.
pub fn decode_span(mut stream: ByteCursor) -> Result<ByteCursor> {
    let span_start = stream.position();

    let mut decoded = Vec::new();
    let mut mask = 0u8;
    let mut pos = 0usize;
    let mut byte = stream.read_u8()?;
    while byte != 0 {
        if pos % 8 == 0 {
            mask = byte;
        } else if mask & (1 << (pos % 8)) == 0 {
            decoded.push(byte - 1);
        } else {
            decoded.push(byte);
        }
        byte = stream.read_u8()?;
        pos += 1;
    }

    let resume = stream.position();
    let data = stream.into_inner();

    let mut out = ByteCursor::empty();
    out.write_bytes(&data[..span_start])?;
    out.write_bytes(&decoded)?;
    out.write_u8(0)?;
    out.write_bytes(&data[resume..])?;
    out.set_position(span_start);
    Ok(out)
}
