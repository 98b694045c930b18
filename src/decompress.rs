//! Compressed block reassembly
//!
//! The payload after the header is split into blocks, each deflated
//! independently with zlib framing and prefixed by a small frame header:
//!
//! | Size | Field |
//! |------|-------|
//! | 2    | Compressed size of this block |
//! | 2    | Decompressed size (always 8192) |
//! | 4    | Checksum (not verified) |
//! | var  | Compressed data |
//!
//! Blocks are inflated in order and concatenated into one logical stream;
//! all structured decoding happens on that stream, never on the raw file.

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::{debug, trace};

use crate::buffer::ByteCursor;
use crate::error::{Error, Result};

/// Declared decompressed size of every block frame.
pub const BLOCK_DECOMPRESSED_SIZE: u16 = 8192;

/// Inflate `block_count` blocks from `cursor` and concatenate them into a
/// single logical stream, returned as a cursor positioned at offset 0.
pub fn reassemble_blocks(cursor: &mut ByteCursor, block_count: u32) -> Result<ByteCursor> {
    let mut stream = ByteCursor::empty();

    for index in 0..block_count {
        let compressed_size = cursor.read_u16()?;
        let decompressed_size = cursor.read_u16()?;
        if decompressed_size != BLOCK_DECOMPRESSED_SIZE {
            return Err(Error::Decompression(format!(
                "block {}: expected decompressed size {}, got {}",
                index, BLOCK_DECOMPRESSED_SIZE, decompressed_size
            )));
        }
        let _checksum = cursor.read_u32()?;

        let compressed = cursor.read_bytes(compressed_size as usize).map_err(|_| {
            Error::Decompression(format!(
                "block {}: declared compressed size {} overruns the input",
                index, compressed_size
            ))
        })?;

        let mut decoder = ZlibDecoder::new(compressed.as_slice());
        let mut block = Vec::with_capacity(BLOCK_DECOMPRESSED_SIZE as usize);
        decoder
            .read_to_end(&mut block)
            .map_err(|e| Error::Decompression(format!("block {}: {}", index, e)))?;
        trace!(index, inflated = block.len(), "inflated block");

        stream.write_bytes(&block)?;
    }

    debug!(
        blocks = block_count,
        bytes = stream.len(),
        "reassembled logical stream"
    );
    stream.set_position(0);
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn write_block(cursor: &mut ByteCursor, payload: &[u8], declared_size: u16) {
        let compressed = deflate(payload);
        cursor.write_u16(compressed.len() as u16).unwrap();
        cursor.write_u16(declared_size).unwrap();
        cursor.write_u32(0).unwrap();
        cursor.write_bytes(&compressed).unwrap();
    }

    #[test]
    fn test_single_block() {
        let mut cursor = ByteCursor::empty();
        write_block(&mut cursor, b"hello stream", BLOCK_DECOMPRESSED_SIZE);
        cursor.set_position(0);

        let stream = reassemble_blocks(&mut cursor, 1).unwrap();
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.as_slice(), b"hello stream");
    }

    #[test]
    fn test_blocks_concatenate_in_order() {
        let mut cursor = ByteCursor::empty();
        write_block(&mut cursor, b"first|", BLOCK_DECOMPRESSED_SIZE);
        write_block(&mut cursor, b"second|", BLOCK_DECOMPRESSED_SIZE);
        write_block(&mut cursor, b"third", BLOCK_DECOMPRESSED_SIZE);
        cursor.set_position(0);

        let stream = reassemble_blocks(&mut cursor, 3).unwrap();
        assert_eq!(stream.as_slice(), b"first|second|third");
    }

    #[test]
    fn test_rejects_unexpected_decompressed_size() {
        let mut cursor = ByteCursor::empty();
        write_block(&mut cursor, b"payload", 4096);
        cursor.set_position(0);

        assert!(matches!(
            reassemble_blocks(&mut cursor, 1),
            Err(Error::Decompression(_))
        ));
    }

    #[test]
    fn test_compressed_size_overrunning_input_is_decompression_error() {
        let mut cursor = ByteCursor::empty();
        cursor.write_u16(500).unwrap();
        cursor.write_u16(BLOCK_DECOMPRESSED_SIZE).unwrap();
        cursor.write_u32(0).unwrap();
        cursor.write_bytes(&[0x78, 0x9C]).unwrap();
        cursor.set_position(0);

        let err = reassemble_blocks(&mut cursor, 1).unwrap_err();
        assert!(matches!(err, Error::Decompression(_)));
    }

    #[test]
    fn test_malformed_deflate_stream() {
        let mut cursor = ByteCursor::empty();
        cursor.write_u16(4).unwrap();
        cursor.write_u16(BLOCK_DECOMPRESSED_SIZE).unwrap();
        cursor.write_u32(0).unwrap();
        cursor.write_bytes(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        cursor.set_position(0);

        assert!(matches!(
            reassemble_blocks(&mut cursor, 1),
            Err(Error::Decompression(_))
        ));
    }

    #[test]
    fn test_checksum_is_not_verified() {
        let mut cursor = ByteCursor::empty();
        let compressed = deflate(b"data");
        cursor.write_u16(compressed.len() as u16).unwrap();
        cursor.write_u16(BLOCK_DECOMPRESSED_SIZE).unwrap();
        cursor.write_u32(0xBADC0FFE).unwrap();
        cursor.write_bytes(&compressed).unwrap();
        cursor.set_position(0);

        assert!(reassemble_blocks(&mut cursor, 1).is_ok());
    }
}
