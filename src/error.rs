//! Error types for unw3g

use thiserror::Error;

/// Main error type for replay decoding operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid replay magic: expected \"Warcraft III recorded game\", got {0:?}")]
    MagicMismatch(String),

    #[error("unsupported header version {0}")]
    UnsupportedHeaderVersion(u32),

    #[error("unexpected value 0x{value:02X} for {field}")]
    UnexpectedEnumValue { field: &'static str, value: u32 },

    #[error("expected marker 0x{expected:02X}, got 0x{got:02X}")]
    UnexpectedMarker { expected: u32, got: u32 },

    #[error("read of {wanted} bytes at offset {offset} overruns buffer of {length} bytes")]
    BufferUnderrun {
        offset: usize,
        wanted: usize,
        length: usize,
    },

    #[error("decompression failed: {0}")]
    Decompression(String),

    #[error("malformed string data: {0}")]
    InvalidString(String),
}

/// Result type alias for replay decoding operations
pub type Result<T> = std::result::Result<T, Error>;
