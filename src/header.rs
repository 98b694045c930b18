//! Replay container header parsing
//!
//! Every `.w3g` file starts with a fixed outer header followed by one of two
//! sub-header layouts selected by the header version field:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00   | var  | Magic string, null-terminated, starts with `"Warcraft III recorded game"` |
//! | var    | 4    | Offset of the first compressed block (0x40 or 0x44) |
//! | var    | 4    | Total compressed size |
//! | var    | 4    | Header version (0 or 1) |
//! | var    | 4    | Total decompressed size |
//! | var    | 4    | Number of compressed blocks |
//! | var    | 16/20| Sub-header (layout depends on header version) |
//!
//! Version 1 sub-headers carry a 4-character product identifier: `"3RAW"`
//! for classic Reign of Chaos replays, `"PX3W"` for The Frozen Throne.

use serde::Serialize;

use crate::buffer::ByteCursor;
use crate::error::{Error, Result};

/// Every replay container starts with this string.
pub const REPLAY_MAGIC: &str = "Warcraft III recorded game";

/// The two known offsets of the first compressed block.
pub const HEADER_OFFSETS: [u32; 2] = [0x40, 0x44];

/// Sentinel for a single-player recording in the sub-header flag field.
const SINGLE_PLAYER_FLAG: u16 = 0x0000;
/// Sentinel for a multiplayer recording in the sub-header flag field.
const MULTI_PLAYER_FLAG: u16 = 0x8000;

/// The fixed outer header of a replay container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayHeader {
    /// Full magic string as stored on disk, including any suffix bytes.
    pub magic: String,
    /// Offset of the first compressed block (0x40 or 0x44).
    pub header_offset: u32,
    /// Total size of the compressed data in bytes.
    pub compressed_size: u32,
    /// Header version; selects the sub-header layout.
    pub header_version: u32,
    /// Total size of the decompressed data in bytes.
    pub decompressed_size: u32,
    /// Number of independently compressed blocks that follow the header.
    pub block_count: u32,
    /// Version-dependent sub-header.
    pub sub_header: SubHeader,
}

/// The version-selected sub-header variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SubHeader {
    /// Header version 0, used by patches before 1.07.
    V0 {
        unknown: u16,
        version_number: u16,
        build_number: u16,
        single_player: bool,
        /// Replay length in milliseconds.
        replay_length: u32,
        crc32: u32,
    },
    /// Header version 1, used by patch 1.07 and later.
    V1 {
        /// True for `"3RAW"` (Reign of Chaos), false for `"PX3W"`
        /// (The Frozen Throne).
        classic: bool,
        version_number: u32,
        build_number: u16,
        single_player: bool,
        /// Replay length in milliseconds.
        replay_length: u32,
        crc32: u32,
    },
}

impl ReplayHeader {
    /// Parse the outer header and its sub-header from a cursor positioned
    /// at offset 0.
    ///
    /// On success the cursor is left immediately after the sub-header,
    /// where the first compressed block begins.
    pub fn parse(cursor: &mut ByteCursor) -> Result<Self> {
        let magic = cursor.read_cstring()?;
        if !magic.starts_with(REPLAY_MAGIC) {
            return Err(Error::MagicMismatch(magic));
        }

        let header_offset = cursor.read_u32()?;
        if !HEADER_OFFSETS.contains(&header_offset) {
            return Err(Error::UnexpectedEnumValue {
                field: "header offset",
                value: header_offset,
            });
        }

        let compressed_size = cursor.read_u32()?;

        let header_version = cursor.read_u32()?;
        if header_version != 0 && header_version != 1 {
            return Err(Error::UnsupportedHeaderVersion(header_version));
        }

        let decompressed_size = cursor.read_u32()?;
        let block_count = cursor.read_u32()?;

        let sub_header = SubHeader::parse(cursor, header_version)?;

        Ok(ReplayHeader {
            magic,
            header_offset,
            compressed_size,
            header_version,
            decompressed_size,
            block_count,
            sub_header,
        })
    }
}

impl SubHeader {
    fn parse(cursor: &mut ByteCursor, header_version: u32) -> Result<Self> {
        if header_version == 0 {
            let unknown = cursor.read_u16()?;
            let version_number = cursor.read_u16()?;
            let build_number = cursor.read_u16()?;
            let single_player = read_single_player_flag(cursor)?;
            let replay_length = cursor.read_u32()?;
            let crc32 = cursor.read_u32()?;
            Ok(SubHeader::V0 {
                unknown,
                version_number,
                build_number,
                single_player,
                replay_length,
                crc32,
            })
        } else {
            let identifier = cursor.read_bytes(4)?;
            let classic = if identifier == b"3RAW" {
                true
            } else if identifier == b"PX3W" {
                false
            } else {
                return Err(Error::UnexpectedEnumValue {
                    field: "sub-header version identifier",
                    value: u32::from_le_bytes([
                        identifier[0],
                        identifier[1],
                        identifier[2],
                        identifier[3],
                    ]),
                });
            };
            let version_number = cursor.read_u32()?;
            let build_number = cursor.read_u16()?;
            let single_player = read_single_player_flag(cursor)?;
            let replay_length = cursor.read_u32()?;
            let crc32 = cursor.read_u32()?;
            Ok(SubHeader::V1 {
                classic,
                version_number,
                build_number,
                single_player,
                replay_length,
                crc32,
            })
        }
    }
}

fn read_single_player_flag(cursor: &mut ByteCursor) -> Result<bool> {
    match cursor.read_u16()? {
        SINGLE_PLAYER_FLAG => Ok(true),
        MULTI_PLAYER_FLAG => Ok(false),
        value => Err(Error::UnexpectedEnumValue {
            field: "single player flag",
            value: value.into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_outer_header(cursor: &mut ByteCursor, header_version: u32) {
        cursor.write_cstring("Warcraft III recorded game\u{1A}").unwrap();
        cursor.write_u32(0x44).unwrap();
        cursor.write_u32(2048).unwrap();
        cursor.write_u32(header_version).unwrap();
        cursor.write_u32(8192).unwrap();
        cursor.write_u32(1).unwrap();
    }

    #[test]
    fn test_parse_version_1_header() {
        let mut cursor = ByteCursor::empty();
        write_outer_header(&mut cursor, 1);
        cursor.write_bytes(b"PX3W").unwrap();
        cursor.write_u32(10030).unwrap();
        cursor.write_u16(6061).unwrap();
        cursor.write_u16(0x8000).unwrap();
        cursor.write_u32(653_000).unwrap();
        cursor.write_u32(0xCAFEF00D).unwrap();
        cursor.set_position(0);

        let header = ReplayHeader::parse(&mut cursor).unwrap();
        assert_eq!(header.magic, "Warcraft III recorded game\u{1A}");
        assert_eq!(header.header_offset, 0x44);
        assert_eq!(header.compressed_size, 2048);
        assert_eq!(header.header_version, 1);
        assert_eq!(header.decompressed_size, 8192);
        assert_eq!(header.block_count, 1);
        assert_eq!(
            header.sub_header,
            SubHeader::V1 {
                classic: false,
                version_number: 10030,
                build_number: 6061,
                single_player: false,
                replay_length: 653_000,
                crc32: 0xCAFEF00D,
            }
        );
    }

    #[test]
    fn test_parse_version_0_header() {
        let mut cursor = ByteCursor::empty();
        write_outer_header(&mut cursor, 0);
        cursor.write_u16(0).unwrap();
        cursor.write_u16(104).unwrap();
        cursor.write_u16(4531).unwrap();
        cursor.write_u16(0x0000).unwrap();
        cursor.write_u32(120_000).unwrap();
        cursor.write_u32(0x12345678).unwrap();
        cursor.set_position(0);

        let header = ReplayHeader::parse(&mut cursor).unwrap();
        assert_eq!(
            header.sub_header,
            SubHeader::V0 {
                unknown: 0,
                version_number: 104,
                build_number: 4531,
                single_player: true,
                replay_length: 120_000,
                crc32: 0x12345678,
            }
        );
    }

    #[test]
    fn test_classic_identifier() {
        let mut cursor = ByteCursor::empty();
        write_outer_header(&mut cursor, 1);
        cursor.write_bytes(b"3RAW").unwrap();
        cursor.write_u32(26).unwrap();
        cursor.write_u16(6059).unwrap();
        cursor.write_u16(0x8000).unwrap();
        cursor.write_u32(1).unwrap();
        cursor.write_u32(2).unwrap();
        cursor.set_position(0);

        let header = ReplayHeader::parse(&mut cursor).unwrap();
        assert!(matches!(header.sub_header, SubHeader::V1 { classic: true, .. }));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut cursor = ByteCursor::empty();
        cursor.write_cstring("Starcraft recorded game").unwrap();
        cursor.set_position(0);
        assert!(matches!(
            ReplayHeader::parse(&mut cursor),
            Err(Error::MagicMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_header_version() {
        let mut cursor = ByteCursor::empty();
        write_outer_header(&mut cursor, 2);
        cursor.set_position(0);
        assert!(matches!(
            ReplayHeader::parse(&mut cursor),
            Err(Error::UnsupportedHeaderVersion(2))
        ));
    }

    #[test]
    fn test_rejects_unknown_header_offset() {
        let mut cursor = ByteCursor::empty();
        cursor.write_cstring(REPLAY_MAGIC).unwrap();
        cursor.write_u32(0x48).unwrap();
        cursor.set_position(0);
        assert!(matches!(
            ReplayHeader::parse(&mut cursor),
            Err(Error::UnexpectedEnumValue {
                field: "header offset",
                value: 0x48,
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_version_identifier() {
        let mut cursor = ByteCursor::empty();
        write_outer_header(&mut cursor, 1);
        cursor.write_bytes(b"WXYZ").unwrap();
        cursor.set_position(0);
        assert!(matches!(
            ReplayHeader::parse(&mut cursor),
            Err(Error::UnexpectedEnumValue {
                field: "sub-header version identifier",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_single_player_flag() {
        let mut cursor = ByteCursor::empty();
        write_outer_header(&mut cursor, 1);
        cursor.write_bytes(b"3RAW").unwrap();
        cursor.write_u32(26).unwrap();
        cursor.write_u16(6059).unwrap();
        cursor.write_u16(0x1234).unwrap();
        cursor.set_position(0);
        assert!(matches!(
            ReplayHeader::parse(&mut cursor),
            Err(Error::UnexpectedEnumValue {
                field: "single player flag",
                value: 0x1234,
            })
        ));
    }

    #[test]
    fn test_truncated_header_is_underrun() {
        let mut cursor = ByteCursor::empty();
        cursor.write_cstring(REPLAY_MAGIC).unwrap();
        cursor.write_u32(0x44).unwrap();
        cursor.set_position(0);
        assert!(matches!(
            ReplayHeader::parse(&mut cursor),
            Err(Error::BufferUnderrun { .. })
        ));
    }
}
