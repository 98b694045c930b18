//! Top-level replay decoding
//!
//! [`Replay::parse`] drives the whole pipeline over one in-memory
//! container: header, block reassembly, then the metadata records of the
//! logical stream in their fixed order. Decoding is fail-fast; the first
//! error anywhere aborts the decode and is returned unchanged, never a
//! partial document.

use serde::Serialize;
use tracing::debug;

use crate::buffer::ByteCursor;
use crate::decompress::reassemble_blocks;
use crate::encoded::decode_span;
use crate::error::{Error, Result};
use crate::header::ReplayHeader;
use crate::player::{ParseState, PlayerRecord};
use crate::settings::GameSettings;
use crate::slots::GameStartRecord;

/// Marker opening the logical stream's metadata section.
pub const GAME_RECORD_MAGIC: u32 = 0x0000_0110;

/// Record tag introducing an additional player record.
pub const ADDITIONAL_PLAYER_RECORD: u8 = 0x16;

/// Record tag introducing the game-start record.
pub const GAME_START_RECORD: u8 = 0x19;

/// A fully decoded replay container.
///
/// Built once per decode and owned by the caller; decoding never shares
/// state between invocations, so independent replays can be decoded in
/// parallel without coordination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    pub header: ReplayHeader,
    pub game_name: String,
    /// Host record first, then additional players in stream order.
    pub players: Vec<PlayerRecord>,
    pub settings: GameSettings,
    pub start_record: GameStartRecord,
}

impl Replay {
    /// Decode a replay from the raw bytes of a whole container.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut container = ByteCursor::fixed(data.to_vec());

        let header = ReplayHeader::parse(&mut container)?;
        debug!(
            version = header.header_version,
            blocks = header.block_count,
            "parsed container header"
        );

        let mut stream = reassemble_blocks(&mut container, header.block_count)?;

        let marker = stream.read_u32()?;
        if marker != GAME_RECORD_MAGIC {
            return Err(Error::UnexpectedMarker {
                expected: GAME_RECORD_MAGIC,
                got: marker,
            });
        }

        let mut state = ParseState::default();
        let mut players = vec![PlayerRecord::parse(&mut stream, &mut state)?];

        let game_name = stream.read_cstring()?;

        // A non-zero byte here already belongs to the obfuscated span;
        // only a zero byte is padding.
        if stream.read_u8()? != 0 {
            let position = stream.position();
            stream.set_position(position - 1);
        }

        let mut stream = decode_span(stream)?;
        let settings = GameSettings::parse(&mut stream)?;

        let mut tag = stream.read_u8()?;
        while tag == ADDITIONAL_PLAYER_RECORD {
            players.push(PlayerRecord::parse(&mut stream, &mut state)?);
            stream.read_u32()?;
            tag = stream.read_u8()?;
        }
        if tag != GAME_START_RECORD {
            return Err(Error::UnexpectedMarker {
                expected: GAME_START_RECORD.into(),
                got: tag.into(),
            });
        }
        // Declared byte count of the game-start record; not needed to
        // decode it.
        stream.read_u16()?;

        let start_record = GameStartRecord::parse(&mut stream)?;
        debug!(
            players = players.len(),
            slots = start_record.slots.len(),
            "decoded replay"
        );

        Ok(Replay {
            header,
            game_name,
            players,
            settings,
            start_record,
        })
    }
}
