//! Player record parsing
//!
//! The logical stream carries one host player record right after the fixed
//! game marker, then zero or more additional player records between the
//! settings span and the game-start record. Additional records are
//! introduced by a 0x16 marker byte, which the orchestrator consumes before
//! handing the stream to [`PlayerRecord::parse`].

use serde::Serialize;

use crate::buffer::ByteCursor;
use crate::error::{Error, Result};

/// Player race as stored in player records.
///
/// `Daemon` (0x10) appears only here; the slot table's race field uses the
/// same codes without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Race {
    Human,
    Orc,
    NightElf,
    Undead,
    Daemon,
    Random,
    SelectableOrFixed,
}

/// Identity record for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    /// True for the record of the player who saved the replay.
    pub host: bool,
    /// Slot index the player occupies.
    pub slot: u8,
    /// Display name.
    pub name: String,
    /// Present only when the record carries the extended data block.
    pub race: Option<Race>,
}

/// Parse state threaded through one decode pass.
///
/// Tracks whether the host record has been consumed, so a record parsed
/// later in the stream is never mistaken for the host again. Scoped to a
/// single decode; concurrent decodes do not share it.
#[derive(Debug, Default)]
pub struct ParseState {
    host_read: bool,
}

impl PlayerRecord {
    /// Parse one player record.
    ///
    /// The very first record of a decode begins with a tag byte that must
    /// be 0x00 and marks the host. For additional records the introducing
    /// 0x16 marker has already been consumed by the caller and no tag byte
    /// is read here.
    pub fn parse(cursor: &mut ByteCursor, state: &mut ParseState) -> Result<Self> {
        let host = if !state.host_read {
            let tag = cursor.read_u8()?;
            if tag != 0x00 {
                return Err(Error::UnexpectedMarker {
                    expected: 0x00,
                    got: tag.into(),
                });
            }
            state.host_read = true;
            true
        } else {
            false
        };

        let slot = cursor.read_u8()?;
        let name = cursor.read_cstring()?;

        let race = match cursor.read_u8()? {
            0x01 => {
                // Short record form; one reserved byte instead of race data.
                cursor.read_u8()?;
                None
            }
            0x08 => Some(parse_race(cursor.read_u8()?)?),
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "player record size",
                    value: value.into(),
                });
            }
        };

        Ok(PlayerRecord {
            host,
            slot,
            name,
            race,
        })
    }
}

fn parse_race(value: u8) -> Result<Race> {
    match value {
        0x01 => Ok(Race::Human),
        0x02 => Ok(Race::Orc),
        0x04 => Ok(Race::NightElf),
        0x08 => Ok(Race::Undead),
        0x10 => Ok(Race::Daemon),
        0x20 => Ok(Race::Random),
        0x40 => Ok(Race::SelectableOrFixed),
        value => Err(Error::UnexpectedEnumValue {
            field: "player race",
            value: value.into(),
        }),
    }
}
