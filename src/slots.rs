//! Game-start record and slot table parsing
//!
//! The game-start record closes the metadata section of the logical
//! stream: a fixed-width entry per slot, then the random seed, the lobby
//! select mode and the number of start spots on the map.

use serde::Serialize;

use crate::buffer::ByteCursor;
use crate::error::{Error, Result};
use crate::player::Race;

/// Occupancy state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotStatus {
    Empty,
    Closed,
    Used,
}

/// Computer player difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AiStrength {
    Easy,
    Normal,
    Insane,
}

/// Lobby team/race selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectMode {
    TeamAndRaceSelectable,
    TeamNotSelectable,
    TeamAndRaceNotSelectable,
    RaceFixedToRandom,
    AutomatedMatchMaking,
}

/// Configuration of one slot at game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotRecord {
    pub status: SlotStatus,
    /// True when the slot holds a human player. The on-disk flag is
    /// inverted: 0x00 means human, 0x01 means computer.
    pub is_human: bool,
    pub team: u8,
    pub color: u8,
    pub race: Race,
    pub handicap: u8,
    /// Recorded only for non-human slots.
    pub ai_strength: Option<AiStrength>,
}

/// One slot table entry tied to the player occupying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotAssignment {
    pub player_id: u8,
    pub record: SlotRecord,
}

/// The game-start record: the slot table plus lobby-wide values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStartRecord {
    pub slots: Vec<SlotAssignment>,
    pub random_seed: u32,
    pub select_mode: SelectMode,
    pub start_spot_count: u8,
}

impl GameStartRecord {
    /// Parse the game-start record from a cursor positioned at the slot
    /// count byte.
    pub fn parse(cursor: &mut ByteCursor) -> Result<Self> {
        let slot_count = cursor.read_u8()?;
        let mut slots = Vec::with_capacity(slot_count as usize);
        for _ in 0..slot_count {
            slots.push(SlotAssignment::parse(cursor)?);
        }

        let random_seed = cursor.read_u32()?;

        let select_mode = match cursor.read_u8()? {
            0x00 => SelectMode::TeamAndRaceSelectable,
            0x01 => SelectMode::TeamNotSelectable,
            0x03 => SelectMode::TeamAndRaceNotSelectable,
            0x04 => SelectMode::RaceFixedToRandom,
            0xCC => SelectMode::AutomatedMatchMaking,
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "select mode",
                    value: value.into(),
                });
            }
        };

        let start_spot_count = cursor.read_u8()?;

        Ok(GameStartRecord {
            slots,
            random_seed,
            select_mode,
            start_spot_count,
        })
    }
}

impl SlotAssignment {
    fn parse(cursor: &mut ByteCursor) -> Result<Self> {
        let player_id = cursor.read_u8()?;

        let download_percent = cursor.read_u8()?;
        if download_percent != 100 && download_percent != 255 {
            return Err(Error::UnexpectedEnumValue {
                field: "download percent",
                value: download_percent.into(),
            });
        }

        let status = match cursor.read_u8()? {
            0x00 => SlotStatus::Empty,
            0x01 => SlotStatus::Closed,
            0x02 => SlotStatus::Used,
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "slot status",
                    value: value.into(),
                });
            }
        };

        let is_human = match cursor.read_u8()? {
            0x00 => true,
            0x01 => false,
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "computer player flag",
                    value: value.into(),
                });
            }
        };

        let team = cursor.read_u8()?;
        let color = cursor.read_u8()?;

        // Daemon (0x10) is not a valid slot race; only player records
        // carry it.
        let race = match cursor.read_u8()? {
            0x01 => Race::Human,
            0x02 => Race::Orc,
            0x04 => Race::NightElf,
            0x08 => Race::Undead,
            0x20 => Race::Random,
            0x40 => Race::SelectableOrFixed,
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "slot race",
                    value: value.into(),
                });
            }
        };

        let ai_byte = cursor.read_u8()?;
        let ai_strength = if is_human {
            None
        } else {
            Some(match ai_byte {
                0x00 => AiStrength::Easy,
                0x01 => AiStrength::Normal,
                0x02 => AiStrength::Insane,
                value => {
                    return Err(Error::UnexpectedEnumValue {
                        field: "computer strength",
                        value: value.into(),
                    });
                }
            })
        };

        let handicap = cursor.read_u8()?;

        Ok(SlotAssignment {
            player_id,
            record: SlotRecord {
                status,
                is_human,
                team,
                color,
                race,
                handicap,
                ai_strength,
            },
        })
    }
}
