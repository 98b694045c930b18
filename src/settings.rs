//! Game settings decoding
//!
//! The decoded settings span packs most options into three flag bytes,
//! followed by fixed-width fields and the map/creator strings. All
//! enumerated bytes are validated against their known code sets; an
//! unknown code fails the decode.
//!
//! The game-type codes are only meaningful for replays recorded before
//! patch 1.07, and the trailing language id is unreliable across patch
//! levels. Both are decoded as found; interpreting them is left to the
//! caller.

use serde::Serialize;

use crate::buffer::ByteCursor;
use crate::error::{Error, Result};

/// Game speed selected in the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameSpeed {
    Slow,
    Normal,
    Fast,
    Unused,
}

/// Map visibility setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Hide,
    Explored,
    Visible,
    Default,
}

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Observers {
    Off,
    Unused,
    OnDefeat,
    On,
    Referees,
}

/// Fixed-teams (lock teams) configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixedTeams {
    Off,
    Unused,
    On,
}

/// Game type code.
///
/// Only meaningful for replays from patches older than 1.07; later
/// recordings reuse the byte for other purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameType {
    Unknown,
    Ladder,
    Custom,
    Single,
    LadderTeam,
}

/// The decoded game-settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSettings {
    pub game_speed: GameSpeed,
    pub visibility: Visibility,
    pub observers: Observers,
    pub teams_together: bool,
    pub fixed_teams: FixedTeams,
    pub full_shared_unit_control: bool,
    pub random_hero: bool,
    pub random_races: bool,
    pub map_checksum: u32,
    pub map_path: String,
    pub creator_name: String,
    pub player_count: u32,
    pub game_type: GameType,
    pub is_private: bool,
    pub language_id: u32,
}

fn bit(flags: u8, index: u8) -> bool {
    flags & (1 << index) != 0
}

impl GameSettings {
    /// Decode the settings record from a cursor positioned at the start of
    /// the decoded span.
    pub fn parse(cursor: &mut ByteCursor) -> Result<Self> {
        let game_speed = match cursor.read_u8()? {
            0x00 => GameSpeed::Slow,
            0x01 => GameSpeed::Normal,
            0x02 => GameSpeed::Fast,
            0x03 => GameSpeed::Unused,
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "game speed",
                    value: value.into(),
                });
            }
        };

        let flags = cursor.read_u8()?;
        if flags & 0x0F == 0 {
            // At least one of the visibility bits is always set.
            return Err(Error::UnexpectedEnumValue {
                field: "visibility flags",
                value: flags.into(),
            });
        }
        let visibility = if bit(flags, 3) {
            Visibility::Default
        } else if bit(flags, 2) {
            Visibility::Visible
        } else if bit(flags, 1) {
            Visibility::Explored
        } else {
            Visibility::Hide
        };
        let mut observers = match (bit(flags, 5), bit(flags, 4)) {
            (true, true) => Observers::On,
            (true, false) => Observers::OnDefeat,
            (false, true) => Observers::Unused,
            (false, false) => Observers::Off,
        };
        let teams_together = bit(flags, 6);

        let flags = cursor.read_u8()?;
        let fixed_teams = match (bit(flags, 2), bit(flags, 1)) {
            (true, true) => FixedTeams::On,
            (true, false) | (false, true) => FixedTeams::Unused,
            (false, false) => FixedTeams::Off,
        };

        let flags = cursor.read_u8()?;
        let full_shared_unit_control = bit(flags, 0);
        let random_hero = bit(flags, 1);
        let random_races = bit(flags, 2);
        // The referee bit only overrides the plain on/off observer states;
        // OnDefeat and Unused keep their earlier decoding.
        if (observers == Observers::On || observers == Observers::Off) && bit(flags, 6) {
            observers = Observers::Referees;
        }

        cursor.read_bytes(5)?;

        let map_checksum = cursor.read_u32()?;
        let map_path = cursor.read_cstring()?;
        let creator_name = cursor.read_cstring()?;
        cursor.read_u8()?;
        cursor.read_cstring()?;

        let player_count = cursor.read_u32()?;

        let game_type = match cursor.read_u8()? {
            0x00 => GameType::Unknown,
            0x01 => GameType::Ladder,
            0x09 => GameType::Custom,
            0x1D => GameType::Single,
            0x20 => GameType::LadderTeam,
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "game type",
                    value: value.into(),
                });
            }
        };

        let is_private = match cursor.read_u8()? {
            0x00 => false,
            0x08 => true,
            value => {
                return Err(Error::UnexpectedEnumValue {
                    field: "private game flag",
                    value: value.into(),
                });
            }
        };

        cursor.read_u16()?;
        let language_id = cursor.read_u32()?;

        Ok(GameSettings {
            game_speed,
            visibility,
            observers,
            teams_together,
            fixed_teams,
            full_shared_unit_control,
            random_hero,
            random_races,
            map_checksum,
            map_path,
            creator_name,
            player_count,
            game_type,
            is_private,
            language_id,
        })
    }
}
