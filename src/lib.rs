//! # unw3g
//!
//! A Rust library for decoding Warcraft III `.w3g` replay containers.
//!
//! ## Overview
//!
//! A replay container holds the recorded match as a fixed header followed
//! by a sequence of independently zlib-compressed blocks. This library
//! decodes the container into a structured document:
//!
//! - Header and version-dependent sub-header parsing
//! - Block reassembly into one logical byte stream
//! - Decoding of the obfuscated game-settings region
//! - Player records, packed game-settings flags and the per-slot
//!   game-start record
//!
//! The decoder is strict: every enumerated byte is validated against its
//! known code set and the first failure aborts the decode with a
//! structured error. It operates on an in-memory byte sequence; how the
//! bytes were obtained (file, download, database) is up to the caller.
//! The gameplay command stream that follows the metadata section is not
//! decoded.
//!
//! ## Example
//!
//! ```rust,no_run
//! use unw3g::Replay;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let data = std::fs::read("match.w3g")?;
//!     let replay = Replay::parse(&data)?;
//!
//!     println!("game: {}", replay.game_name);
//!     println!("map:  {}", replay.settings.map_path);
//!     for player in &replay.players {
//!         println!("  slot {}: {}", player.slot, player.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod decompress;
pub mod encoded;
pub mod error;
pub mod header;
pub mod player;
pub mod replay;
pub mod settings;
pub mod slots;

pub use buffer::ByteCursor;
pub use error::{Error, Result};
pub use header::{ReplayHeader, SubHeader, REPLAY_MAGIC};
pub use player::{ParseState, PlayerRecord, Race};
pub use replay::{Replay, ADDITIONAL_PLAYER_RECORD, GAME_RECORD_MAGIC, GAME_START_RECORD};
pub use settings::{FixedTeams, GameSettings, GameSpeed, GameType, Observers, Visibility};
pub use slots::{AiStrength, GameStartRecord, SelectMode, SlotAssignment, SlotRecord, SlotStatus};
