//! Game enumerations stored inside a replay.
//!
//! - `GameMode` - ruleset the replay was played in
//! - `Mods` - gameplay modifier bitfield
//! - `KeyState` - buttons held in an action frame

mod enums;
mod keys;
mod mods;

pub use enums::*;
pub use keys::*;
pub use mods::*;
