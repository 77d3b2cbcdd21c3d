use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

use crate::error::{Error, Result};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum GameMode {
    #[default]
    #[strum(serialize = "osu!")]
    Standard = 0,
    #[strum(serialize = "osu!taiko")]
    Taiko = 1,
    #[strum(serialize = "osu!catch")]
    Catch = 2,
    #[strum(serialize = "osu!mania")]
    Mania = 3,
}

impl GameMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn display_name(&self) -> &'static str {
        self.into()
    }
}

impl TryFrom<u8> for GameMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_repr(value).ok_or(Error::InvalidGameMode(value))
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
