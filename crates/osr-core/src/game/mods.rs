use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

bitflags::bitflags! {
    /// Gameplay modifiers active during the play, stored as a 32-bit mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u32 {
        const NO_FAIL = 1 << 0;
        const EASY = 1 << 1;
        const TOUCH_DEVICE = 1 << 2;
        const HIDDEN = 1 << 3;
        const HARD_ROCK = 1 << 4;
        const SUDDEN_DEATH = 1 << 5;
        const DOUBLE_TIME = 1 << 6;
        const RELAX = 1 << 7;
        const HALF_TIME = 1 << 8;
        /// Always set together with `DOUBLE_TIME`.
        const NIGHTCORE = 1 << 9;
        const FLASHLIGHT = 1 << 10;
        const AUTOPLAY = 1 << 11;
        const SPUN_OUT = 1 << 12;
        const AUTOPILOT = 1 << 13;
        /// Always set together with `SUDDEN_DEATH`.
        const PERFECT = 1 << 14;
        const KEY4 = 1 << 15;
        const KEY5 = 1 << 16;
        const KEY6 = 1 << 17;
        const KEY7 = 1 << 18;
        const KEY8 = 1 << 19;
        const FADE_IN = 1 << 20;
        const RANDOM = 1 << 21;
        const CINEMA = 1 << 22;
        const TARGET = 1 << 23;
        const KEY9 = 1 << 24;
        const KEY_COOP = 1 << 25;
        const KEY1 = 1 << 26;
        const KEY3 = 1 << 27;
        const KEY2 = 1 << 28;
        const SCORE_V2 = 1 << 29;
        const MIRROR = 1 << 30;
    }
}

const ACRONYMS: &[(Mods, &str)] = &[
    (Mods::NO_FAIL, "NF"),
    (Mods::EASY, "EZ"),
    (Mods::TOUCH_DEVICE, "TD"),
    (Mods::HIDDEN, "HD"),
    (Mods::HARD_ROCK, "HR"),
    (Mods::SUDDEN_DEATH, "SD"),
    (Mods::DOUBLE_TIME, "DT"),
    (Mods::RELAX, "RX"),
    (Mods::HALF_TIME, "HT"),
    (Mods::NIGHTCORE, "NC"),
    (Mods::FLASHLIGHT, "FL"),
    (Mods::AUTOPLAY, "AT"),
    (Mods::SPUN_OUT, "SO"),
    (Mods::AUTOPILOT, "AP"),
    (Mods::PERFECT, "PF"),
    (Mods::KEY4, "4K"),
    (Mods::KEY5, "5K"),
    (Mods::KEY6, "6K"),
    (Mods::KEY7, "7K"),
    (Mods::KEY8, "8K"),
    (Mods::FADE_IN, "FI"),
    (Mods::RANDOM, "RD"),
    (Mods::CINEMA, "CN"),
    (Mods::TARGET, "TP"),
    (Mods::KEY9, "9K"),
    (Mods::KEY_COOP, "CO"),
    (Mods::KEY1, "1K"),
    (Mods::KEY3, "3K"),
    (Mods::KEY2, "2K"),
    (Mods::SCORE_V2, "V2"),
    (Mods::MIRROR, "MR"),
];

impl Mods {
    /// Validates a raw mask read from a file. Bits outside the known set are an error.
    pub fn from_raw(bits: u32) -> Result<Self> {
        Self::from_bits(bits).ok_or(Error::InvalidModifiers(bits))
    }

    /// Short acronyms of the active modifiers, in bit order.
    ///
    /// Implied modifiers are folded into the one that implies them, so
    /// `DOUBLE_TIME | NIGHTCORE` yields only `"NC"`.
    pub fn short_names(&self) -> Vec<&'static str> {
        ACRONYMS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .filter(|(flag, _)| {
                !(*flag == Mods::DOUBLE_TIME && self.contains(Mods::NIGHTCORE)
                    || *flag == Mods::SUDDEN_DEATH && self.contains(Mods::PERFECT))
            })
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn is_speed_up(&self) -> bool {
        self.intersects(Mods::DOUBLE_TIME | Mods::NIGHTCORE)
    }
}

impl std::fmt::Display for Mods {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "NM");
        }
        write!(f, "{}", self.short_names().concat())
    }
}

impl Serialize for Mods {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mods {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Mods::from_raw(bits).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mods_from_raw() {
        let mods = Mods::from_raw(8 | 64).unwrap();
        assert!(mods.contains(Mods::HIDDEN));
        assert!(mods.contains(Mods::DOUBLE_TIME));
        assert!(!mods.contains(Mods::HARD_ROCK));
    }

    #[test]
    fn test_mods_rejects_unknown_bit() {
        let err = Mods::from_raw(1 << 31).unwrap_err();
        assert!(matches!(err, Error::InvalidModifiers(0x8000_0000)));
    }

    #[test]
    fn test_every_named_bit_has_acronym() {
        assert_eq!(ACRONYMS.len(), 31);
        assert_eq!(Mods::all().bits(), 0x7FFF_FFFF);
    }

    #[test]
    fn test_mods_short_names() {
        let mods = Mods::HIDDEN | Mods::DOUBLE_TIME | Mods::NIGHTCORE;
        assert_eq!(mods.short_names(), vec!["HD", "NC"]);
        assert_eq!(mods.to_string(), "HDNC");
        assert_eq!(Mods::empty().to_string(), "NM");
        assert!(mods.is_speed_up());
    }

    #[test]
    fn test_mods_serde() {
        let json = serde_json::to_string(&(Mods::HIDDEN | Mods::HARD_ROCK)).unwrap();
        assert_eq!(json, "24");
        let mods: Mods = serde_json::from_str("16").unwrap();
        assert_eq!(mods, Mods::HARD_ROCK);
        assert!(serde_json::from_str::<Mods>("2147483648").is_err());
    }
}
