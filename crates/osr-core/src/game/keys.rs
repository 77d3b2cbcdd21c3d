use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags::bitflags! {
    /// Buttons held during one action frame.
    ///
    /// Keyboard presses also set the matching mouse bit (`K1` is always seen
    /// as `M1 | K1`). Mania replays store column masks here, so unknown bits
    /// are kept as-is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyState: u32 {
        const M1 = 1 << 0;
        const M2 = 1 << 1;
        const K1 = 1 << 2;
        const K2 = 1 << 3;
        const SMOKE = 1 << 4;
    }
}

impl KeyState {
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// True when any button is held.
    pub fn is_pressed(&self) -> bool {
        !self.is_empty()
    }
}

impl Serialize for KeyState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Self::from_bits_retain)
    }
}
