use serde::{Deserialize, Serialize};

use crate::game::{GameMode, KeyState, Mods};

/// Session metadata at the start of a replay file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayHeader {
    pub mode: GameMode,
    /// Game build the replay was recorded with (e.g. 20240123).
    pub version: i32,
    pub beatmap_hash: Option<String>,
    pub player_name: Option<String>,
    pub replay_hash: Option<String>,
    pub count_300: u16,
    pub count_100: u16,
    pub count_50: u16,
    pub count_geki: u16,
    pub count_katu: u16,
    pub count_miss: u16,
    pub score: u32,
    pub max_combo: u16,
    /// No misses and no dropped slider ends.
    pub perfect: bool,
    pub mods: Mods,
}

impl ReplayHeader {
    /// Total judged hit objects (300 + 100 + 50 + miss).
    pub fn total_hits(&self) -> u32 {
        u32::from(self.count_300)
            + u32::from(self.count_100)
            + u32::from(self.count_50)
            + u32::from(self.count_miss)
    }
}

/// One point of the health bar curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeSample {
    pub time: i32,
    /// Health from 0.0 (empty) to 1.0 (full).
    pub health: f64,
}

/// One input sample from the frame stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionFrame {
    /// Milliseconds since the previous frame, exactly as stored.
    pub time_delta: i64,
    /// Milliseconds since the start of the stream (running sum of deltas).
    pub time: i64,
    pub x: f64,
    pub y: f64,
    pub keys: KeyState,
}

impl ActionFrame {
    pub fn time_in_seconds(&self) -> f64 {
        self.time as f64 / 1000.0
    }

    pub fn time_in_minutes(&self) -> f64 {
        self.time as f64 / 60_000.0
    }
}
