//! Codec configuration and format constants.
//!
//! This module contains:
//! - `CodecOptions` - options passed explicitly into every decode/encode call
//! - `NumberFormat` - the invariant numeric text format
//! - Constants describing the on-disk layout

mod numbers;

pub use numbers::*;

use serde::{Deserialize, Serialize};

/// Options controlling how strictly a replay is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Reject frame payloads whose decompressed length differs from the
    /// uncompressed size declared in the compressed block header.
    pub verify_payload_size: bool,
    /// Numeric text format used for life curve and frame fields.
    pub numbers: NumberFormat,
}

impl CodecOptions {
    /// Options with payload size verification enabled.
    pub fn strict() -> Self {
        Self {
            verify_payload_size: true,
            ..Self::default()
        }
    }
}

/// Markers and separators of the replay layout.
pub mod format {
    /// Presence byte written in front of a non-empty text field.
    pub const TEXT_PRESENT: u8 = 0x0B;

    /// Presence byte for an absent text field.
    pub const TEXT_ABSENT: u8 = 0x00;

    /// Time delta of the frame entry that carries the RNG seed.
    pub const SEED_SENTINEL: i64 = -12345;

    /// Declared frame block length when a replay has no frames.
    pub const NO_FRAMES: i32 = -1;

    /// Separator between life samples and between frame entries.
    pub const ENTRY_SEPARATOR: char = ',';

    /// Separator between the fields of one entry.
    pub const FIELD_SEPARATOR: char = '|';
}

/// Layout of the compressed frame block header.
pub mod lzma {
    /// Size of the coder properties (lc/lp/pb byte + u32 dictionary size).
    pub const PROPERTIES_SIZE: usize = 5;

    /// Properties plus the u64 uncompressed size.
    pub const HEADER_SIZE: usize = PROPERTIES_SIZE + 8;

    /// Uncompressed size value meaning "unknown, stream is end-marker terminated".
    pub const UNKNOWN_SIZE: u64 = u64::MAX;
}

/// .NET `DateTime` tick arithmetic for the play timestamp.
pub mod ticks {
    /// Ticks (100 ns) per second.
    pub const PER_SECOND: i64 = 10_000_000;

    /// Nanoseconds per tick.
    pub const NANOS_PER_TICK: i64 = 100;

    /// Ticks between 0001-01-01 and 1970-01-01.
    pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_lenient() {
        let options = CodecOptions::default();
        assert!(!options.verify_payload_size);
        assert!(CodecOptions::strict().verify_payload_size);
    }

    #[test]
    fn test_lzma_header_size() {
        assert_eq!(lzma::HEADER_SIZE, 13);
    }

    #[test]
    fn test_unix_epoch_ticks() {
        // 719162 days between 0001-01-01 and 1970-01-01
        assert_eq!(ticks::UNIX_EPOCH_TICKS, 719_162 * 86_400 * ticks::PER_SECOND);
    }
}
