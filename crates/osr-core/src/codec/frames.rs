//! Frame stream codec.
//!
//! The decompressed payload is ASCII text: comma-terminated entries of
//! `delta|x|y|keys`. Absolute times are the running sum of deltas. One
//! entry with delta `-12345` carries the RNG seed in its `keys` field and is
//! not an input sample.

use std::fmt::Write as _;

use tracing::{debug, trace};

use crate::config::NumberFormat;
use crate::config::format::{ENTRY_SEPARATOR, FIELD_SEPARATOR, SEED_SENTINEL};
use crate::error::{Error, Result};
use crate::game::KeyState;
use crate::replay::ActionFrame;

/// Decoded frame payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStream {
    pub frames: Vec<ActionFrame>,
    pub seed: Option<i32>,
}

pub fn decode_frames(text: &str, numbers: &NumberFormat) -> Result<FrameStream> {
    let mut stream = FrameStream::default();
    let mut last_time: i64 = 0;

    for entry in text.split(ENTRY_SEPARATOR).filter(|e| !e.is_empty()) {
        let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).collect();
        if fields.len() < 4 {
            debug!("Skipping malformed frame entry: {:?}", entry);
            continue;
        }

        let time_delta: i64 = numbers.parse_int(fields[0], "frame time delta")?;
        if time_delta == SEED_SENTINEL {
            let seed: i32 = numbers.parse_int(fields[3], "seed")?;
            trace!("Found seed entry: {}", seed);
            stream.seed = Some(seed);
            continue;
        }

        let time = last_time
            .checked_add(time_delta)
            .ok_or_else(|| Error::numeric("frame time delta", fields[0]))?;
        stream.frames.push(ActionFrame {
            time_delta,
            time,
            x: numbers.parse_float(fields[1], "cursor x")?,
            y: numbers.parse_float(fields[2], "cursor y")?,
            keys: KeyState::from_raw(numbers.parse_int(fields[3], "key state")?),
        });
        last_time = time;
    }

    Ok(stream)
}

/// Serializes frames back to payload text, seed entry last.
///
/// Each frame's stored `time_delta` is written as-is; absolute times are not
/// consulted. A frame whose delta equals the seed marker would read back as
/// the seed, so it is rejected with [`Error::ReservedTimeDelta`].
pub fn encode_frames(
    frames: &[ActionFrame],
    seed: Option<i32>,
    numbers: &NumberFormat,
) -> Result<String> {
    let mut out = String::with_capacity(frames.len() * 24);

    for (index, frame) in frames.iter().enumerate() {
        if frame.time_delta == SEED_SENTINEL {
            return Err(Error::ReservedTimeDelta { index });
        }
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "{}{sep}{}{sep}{}{sep}{}{end}",
            frame.time_delta,
            numbers.format_float(frame.x),
            numbers.format_float(frame.y),
            frame.keys.bits(),
            sep = FIELD_SEPARATOR,
            end = ENTRY_SEPARATOR,
        );
    }

    if let Some(seed) = seed {
        let _ = write!(
            out,
            "{SEED_SENTINEL}{sep}0{sep}0{sep}{seed}{end}",
            sep = FIELD_SEPARATOR,
            end = ENTRY_SEPARATOR,
        );
    }

    Ok(out)
}

/// Frames where a new, non-empty key combination starts.
///
/// The reference mask is updated after every frame, so releasing all keys
/// and pressing the same key again counts as a new click.
pub fn click_events(frames: &[ActionFrame]) -> Vec<ActionFrame> {
    let mut last_keys = KeyState::empty();
    let mut clicks = Vec::new();

    for frame in frames {
        if frame.keys.is_pressed() && frame.keys != last_keys {
            clicks.push(*frame);
        }
        last_keys = frame.keys;
    }

    clicks
}

/// Recomputes absolute times from the stored deltas.
pub fn accumulate_times(frames: &mut [ActionFrame]) -> Result<()> {
    let mut last_time: i64 = 0;
    for frame in frames {
        frame.time = last_time
            .checked_add(frame.time_delta)
            .ok_or_else(|| Error::numeric("frame time delta", &frame.time_delta.to_string()))?;
        last_time = frame.time;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FMT: NumberFormat = NumberFormat::INVARIANT;

    fn frame(time_delta: i64, keys: u32) -> ActionFrame {
        ActionFrame {
            time_delta,
            time: 0,
            x: 0.0,
            y: 0.0,
            keys: KeyState::from_raw(keys),
        }
    }

    #[test]
    fn test_decode_accumulates_absolute_time() {
        let stream = decode_frames("0|256|-500|0,-1|256|-500|0,16|100.5|20|1,", &FMT).unwrap();
        let times: Vec<i64> = stream.frames.iter().map(|f| f.time).collect();
        assert_eq!(times, vec![0, -1, 15]);
        assert_eq!(stream.frames[2].time_delta, 16);
        assert_eq!(stream.frames[2].x, 100.5);
        assert_eq!(stream.frames[2].keys, KeyState::M1);
        assert_eq!(stream.seed, None);
    }

    #[test]
    fn test_seed_entry_is_excluded() {
        let stream = decode_frames("10|1|1|0,-12345|0|0|7777,5|2|2|0,", &FMT).unwrap();
        assert_eq!(stream.seed, Some(7777));
        assert_eq!(stream.frames.len(), 2);
        // The seed entry's delta does not enter the running total
        assert_eq!(stream.frames[1].time, 15);
    }

    #[test]
    fn test_short_entries_are_skipped() {
        let stream = decode_frames("10|1|1|0,bogus,3|4,20|2|2|5,,", &FMT).unwrap();
        assert_eq!(stream.frames.len(), 2);
        assert_eq!(stream.frames[1].time, 30);
    }

    #[test]
    fn test_malformed_number_is_fatal() {
        let err = decode_frames("10|1|1|0,5|abc|1|0,", &FMT).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedNumericText {
                field: "cursor x",
                ..
            }
        ));
    }

    #[test]
    fn test_time_overflow_is_error() {
        let err = decode_frames("9223372036854775807|0|0|0,1|0|0|0,", &FMT).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedNumericText {
                field: "frame time delta",
                ..
            }
        ));

        let mut frames = vec![frame(i64::MIN, 0), frame(-1, 0)];
        assert!(accumulate_times(&mut frames).is_err());
    }

    #[test]
    fn test_encode_writes_stored_deltas_and_seed() {
        let mut frames = vec![frame(0, 0), frame(16, 5)];
        frames[1].x = 64.25;
        frames[1].y = 300.0;
        // A stale absolute time must not influence the output
        frames[1].time = 9999;

        let text = encode_frames(&frames, Some(42), &FMT).unwrap();
        assert_eq!(text, "0|0|0|0,16|64.25|300|5,-12345|0|0|42,");
    }

    #[test]
    fn test_encode_rejects_seed_marker_delta() {
        let frames = vec![frame(0, 0), frame(16, 1), frame(SEED_SENTINEL, 0)];
        let err = encode_frames(&frames, Some(42), &FMT).unwrap_err();
        assert!(matches!(err, Error::ReservedTimeDelta { index: 2 }));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut frames = vec![frame(0, 0), frame(-1, 0), frame(17, 10), frame(16, 0)];
        frames[2].x = 511.987_654_321;
        frames[2].y = -0.000_01;
        accumulate_times(&mut frames).unwrap();

        let text = encode_frames(&frames, Some(-5), &FMT).unwrap();
        let stream = decode_frames(&text, &FMT).unwrap();
        assert_eq!(stream.frames, frames);
        assert_eq!(stream.seed, Some(-5));
    }

    #[test]
    fn test_click_events() {
        const A: u32 = 5;
        const B: u32 = 10;
        let mut frames: Vec<ActionFrame> = [0, 0, A, A, 0, B]
            .into_iter()
            .map(|keys| frame(10, keys))
            .collect();
        frames[0].time_delta = 0;
        accumulate_times(&mut frames).unwrap();

        let clicks = click_events(&frames);
        let summary: Vec<(i64, u32)> = clicks.iter().map(|f| (f.time, f.keys.bits())).collect();
        assert_eq!(summary, vec![(20, A), (50, B)]);
    }

    #[test]
    fn test_click_after_release_of_same_key() {
        let mut frames: Vec<ActionFrame> = [1, 0, 1].into_iter().map(|k| frame(10, k)).collect();
        accumulate_times(&mut frames).unwrap();
        assert_eq!(click_events(&frames).len(), 2);
    }
}
