//! Life curve codec.
//!
//! The curve is one text field of `time|health` pairs, each followed by a
//! comma. Pairs with fewer than two fields are skipped.

use std::fmt::Write as _;

use tracing::debug;

use crate::config::NumberFormat;
use crate::config::format::{ENTRY_SEPARATOR, FIELD_SEPARATOR};
use crate::error::Result;
use crate::replay::LifeSample;

pub fn decode_life(text: &str, numbers: &NumberFormat) -> Result<Vec<LifeSample>> {
    let mut samples = Vec::new();

    for entry in text.split(ENTRY_SEPARATOR).filter(|e| !e.is_empty()) {
        let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).collect();
        if fields.len() < 2 {
            debug!("Skipping malformed life sample: {:?}", entry);
            continue;
        }

        samples.push(LifeSample {
            time: numbers.parse_int(fields[0], "life time")?,
            health: numbers.parse_float(fields[1], "life health")?,
        });
    }

    Ok(samples)
}

pub fn encode_life(samples: &[LifeSample], numbers: &NumberFormat) -> String {
    let mut out = String::new();
    for sample in samples {
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "{}{}{}{}",
            sample.time,
            FIELD_SEPARATOR,
            numbers.format_float(sample.health),
            ENTRY_SEPARATOR
        );
    }
    out
}
