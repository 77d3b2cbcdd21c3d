//! Replay data model and whole-file codec.
//!
//! - `ReplayHeader`, `LifeSample`, `ActionFrame` - decoded records
//! - `Replay` - one parsed session, with `load`/`save`
//! - `ReplayCodec` - decode/encode with explicit options and compressor

mod aggregate;
mod types;

pub use aggregate::*;
pub use types::*;
