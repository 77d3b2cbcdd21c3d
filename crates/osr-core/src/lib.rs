//! Reader and writer for osu! replay (`.osr`) files.
//!
//! ```no_run
//! use osr_core::Replay;
//!
//! let replay = Replay::load("replay.osr")?;
//! println!(
//!     "{} played {} frames with {}",
//!     replay.header.player_name.as_deref().unwrap_or("?"),
//!     replay.frames.len(),
//!     replay.header.mods,
//! );
//! replay.save("copy.osr")?;
//! # Ok::<(), osr_core::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod game;
pub mod replay;

pub use codec::{Compressor, LzmaCompressor};
pub use config::{CodecOptions, NumberFormat};
pub use error::{Error, Result};
pub use game::{GameMode, KeyState, Mods};
pub use replay::{ActionFrame, LifeSample, Replay, ReplayCodec, ReplayHeader};
