//! Binary and text codecs for the replay layout.
//!
//! - `bytes` - little-endian integers, VLQ lengths, optional text fields
//! - `header` - session metadata
//! - `life` - health curve text
//! - `frames` - action frame payload text, seed entry, click derivation
//! - `compression` - compressed block header and the `Compressor` boundary

pub mod bytes;
pub mod compression;
pub mod frames;
pub mod header;
pub mod life;

pub use bytes::ByteBuffer;
pub use compression::{BlockHeader, Compressor, LzmaCompressor};
pub use frames::{FrameStream, click_events, decode_frames, encode_frames};
pub use header::{decode_header, encode_header};
pub use life::{decode_life, encode_life};
