use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::bytes::{write_i32, write_i64, write_optional_text};
use crate::codec::{
    BlockHeader, ByteBuffer, Compressor, FrameStream, LzmaCompressor, click_events, decode_frames,
    decode_header, decode_life, encode_frames, encode_header, encode_life,
};
use crate::config::CodecOptions;
use crate::config::format::NO_FRAMES;
use crate::config::ticks::{NANOS_PER_TICK, PER_SECOND, UNIX_EPOCH_TICKS};
use crate::error::{Error, Result};
use crate::replay::{ActionFrame, LifeSample, ReplayHeader};

/// A complete replay: metadata, health curve and input frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub header: ReplayHeader,
    pub life: Vec<LifeSample>,
    /// When the play ended.
    pub play_time: DateTime<Utc>,
    /// Frame block length declared in the file (-1 when there were no frames).
    /// Recomputed on save.
    pub frame_block_length: i32,
    pub frames: Vec<ActionFrame>,
    pub seed: Option<i32>,
}

impl Replay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a replay file with default options.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        ReplayCodec::new(CodecOptions::default()).read_file(path)
    }

    /// Saves the replay with default options, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        ReplayCodec::new(CodecOptions::default()).write_file(self, path)
    }

    /// Reads only the metadata prefix of a replay file.
    pub fn read_header<P: AsRef<Path>>(path: P) -> Result<ReplayHeader> {
        let data = fs::read(path)?;
        decode_header(&mut ByteBuffer::new(&data))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        ReplayCodec::new(CodecOptions::default()).decode(data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        ReplayCodec::new(CodecOptions::default()).encode(self)
    }

    /// Frames that start a new key combination.
    pub fn click_events(&self) -> Vec<ActionFrame> {
        click_events(&self.frames)
    }

    /// Absolute time of the last frame in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.frames.last().map_or(0, |f| f.time)
    }
}

/// Encoder/decoder for whole replay files.
///
/// Generic over the [`Compressor`] used for the frame block so callers and
/// tests can substitute their own.
#[derive(Debug, Clone, Default)]
pub struct ReplayCodec<C: Compressor = LzmaCompressor> {
    options: CodecOptions,
    compressor: C,
}

impl ReplayCodec<LzmaCompressor> {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options,
            compressor: LzmaCompressor,
        }
    }
}

impl<C: Compressor> ReplayCodec<C> {
    pub fn with_compressor(options: CodecOptions, compressor: C) -> Self {
        Self {
            options,
            compressor,
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Replay> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        debug!("Read {} bytes from {:?}", data.len(), path);
        self.decode(&data)
    }

    /// Encodes fully in memory first so a failed encode leaves `path` untouched.
    pub fn write_file<P: AsRef<Path>>(&self, replay: &Replay, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = self.encode(replay)?;

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&data)?;
        writer.flush()?;
        debug!("Wrote {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    pub fn decode(&self, data: &[u8]) -> Result<Replay> {
        let numbers = &self.options.numbers;
        let mut buf = ByteBuffer::new(data);

        let header = decode_header(&mut buf)?;
        let life = match buf.read_optional_text("life curve")? {
            Some(text) => decode_life(&text, numbers)?,
            None => Vec::new(),
        };
        let play_time = ticks_to_datetime(buf.read_i64()?)?;

        let frame_block_length = buf.read_i32()?;
        let stream = if frame_block_length > 0 {
            let block = buf.read_bytes(frame_block_length as usize)?;
            self.decode_block(block)?
        } else {
            if frame_block_length < NO_FRAMES {
                warn!(
                    "Negative frame block length {}, treating as no frames",
                    frame_block_length
                );
            }
            FrameStream::default()
        };

        if !buf.is_exhausted() {
            debug!("Ignoring {} trailing bytes", buf.remaining());
        }

        Ok(Replay {
            header,
            life,
            play_time,
            frame_block_length,
            frames: stream.frames,
            seed: stream.seed,
        })
    }

    fn decode_block(&self, block: &[u8]) -> Result<FrameStream> {
        let block_header = BlockHeader::parse(block)?;
        let raw = self
            .compressor
            .decompress(block, block_header.uncompressed_size)?;

        if self.options.verify_payload_size {
            if let Some(declared) = block_header.uncompressed_size {
                if declared != raw.len() as u64 {
                    return Err(Error::PayloadSizeMismatch {
                        declared,
                        actual: raw.len() as u64,
                    });
                }
            }
        }

        let text = std::str::from_utf8(&raw).map_err(|_| Error::InvalidText {
            field: "frame payload",
        })?;
        let stream = decode_frames(text, &self.options.numbers)?;
        debug!(
            "Decoded {} frames from {} compressed bytes",
            stream.frames.len(),
            block.len()
        );
        Ok(stream)
    }

    pub fn encode(&self, replay: &Replay) -> Result<Vec<u8>> {
        let numbers = &self.options.numbers;
        let mut out = Vec::new();

        encode_header(&mut out, &replay.header)?;
        let life = encode_life(&replay.life, numbers);
        write_optional_text(&mut out, Some(life.as_str()))?;
        write_i64(&mut out, datetime_to_ticks(&replay.play_time)?)?;

        if replay.frames.is_empty() {
            if replay.seed.is_some() {
                debug!("Replay has a seed but no frames; seed is not written");
            }
            write_i32(&mut out, NO_FRAMES)?;
            return Ok(out);
        }

        let payload = encode_frames(&replay.frames, replay.seed, numbers)?;
        let block = self.compressor.compress(payload.as_bytes())?;
        let length = i32::try_from(block.len()).map_err(|_| Error::PayloadTooLarge(block.len()))?;
        write_i32(&mut out, length)?;
        out.extend_from_slice(&block);

        debug!(
            "Encoded {} frames: {} payload bytes, {} compressed",
            replay.frames.len(),
            payload.len(),
            block.len()
        );
        Ok(out)
    }
}

/// Converts .NET ticks (100 ns since 0001-01-01 UTC) to a timestamp.
pub fn ticks_to_datetime(ticks: i64) -> Result<DateTime<Utc>> {
    let since_epoch = ticks
        .checked_sub(UNIX_EPOCH_TICKS)
        .ok_or(Error::InvalidTimestamp(ticks))?;
    let secs = since_epoch.div_euclid(PER_SECOND);
    let nanos = (since_epoch.rem_euclid(PER_SECOND) * NANOS_PER_TICK) as u32;
    DateTime::from_timestamp(secs, nanos).ok_or(Error::InvalidTimestamp(ticks))
}

/// Converts a timestamp to .NET ticks, truncating below 100 ns.
pub fn datetime_to_ticks(time: &DateTime<Utc>) -> Result<i64> {
    let subsec = i64::from(time.timestamp_subsec_nanos()) / NANOS_PER_TICK;
    time.timestamp()
        .checked_mul(PER_SECOND)
        .and_then(|t| t.checked_add(subsec))
        .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
        .ok_or(Error::InvalidTimestamp(time.timestamp()))
}
