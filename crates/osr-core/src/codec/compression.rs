//! Compression boundary for the frame payload.
//!
//! The frame block is an LZMA "alone" stream: 5 bytes of coder properties,
//! a u64 little-endian uncompressed size, then the compressed data. The
//! codec reads that header itself; the algorithm lives behind [`Compressor`].

use tracing::trace;

use crate::codec::bytes::ByteBuffer;
use crate::config::lzma::{HEADER_SIZE, PROPERTIES_SIZE, UNKNOWN_SIZE};
use crate::error::Result;

/// Trait for the compressor that packs the frame payload.
///
/// Implementations are stateless; each call owns its input and output.
pub trait Compressor {
    /// Compresses `raw` into a block that starts with the stream header.
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;

    /// Decompresses a full block (header included).
    ///
    /// `expected_size` is the uncompressed size read from the block header,
    /// or `None` when the header marks it unknown. Implementations may ignore
    /// it; the replay codec checks the decompressed length itself when
    /// `CodecOptions::verify_payload_size` is set.
    fn decompress(&self, block: &[u8], expected_size: Option<u64>) -> Result<Vec<u8>>;
}

/// Header at the start of a compressed frame block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub properties: [u8; PROPERTIES_SIZE],
    /// Uncompressed payload size, `None` if the producer did not record it.
    pub uncompressed_size: Option<u64>,
}

impl BlockHeader {
    pub fn parse(block: &[u8]) -> Result<Self> {
        let mut buf = ByteBuffer::new(block);
        let mut properties = [0u8; PROPERTIES_SIZE];
        properties.copy_from_slice(buf.read_bytes(PROPERTIES_SIZE)?);
        let size = buf.read_u64()?;

        Ok(Self {
            properties,
            uncompressed_size: (size != UNKNOWN_SIZE).then_some(size),
        })
    }
}

/// LZMA compressor backed by `lzma-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzmaCompressor;

impl Compressor for LzmaCompressor {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let options = lzma_rs::compress::Options {
            unpacked_size: lzma_rs::compress::UnpackedSize::WriteToHeader(Some(raw.len() as u64)),
        };
        let mut input = raw;
        let mut out = Vec::with_capacity(HEADER_SIZE + raw.len() / 2);
        lzma_rs::lzma_compress_with_options(&mut input, &mut out, &options)?;

        trace!("Compressed {} bytes into {}", raw.len(), out.len());
        Ok(out)
    }

    fn decompress(&self, block: &[u8], expected_size: Option<u64>) -> Result<Vec<u8>> {
        let mut input = block;
        let capacity = expected_size.map_or(0, |size| size.min(block.len() as u64 * 16));
        let mut out = Vec::with_capacity(capacity as usize);
        lzma_rs::lzma_decompress(&mut input, &mut out)?;

        trace!("Decompressed {} bytes into {}", block.len(), out.len());
        Ok(out)
    }
}
