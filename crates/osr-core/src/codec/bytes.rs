//! Primitive binary codec.
//!
//! `ByteBuffer` is a position-tracking reader over a replay file held in
//! memory; the `write_*` functions are its counterparts over any `Write`.
//! All integers are little-endian. Text fields are preceded by a presence
//! byte and, when present, a ULEB128 (VLQ) byte length.

use std::io::Write;

use crate::config::format::{TEXT_ABSENT, TEXT_PRESENT};
use crate::error::{Error, Result};

/// Longest VLQ accepted for a length prefix (enough for 35 bits).
const MAX_VLQ_BYTES: usize = 5;

/// A position-tracking byte reader for the replay layout.
///
/// # Example
///
/// ```
/// use osr_core::codec::ByteBuffer;
///
/// let data = [0x78, 0x56, 0x34, 0x12];
/// let mut buf = ByteBuffer::new(&data);
///
/// assert_eq!(buf.read_i32().unwrap(), 0x12345678);
/// assert_eq!(buf.position(), 4);
/// ```
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads the specified number of bytes and advances the position.
    ///
    /// # Errors
    ///
    /// Returns `TruncatedInput` if there are not enough bytes remaining.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed: count,
                remaining,
            });
        }

        let result = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(result)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    /// Reads a one-byte boolean; any nonzero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Reads a ULEB128 length: low 7 bits per byte, high bit set while more follow.
    pub fn read_vlq_length(&mut self) -> Result<usize> {
        let start = self.pos;
        let mut value: u64 = 0;
        for i in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return usize::try_from(value).map_err(|_| Error::MalformedLength { offset: start });
            }
        }
        Err(Error::MalformedLength { offset: start })
    }

    /// Reads a presence-flagged text field.
    ///
    /// Returns `None` for an absent field and for a present field of length
    /// zero, which the layout cannot tell apart.
    pub fn read_optional_text(&mut self, field: &'static str) -> Result<Option<String>> {
        if self.read_u8()? == TEXT_ABSENT {
            return Ok(None);
        }
        let len = self.read_vlq_length()?;
        let bytes = self.read_bytes(len)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        let text = std::str::from_utf8(bytes).map_err(|_| Error::InvalidText { field })?;
        Ok(Some(text.to_string()))
    }
}

pub fn write_u8<W: Write + ?Sized>(w: &mut W, v: u8) -> Result<()> {
    w.write_all(&[v])?;
    Ok(())
}

pub fn write_i8<W: Write + ?Sized>(w: &mut W, v: i8) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_bool<W: Write + ?Sized>(w: &mut W, v: bool) -> Result<()> {
    write_u8(w, u8::from(v))
}

pub fn write_u16<W: Write + ?Sized>(w: &mut W, v: u16) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_i16<W: Write + ?Sized>(w: &mut W, v: i16) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u32<W: Write + ?Sized>(w: &mut W, v: u32) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_i32<W: Write + ?Sized>(w: &mut W, v: i32) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u64<W: Write + ?Sized>(w: &mut W, v: u64) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_i64<W: Write + ?Sized>(w: &mut W, v: i64) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Writes a ULEB128 length prefix.
pub fn write_vlq_length<W: Write + ?Sized>(w: &mut W, len: usize) -> Result<()> {
    let mut value = len as u64;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            return write_u8(w, byte);
        }
        write_u8(w, byte | 0x80)?;
    }
}

/// Writes a presence-flagged text field. Empty and absent text both become a single `0x00`.
pub fn write_optional_text<W: Write + ?Sized>(w: &mut W, text: Option<&str>) -> Result<()> {
    match text {
        Some(text) if !text.is_empty() => {
            write_u8(w, TEXT_PRESENT)?;
            write_vlq_length(w, text.len())?;
            w.write_all(text.as_bytes())?;
            Ok(())
        }
        _ => write_u8(w, TEXT_ABSENT),
    }
}
