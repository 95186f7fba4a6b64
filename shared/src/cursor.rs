//! Bounded byte cursors
//!
//! [`ByteReader`] walks a borrowed slice and [`FixedWriter`] fills a borrowed
//! fixed-size buffer. Both check the remaining length before touching the
//! buffer, so a corrupted length field turns into an error instead of an
//! out-of-bounds access. Neither supports rollback: a failed read leaves the
//! cursor where it was, but successful reads are never undone.
//!
//! All integers are little-endian. Strings are a `u32` byte length followed by
//! that many raw bytes.

use std::io::{self, Cursor, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{DecodeError, EncodeError};

/// Sequential reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current offset from the start of the slice.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Bytes left between the cursor and the end of the slice.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(DecodeError::Truncated {
                offset: self.position(),
                needed,
                remaining,
            });
        }
        Ok(())
    }

    fn read_with<T>(
        &mut self,
        size: usize,
        read: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T, DecodeError> {
        self.ensure(size)?;
        let offset = self.position();
        read(&mut self.cursor).map_err(|_| DecodeError::Truncated {
            offset,
            needed: size,
            remaining: 0,
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.read_with(1, |c| c.read_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_with(2, |c| c.read_u16::<LittleEndian>())
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_with(4, |c| c.read_u32::<LittleEndian>())
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.read_with(4, |c| c.read_i32::<LittleEndian>())
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_with(4, |c| c.read_f32::<LittleEndian>())
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(len)?;
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    /// Read a length-prefixed string.
    ///
    /// The bytes are not validated; invalid UTF-8 is replaced rather than
    /// rejected. The length is checked against the remaining bytes before
    /// anything is allocated.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let start = self.position();
        let len = self.read_u32()? as usize;
        match self.read_bytes(len) {
            Ok(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Err(err) => {
                self.cursor.set_position(start as u64);
                Err(err)
            }
        }
    }

    /// Consume `magic.len()` bytes and report whether they equal `magic`.
    ///
    /// Returns `false` without advancing when fewer bytes remain.
    pub fn read_magic(&mut self, magic: &[u8]) -> bool {
        match self.read_bytes(magic.len()) {
            Ok(bytes) => bytes == magic,
            Err(_) => false,
        }
    }

    /// Like [`read_magic`](Self::read_magic) but as an error naming the block.
    pub fn expect_magic(&mut self, magic: &[u8], what: &'static str) -> Result<(), DecodeError> {
        let offset = self.position();
        if self.read_magic(magic) {
            Ok(())
        } else {
            Err(DecodeError::BadMagic { what, offset })
        }
    }
}

/// Check `value` against an inclusive range, naming the field on failure.
pub fn check_range(what: &'static str, value: i64, min: i64, max: i64) -> Result<(), DecodeError> {
    if value < min || value > max {
        return Err(DecodeError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Record-level helpers for any [`Write`] sink.
pub trait WriteRecordExt: Write {
    /// Write a `u32` length followed by the raw bytes of `s`.
    fn write_string(&mut self, s: &str) -> io::Result<()> {
        let len = u32::try_from(s.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;
        self.write_u32::<LittleEndian>(len)?;
        self.write_all(s.as_bytes())
    }
}

impl<W: Write + ?Sized> WriteRecordExt for W {}

/// Encoded size of a length-prefixed string.
pub fn string_size(s: &str) -> usize {
    4 + s.len()
}

/// Sequential writer into a fixed-size buffer.
///
/// Writes that would not fit are rejected whole; nothing is partially written.
#[derive(Debug)]
pub struct FixedWriter<'a> {
    cursor: Cursor<&'a mut [u8]>,
}

impl<'a> FixedWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            cursor: Cursor::new(buffer),
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn capacity(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.position())
    }

    fn write_with(
        &mut self,
        size: usize,
        write: impl FnOnce(&mut Cursor<&'a mut [u8]>) -> io::Result<()>,
    ) -> Result<(), EncodeError> {
        let offset = self.position();
        let remaining = self.remaining();
        let overflow = EncodeError::CapacityExceeded {
            offset,
            needed: size,
            remaining,
        };
        if size > remaining {
            return Err(overflow);
        }
        write(&mut self.cursor).map_err(|_| overflow)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_with(4, |c| c.write_u32::<LittleEndian>(value))
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), EncodeError> {
        self.write_with(4, |c| c.write_i32::<LittleEndian>(value))
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.write_with(bytes.len(), |c| c.write_all(bytes))
    }

    pub fn write_string(&mut self, s: &str) -> Result<(), EncodeError> {
        self.write_with(string_size(s), |c| c.write_string(s))
    }

    /// Overwrite a `u32` previously written at `offset`, keeping the cursor.
    pub fn patch_u32(&mut self, offset: usize, value: u32) -> Result<(), EncodeError> {
        let end = self.position();
        if offset + 4 > end {
            return Err(EncodeError::CapacityExceeded {
                offset,
                needed: 4,
                remaining: end.saturating_sub(offset),
            });
        }
        self.cursor.set_position(offset as u64);
        let result = self.write_u32(value);
        self.cursor.set_position(end as u64);
        result
    }
}
