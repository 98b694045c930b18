//! Position-tracked byte buffer used by every decoding stage.
//!
//! Replay containers are little-endian throughout, and most of the structured
//! content is a mix of fixed-width integers and null-terminated UTF-8 strings.
//! [`ByteCursor`] wraps an owned buffer with a read/write offset and gives the
//! rest of the crate a uniform, bounds-checked view of it.
//!
//! A cursor is either growable (writes past the end extend the buffer) or
//! fixed (writes past the end fail), so a decode pass over caller-provided
//! input can never reallocate it by accident.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// A growable, position-tracked byte buffer with little-endian accessors.
///
/// Reads past the end of the buffer fail with [`Error::BufferUnderrun`]
/// rather than zero-filling; the same error is returned for a write past the
/// end of a fixed cursor.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Vec<u8>,
    position: usize,
    growable: bool,
}

impl ByteCursor {
    /// Create an empty, growable cursor.
    pub fn empty() -> Self {
        ByteCursor {
            data: Vec::new(),
            position: 0,
            growable: true,
        }
    }

    /// Create a growable cursor over an existing buffer, positioned at 0.
    pub fn new(data: Vec<u8>) -> Self {
        ByteCursor {
            data,
            position: 0,
            growable: true,
        }
    }

    /// Create a fixed-size cursor over an existing buffer, positioned at 0.
    ///
    /// Writes past the end fail instead of growing the buffer.
    pub fn fixed(data: Vec<u8>) -> Self {
        ByteCursor {
            data,
            position: 0,
            growable: false,
        }
    }

    /// Current read/write offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the read/write offset.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Total buffer length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes between the current position and the end.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Borrow the underlying buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the cursor and return the underlying buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn check_read(&self, wanted: usize) -> Result<()> {
        if self.position + wanted > self.data.len() {
            return Err(Error::BufferUnderrun {
                offset: self.position,
                wanted,
                length: self.data.len(),
            });
        }
        Ok(())
    }

    fn reserve(&mut self, wanted: usize) -> Result<()> {
        let needed = self.position + wanted;
        if needed <= self.data.len() {
            return Ok(());
        }
        if !self.growable {
            return Err(Error::BufferUnderrun {
                offset: self.position,
                wanted,
                length: self.data.len(),
            });
        }
        self.data.resize(needed, 0);
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.check_read(1)?;
        let value = self.data[self.position];
        self.position += 1;
        Ok(value)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?;
        self.data[self.position] = value;
        self.position += 1;
        Ok(())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_u8(value as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.check_read(2)?;
        let value = LittleEndian::read_u16(&self.data[self.position..]);
        self.position += 2;
        Ok(value)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.reserve(2)?;
        LittleEndian::write_u16(&mut self.data[self.position..], value);
        self.position += 2;
        Ok(())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_u16(value as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.check_read(4)?;
        let value = LittleEndian::read_u32(&self.data[self.position..]);
        self.position += 4;
        Ok(value)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.reserve(4)?;
        LittleEndian::write_u32(&mut self.data[self.position..], value);
        self.position += 4;
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_u32(value as u32)
    }

    /// Read `length` raw bytes, advancing the cursor.
    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        self.check_read(length)?;
        let bytes = self.data[self.position..self.position + length].to_vec();
        self.position += length;
        Ok(bytes)
    }

    /// Write raw bytes verbatim, advancing the cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        self.data[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    /// Read bytes up to (and consuming) a zero terminator and decode them
    /// as UTF-8.
    ///
    /// A missing terminator fails with [`Error::BufferUnderrun`]; bytes that
    /// are not valid UTF-8 fail with [`Error::InvalidString`].
    pub fn read_cstring(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        String::from_utf8(bytes).map_err(|e| Error::InvalidString(e.to_string()))
    }

    /// Write a string as UTF-8 followed by a zero terminator.
    pub fn write_cstring(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())?;
        self.write_u8(0)
    }
}
