use byteorder::{BigEndian, ByteOrder};
use encoding_rs::UTF_16BE;

use crate::error::{MapError, Result};

/// Length prefix and list terminator.
pub const SENTINEL: u32 = u32::MAX;

/// Big-endian cursor over an inflated payload.
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self { Self { bytes, pos: 0 } }

    pub fn position(&self) -> usize { self.pos }
    pub fn remaining(&self) -> usize { self.bytes.len() - self.pos }

    /// Next `n` bytes, or `IncompleteData` when fewer remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(MapError::IncompleteData);
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> { Ok(self.take(1)?[0]) }
    pub fn read_u16(&mut self) -> Result<u16> { Ok(BigEndian::read_u16(self.take(2)?)) }
    pub fn read_u32(&mut self) -> Result<u32> { Ok(BigEndian::read_u32(self.take(4)?)) }
    pub fn read_i32(&mut self) -> Result<i32> { Ok(BigEndian::read_i32(self.take(4)?)) }

    /// Unsigned integer of `width` bytes (1, 2 or 4), zero-extended. Width 0
    /// is an absent field and reads as 0.
    pub fn read_uint(&mut self, width: usize) -> Result<u32> {
        match width {
            0 => Ok(0),
            1 => self.read_u8().map(u32::from),
            2 => self.read_u16().map(u32::from),
            4 => self.read_u32(),
            _ => unreachable!("unsupported field width {width}"),
        }
    }

    /// Raw bytes of a length-prefixed string, prefix included.
    pub fn take_text_raw(&mut self) -> Result<&'a [u8]> {
        let start = self.pos;
        let len = self.read_u32()?;
        if len != SENTINEL {
            self.take(len as usize)?;
        }
        Ok(&self.bytes[start..self.pos])
    }

    /// Length-prefixed UTF-16BE text; a `SENTINEL` length is an absent string.
    pub fn read_text(&mut self) -> Result<Option<String>> {
        let len = self.read_u32()?;
        if len == SENTINEL {
            return Ok(None);
        }
        let raw = self.take(len as usize)?;
        let (text, _) = UTF_16BE.decode_without_bom_handling(raw);
        Ok(Some(text.into_owned()))
    }

    /// Reads ids until the terminator and returns the last one, if any.
    pub fn read_connections(&mut self) -> Result<Option<u32>> {
        let mut last = None;
        loop {
            let id = self.read_u32()?;
            if id == SENTINEL {
                return Ok(last);
            }
            last = Some(id);
        }
    }

    /// Raw bytes of a connection list, terminator included.
    pub fn take_connections_raw(&mut self) -> Result<&'a [u8]> {
        let start = self.pos;
        while self.read_u32()? != SENTINEL {}
        Ok(&self.bytes[start..self.pos])
    }
}
