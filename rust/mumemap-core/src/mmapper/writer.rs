use byteorder::{BigEndian, ByteOrder};

use super::reader::SENTINEL;

/// Big-endian output buffer; the inverse of [`super::reader::ByteReader`].
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.buf.len() }
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }
    pub fn as_slice(&self) -> &[u8] { &self.buf }
    pub fn into_inner(self) -> Vec<u8> { self.buf }
    pub fn clear(&mut self) { self.buf.clear() }

    pub fn put_bytes(&mut self, bytes: &[u8]) { self.buf.extend_from_slice(bytes); }
    pub fn put_u8(&mut self, v: u8) { self.buf.push(v); }

    pub fn put_u16(&mut self, v: u16) {
        let mut b = [0u8; 2];
        BigEndian::write_u16(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn put_u32(&mut self, v: u32) {
        let mut b = [0u8; 4];
        BigEndian::write_u32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn put_i32(&mut self, v: i32) {
        let mut b = [0u8; 4];
        BigEndian::write_i32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    /// Unsigned integer in `width` bytes (1, 2 or 4); higher bits are
    /// truncated. Width 0 is an absent field and writes nothing.
    pub fn put_uint(&mut self, width: usize, v: u32) {
        match width {
            0 => {}
            1 => self.put_u8(v as u8),
            2 => self.put_u16(v as u16),
            4 => self.put_u32(v),
            _ => unreachable!("unsupported field width {width}"),
        }
    }

    pub fn put_text(&mut self, text: Option<&str>) {
        let Some(text) = text else {
            self.put_u32(SENTINEL);
            return;
        };
        let units: Vec<u16> = text.encode_utf16().collect();
        self.put_u32((units.len() * 2) as u32);
        for u in units {
            self.put_u16(u);
        }
    }

    /// Connection list holding at most one id.
    pub fn put_connections(&mut self, id: Option<u32>) {
        if let Some(id) = id {
            self.put_u32(id);
        }
        self.put_u32(SENTINEL);
    }

    /// Overwrites a u32 previously written at `offset`.
    pub fn patch_u32(&mut self, offset: usize, v: u32) {
        BigEndian::write_u32(&mut self.buf[offset..offset + 4], v);
    }
}
