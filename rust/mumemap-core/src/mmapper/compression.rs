//! Zlib framing of the database payload.
//!
//! Revisions before 042 store a bare zlib stream after the version. From 042
//! the stream is preceded by the uncompressed length as a big-endian u32 (the
//! framing of Qt's `qCompress`), which the decoder skips.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::trace;

use super::reader::ByteReader;
use super::version::{width, FieldKind, FormatVersion};
use super::writer::ByteWriter;
use crate::error::{MapError, Result};

/// Inflates everything after the version field.
pub fn inflate_payload(rest: &mut ByteReader<'_>, version: FormatVersion) -> Result<Vec<u8>> {
    let header = width(FieldKind::SizeHeader, version);
    if header > 0 {
        let declared = rest.read_uint(header)?;
        trace!(declared, "skipping uncompressed size header");
    }
    let compressed = rest.take(rest.remaining())?;
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::with_capacity(compressed.len().saturating_mul(4));
    decoder.read_to_end(&mut out).map_err(|e| match e.kind() {
        // A stream cut short is a truncated file, not a corrupt one.
        io::ErrorKind::UnexpectedEof => MapError::IncompleteData,
        _ => MapError::Decompression(e),
    })?;
    trace!(compressed = compressed.len(), inflated = out.len(), "inflated payload");
    Ok(out)
}

/// Writes the size header (newest framing) and the deflated payload.
pub fn deflate_payload(out: &mut ByteWriter, payload: &[u8]) -> Result<()> {
    let header = width(FieldKind::SizeHeader, FormatVersion::NEWEST);
    out.put_uint(header, payload.len() as u32);
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload)?;
    let compressed = encoder.finish()?;
    trace!(inflated = payload.len(), compressed = compressed.len(), "deflated payload");
    out.put_bytes(&compressed);
    Ok(())
}
