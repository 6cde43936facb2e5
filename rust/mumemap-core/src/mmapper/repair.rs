//! Rebuilds a database from the rooms of one file and the info marks of
//! another.
//!
//! Records are copied without being interpreted, so values the semantic
//! decoder would reject or drop survive. Fields that did not exist in the
//! source revision are written as zero.

use std::{fs, path::Path};

use tracing::info;

use super::mark::transcode_mark;
use super::reader::ByteReader;
use super::room::transcode_room;
use super::writer::ByteWriter;
use super::{open_envelope, seal_envelope, Envelope};
use crate::error::Result;

/// Offset of the mark count in the payload.
const MARK_COUNT_OFFSET: usize = 4;
/// Selected x, y, z.
const SELECTION_LEN: usize = 12;

/// Reads both files one after the other and returns the merged database in
/// the newest revision. Nothing is written; callers persist the result.
pub fn repair(corrupted: impl AsRef<Path>, previous: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut payload = ByteWriter::new();
    {
        let data = fs::read(corrupted.as_ref())?;
        extract_rooms(&data, &mut payload)?;
    }
    let data = fs::read(previous.as_ref())?;
    extract_marks(&data, &mut payload)?;
    drop(data);
    finish(payload)
}

pub fn repair_bytes(corrupted: &[u8], previous: &[u8]) -> Result<Vec<u8>> {
    let mut payload = ByteWriter::new();
    extract_rooms(corrupted, &mut payload)?;
    extract_marks(previous, &mut payload)?;
    finish(payload)
}

/// Writes the payload head (room count, placeholder mark count, selection)
/// and every room record of `data`.
fn extract_rooms(data: &[u8], out: &mut ByteWriter) -> Result<()> {
    info!("Decompressing corrupted database");
    let Envelope { version, payload } = open_envelope(data)?;
    let mut r = ByteReader::new(&payload);
    let room_count = r.read_u32()?;
    let _corrupted_marks = r.read_u32()?;
    out.put_u32(room_count);
    out.put_u32(0);
    out.put_bytes(r.take(SELECTION_LEN)?);

    info!(%version, room_count, "Extracting rooms");
    for _ in 0..room_count {
        transcode_room(&mut r, out, version)?;
    }
    Ok(())
}

/// Skips the rooms of `data` and appends its marks, patching the mark count.
fn extract_marks(data: &[u8], out: &mut ByteWriter) -> Result<()> {
    info!("Decompressing previous database");
    let Envelope { version, payload } = open_envelope(data)?;
    let mut r = ByteReader::new(&payload);
    let room_count = r.read_u32()?;
    let mark_count = r.read_u32()?;
    r.take(SELECTION_LEN)?;

    info!(%version, room_count, "Discarding rooms");
    let mut junk = ByteWriter::new();
    for _ in 0..room_count {
        junk.clear();
        transcode_room(&mut r, &mut junk, version)?;
    }

    info!(mark_count, "Extracting marks");
    out.patch_u32(MARK_COUNT_OFFSET, mark_count);
    for _ in 0..mark_count {
        transcode_mark(&mut r, out, version)?;
    }
    Ok(())
}

fn finish(payload: ByteWriter) -> Result<Vec<u8>> {
    info!(bytes = payload.len(), "Compressing");
    let out = seal_envelope(payload.as_slice())?;
    info!("Done");
    Ok(out)
}
