//! MMapper database files.
//!
//! A file is a magic number, a format revision and a zlib-compressed payload
//! holding the room records followed by the info-mark records. Any revision
//! listed in [`FormatVersion`] can be read; files are always written in the
//! newest one.

pub mod compression;
pub mod flags;
pub mod mark;
pub mod reader;
pub mod repair;
pub mod room;
pub mod version;
pub mod writer;

use std::{fs::File, path::Path};

use indexmap::IndexMap;
use memmap2::Mmap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MapError, Result};
use crate::models::{Coordinate, ExitTarget, InfoMark, Room, Terrain};
use compression::{deflate_payload, inflate_payload};
use reader::ByteReader;
use version::{FormatVersion, MMAPPER_MAGIC};
use writer::ByteWriter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode the mark section of 042 files instead of skipping it.
    pub read_newest_marks: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Database {
    pub version: FormatVersion,
    pub selected: Coordinate,
    pub rooms: IndexMap<u32, Room>,
    /// Rooms with DEATH terrain, held apart from the walkable map.
    pub deathtraps: IndexMap<u32, Room>,
    pub marks: Vec<InfoMark>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            version: FormatVersion::NEWEST,
            selected: [0; 3],
            rooms: IndexMap::new(),
            deathtraps: IndexMap::new(),
            marks: Vec::new(),
        }
    }
}

/// Validated header plus the inflated payload.
pub(crate) struct Envelope {
    pub version: FormatVersion,
    pub payload: Vec<u8>,
}

pub(crate) fn open_envelope(data: &[u8]) -> Result<Envelope> {
    let mut r = ByteReader::new(data);
    let magic = r.read_u32()?;
    if magic != MMAPPER_MAGIC {
        return Err(MapError::BadMagicNumber(magic));
    }
    let version = FormatVersion::from_raw(r.read_i32()?)?;
    let payload = inflate_payload(&mut r, version)?;
    Ok(Envelope { version, payload })
}

/// Magic, newest version and the deflated `payload`.
pub(crate) fn seal_envelope(payload: &[u8]) -> Result<Vec<u8>> {
    let mut out = ByteWriter::new();
    out.put_u32(MMAPPER_MAGIC);
    out.put_i32(FormatVersion::NEWEST.raw());
    deflate_payload(&mut out, payload)?;
    Ok(out.into_inner())
}

pub fn decode(data: &[u8]) -> Result<Database> { decode_with(data, &DecodeOptions::default()) }

pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Database> {
    let Envelope { version, payload } = open_envelope(data)?;
    let mut r = ByteReader::new(&payload);
    let room_count = r.read_u32()?;
    let mark_count = r.read_u32()?;
    let selected = [r.read_i32()?, r.read_i32()?, r.read_i32()?];

    let mut rooms = IndexMap::new();
    let mut deathtraps = IndexMap::new();
    for _ in 0..room_count {
        let room = room::decode_room(&mut r, version)?;
        if room.terrain == Terrain::Death {
            deathtraps.insert(room.id, room);
        } else {
            rooms.insert(room.id, room);
        }
    }

    let death_ids: FxHashSet<u32> = deathtraps.keys().copied().collect();
    for room in rooms.values_mut().chain(deathtraps.values_mut()) {
        for exit in &mut room.exits {
            if let ExitTarget::Room(id) = exit.to {
                if death_ids.contains(&id) {
                    exit.to = ExitTarget::Death(Some(id));
                }
            }
        }
    }

    let mut marks = Vec::new();
    if version.marks_reliable() || options.read_newest_marks {
        for _ in 0..mark_count {
            marks.push(mark::decode_mark(&mut r, version)?);
        }
    } else if mark_count > 0 {
        warn!(%version, mark_count, "skipping info marks of this revision");
    }

    debug!(%version, rooms = rooms.len(), deathtraps = deathtraps.len(), marks = marks.len(), "decoded database");
    Ok(Database { version, selected, rooms, deathtraps, marks })
}

/// Serializes `db` in the newest revision. Deathtraps are written after the
/// walkable rooms.
pub fn encode(db: &Database) -> Result<Vec<u8>> {
    let mut payload = ByteWriter::new();
    payload.put_u32((db.rooms.len() + db.deathtraps.len()) as u32);
    payload.put_u32(db.marks.len() as u32);
    for c in db.selected {
        payload.put_i32(c);
    }
    for room in db.rooms.values().chain(db.deathtraps.values()) {
        room::encode_room(&mut payload, room);
    }
    for m in &db.marks {
        mark::encode_mark(&mut payload, m);
    }
    seal_envelope(payload.as_slice())
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> { Self::open_with(path, &DecodeOptions::default()) }

    pub fn open_with(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.as_ref().display(), bytes = mmap.len(), "mapped database");
        decode_with(&mmap, options)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, encode(self)?)?;
        Ok(())
    }

    /// Looks up a room among walkable rooms and deathtraps.
    pub fn any_room(&self, id: u32) -> Option<&Room> {
        self.rooms.get(&id).or_else(|| self.deathtraps.get(&id))
    }
}
