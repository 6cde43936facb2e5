//! Hand-built database files in any revision.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use mumemap_core::mmapper::reader::SENTINEL;
use mumemap_core::mmapper::version::{width, FieldKind, FormatVersion, MMAPPER_MAGIC};
use mumemap_core::mmapper::writer::ByteWriter;

pub struct RawRoom<'a> {
    pub id: u32,
    pub name: &'a str,
    pub terrain: u8,
    pub mob_flags: u32,
    /// (slot 0..7, exit flags, outbound target)
    pub exits: &'a [(usize, u32, Option<u32>)],
}

pub fn room(id: u32, terrain: u8, exits: &'static [(usize, u32, Option<u32>)]) -> RawRoom<'static> {
    RawRoom { id, name: "", terrain, mob_flags: 0, exits }
}

fn put_room(w: &mut ByteWriter, v: FormatVersion, room: &RawRoom<'_>) {
    w.put_text(Some(room.name));
    w.put_text(None);
    w.put_text(None);
    w.put_u32(room.id);
    w.put_text(None);
    w.put_bytes(&[room.terrain, 0, 0, 0, 0]);
    w.put_uint(width(FieldKind::SunDeath, v), 0);
    w.put_uint(width(FieldKind::RoomFlags, v), room.mob_flags);
    w.put_uint(width(FieldKind::RoomFlags, v), 0);
    w.put_u8(0);
    for c in [0i32, 0, 0] {
        w.put_i32(c);
    }
    for slot in 0..7 {
        let exit = room.exits.iter().find(|(s, _, _)| *s == slot);
        w.put_uint(width(FieldKind::ExitFlags, v), exit.map_or(0, |e| e.1));
        w.put_uint(width(FieldKind::DoorFlags, v), 0);
        w.put_text(None);
        w.put_u32(SENTINEL);
        if let Some(to) = exit.and_then(|e| e.2) {
            w.put_u32(to);
        }
        w.put_u32(SENTINEL);
    }
}

fn put_mark(w: &mut ByteWriter, v: FormatVersion, name: &str) {
    w.put_text(Some(name));
    w.put_text(Some("note"));
    w.put_u32(2_451_545);
    w.put_u32(0);
    w.put_u8(0);
    w.put_u8(0);
    if width(FieldKind::MarkClass, v) > 0 {
        w.put_u8(3);
        w.put_i32(9000);
    }
    for c in [100, 200, 0, 300, 400, 0] {
        w.put_i32(c);
    }
}

/// Raw payload: counts, selection, rooms, marks.
pub fn payload(v: FormatVersion, declared_rooms: u32, rooms: &[RawRoom<'_>], marks: &[&str]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.put_u32(declared_rooms);
    w.put_u32(marks.len() as u32);
    for c in [1i32, 2, 3] {
        w.put_i32(c);
    }
    for r in rooms {
        put_room(&mut w, v, r);
    }
    for m in marks {
        put_mark(&mut w, v, m);
    }
    w.into_inner()
}

/// Full file: magic, version, optional size header, zlib stream.
pub fn file(v: FormatVersion, payload: &[u8]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.put_u32(MMAPPER_MAGIC);
    w.put_i32(v.raw());
    w.put_uint(width(FieldKind::SizeHeader, v), payload.len() as u32);
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(payload).unwrap();
    w.put_bytes(&enc.finish().unwrap());
    w.into_inner()
}

pub fn database(v: FormatVersion, rooms: &[RawRoom<'_>], marks: &[&str]) -> Vec<u8> {
    file(v, &payload(v, rooms.len() as u32, rooms, marks))
}
