use super::flags::{DOOR_FLAGS, EXIT_FLAGS, LOAD_FLAGS, MOB_FLAGS};
use super::reader::ByteReader;
use super::version::{width, FieldKind, FormatVersion};
use super::writer::ByteWriter;
use crate::error::Result;
use crate::models::{Align, Direction, Exit, ExitTarget, Light, Portable, Ridable, Room, SunDeath, Terrain};

pub fn decode_room(r: &mut ByteReader<'_>, version: FormatVersion) -> Result<Room> {
    let name = r.read_text()?;
    let desc = r.read_text()?;
    let dynamic_desc = r.read_text()?;
    let id = r.read_u32()?;
    let note = r.read_text()?;
    let terrain = Terrain::from_u8(r.read_u8()?)?;
    let light = Light::from_u8(r.read_u8()?)?;
    let align = Align::from_u8(r.read_u8()?)?;
    let portable = Portable::from_u8(r.read_u8()?)?;
    let ridable = Ridable::from_u8(r.read_u8()?)?;
    let sundeath = SunDeath::from_u8(r.read_uint(width(FieldKind::SunDeath, version))? as u8)?;
    let flags_width = width(FieldKind::RoomFlags, version);
    let mob_flags = MOB_FLAGS.to_set(r.read_uint(flags_width)?);
    let load_flags = LOAD_FLAGS.to_set(r.read_uint(flags_width)?);
    let updated = r.read_u8()? != 0;
    let position = [r.read_i32()?, r.read_i32()?, r.read_i32()?];

    let mut exits = Vec::new();
    for direction in Direction::ALL {
        if let Some(exit) = decode_exit(r, version, direction)? {
            exits.push(exit);
        }
    }

    Ok(Room {
        id,
        name,
        desc,
        dynamic_desc,
        note,
        terrain,
        light,
        align,
        portable,
        ridable,
        sundeath,
        mob_flags,
        load_flags,
        updated,
        position,
        exits,
    })
}

/// Decodes one exit slot. The slot is always consumed; `None` when it has no
/// named exit flags.
fn decode_exit(r: &mut ByteReader<'_>, version: FormatVersion, direction: Direction) -> Result<Option<Exit>> {
    let mut exit_flags = EXIT_FLAGS.to_set(r.read_uint(width(FieldKind::ExitFlags, version))?);
    let door_flags = DOOR_FLAGS.to_set(r.read_uint(width(FieldKind::DoorFlags, version))?);
    let mut door = r.read_text()?;
    if exit_flags.contains("door") {
        exit_flags.insert("exit");
        if door.as_deref().map_or(true, str::is_empty) {
            door = Some("exit".to_string());
        }
    }
    // Inbound connections carry nothing we keep.
    r.read_connections()?;
    let to = match r.read_connections()? {
        Some(id) => ExitTarget::Room(id),
        None => ExitTarget::Undefined,
    };
    if exit_flags.is_empty() {
        return Ok(None);
    }
    Ok(Some(Exit { direction, exit_flags, door_flags, door, to }))
}

/// Writes `room` in the newest layout. Every exit in `room.exits` gets the
/// `exit` flag. `ExitTarget::Death(None)` has no id and reads back as
/// `Undefined`.
pub fn encode_room(w: &mut ByteWriter, room: &Room) {
    let v = FormatVersion::NEWEST;
    w.put_text(room.name.as_deref());
    w.put_text(room.desc.as_deref());
    w.put_text(room.dynamic_desc.as_deref());
    w.put_u32(room.id);
    w.put_text(room.note.as_deref());
    w.put_u8(room.terrain.to_u8());
    w.put_u8(room.light.to_u8());
    w.put_u8(room.align.to_u8());
    w.put_u8(room.portable.to_u8());
    w.put_u8(room.ridable.to_u8());
    w.put_uint(width(FieldKind::SunDeath, v), u32::from(room.sundeath.to_u8()));
    w.put_uint(width(FieldKind::RoomFlags, v), MOB_FLAGS.to_bits(&room.mob_flags));
    w.put_uint(width(FieldKind::RoomFlags, v), LOAD_FLAGS.to_bits(&room.load_flags));
    w.put_u8(u8::from(room.updated));
    for c in room.position {
        w.put_i32(c);
    }
    for direction in Direction::ALL {
        match room.exit(direction) {
            Some(exit) => {
                let flags = EXIT_FLAGS.to_bits(&exit.exit_flags) | EXIT_FLAGS.bit("exit").unwrap_or_default();
                w.put_uint(width(FieldKind::ExitFlags, v), flags);
                w.put_uint(width(FieldKind::DoorFlags, v), DOOR_FLAGS.to_bits(&exit.door_flags));
                w.put_text(exit.door.as_deref());
                w.put_connections(None);
                w.put_connections(exit.to.wire_id());
            }
            None => {
                w.put_uint(width(FieldKind::ExitFlags, v), 0);
                w.put_uint(width(FieldKind::DoorFlags, v), 0);
                w.put_text(None);
                w.put_connections(None);
                w.put_connections(None);
            }
        }
    }
}

/// Copies an integer field into its newest width, zero-extending; a field
/// absent from `version` is written as 0.
pub(crate) fn transcode_uint(r: &mut ByteReader<'_>, w: &mut ByteWriter, field: FieldKind, version: FormatVersion) -> Result<()> {
    let value = r.read_uint(width(field, version))?;
    w.put_uint(width(field, FormatVersion::NEWEST), value);
    Ok(())
}

/// Copies one room record into the newest layout without interpreting it.
pub fn transcode_room(r: &mut ByteReader<'_>, w: &mut ByteWriter, version: FormatVersion) -> Result<()> {
    // name, static and dynamic description
    for _ in 0..3 {
        w.put_bytes(r.take_text_raw()?);
    }
    w.put_bytes(r.take(4)?); // id
    w.put_bytes(r.take_text_raw()?); // note
    w.put_bytes(r.take(5)?); // terrain, light, align, portable, ridable
    transcode_uint(r, w, FieldKind::SunDeath, version)?;
    transcode_uint(r, w, FieldKind::RoomFlags, version)?; // mob
    transcode_uint(r, w, FieldKind::RoomFlags, version)?; // load
    w.put_bytes(r.take(1 + 3 * 4)?); // updated, x, y, z
    for _ in Direction::ALL {
        transcode_uint(r, w, FieldKind::ExitFlags, version)?;
        transcode_uint(r, w, FieldKind::DoorFlags, version)?;
        w.put_bytes(r.take_text_raw()?);
        w.put_bytes(r.take_connections_raw()?); // inbound
        w.put_bytes(r.take_connections_raw()?); // outbound
    }
    Ok(())
}
