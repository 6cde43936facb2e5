//! Pandora XML room databases.
//!
//! ```xml
//! <room id="1" x="0" y="0" z="0" terrain="FIELD">
//!   <roomname>Meadow</roomname>
//!   <desc>...</desc>
//!   <exits><exit dir="n" to="2" door="gate"/></exits>
//! </room>
//! ```

use std::{fs, path::Path, str::FromStr};

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use tracing::debug;

use crate::error::{MapError, Result};
use crate::models::{Direction, Exit, ExitTarget, Room, Terrain};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PandoraDatabase {
    pub rooms: IndexMap<u32, Room>,
}

impl PandoraDatabase {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let xml = fs::read_to_string(path.as_ref())?;
        let db: Self = xml.parse()?;
        debug!(path = %path.as_ref().display(), rooms = db.rooms.len(), "loaded pandora database");
        Ok(db)
    }
}

#[derive(Clone, Copy)]
enum TextField {
    Name,
    Desc,
    Note,
}

impl TextField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"roomname" => Some(TextField::Name),
            b"desc" => Some(TextField::Desc),
            b"note" => Some(TextField::Note),
            _ => None,
        }
    }

    fn slot(self, room: &mut Room) -> &mut Option<String> {
        match self {
            TextField::Name => &mut room.name,
            TextField::Desc => &mut room.desc,
            TextField::Note => &mut room.note,
        }
    }
}

fn xml_err(e: impl std::fmt::Display) -> MapError { MapError::Xml(e.to_string()) }

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    e.attributes()
        .map(|a| {
            let a = a.map_err(xml_err)?;
            let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
            let value = a.unescape_value().map_err(xml_err)?.into_owned();
            Ok((key, value))
        })
        .collect()
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn parse_room(e: &BytesStart<'_>) -> Result<Room> {
    let attrs = attributes(e)?;
    let raw_id = attr(&attrs, "id").ok_or_else(|| MapError::Xml("room without id".into()))?;
    let id: u32 = raw_id.parse().map_err(|_| MapError::Xml(format!("invalid room id {raw_id:?}")))?;
    let mut position = [0; 3];
    for (slot, key) in position.iter_mut().zip(["x", "y", "z"]) {
        if let Some(v) = attr(&attrs, key) {
            *slot = v.parse().map_err(|_| MapError::Xml(format!("invalid {key} {v:?} in room {id}")))?;
        }
    }
    let terrain = attr(&attrs, "terrain").and_then(Terrain::from_name).unwrap_or_default();
    Ok(Room { id, terrain, position, ..Room::default() })
}

fn parse_exit(e: &BytesStart<'_>) -> Result<Exit> {
    let attrs = attributes(e)?;
    let dir = attr(&attrs, "dir").unwrap_or_default();
    let direction = Direction::from_code(dir).ok_or_else(|| MapError::Xml(format!("invalid exit direction {dir:?}")))?;
    let to = match attr(&attrs, "to") {
        None | Some("UNDEFINED") => ExitTarget::Undefined,
        Some("DEATH") => ExitTarget::Death(None),
        Some(v) => ExitTarget::Room(v.parse().map_err(|_| MapError::Xml(format!("invalid exit target {v:?}")))?),
    };
    let mut exit = Exit::new(direction, to);
    if let Some(door) = attr(&attrs, "door").filter(|d| !d.is_empty()) {
        exit.exit_flags.insert("door");
        exit.door = Some(door.to_string());
    }
    Ok(exit)
}

fn finish(rooms: &mut IndexMap<u32, Room>, mut room: Room) {
    room.exits.sort_by_key(|e| e.direction);
    rooms.insert(room.id, room);
}

impl FromStr for PandoraDatabase {
    type Err = MapError;

    fn from_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut rooms = IndexMap::new();
        let mut current: Option<Room> = None;
        let mut field: Option<TextField> = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(xml_err)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"room" => current = Some(parse_room(&e)?),
                    b"exit" => {
                        if let Some(room) = current.as_mut() {
                            room.exits.push(parse_exit(&e)?);
                        }
                    }
                    tag => {
                        field = TextField::from_tag(tag);
                        if let (Some(room), Some(f)) = (current.as_mut(), field) {
                            *f.slot(room) = Some(String::new());
                        }
                    }
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"room" => finish(&mut rooms, parse_room(&e)?),
                    b"exit" => {
                        if let Some(room) = current.as_mut() {
                            room.exits.push(parse_exit(&e)?);
                        }
                    }
                    tag => {
                        if let (Some(room), Some(f)) = (current.as_mut(), TextField::from_tag(tag)) {
                            *f.slot(room) = Some(String::new());
                        }
                    }
                },
                Event::Text(t) => {
                    if let (Some(room), Some(f)) = (current.as_mut(), field) {
                        let text = t.unescape().map_err(xml_err)?;
                        f.slot(room).get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"room" {
                        if let Some(room) = current.take() {
                            finish(&mut rooms, room);
                        }
                    }
                    field = None;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(PandoraDatabase { rooms })
    }
}
