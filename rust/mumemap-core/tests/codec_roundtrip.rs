mod common;

use common::{database, file, payload, room, RawRoom};
use mumemap_core::mmapper::version::FormatVersion;
use mumemap_core::models::{
    Align, Direction, Exit, ExitTarget, InfoMark, MarkClass, MarkPosition, MarkTime, MarkType, Room, SunDeath, Terrain,
};
use mumemap_core::{decode, decode_with, encode, Database, DecodeOptions, MapError};

const WITH_MARKS: DecodeOptions = DecodeOptions { read_newest_marks: true };

fn sample() -> Database {
    let mut inn = Room::new(10, Terrain::Indoors);
    inn.name = Some("The Prancing Pony".into());
    inn.desc = Some("Smoke curls under the rafters.\nÆlfwine was here.".into());
    inn.note = Some(String::new());
    inn.align = Align::Neutral;
    inn.sundeath = SunDeath::NoSunDeath;
    inn.mob_flags.insert("rent");
    inn.load_flags.insert("water");
    inn.position = [3, -7, 1];
    let mut door = Exit::new(Direction::North, ExitTarget::Room(11));
    door.exit_flags.insert("door");
    door.door_flags.insert("needkey");
    door.door = Some("oak door".into());
    inn.exits.push(door);
    inn.exits.push(Exit::new(Direction::Up, ExitTarget::Undefined));

    let mut street = Room::new(11, Terrain::City);
    street.exits.push(Exit::new(Direction::South, ExitTarget::Room(10)));
    street.exits.push(Exit::new(Direction::Down, ExitTarget::Room(12)));

    let mut db = Database { selected: [3, -7, 1], ..Database::default() };
    for r in [inn, street, Room::new(12, Terrain::Death)] {
        db.rooms.insert(r.id, r);
    }
    db.marks.push(InfoMark {
        name: Some("ford".into()),
        text: None,
        time: MarkTime { julian_day: 2_459_000, msecs: 1234, time_spec: 1 },
        kind: MarkType::Line,
        class: MarkClass::River,
        rotation: 12.34,
        pos1: MarkPosition { x: 1.5, y: -2.25, z: 0 },
        pos2: MarkPosition { x: 4.0, y: 0.01, z: 1 },
    });
    db
}

#[test]
fn encode_then_decode_preserves_everything() {
    let original = sample();
    let decoded = decode_with(&encode(&original).unwrap(), &WITH_MARKS).unwrap();

    assert_eq!(decoded.version, FormatVersion::V042);
    assert_eq!(decoded.selected, original.selected);
    assert_eq!(decoded.marks, original.marks);
    assert_eq!(decoded.rooms[&10], original.rooms[&10]);
    assert_eq!(decoded.rooms[&11].exit(Direction::Down).unwrap().to, ExitTarget::Death(Some(12)));
    assert_eq!(decoded.deathtraps.keys().copied().collect::<Vec<_>>(), vec![12]);

    let again = decode_with(&encode(&decoded).unwrap(), &WITH_MARKS).unwrap();
    assert_eq!(again, decoded);
}

#[test]
fn absent_text_stays_distinct_from_empty() {
    let decoded = decode(&encode(&sample()).unwrap()).unwrap();
    let inn = &decoded.rooms[&10];
    assert_eq!(inn.note.as_deref(), Some(""));
    assert_eq!(inn.dynamic_desc, None);
}

#[test]
fn room_flags_widen_at_041() {
    let rooms = [RawRoom { id: 1, name: "Hall", terrain: 1, mob_flags: 0b1000_0000_0000_0001, exits: &[(0, 1, Some(2))] }];
    for version in [FormatVersion::V040, FormatVersion::V041] {
        let db = decode(&database(version, &rooms, &["m"])).unwrap();
        let hall = &db.rooms[&1];
        assert!(hall.mob_flags.contains("rent") && hall.mob_flags.contains("reserved2"), "{version}");
        assert_eq!(hall.exits[0].to, ExitTarget::Room(2));
        assert_eq!(db.marks.len(), 1);
        assert_eq!(db.marks[0].class, MarkClass::Place);
        assert_eq!(db.marks[0].rotation, 90.0);
    }
    let old = decode(&database(FormatVersion::V031, &rooms, &["m"])).unwrap();
    assert_eq!(old.marks[0].class, MarkClass::Generic);
    assert_eq!(old.marks[0].pos2, MarkPosition { x: 3.0, y: 4.0, z: 0 });
}

#[test]
fn every_revision_decodes_the_same_graph() {
    static EXITS_A: [(usize, u32, Option<u32>); 2] = [(0, 1, Some(2)), (5, 1, Some(3))];
    static EXITS_B: [(usize, u32, Option<u32>); 1] = [(1, 1, Some(1))];
    let rooms = [room(1, 3, &EXITS_A), room(2, 4, &EXITS_B), room(3, 15, &[])];
    for version in FormatVersion::ALL {
        let db = decode_with(&database(version, &rooms, &[]), &WITH_MARKS).unwrap();
        assert_eq!(db.version, version);
        assert_eq!(db.rooms.len(), 2, "{version}");
        assert_eq!(db.rooms[&1].exit(Direction::Down).unwrap().to, ExitTarget::Death(Some(3)));
        assert_eq!(db.rooms[&2].exit(Direction::South).unwrap().to, ExitTarget::Room(1));
        assert_eq!(db.selected, [1, 2, 3]);
    }
}

#[test]
fn newest_revision_skips_marks_by_default() {
    let bytes = database(FormatVersion::V042, &[room(1, 0, &[])], &["a", "b"]);
    assert!(decode(&bytes).unwrap().marks.is_empty());
    assert_eq!(decode_with(&bytes, &WITH_MARKS).unwrap().marks.len(), 2);
}

#[test]
fn fewer_rooms_than_declared_is_incomplete() {
    let v = FormatVersion::V041;
    let bytes = file(v, &payload(v, 2, &[room(1, 0, &[])], &[]));
    assert!(matches!(decode(&bytes), Err(MapError::IncompleteData)));
}

fn many_rooms(v: FormatVersion) -> Vec<u8> {
    let rooms: Vec<RawRoom<'static>> = (1..=200).map(|id| room(id, 2, &[])).collect();
    database(v, &rooms, &[])
}

#[test]
fn file_cut_inside_the_stream_is_incomplete() {
    for v in [FormatVersion::V041, FormatVersion::V042] {
        let bytes = many_rooms(v);
        for cut in [9, 20, bytes.len() / 2, bytes.len() - 3] {
            assert!(
                matches!(decode(&bytes[..cut]), Err(MapError::IncompleteData)),
                "revision {v} cut at {cut} of {}",
                bytes.len()
            );
        }
    }
}

#[test]
fn corrupt_stream_is_a_decompression_error() {
    let mut bytes = database(FormatVersion::V040, &[room(1, 0, &[])], &[]);
    // everything after magic and version
    bytes[8..].fill(0xAA);
    assert!(matches!(decode(&bytes), Err(MapError::Decompression(_))));
}

#[test]
fn open_and_save_go_through_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arda.mm2");
    sample().save(&path).unwrap();
    let db = Database::open(&path).unwrap();
    assert_eq!(db.rooms.len(), 2);
    assert!(matches!(Database::open(dir.path().join("missing.mm2")), Err(MapError::Io(_))));
}
