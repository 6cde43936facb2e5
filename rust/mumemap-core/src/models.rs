use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::cost;
use crate::error::MapError;
use crate::julian;
use crate::mmapper::flags::FlagSet;

pub type Coordinate = [i32; 3];

/// One-byte enumerations stored verbatim in room and mark records.
macro_rules! byte_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, default $default:ident {
        $($variant:ident = $value:literal => $label:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name { $($variant),+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn from_u8(value: u8) -> Result<Self, MapError> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(MapError::InvalidValue { field: $field, value: other as u32 }),
                }
            }

            pub fn to_u8(self) -> u8 {
                match self { $($name::$variant => $value),+ }
            }

            pub fn name(self) -> &'static str {
                match self { $($name::$variant => $label),+ }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.name().eq_ignore_ascii_case(name))
            }
        }

        impl Default for $name {
            fn default() -> Self { $name::$default }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> { s.serialize_str(self.name()) }
        }
    };
}

byte_enum!(Terrain, "terrain", default Undefined {
    Undefined = 0 => "UNDEFINED",
    Indoors = 1 => "INDOORS",
    City = 2 => "CITY",
    Field = 3 => "FIELD",
    Forest = 4 => "FOREST",
    Hills = 5 => "HILLS",
    Mountains = 6 => "MOUNTAINS",
    ShallowWater = 7 => "SHALLOWWATER",
    Water = 8 => "WATER",
    Rapids = 9 => "RAPIDS",
    Underwater = 10 => "UNDERWATER",
    Road = 11 => "ROAD",
    Brush = 12 => "BRUSH",
    Tunnel = 13 => "TUNNEL",
    Cavern = 14 => "CAVERN",
    Death = 15 => "DEATH",
    Random = 16 => "RANDOM",
});

byte_enum!(Light, "light", default Undefined {
    Undefined = 0 => "undefined",
    Dark = 1 => "dark",
    Lit = 2 => "lit",
});

byte_enum!(Align, "alignment", default Undefined {
    Undefined = 0 => "undefined",
    Good = 1 => "good",
    Neutral = 2 => "neutral",
    Evil = 3 => "evil",
});

byte_enum!(Portable, "portable", default Undefined {
    Undefined = 0 => "undefined",
    Portable = 1 => "portable",
    NotPortable = 2 => "notportable",
});

byte_enum!(Ridable, "ridable", default Undefined {
    Undefined = 0 => "undefined",
    Ridable = 1 => "ridable",
    NotRidable = 2 => "notridable",
});

byte_enum!(SunDeath, "sundeath", default Undefined {
    Undefined = 0 => "undefined",
    SunDeath = 1 => "sundeath",
    NoSunDeath = 2 => "nosundeath",
});

byte_enum!(MarkType, "mark type", default Text {
    Text = 0 => "text",
    Line = 1 => "line",
    Arrow = 2 => "arrow",
});

byte_enum!(MarkClass, "mark class", default Generic {
    Generic = 0 => "generic",
    Herb = 1 => "herb",
    River = 2 => "river",
    Place = 3 => "place",
    Mob = 4 => "mob",
    Comment = 5 => "comment",
    Road = 6 => "road",
    Object = 7 => "object",
    Action = 8 => "action",
    Locality = 9 => "locality",
});

/// Exit slots in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
    Unknown,
}

impl Direction {
    pub const ALL: [Direction; 7] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::Unknown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Unknown => "unknown",
        }
    }

    /// Single-character speedwalk code.
    pub fn code(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Unknown => '?',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| code.len() == 1 && code.starts_with(d.code()))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

/// Where an exit leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitTarget {
    /// No outbound connection was recorded.
    Undefined,
    /// The target is a deathtrap, held outside the room map. The id is
    /// unknown for sources that only record the fact.
    Death(Option<u32>),
    Room(u32),
}

impl ExitTarget {
    /// Id written back to the outbound connection list.
    pub fn wire_id(self) -> Option<u32> {
        match self {
            ExitTarget::Undefined => None,
            ExitTarget::Death(id) => id,
            ExitTarget::Room(id) => Some(id),
        }
    }

    pub fn room_id(self) -> Option<u32> {
        match self {
            ExitTarget::Room(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitTarget::Undefined => f.write_str("UNDEFINED"),
            ExitTarget::Death(_) => f.write_str("DEATH"),
            ExitTarget::Room(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for ExitTarget {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> { s.collect_str(self) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exit {
    pub direction: Direction,
    pub exit_flags: FlagSet,
    pub door_flags: FlagSet,
    pub door: Option<String>,
    pub to: ExitTarget,
}

impl Exit {
    pub fn new(direction: Direction, to: ExitTarget) -> Self {
        let mut exit_flags = FlagSet::new();
        exit_flags.insert("exit");
        Self { direction, exit_flags, door_flags: FlagSet::new(), door: None, to }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Room {
    pub id: u32,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub dynamic_desc: Option<String>,
    pub note: Option<String>,
    pub terrain: Terrain,
    pub light: Light,
    pub align: Align,
    pub portable: Portable,
    pub ridable: Ridable,
    pub sundeath: SunDeath,
    pub mob_flags: FlagSet,
    pub load_flags: FlagSet,
    pub updated: bool,
    pub position: Coordinate,
    pub exits: Vec<Exit>,
}

impl Room {
    pub fn new(id: u32, terrain: Terrain) -> Self { Self { id, terrain, ..Self::default() } }

    /// Movement cost of entering this room.
    pub fn cost(&self) -> f64 { cost::terrain_cost(self.terrain) }

    pub fn symbol(&self) -> Option<char> { cost::terrain_symbol(self.terrain) }

    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.exits.iter().find(|e| e.direction == direction)
    }
}

/// Raw time fields of a mark: Julian day, milliseconds since midnight and
/// time spec (0 local, 1 UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MarkTime {
    pub julian_day: u32,
    pub msecs: u32,
    pub time_spec: u8,
}

impl MarkTime {
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let msecs = if self.msecs == u32::MAX { 0 } else { self.msecs };
        julian::to_datetime(self.julian_day, msecs)
    }

    pub fn is_utc(&self) -> bool { self.time_spec == 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MarkPosition {
    pub x: f64,
    pub y: f64,
    pub z: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InfoMark {
    pub name: Option<String>,
    pub text: Option<String>,
    pub time: MarkTime,
    pub kind: MarkType,
    pub class: MarkClass,
    pub rotation: f64,
    pub pos1: MarkPosition,
    pub pos2: MarkPosition,
}
