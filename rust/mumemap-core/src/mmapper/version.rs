//! Format revisions and the field-width matrix.
//!
//! Every width that differs between revisions is answered by [`width`], so the
//! support matrix for the four known revisions lives in one table:
//!
//! | field         | 031 | 040 | 041 | 042 |
//! |---------------|-----|-----|-----|-----|
//! | size header   |  0  |  0  |  0  |  4  |
//! | sundeath      |  0  |  0  |  1  |  1  |
//! | room flags    |  2  |  2  |  4  |  4  |
//! | exit flags    |  1  |  1  |  2  |  2  |
//! | door flags    |  1  |  2  |  2  |  2  |
//! | mark class    |  0  |  1  |  1  |  1  |
//! | mark rotation |  0  |  4  |  4  |  4  |

use serde::{Serialize, Serializer};

use crate::error::MapError;

pub const MMAPPER_MAGIC: u32 = 0xFFB2_AF01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    V031,
    V040,
    V041,
    V042,
}

impl FormatVersion {
    pub const NEWEST: FormatVersion = FormatVersion::V042;
    pub const ALL: [FormatVersion; 4] = [
        FormatVersion::V031,
        FormatVersion::V040,
        FormatVersion::V041,
        FormatVersion::V042,
    ];

    pub fn from_raw(raw: i32) -> Result<Self, MapError> {
        match raw {
            0o31 => Ok(FormatVersion::V031),
            0o40 => Ok(FormatVersion::V040),
            0o41 => Ok(FormatVersion::V041),
            0o42 => Ok(FormatVersion::V042),
            other => Err(MapError::UnsupportedVersion(other)),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            FormatVersion::V031 => 0o31,
            FormatVersion::V040 => 0o40,
            FormatVersion::V041 => 0o41,
            FormatVersion::V042 => 0o42,
        }
    }

    /// Mark sections written by the first 042 release are unreliable and are
    /// not read unless the caller opts in.
    pub fn marks_reliable(self) -> bool {
        self != FormatVersion::V042
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0{:o}", self.raw())
    }
}

impl Serialize for FormatVersion {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> { s.collect_str(self) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Uncompressed payload length ahead of the zlib stream.
    SizeHeader,
    SunDeath,
    /// Room mob and load flags.
    RoomFlags,
    ExitFlags,
    DoorFlags,
    MarkClass,
    MarkRotation,
}

/// Width in bytes of `field` under `version`; 0 means the field is absent.
pub fn width(field: FieldKind, version: FormatVersion) -> usize {
    use FieldKind::*;
    use FormatVersion::*;
    match (field, version) {
        (SizeHeader, V042) => 4,
        (SizeHeader, _) => 0,
        (SunDeath, V041 | V042) => 1,
        (SunDeath, _) => 0,
        (RoomFlags, V041 | V042) => 4,
        (RoomFlags, _) => 2,
        (ExitFlags, V041 | V042) => 2,
        (ExitFlags, _) => 1,
        (DoorFlags, V031) => 1,
        (DoorFlags, _) => 2,
        (MarkClass, V031) => 0,
        (MarkClass, _) => 1,
        (MarkRotation, V031) => 0,
        (MarkRotation, _) => 4,
    }
}
