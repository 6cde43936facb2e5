use indexmap::IndexMap;

use crate::mmapper::Database;
use crate::models::Room;
use crate::pandora::PandoraDatabase;

/// Id-keyed access to a room graph.
pub trait RoomLookup {
    fn room(&self, id: u32) -> Option<&Room>;
}

impl RoomLookup for IndexMap<u32, Room> {
    fn room(&self, id: u32) -> Option<&Room> { self.get(&id) }
}

/// Deathtraps are not part of the walkable graph.
impl RoomLookup for Database {
    fn room(&self, id: u32) -> Option<&Room> { self.rooms.get(&id) }
}

impl RoomLookup for PandoraDatabase {
    fn room(&self, id: u32) -> Option<&Room> { self.rooms.get(&id) }
}
