use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::trace;

use super::lookup::RoomLookup;
use super::speedwalk::speedwalk;
use crate::models::{Direction, Room};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PathOutcome {
    Found { directions: Vec<Direction>, cost: f64 },
    AlreadyThere,
    NoRoute,
    InvalidEndpoint,
}

impl PathOutcome {
    pub fn speedwalk(&self) -> Option<String> {
        match self {
            PathOutcome::Found { directions, .. } => Some(speedwalk(directions)),
            _ => None,
        }
    }
}

impl fmt::Display for PathOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathOutcome::Found { directions, .. } => f.write_str(&speedwalk(directions)),
            PathOutcome::AlreadyThere => f.write_str("You are already there!"),
            PathOutcome::NoRoute => f.write_str("No routes found."),
            PathOutcome::InvalidEndpoint => f.write_str("Error: Invalid origin or destination."),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct QueueNode {
    cost: f64,
    seq: u64,
    room: u32,
}

impl PartialEq for QueueNode { fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal } }
impl Eq for QueueNode {}
impl PartialOrd for QueueNode { fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) } }
impl Ord for QueueNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is max-heap; invert for lowest cost first, earliest discovery on ties
        other.cost.total_cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Endpoints resolve even when the graph itself does not hold them.
struct View<'a, G: ?Sized> {
    graph: &'a G,
    origin: &'a Room,
    destination: &'a Room,
}

impl<'a, G: RoomLookup + ?Sized> View<'a, G> {
    fn room(&self, id: u32) -> Option<&'a Room> {
        if id == self.origin.id {
            Some(self.origin)
        } else if id == self.destination.id {
            Some(self.destination)
        } else {
            self.graph.room(id)
        }
    }
}

/// Cheapest route from `origin` to `destination`, where entering a room costs
/// that room's terrain cost.
pub fn find_path<G: RoomLookup + ?Sized>(origin: Option<&Room>, destination: Option<&Room>, graph: &G) -> PathOutcome {
    let (Some(origin), Some(destination)) = (origin, destination) else {
        return PathOutcome::InvalidEndpoint;
    };
    if origin.id == destination.id {
        return PathOutcome::AlreadyThere;
    }
    let view = View { graph, origin, destination };

    let mut open = BinaryHeap::new();
    let mut best: FxHashMap<u32, f64> = FxHashMap::default();
    let mut parent: FxHashMap<u32, u32> = FxHashMap::default();
    let mut seq: u64 = 0;
    let mut expanded: u64 = 0;

    best.insert(origin.id, 0.0);
    open.push(QueueNode { cost: 0.0, seq, room: origin.id });

    while let Some(node) = open.pop() {
        // Discard stale
        if best.get(&node.room).is_some_and(|b| node.cost > *b) {
            continue;
        }
        expanded += 1;
        if node.room == destination.id {
            trace!(expanded, cost = node.cost, "route found");
            let directions = reconstruct(&view, &parent, destination.id);
            return PathOutcome::Found { directions, cost: node.cost };
        }
        let Some(room) = view.room(node.room) else { continue };
        for exit in &room.exits {
            let Some(next_id) = exit.to.room_id() else { continue };
            let Some(next) = view.room(next_id) else { continue };
            let cost = node.cost + next.cost();
            if best.get(&next_id).map_or(true, |b| cost < *b) {
                best.insert(next_id, cost);
                parent.insert(next_id, node.room);
                seq += 1;
                open.push(QueueNode { cost, seq, room: next_id });
            }
        }
    }

    trace!(expanded, "frontier exhausted");
    PathOutcome::NoRoute
}

fn reconstruct<G: RoomLookup + ?Sized>(view: &View<'_, G>, parent: &FxHashMap<u32, u32>, destination: u32) -> Vec<Direction> {
    let mut directions = Vec::new();
    let mut current = destination;
    while let Some(&prev) = parent.get(&current) {
        let step = view.room(prev).and_then(|room| {
            Direction::ALL
                .into_iter()
                .find(|d| room.exit(*d).is_some_and(|e| e.to.room_id() == Some(current)))
        });
        if let Some(d) = step {
            directions.push(d);
        }
        current = prev;
    }
    directions.reverse();
    directions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exit, ExitTarget, Terrain};
    use indexmap::IndexMap;

    fn link(map: &mut IndexMap<u32, Room>, from: u32, dir: Direction, to: ExitTarget) {
        map.get_mut(&from).unwrap().exits.push(Exit::new(dir, to));
    }

    fn rooms(layout: &[(u32, Terrain)]) -> IndexMap<u32, Room> {
        layout.iter().map(|(id, t)| (*id, Room::new(*id, *t))).collect()
    }

    #[test]
    fn cheaper_route_beats_water_detour() {
        // A indoors (1.0), B field (1.2), C city (1.0); D water is a detour
        let mut g = rooms(&[(1, Terrain::Indoors), (2, Terrain::Field), (3, Terrain::City), (4, Terrain::Water)]);
        link(&mut g, 1, Direction::East, ExitTarget::Room(2));
        link(&mut g, 2, Direction::East, ExitTarget::Room(3));
        link(&mut g, 1, Direction::South, ExitTarget::Room(4));
        link(&mut g, 4, Direction::East, ExitTarget::Room(3));

        let out = find_path(g.get(&1), g.get(&3), &g);
        let PathOutcome::Found { directions, cost } = &out else { panic!("expected a route, got {out:?}") };
        assert_eq!(directions, &vec![Direction::East, Direction::East]);
        assert!((cost - 2.2).abs() < 1e-9);
        assert_eq!(out.to_string(), "2e");
    }

    #[test]
    fn same_room_is_already_there() {
        let g = rooms(&[(1, Terrain::Road)]);
        let out = find_path(g.get(&1), g.get(&1), &g);
        assert_eq!(out, PathOutcome::AlreadyThere);
        assert_eq!(out.to_string(), "You are already there!");
    }

    #[test]
    fn missing_endpoint_is_invalid() {
        let g = rooms(&[(1, Terrain::Road)]);
        assert_eq!(find_path(g.get(&1), g.get(&9), &g), PathOutcome::InvalidEndpoint);
        assert_eq!(PathOutcome::InvalidEndpoint.to_string(), "Error: Invalid origin or destination.");
    }

    #[test]
    fn untraversable_exits_give_no_route() {
        let mut g = rooms(&[(1, Terrain::Road), (2, Terrain::Road)]);
        link(&mut g, 1, Direction::North, ExitTarget::Undefined);
        link(&mut g, 1, Direction::South, ExitTarget::Death(None));
        link(&mut g, 1, Direction::East, ExitTarget::Room(42));
        link(&mut g, 2, Direction::West, ExitTarget::Room(1));
        let out = find_path(g.get(&1), g.get(&2), &g);
        assert_eq!(out, PathOutcome::NoRoute);
        assert_eq!(out.to_string(), "No routes found.");
        assert_eq!(out.speedwalk(), None);
    }

    #[test]
    fn first_exit_in_direction_order_names_the_step() {
        let mut g = rooms(&[(1, Terrain::Road), (2, Terrain::Road)]);
        link(&mut g, 1, Direction::Up, ExitTarget::Room(2));
        link(&mut g, 1, Direction::North, ExitTarget::Room(2));
        let out = find_path(g.get(&1), g.get(&2), &g);
        assert_eq!(out.speedwalk().as_deref(), Some("n"));
    }

    #[test]
    fn serializes_with_outcome_tag() {
        let out = PathOutcome::Found { directions: vec![Direction::Up], cost: 1.0 };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["outcome"], "found");
        assert_eq!(json["directions"][0], "up");
        assert_eq!(serde_json::to_value(PathOutcome::NoRoute).unwrap()["outcome"], "no_route");
    }
}
