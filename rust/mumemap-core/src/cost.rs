use crate::models::Terrain;

pub const DEFAULT_TERRAIN_COST: f64 = 5.0;

/// Prompt symbol and movement cost per terrain.
static TERRAIN_TABLE: &[(Terrain, Option<char>, f64)] = &[
    (Terrain::Indoors, Some('['), 1.0),
    (Terrain::City, Some('#'), 1.0),
    (Terrain::Road, Some('+'), 1.1),
    (Terrain::Field, Some('.'), 1.2),
    (Terrain::Cavern, Some('O'), 1.2),
    (Terrain::Tunnel, Some('='), 1.2),
    (Terrain::ShallowWater, Some('%'), 1.3),
    (Terrain::Forest, Some('f'), 1.4),
    (Terrain::Hills, Some('('), 2.0),
    (Terrain::Brush, Some(':'), 2.5),
    (Terrain::Mountains, Some('<'), 3.0),
    (Terrain::Undefined, None, DEFAULT_TERRAIN_COST),
    (Terrain::Water, Some('~'), 15.0),
    (Terrain::Rapids, Some('W'), 25.0),
    (Terrain::Underwater, Some('U'), 30.0),
    (Terrain::Random, Some('|'), 90.0),
    (Terrain::Death, Some('?'), 100.0),
];

fn entry(terrain: Terrain) -> Option<&'static (Terrain, Option<char>, f64)> {
    TERRAIN_TABLE.iter().find(|(t, _, _)| *t == terrain)
}

pub fn terrain_cost(terrain: Terrain) -> f64 {
    entry(terrain).map(|e| e.2).unwrap_or(DEFAULT_TERRAIN_COST)
}

pub fn terrain_symbol(terrain: Terrain) -> Option<char> {
    entry(terrain).and_then(|e| e.1)
}
