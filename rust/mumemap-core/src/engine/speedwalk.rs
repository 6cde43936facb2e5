use itertools::Itertools;

use crate::models::Direction;

/// Collapses runs of the same direction into `<count><code>`; single steps
/// are the bare code.
pub fn speedwalk(directions: &[Direction]) -> String {
    directions
        .iter()
        .dedup_with_count()
        .map(|(n, d)| if n > 1 { format!("{n}{}", d.code()) } else { d.code().to_string() })
        .collect()
}
