pub mod lookup;
pub mod search;
pub mod speedwalk;

pub use lookup::RoomLookup;
pub use search::{find_path, PathOutcome};
pub use speedwalk::speedwalk;
