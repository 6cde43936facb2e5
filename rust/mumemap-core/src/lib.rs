pub mod cost;
pub mod engine;
pub mod error;
pub mod julian;
pub mod mmapper;
pub mod models;
pub mod pandora;
pub mod settings;

pub use engine::{find_path, speedwalk, PathOutcome, RoomLookup};
pub use error::{MapError, Result};
pub use mmapper::{decode, decode_with, encode, Database, DecodeOptions};
pub use pandora::PandoraDatabase;
pub use settings::Settings;
