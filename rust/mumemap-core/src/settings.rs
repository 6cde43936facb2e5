use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::RoomLookup;
use crate::error::{MapError, Result};

/// Environment variable naming the settings file when no path is given.
pub const CONFIG_ENV: &str = "MUMEMAP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Room labels usable wherever a room id is expected.
    pub labels: BTreeMap<String, u32>,
    /// Room the last route started from or ended in.
    pub last_id: Option<u32>,
    pub brief: bool,
    pub show_id: bool,
    pub use_terrain_symbols: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelChange {
    Added { name: String, room: u32 },
    Removed { name: String },
}

impl fmt::Display for LabelChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelChange::Added { name, room } => write!(f, "label {name} added for room ID {room}."),
            LabelChange::Removed { name } => write!(f, "Label {name} removed."),
        }
    }
}

/// `explicit` if given, else the path in `MUMEMAP_CONFIG`.
pub fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
}

impl Settings {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).map_err(|e| MapError::Settings(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self).map_err(|e| MapError::Settings(e.to_string()))?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Room id for a label or a numeric id.
    pub fn resolve(&self, token: &str) -> Option<u32> {
        self.labels.get(token).copied().or_else(|| token.parse().ok())
    }

    /// Points `name` at `target`, or removes it when `target` is `none`.
    pub fn label<G: RoomLookup + ?Sized>(&mut self, name: &str, target: &str, graph: &G) -> Result<LabelChange> {
        if target == "none" {
            return match self.labels.remove(name) {
                Some(_) => Ok(LabelChange::Removed { name: name.to_string() }),
                None => Err(MapError::Settings(format!("no label named {name}"))),
            };
        }
        let room = target
            .parse::<u32>()
            .ok()
            .filter(|id| graph.room(*id).is_some())
            .ok_or_else(|| MapError::Settings(format!("invalid room ID {target}")))?;
        self.labels.insert(name.to_string(), room);
        Ok(LabelChange::Added { name: name.to_string(), room })
    }
}
