use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mumemap_core::mmapper::repair::repair;
use mumemap_core::models::Room;
use mumemap_core::settings::{config_path, Settings};
use mumemap_core::{find_path, Database, DecodeOptions, PandoraDatabase, PathOutcome, RoomLookup};

#[derive(Parser, Debug)]
#[command(name = "mumemap", version, about = "Repair MMapper map databases and find routes between rooms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild a database from the rooms of a corrupted file and the info marks of an older one
    Repair {
        /// Database whose rooms are kept
        #[arg(short = 'c', long, value_name = "PATH")]
        corrupted: PathBuf,
        /// Database whose info marks are kept
        #[arg(short = 'p', long, value_name = "PATH")]
        previous: PathBuf,
        /// Output file, written only when both inputs decode
        #[arg(short = 'o', long, value_name = "PATH")]
        output: PathBuf,
    },
    /// Print the speedwalk between two rooms
    Path {
        #[command(flatten)]
        source: Source,
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
        /// [ORIGIN] DESTINATION as room ids or labels; the origin defaults to the last room
        #[arg(value_name = "ROOM", num_args = 1..=2, required = true)]
        rooms: Vec<String>,
    },
    /// Print database statistics
    Info {
        #[command(flatten)]
        source: Source,
        /// Dump the whole database as JSON
        #[arg(long)]
        json: bool,
        /// Decode the info marks of 042 files, which are skipped by default
        #[arg(long)]
        newest_marks: bool,
    },
    /// Add a room label, or remove it with `none`
    Label {
        #[command(flatten)]
        source: Source,
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        name: String,
        /// Room id, `none`, or omitted for the last room
        target: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Source {
    /// Database file
    #[arg(value_name = "DB")]
    db: PathBuf,
    /// Read a Pandora XML database instead of an MMapper one
    #[arg(long)]
    pandora: bool,
}

enum World {
    MMapper(Database),
    Pandora(PandoraDatabase),
}

impl RoomLookup for World {
    fn room(&self, id: u32) -> Option<&Room> {
        match self {
            World::MMapper(db) => db.room(id),
            World::Pandora(db) => db.room(id),
        }
    }
}

impl Source {
    fn load(&self) -> Result<World> { self.load_with(&DecodeOptions::default()) }

    fn load_with(&self, options: &DecodeOptions) -> Result<World> {
        let world = if self.pandora {
            World::Pandora(PandoraDatabase::open(&self.db).with_context(|| format!("failed to load {:?}", self.db))?)
        } else {
            World::MMapper(Database::open_with(&self.db, options).with_context(|| format!("failed to load {:?}", self.db))?)
        };
        Ok(world)
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<(Settings, Option<PathBuf>)> {
    let path = config_path(config);
    let settings = match &path {
        Some(p) => Settings::load(p).with_context(|| format!("failed to read settings {:?}", p))?,
        None => Settings::default(),
    };
    Ok((settings, path))
}

/// Prompt-style line for the room a route ends in.
fn describe(room: &Room, settings: &Settings) -> String {
    let terrain = if settings.use_terrain_symbols {
        room.symbol().map(String::from).unwrap_or_default()
    } else {
        room.terrain.to_string()
    };
    let mut line = format!("{terrain}> {}", room.name.as_deref().unwrap_or_default());
    if settings.show_id {
        line.push_str(&format!(" [{}]", room.id));
    }
    line
}

fn run_repair(corrupted: &Path, previous: &Path, output: &Path) -> Result<()> {
    info!(?corrupted, ?previous, "repairing database");
    let bytes = repair(corrupted, previous).with_context(|| format!("failed to repair {:?}", corrupted))?;
    fs::write(output, &bytes).with_context(|| format!("failed to write {:?}", output))?;
    info!(?output, bytes = bytes.len(), "wrote repaired database");
    Ok(())
}

fn run_path(source: &Source, config: Option<PathBuf>, json: bool, rooms: &[String]) -> Result<()> {
    let (mut settings, settings_path) = load_settings(config)?;
    let world = source.load()?;

    let (origin_id, destination_id) = match rooms {
        [destination] => (settings.last_id, settings.resolve(destination)),
        [origin, destination, ..] => (settings.resolve(origin), settings.resolve(destination)),
        [] => anyhow::bail!("no destination given"),
    };
    let origin = origin_id.and_then(|id| world.room(id));
    let destination = destination_id.and_then(|id| world.room(id));
    let outcome = find_path(origin, destination, &world);

    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        println!("{outcome}");
    }

    if let (PathOutcome::Found { .. }, Some(room)) = (&outcome, destination) {
        if !json && !settings.brief {
            println!("{}", describe(room, &settings));
        }
        if let Some(path) = &settings_path {
            settings.last_id = Some(room.id);
            settings.save(path).with_context(|| format!("failed to write settings {:?}", path))?;
        }
    }
    Ok(())
}

fn run_info(source: &Source, json: bool, newest_marks: bool) -> Result<()> {
    let world = source.load_with(&DecodeOptions { read_newest_marks: newest_marks })?;
    if json {
        let text = match &world {
            World::MMapper(db) => serde_json::to_string_pretty(db)?,
            World::Pandora(db) => serde_json::to_string_pretty(db)?,
        };
        println!("{text}");
        return Ok(());
    }
    match world {
        World::MMapper(db) => {
            println!("version: {}", db.version);
            println!("rooms: {}", db.rooms.len());
            println!("deathtraps: {}", db.deathtraps.len());
            println!("marks: {}", db.marks.len());
            let [x, y, z] = db.selected;
            println!("selected: {x}, {y}, {z}");
        }
        World::Pandora(db) => println!("rooms: {}", db.rooms.len()),
    }
    Ok(())
}

fn run_label(source: &Source, config: Option<PathBuf>, name: &str, target: Option<&str>) -> Result<()> {
    let (mut settings, settings_path) = load_settings(config)?;
    let settings_path = settings_path.context("no settings file; pass --config or set MUMEMAP_CONFIG")?;
    let world = source.load()?;
    let target = match target {
        Some(t) => t.to_string(),
        None => settings.last_id.context("no target room and no last room recorded")?.to_string(),
    };
    let change = settings.label(name, &target, &world)?;
    settings.save(&settings_path).with_context(|| format!("failed to write settings {:?}", settings_path))?;
    println!("{change}");
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();
    match cli.command {
        Command::Repair { corrupted, previous, output } => run_repair(&corrupted, &previous, &output),
        Command::Path { source, config, json, rooms } => run_path(&source, config, json, &rooms),
        Command::Info { source, json, newest_marks } => run_info(&source, json, newest_marks),
        Command::Label { source, config, name, target } => run_label(&source, config, &name, target.as_deref()),
    }
}
