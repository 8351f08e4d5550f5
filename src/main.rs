use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::{error, info};

use handparts::import::{read_song_info, SONG_INFO_FILE};
use handparts::metadata::unique_id;
use handparts::split::{assign_roles_from_bytes, SongAssignment};
use handparts::{decode_parts, import_song_file, Config, PartTable, PartsError, Result, Role};

#[derive(Parser)]
#[command(name = "handparts")]
#[command(about = "Import and inspect per-measure hand assignments of Synthesia songs")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Synthesia data directory (overrides the configuration file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a .synthesia metadata file for every song in a folder
    Import {
        /// Folder to read song files from. Defaults to the current directory.
        #[arg(short, long)]
        folder: Option<PathBuf>,
    },
    /// Print the decoded form of a parts string
    Decode {
        /// Parts string, e.g. "t0:m-1:Lm0:L3R2-4"
        parts: String,
    },
    /// Show which role each note of a song is given
    Report {
        /// MIDI file to inspect
        midi: PathBuf,
        /// Parts string to apply instead of the one in songInfo.xml
        #[arg(long)]
        parts: Option<String>,
        /// List every note instead of per-track totals
        #[arg(long)]
        notes: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("handparts=info"))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    match args.command {
        Command::Import { folder } => import_folder(folder, &config),
        Command::Decode { parts } => print_decoded(&parts),
        Command::Report { midi, parts, notes } => report(&midi, parts, notes, &config),
    }
}

fn import_folder(folder: Option<PathBuf>, config: &Config) -> Result<()> {
    let folder = match folder {
        Some(folder) => folder,
        None => env::current_dir().map_err(|e| PartsError::Io {
            path: PathBuf::from("."),
            source: e,
        })?,
    };

    let entries = fs::read_dir(&folder).map_err(|e| PartsError::Io {
        path: folder.clone(),
        source: e,
    })?;
    let mut songs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && config.is_song_file(path))
        .collect();
    songs.sort();

    if songs.is_empty() {
        info!("No song files found in {}", folder.display());
        return Ok(());
    }

    for song in songs {
        match import_song_file(&song, &folder, config) {
            Ok(import) => {
                let title = import.song().map(|s| s.title.as_str()).unwrap_or_default();
                println!("{} - Imported: {}", title, import.imported_summary());
            }
            Err(e) => error!("{}: {}", song.display(), e),
        }
    }

    Ok(())
}

fn print_decoded(raw: &str) -> Result<()> {
    let parts = decode_parts(raw)?;
    let yaml = serde_yaml::to_string(&parts).map_err(|e| PartsError::OutputError(e.to_string()))?;
    print!("{}", yaml);
    Ok(())
}

fn report(midi: &Path, parts: Option<String>, list_notes: bool, config: &Config) -> Result<()> {
    let bytes = fs::read(midi).map_err(|e| PartsError::Io {
        path: midi.to_path_buf(),
        source: e,
    })?;

    let raw = match parts {
        Some(parts) => parts,
        None => stored_parts(&bytes, config)?,
    };
    let parts: PartTable = decode_parts(&raw)?;
    let assignment = assign_roles_from_bytes(&bytes, &parts)?;

    if list_notes {
        let yaml = serde_yaml::to_string(&assignment)
            .map_err(|e| PartsError::OutputError(e.to_string()))?;
        print!("{}", yaml);
    } else {
        print_summary(&assignment);
    }
    Ok(())
}

/// Parts recorded for a song in the data directory's songInfo.xml
fn stored_parts(bytes: &[u8], config: &Config) -> Result<String> {
    let hash = unique_id(bytes);
    let infos = read_song_info(&config.data_dir.join(SONG_INFO_FILE))?;

    match infos.into_iter().find(|info| info.hash == hash) {
        Some(info) => Ok(info.parts),
        None => {
            info!("No parts recorded for song {}; every note is ignored", hash);
            Ok(String::new())
        }
    }
}

fn print_summary(assignment: &SongAssignment) {
    for track in &assignment.tracks {
        let counts = Role::ALL
            .iter()
            .filter(|role| track.count(**role) > 0)
            .map(|role| format!("{} {}", role, track.count(*role)))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "Track {}: {} notes ({}), dominant hand: {}",
            track.track,
            track.notes.len(),
            counts,
            track.dominant_hand()
        );
    }
}
