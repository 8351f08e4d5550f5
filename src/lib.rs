pub mod config;
pub mod error;
pub mod import;
pub mod metadata;
pub mod parts;
pub mod role;
pub mod split;

use std::path::{Path, PathBuf};

use log::warn;

pub use config::Config;
pub use error::*;
pub use import::{ImportKind, ImportOptions, ImportResults};
pub use metadata::{MetadataFile, SongEntry};
pub use parts::*;
pub use role::Role;
pub use split::SongAssignment;

/// Label every note of a MIDI song with the role its parts string gives it.
/// This is the main entry point for the library.
pub fn assign_song(midi: &[u8], parts: &str) -> Result<SongAssignment> {
    let parts = decode_parts(parts)?;
    split::assign_roles_from_bytes(midi, &parts)
}

/// Outcome of importing the metadata of one song file.
#[derive(Debug, Clone)]
pub struct SongImport {
    pub metadata: MetadataFile,
    pub results: Vec<(ImportKind, ImportResults)>,
    /// Where the `.synthesia` file was written
    pub output: PathBuf,
}

impl SongImport {
    pub fn song(&self) -> Option<&SongEntry> {
        self.metadata.songs().next()
    }

    /// Kinds of metadata found for the song, e.g. `finger hints, parts`.
    pub fn imported_summary(&self) -> String {
        self.results
            .iter()
            .filter(|(_, results)| results.imported > 0)
            .map(|(kind, _)| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Import the data-directory metadata of one song file and save it as
/// `<title>.synthesia` in `output_dir`.
pub fn import_song_file(song_path: &Path, output_dir: &Path, config: &Config) -> Result<SongImport> {
    let song = SongEntry::for_file(song_path)?;
    let output = output_dir.join(format!("{}.synthesia", song.title));

    let mut metadata = MetadataFile::new();
    metadata.add_song(song);

    let results = import::import_all(&mut metadata, &config.data_dir, config.import);

    if let Some(song) = metadata.songs().next() {
        if !song.parts.is_empty() {
            // kept as imported even when it does not decode
            if let Err(e) = decode_parts(&song.parts) {
                warn!("{}: imported parts do not decode: {}", song.title, e);
            }
        }
    }

    metadata.save(&output)?;
    Ok(SongImport {
        metadata,
        results,
        output,
    })
}
