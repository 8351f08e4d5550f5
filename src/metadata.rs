//! # Song Metadata
//!
//! Song entries keyed by a content hash, and the `.synthesia` metadata file
//! they are saved into.
//!
//! ## Example
//! ```rust
//! use handparts::{MetadataFile, SongEntry};
//!
//! let mut metadata = MetadataFile::new();
//! metadata.add_song(SongEntry {
//!     unique_id: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
//!     title: "Prelude".to_string(),
//!     parts: "t0:m0:L3".to_string(),
//!     ..Default::default()
//! });
//!
//! let xml = metadata.to_xml();
//! assert!(xml.contains(r#"Title="Prelude""#));
//! assert!(xml.contains(r#"Parts="t0:m0:L3""#));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::{PartsError, Result};

/// Metadata for one song, identified by the hash of its file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SongEntry {
    pub unique_id: String,
    pub title: String,
    pub parts: String,
    pub hand_parts: String,
    pub finger_hints: String,
}

impl SongEntry {
    /// Entry for a song file: hashed contents and the file name without extension.
    pub fn for_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| PartsError::io(path, e))?;
        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            unique_id: unique_id(&bytes),
            title,
            ..Default::default()
        })
    }
}

/// Lowercase hex MD5 of a song file's contents.
pub fn unique_id(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

/// A set of song entries, saved as one `.synthesia` file.
#[derive(Debug, Clone, Default)]
pub struct MetadataFile {
    songs: BTreeMap<String, SongEntry>,
}

impl MetadataFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a song, replacing any entry with the same unique id.
    pub fn add_song(&mut self, song: SongEntry) {
        self.songs.insert(song.unique_id.clone(), song);
    }

    pub fn songs(&self) -> impl Iterator<Item = &SongEntry> {
        self.songs.values()
    }

    pub fn songs_mut(&mut self) -> impl Iterator<Item = &mut SongEntry> {
        self.songs.values_mut()
    }

    pub fn song(&self, unique_id: &str) -> Option<&SongEntry> {
        self.songs.get(unique_id)
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Render the metadata file. Empty fields are left out.
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<SynthesiaMetadata Version="1">"#);
        xml.push('\n');

        xml.push_str("  <Songs>\n");
        for song in self.songs.values() {
            xml.push_str(&song_to_xml(song));
        }
        xml.push_str("  </Songs>\n");

        xml.push_str("</SynthesiaMetadata>\n");
        xml
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_xml()).map_err(|e| PartsError::io(path, e))
    }
}

fn song_to_xml(song: &SongEntry) -> String {
    let attributes = [
        ("UniqueId", &song.unique_id),
        ("Title", &song.title),
        ("Parts", &song.parts),
        ("HandParts", &song.hand_parts),
        ("FingerHints", &song.finger_hints),
    ];

    let mut xml = String::from("    <Song");
    for (name, value) in attributes {
        if value.is_empty() {
            continue;
        }
        xml.push_str(&format!(" {}=\"{}\"", name, escape_xml(value)));
    }
    xml.push_str(" />\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
