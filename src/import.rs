//! # Data Directory Import
//!
//! Pulls finger hints, hand parts, and parts for known songs out of the
//! Synthesia data directory and merges them into a [`MetadataFile`].
//!
//! ## Source Files
//! - `fingers.xml` - `LocalFingerInfoList` of `FingerInfo hash=".." fingers=".."`
//! - `songInfo.xml` - `LocalSongInfoList` of `SongInfo hash=".." parts=".."
//!   leftHand=".." rightHand=".." bothHands=".."`
//!
//! Both files carry a `version` attribute on their root element. Only
//! version `1` (the default when absent) is understood.
//!
//! ## Results
//! Each import reports an [`ImportResults`]. A missing or unreadable file is
//! logged and reported through `problem_encountered` instead of failing the
//! whole run, so the remaining imports still happen.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{error, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;

use crate::error::{PartsError, Result};
use crate::metadata::MetadataFile;

pub const FINGERS_FILE: &str = "fingers.xml";
pub const SONG_INFO_FILE: &str = "songInfo.xml";

const SUPPORTED_VERSION: &str = "1";

/// Counts for one kind of import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportResults {
    pub imported: usize,
    pub changed: usize,
    pub identical: usize,
    pub problem_encountered: bool,
}

impl ImportResults {
    fn problem() -> Self {
        Self {
            problem_encountered: true,
            ..Default::default()
        }
    }

    pub fn to_display_string(&self, kind: ImportKind) -> String {
        if self.problem_encountered {
            return format!("Unable to import {}.", kind);
        }

        if self.imported == 0 {
            return String::new();
        }

        format!(
            "Imported {} for {} song{}.  ({} changed, {} identical.)",
            kind,
            self.imported,
            if self.imported == 1 { "" } else { "s" },
            self.changed,
            self.identical
        )
    }

    fn record(&mut self, old: &mut String, new: String) {
        self.imported += 1;
        if *old == new {
            self.identical += 1;
        } else {
            *old = new;
            self.changed += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    FingerHints,
    HandParts,
    Parts,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportKind::FingerHints => "finger hints",
            ImportKind::HandParts => "hand parts",
            ImportKind::Parts => "parts",
        };
        f.write_str(name)
    }
}

/// Which imports to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ImportOptions {
    pub finger_hints: bool,
    pub hand_parts: bool,
    pub parts: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            finger_hints: true,
            hand_parts: true,
            parts: true,
        }
    }
}

/// One `SongInfo` record of `songInfo.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SongInfo {
    pub hash: String,
    pub parts: String,
    pub left_hand: String,
    pub right_hand: String,
    pub both_hands: String,
}

impl SongInfo {
    fn has_hand_parts(&self) -> bool {
        [&self.left_hand, &self.right_hand, &self.both_hands]
            .iter()
            .any(|value| !value.trim().is_empty())
    }

    /// Hand parts as stored in song metadata: `left;right;both`.
    pub fn hand_parts(&self) -> String {
        [
            self.left_hand.as_str(),
            self.right_hand.as_str(),
            self.both_hands.as_str(),
        ]
        .join(";")
    }
}

/// Read every `SongInfo` record of a `songInfo.xml` file.
pub fn read_song_info(path: &Path) -> Result<Vec<SongInfo>> {
    let records = read_records(path, "LocalSongInfoList", "SongInfo")?;
    Ok(records
        .into_iter()
        .map(|mut record| SongInfo {
            hash: record.remove("hash").unwrap_or_default(),
            parts: record.remove("parts").unwrap_or_default(),
            left_hand: record.remove("leftHand").unwrap_or_default(),
            right_hand: record.remove("rightHand").unwrap_or_default(),
            both_hands: record.remove("bothHands").unwrap_or_default(),
        })
        .collect())
}

/// Read the `hash -> fingers` pairs of a `fingers.xml` file.
pub fn read_finger_info(path: &Path) -> Result<HashMap<String, String>> {
    let records = read_records(path, "LocalFingerInfoList", "FingerInfo")?;
    Ok(records
        .into_iter()
        .map(|mut record| {
            (
                record.remove("hash").unwrap_or_default(),
                record.remove("fingers").unwrap_or_default(),
            )
        })
        .collect())
}

/// Attributes of every `element` directly under the top-level `root`.
fn read_records(path: &Path, root: &str, element: &str) -> Result<Vec<HashMap<String, String>>> {
    let content = fs::read_to_string(path).map_err(|e| PartsError::io(path, e))?;
    let xml_error = |message: String| PartsError::Xml {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = Reader::from_str(&content);
    reader.trim_text(true);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut found_root = false;

    loop {
        let (start, is_empty) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, false),
            Ok(Event::Empty(e)) => (e, true),
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(xml_error(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => continue,
        };

        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        if depth == 0 {
            if name != root {
                break;
            }
            found_root = true;
            let attributes = read_attributes(&start).map_err(xml_error)?;
            let version = attributes
                .get("version")
                .map(String::as_str)
                .unwrap_or(SUPPORTED_VERSION);
            if version != SUPPORTED_VERSION {
                return Err(PartsError::UnsupportedVersion {
                    file: file_name(path),
                    version: version.to_string(),
                });
            }
        } else if depth == 1 && name == element {
            records.push(read_attributes(&start).map_err(xml_error)?);
        }

        if !is_empty {
            depth += 1;
        }
    }

    if !found_root {
        return Err(xml_error(format!(
            "Couldn't find top-level {} element.",
            root
        )));
    }

    Ok(records)
}

fn read_attributes(start: &BytesStart) -> std::result::Result<HashMap<String, String>, String> {
    let mut attributes = HashMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        attributes.insert(key, value.into_owned());
    }
    Ok(attributes)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Locate and read a data file, logging why it could not be used.
fn load<T>(data_dir: &Path, file: &str, kind: ImportKind, read: fn(&Path) -> Result<T>) -> Option<T> {
    let path = data_dir.join(file);
    if !path.exists() {
        warn!(
            "Couldn't find {} in the Synthesia data directory ({}). Skipping {} import.",
            file,
            data_dir.display(),
            kind
        );
        return None;
    }

    match read(&path) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Unable to import {}: {}", kind, e);
            None
        }
    }
}

/// Key `songInfo.xml` values by song hash. A hash listed twice fails the import.
fn index_by_hash(
    pairs: impl Iterator<Item = (String, String)>,
    kind: ImportKind,
) -> Option<HashMap<String, String>> {
    let mut index = HashMap::new();
    for (hash, value) in pairs {
        if index.insert(hash.clone(), value).is_some() {
            error!(
                "Unable to import {}: song {} is listed more than once in {}",
                kind, hash, SONG_INFO_FILE
            );
            return None;
        }
    }
    Some(index)
}

pub fn import_finger_hints(metadata: &mut MetadataFile, data_dir: &Path) -> ImportResults {
    let Some(fingers) = load(data_dir, FINGERS_FILE, ImportKind::FingerHints, read_finger_info) else {
        return ImportResults::problem();
    };

    let mut results = ImportResults::default();
    for song in metadata.songs_mut() {
        if let Some(hints) = fingers.get(&song.unique_id) {
            results.record(&mut song.finger_hints, hints.clone());
        }
    }
    results
}

pub fn import_hand_parts(metadata: &mut MetadataFile, data_dir: &Path) -> ImportResults {
    let Some(infos) = load(data_dir, SONG_INFO_FILE, ImportKind::HandParts, read_song_info) else {
        return ImportResults::problem();
    };

    let hands = infos.into_iter().filter(SongInfo::has_hand_parts).map(|info| {
        let hand_parts = info.hand_parts();
        (info.hash, hand_parts)
    });
    let Some(hands) = index_by_hash(hands, ImportKind::HandParts) else {
        return ImportResults::problem();
    };

    let mut results = ImportResults::default();
    for song in metadata.songs_mut() {
        if let Some(hand_parts) = hands.get(&song.unique_id) {
            results.record(&mut song.hand_parts, hand_parts.clone());
        }
    }
    results
}

pub fn import_parts(metadata: &mut MetadataFile, data_dir: &Path) -> ImportResults {
    let Some(infos) = load(data_dir, SONG_INFO_FILE, ImportKind::Parts, read_song_info) else {
        return ImportResults::problem();
    };

    let parts = infos
        .into_iter()
        .filter(|info| !info.parts.trim().is_empty())
        .map(|info| (info.hash, info.parts));
    let Some(parts) = index_by_hash(parts, ImportKind::Parts) else {
        return ImportResults::problem();
    };

    let mut results = ImportResults::default();
    for song in metadata.songs_mut() {
        if let Some(value) = parts.get(&song.unique_id) {
            results.record(&mut song.parts, value.clone());
        }
    }
    results
}

/// Run every enabled import, in the order finger hints, hand parts, parts.
pub fn import_all(
    metadata: &mut MetadataFile,
    data_dir: &Path,
    options: ImportOptions,
) -> Vec<(ImportKind, ImportResults)> {
    let mut all = Vec::new();
    if options.finger_hints {
        all.push((ImportKind::FingerHints, import_finger_hints(metadata, data_dir)));
    }
    if options.hand_parts {
        all.push((ImportKind::HandParts, import_hand_parts(metadata, data_dir)));
    }
    if options.parts {
        all.push((ImportKind::Parts, import_parts(metadata, data_dir)));
    }

    for (kind, results) in &all {
        let summary = results.to_display_string(*kind);
        if !summary.is_empty() {
            info!("{}", summary);
        }
    }
    all
}
