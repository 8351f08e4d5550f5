//! # Error Types
//!
//! This module defines all error types for the handparts library.
//!
//! Decode errors carry the track and measure they were raised in, so a caller
//! can point at the offending part of a parts string.
//!
//! ## Error Types
//! - `MalformedTrackHeader` - a track entry without a parseable track index
//! - `InvalidRoleCode` - a run token that does not start with a known role code
//! - `InvalidRunLength` - a run token whose digit suffix is not a valid length
//! - `Io`, `Xml`, `UnsupportedVersion` - reading the Synthesia data files
//! - `Midi` - reading a song file
//! - `ConfigError` - invalid configuration file
//! - `OutputError` - rendering a report
//!
//! ## Usage
//! ```rust
//! use handparts::{decode_parts, PartsError};
//!
//! match decode_parts("t0:m0:Q2") {
//!     Ok(parts) => println!("{} tracks", parts.len()),
//!     Err(PartsError::InvalidRoleCode { code, location, .. }) => {
//!         eprintln!("Unknown role '{}'{}", code, location);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Where in a parts string a decode error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub track: Option<usize>,
    pub measure: Option<i32>,
}

impl Location {
    pub fn new(track: usize, measure: i32) -> Self {
        Self {
            track: Some(track),
            measure: Some(measure),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.track, self.measure) {
            (Some(track), Some(-1)) => write!(f, " (track {}, track default)", track),
            (Some(track), Some(measure)) => write!(f, " (track {}, measure {})", track, measure),
            (Some(track), None) => write!(f, " (track {})", track),
            (None, Some(measure)) => write!(f, " (measure {})", measure),
            (None, None) => Ok(()),
        }
    }
}

#[derive(Error, Debug)]
pub enum PartsError {
    /// A track entry did not start with `<trackIndex>:`.
    ///
    /// ```
    /// # use handparts::PartsError;
    /// let err = PartsError::MalformedTrackHeader { header: "x:m0:L".to_string() };
    /// assert_eq!(err.to_string(), "Malformed track header 'x:m0:L'");
    /// ```
    #[error("Malformed track header '{header}'")]
    MalformedTrackHeader { header: String },

    /// A run token started with a character that is not a role code.
    #[error("Invalid role code '{code}' in token '{token}'{location}")]
    InvalidRoleCode {
        code: char,
        token: String,
        location: Location,
    },

    /// A run token's digit suffix could not be read as a length of at least one.
    #[error("Invalid run length in token '{token}'{location}")]
    InvalidRunLength { token: String, location: Location },

    #[error("Unable to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to read {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    /// The data file was written by a newer version of Synthesia.
    #[error("Data in {file} is in a newer format (version {version})")]
    UnsupportedVersion { file: String, version: String },

    #[error("MIDI error: {0}")]
    Midi(String),

    #[error("Invalid config: {0}")]
    ConfigError(String),

    #[error("Unable to render output: {0}")]
    OutputError(String),
}

impl PartsError {
    /// Attach a track/measure location to a decode error raised without one.
    pub fn at(self, location: Location) -> Self {
        match self {
            PartsError::InvalidRoleCode { code, token, .. } => PartsError::InvalidRoleCode {
                code,
                token,
                location,
            },
            PartsError::InvalidRunLength { token, .. } => {
                PartsError::InvalidRunLength { token, location }
            }
            other => other,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PartsError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = PartsError> = std::result::Result<T, E>;
