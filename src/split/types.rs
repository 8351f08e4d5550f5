//! Role assignment report types

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parts::HandTotals;
use crate::role::Role;

/// One note-on of a song with the role its track's part gives it.
///
/// # Fields
/// - `tick`: absolute start time in MIDI ticks
/// - `measure`: zero-based measure containing `tick`
/// - `ordinal`: zero-based position among the track's notes in that measure,
///   ordered by tick and then by key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedNote {
    pub tick: u64,
    pub key: u8,
    pub channel: u8,
    pub measure: i32,
    pub ordinal: usize,
    pub role: Role,
}

/// Role assignment for every note of one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackAssignment {
    pub track: usize,
    pub notes: Vec<AssignedNote>,
    /// Number of notes that ended up with each role
    pub role_counts: BTreeMap<Role, usize>,
    /// Left/right totals declared by the part itself
    pub hands: HandTotals,
}

impl TrackAssignment {
    pub fn count(&self, role: Role) -> usize {
        self.role_counts.get(&role).copied().unwrap_or(0)
    }

    pub fn dominant_hand(&self) -> Role {
        self.hands.dominant()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SongAssignment {
    pub tracks: Vec<TrackAssignment>,
}

impl SongAssignment {
    pub fn track(&self, track: usize) -> Option<&TrackAssignment> {
        self.tracks.iter().find(|assignment| assignment.track == track)
    }
}
