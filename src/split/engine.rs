use std::collections::BTreeMap;

use log::debug;
use midly::{MidiMessage, Smf, Track, TrackEventKind};

use super::measure_map::MeasureMap;
use super::types::{AssignedNote, SongAssignment, TrackAssignment};
use crate::error::{PartsError, Result};
use crate::parts::{Part, PartTable};

/// A note-on before its role is known
#[derive(Debug, Clone, Copy)]
struct NoteOn {
    tick: u64,
    key: u8,
    channel: u8,
}

/// Assign a role to every note of a song.
///
/// Tracks are indexed as they appear in the file. A track without a part
/// uses an empty part, so all of its notes are ignored. Tracks without notes
/// are left out of the result.
pub fn assign_roles(smf: &Smf, parts: &PartTable) -> Result<SongAssignment> {
    let measures = MeasureMap::from_smf(smf)?;
    let empty = Part::default();

    let mut assignment = SongAssignment::default();
    for (index, track) in smf.tracks.iter().enumerate() {
        let notes = collect_notes(track);
        if notes.is_empty() {
            continue;
        }

        let part = parts.get(&index).unwrap_or(&empty);
        let track_assignment = assign_track(index, &notes, part, &measures);
        debug!(
            "Track {}: {} notes, dominant hand {}",
            index,
            track_assignment.notes.len(),
            track_assignment.dominant_hand()
        );
        assignment.tracks.push(track_assignment);
    }

    Ok(assignment)
}

/// Parse a song file's bytes and assign roles to its notes.
pub fn assign_roles_from_bytes(bytes: &[u8], parts: &PartTable) -> Result<SongAssignment> {
    let smf = Smf::parse(bytes).map_err(|e| PartsError::Midi(e.to_string()))?;
    assign_roles(&smf, parts)
}

fn collect_notes(track: &Track) -> Vec<NoteOn> {
    let mut tick = 0u64;
    let mut notes = Vec::new();

    for event in track {
        tick += u64::from(event.delta.as_int());
        if let TrackEventKind::Midi {
            channel,
            message: MidiMessage::NoteOn { key, vel },
        } = event.kind
        {
            // note-on with zero velocity is a note-off
            if vel.as_int() > 0 {
                notes.push(NoteOn {
                    tick,
                    key: key.as_int(),
                    channel: channel.as_int(),
                });
            }
        }
    }

    notes.sort_by_key(|note| (note.tick, note.key));
    notes
}

fn assign_track(index: usize, notes: &[NoteOn], part: &Part, measures: &MeasureMap) -> TrackAssignment {
    let mut assigned = Vec::with_capacity(notes.len());
    let mut role_counts = BTreeMap::new();
    let mut current_measure = None;
    let mut ordinal = 0usize;

    for note in notes {
        let measure = measures.measure_at(note.tick);
        if current_measure != Some(measure) {
            current_measure = Some(measure);
            ordinal = 0;
        }

        let role = part.role_at(measure, ordinal);
        *role_counts.entry(role).or_insert(0) += 1;
        assigned.push(AssignedNote {
            tick: note.tick,
            key: note.key,
            channel: note.channel,
            measure,
            ordinal,
            role,
        });
        ordinal += 1;
    }

    TrackAssignment {
        track: index,
        notes: assigned,
        role_counts,
        hands: part.hand_totals(),
    }
}
