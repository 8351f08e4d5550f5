//! # Role Assignment
//!
//! Applies decoded parts to the notes of a MIDI song.
//!
//! ## Purpose
//! A parts string only says "the Nth note of measure M is played by the left
//! hand". This module supplies the N and the M: it walks each track's notes
//! in time order, finds the measure of every note from the song's time
//! signatures, counts its position within that measure, and asks the
//! track's [`Part`](crate::Part) for the role.
//!
//! Notes are only labelled. Channels and events of the song are never
//! changed.
//!
//! ## Sub-modules
//! - `measure_map` - tick to measure conversion
//! - `engine` - note collection and role lookup
//! - `types` - report types
//!
//! ## Example
//! ```rust
//! use handparts::decode_parts;
//! use handparts::split::assign_roles;
//! use midly::{num::{u15, u28, u4, u7}, Format, Header, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
//!
//! let note = |delta: u32, key: u8| TrackEvent {
//!     delta: u28::new(delta),
//!     kind: TrackEventKind::Midi {
//!         channel: u4::new(0),
//!         message: MidiMessage::NoteOn { key: u7::new(key), vel: u7::new(90) },
//!     },
//! };
//!
//! let mut smf = Smf::new(Header::new(Format::SingleTrack, Timing::Metrical(u15::new(480))));
//! smf.tracks.push(vec![note(0, 60), note(480, 62), note(480, 64)]);
//!
//! let parts = decode_parts("t0:m0:L2R")?;
//! let report = assign_roles(&smf, &parts)?;
//! let roles: Vec<_> = report.tracks[0].notes.iter().map(|n| n.role).collect();
//!
//! assert_eq!(roles, vec![handparts::Role::Left, handparts::Role::Left, handparts::Role::Right]);
//! # Ok::<(), handparts::PartsError>(())
//! ```

mod engine;
mod measure_map;
mod types;


pub use engine::{assign_roles, assign_roles_from_bytes};
pub use measure_map::MeasureMap;
pub use types::{AssignedNote, SongAssignment, TrackAssignment};
