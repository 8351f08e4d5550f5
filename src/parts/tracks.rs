use std::collections::BTreeMap;

use log::debug;

use super::part::Part;
use super::run::decode_run;
use super::tokenizer::split_runs;
use crate::error::{Location, PartsError, Result};
use crate::role::Role;

/// Measure key reserved for a track's default role.
pub const TRACK_DEFAULT: i32 = -1;

/// Raw measure substrings per track: `track -> (measure key -> run codes)`.
pub type TrackTable = BTreeMap<usize, BTreeMap<i32, String>>;

/// Decoded parts per track.
pub type PartTable = BTreeMap<usize, Part>;

/// Split a parts string into its per-track, per-measure substrings.
///
/// Whitespace is ignored. Measure entries without exactly one `:` are
/// dropped, as are entries whose key is not a number. A key still holding
/// the `t` of the track header becomes [`TRACK_DEFAULT`].
pub fn decode_tracks(raw: &str) -> Result<TrackTable> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut table = TrackTable::new();

    for piece in compact.split('t').filter(|piece| !piece.is_empty()) {
        let track = parse_track_header(piece)?;
        let measures = table.entry(track).or_default();

        let prefixed = format!("t{}", piece);
        for entry in prefixed.split('m') {
            let Some((key, value)) = split_entry(entry) else {
                debug!("Dropping malformed measure entry '{}' in track {}", entry, track);
                continue;
            };

            let key = if key.contains('t') {
                TRACK_DEFAULT
            } else {
                match key.parse::<i32>() {
                    Ok(key) => key,
                    Err(_) => {
                        debug!("Dropping measure entry with key '{}' in track {}", key, track);
                        continue;
                    }
                }
            };

            // the bare `t<n>:` header must not clear a default set earlier
            if key == TRACK_DEFAULT && value.is_empty() {
                continue;
            }
            measures.insert(key, value.to_string());
        }
    }

    Ok(table)
}

fn parse_track_header(piece: &str) -> Result<usize> {
    piece
        .split_once(':')
        .and_then(|(index, _)| index.parse().ok())
        .ok_or_else(|| PartsError::MalformedTrackHeader {
            header: piece.to_string(),
        })
}

fn split_entry(entry: &str) -> Option<(&str, &str)> {
    if entry.matches(':').count() != 1 {
        return None;
    }
    entry.split_once(':')
}

/// Build the [`Part`] for one track from its measure substrings.
pub fn build_part(track: usize, measures: BTreeMap<i32, String>) -> Result<Part> {
    let mut part = Part::default();

    for (measure, value) in measures {
        if value.is_empty() {
            continue;
        }
        let location = Location::new(track, measure);

        if measure == TRACK_DEFAULT {
            part.default_role = Role::from_token(&value).map_err(|e| e.at(location))?;
            continue;
        }

        let runs = split_runs(&value)
            .iter()
            .map(|token| decode_run(token))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.at(location))?;
        part.measures.insert(measure, runs);
    }

    Ok(part)
}

/// Decode a full parts string into one [`Part`] per track.
///
/// # Example
/// ```rust
/// use handparts::{decode_parts, Role};
///
/// let parts = decode_parts("t0:m-1:Bm0:L2R1")?;
/// let part = &parts[&0];
///
/// assert_eq!(part.default_role, Role::Background);
/// assert_eq!(part.role_at(0, 2), Role::Right);
/// assert_eq!(part.role_at(1, 0), Role::Background);
/// # Ok::<(), handparts::PartsError>(())
/// ```
pub fn decode_parts(raw: &str) -> Result<PartTable> {
    let table = decode_tracks(raw)?;
    let mut parts = PartTable::new();

    for (track, measures) in table {
        let part = build_part(track, measures)?;
        debug!(
            "Track {}: default {}, {} measures",
            track,
            part.default_role,
            part.measures.len()
        );
        parts.insert(track, part);
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::run::Run;

    #[test]
    fn test_empty_input() {
        assert!(decode_tracks("").unwrap().is_empty());
        assert!(decode_tracks("  \n\t").unwrap().is_empty());
        assert!(decode_parts("").unwrap().is_empty());
    }

    #[test]
    fn test_track_table() {
        let table = decode_tracks("t0:m-1:Lm0:L3R2-4").unwrap();
        assert_eq!(table.len(), 1);
        let measures = &table[&0];
        assert_eq!(measures[&TRACK_DEFAULT], "L");
        assert_eq!(measures[&0], "L3R2-4");
    }

    #[test]
    fn test_whitespace_removed() {
        let table = decode_tracks(" t0: m0: L3 R2\n t1:m4:B ").unwrap();
        assert_eq!(table[&0][&0], "L3R2");
        assert_eq!(table[&1][&4], "B");
    }

    #[test]
    fn test_default_after_header() {
        let table = decode_tracks("t3:Rm1:L").unwrap();
        assert_eq!(table[&3][&TRACK_DEFAULT], "R");
        assert_eq!(table[&3][&1], "L");
    }

    #[test]
    fn test_malformed_measure_entries_dropped() {
        let table = decode_tracks("t0:m1:L:Rm2Lm3:R").unwrap();
        let measures = &table[&0];
        assert!(!measures.contains_key(&1));
        assert!(!measures.contains_key(&2));
        assert_eq!(measures[&3], "R");
    }

    #[test]
    fn test_non_numeric_measure_key_dropped() {
        let table = decode_tracks("t0:mx:Lm1:R").unwrap();
        assert_eq!(table[&0].len(), 1);
        assert_eq!(table[&0][&1], "R");
    }

    #[test]
    fn test_malformed_track_header() {
        let result = decode_tracks("tx:m0:L");
        match result {
            Err(PartsError::MalformedTrackHeader { header }) => assert_eq!(header, "x:m0:L"),
            other => panic!("Expected MalformedTrackHeader, got {:?}", other),
        }
        assert!(decode_tracks("t5").is_err());
    }

    #[test]
    fn test_multiple_tracks() {
        let parts = decode_parts("t0:m0:L2t1:m-1:Rm0:-3").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[&0].default_role, Role::Ignore);
        assert_eq!(parts[&0].measures[&0], vec![Run::new(Role::Left, 2)]);
        assert_eq!(parts[&1].default_role, Role::Right);
        assert_eq!(parts[&1].measures[&0], vec![Run::new(Role::Ignore, 3)]);
    }

    #[test]
    fn test_repeated_track_keeps_default() {
        let parts = decode_parts("t0:m-1:Lt0:m1:R").unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[&0].default_role, Role::Left);
        assert_eq!(parts[&0].measures[&1], vec![Run::new(Role::Right, 1)]);
        assert_eq!(parts[&0].role_at(0, 0), Role::Left);

        let parts = decode_parts("t0:m-1:Lt0:m-1:X").unwrap();
        assert_eq!(parts[&0].default_role, Role::Dispose);
    }

    #[test]
    fn test_empty_measure_creates_no_entry() {
        let parts = decode_parts("t0:m0:m1:L").unwrap();
        assert!(!parts[&0].measures.contains_key(&0));
        assert_eq!(parts[&0].measures[&1], vec![Run::new(Role::Left, 1)]);
    }

    #[test]
    fn test_build_part_directly() {
        let mut measures = BTreeMap::new();
        measures.insert(TRACK_DEFAULT, "X".to_string());
        measures.insert(4, "B12L".to_string());
        let part = build_part(0, measures).unwrap();
        assert_eq!(part.default_role, Role::Dispose);
        assert_eq!(
            part.measures[&4],
            vec![Run::new(Role::Background, 12), Run::new(Role::Left, 1)]
        );
    }

    #[test]
    fn test_errors_carry_location() {
        let err = decode_parts("t2:m7:L3Q1").unwrap_err();
        match err {
            PartsError::InvalidRoleCode { code, location, .. } => {
                assert_eq!(code, 'Q');
                assert_eq!(location, Location::new(2, 7));
            }
            other => panic!("Expected InvalidRoleCode, got {:?}", other),
        }

        let err = decode_parts("t1:m-1:Z").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid role code 'Z' in token 'Z' (track 1, track default)"
        );
    }

    #[test]
    fn test_end_to_end_lookup() {
        let parts = decode_parts("t0:m-1:Bm0:L2R1").unwrap();
        assert_eq!(parts.len(), 1);
        let part = &parts[&0];
        assert_eq!(part.default_role, Role::Background);
        assert_eq!(
            part.measures[&0],
            vec![Run::new(Role::Left, 2), Run::new(Role::Right, 1)]
        );
        assert_eq!(part.role_at(0, 0), Role::Left);
        assert_eq!(part.role_at(0, 2), Role::Right);
        assert_eq!(part.role_at(1, 0), Role::Background);
    }
}
