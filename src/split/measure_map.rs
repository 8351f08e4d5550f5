//! Maps MIDI ticks to measure indices using the song's time signatures.

use log::debug;
use midly::{MetaMessage, Smf, Timing, TrackEventKind};

use crate::error::{PartsError, Result};

/// A stretch of the song with one time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    start_tick: u64,
    start_measure: u64,
    measure_ticks: u64,
}

/// Measure boundaries of a song.
///
/// Without time signature events the song is in 4/4. A change that falls in
/// the middle of a measure cuts that measure short and starts a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureMap {
    ticks_per_quarter: u32,
    segments: Vec<Segment>,
}

impl MeasureMap {
    /// Build a map from a tick resolution and `(tick, numerator, denominator power)` changes.
    pub fn new(ticks_per_quarter: u32, mut changes: Vec<(u64, u8, u8)>) -> Result<Self> {
        if ticks_per_quarter == 0 {
            return Err(PartsError::Midi("ticks per quarter note is zero".to_string()));
        }

        let mut map = Self {
            ticks_per_quarter,
            segments: vec![Segment {
                start_tick: 0,
                start_measure: 0,
                measure_ticks: u64::from(ticks_per_quarter) * 4,
            }],
        };

        changes.sort_by_key(|(tick, _, _)| *tick);
        for (tick, numerator, denominator_power) in changes {
            map.push_change(tick, numerator, denominator_power);
        }
        Ok(map)
    }

    /// Collect every time signature event of a song, from any track.
    pub fn from_smf(smf: &Smf) -> Result<Self> {
        let ticks_per_quarter = match smf.header.timing {
            Timing::Metrical(ticks) => u32::from(ticks.as_int()),
            Timing::Timecode(..) => {
                return Err(PartsError::Midi(
                    "SMPTE timecode timing is not supported".to_string(),
                ))
            }
        };

        let mut changes = Vec::new();
        for track in &smf.tracks {
            let mut tick = 0u64;
            for event in track {
                tick += u64::from(event.delta.as_int());
                if let TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, power, _, _)) =
                    event.kind
                {
                    changes.push((tick, numerator, power));
                }
            }
        }

        MeasureMap::new(ticks_per_quarter, changes)
    }

    fn push_change(&mut self, tick: u64, numerator: u8, denominator_power: u8) {
        let measure_ticks = if denominator_power > 16 {
            0
        } else {
            (u64::from(self.ticks_per_quarter) * 4 * u64::from(numerator)) >> denominator_power
        };
        if measure_ticks == 0 {
            debug!(
                "Ignoring unusable time signature {}/2^{} at tick {}",
                numerator, denominator_power, tick
            );
            return;
        }

        let Some(last) = self.segments.last_mut() else {
            return;
        };

        if last.start_tick == tick {
            last.measure_ticks = measure_ticks;
            return;
        }

        let elapsed = tick - last.start_tick;
        let start_measure = last.start_measure + elapsed.div_ceil(last.measure_ticks);
        self.segments.push(Segment {
            start_tick: tick,
            start_measure,
            measure_ticks,
        });
    }

    pub fn ticks_per_quarter(&self) -> u32 {
        self.ticks_per_quarter
    }

    /// Zero-based index of the measure containing `tick`.
    pub fn measure_at(&self, tick: u64) -> i32 {
        let segment = self
            .segments
            .iter()
            .rev()
            .find(|segment| segment.start_tick <= tick)
            .unwrap_or(&self.segments[0]);

        let measure =
            segment.start_measure + (tick - segment.start_tick) / segment.measure_ticks;
        i32::try_from(measure).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_four_four() {
        let map = MeasureMap::new(480, vec![]).unwrap();
        assert_eq!(map.measure_at(0), 0);
        assert_eq!(map.measure_at(1919), 0);
        assert_eq!(map.measure_at(1920), 1);
        assert_eq!(map.measure_at(1920 * 10 + 5), 10);
    }

    #[test]
    fn test_time_signature_at_start() {
        // 3/4: 3 quarters per measure
        let map = MeasureMap::new(480, vec![(0, 3, 2)]).unwrap();
        assert_eq!(map.measure_at(1439), 0);
        assert_eq!(map.measure_at(1440), 1);
    }

    #[test]
    fn test_change_on_barline() {
        // two bars of 4/4, then 6/8 (three quarters per bar)
        let map = MeasureMap::new(480, vec![(3840, 6, 3)]).unwrap();
        assert_eq!(map.measure_at(3839), 1);
        assert_eq!(map.measure_at(3840), 2);
        assert_eq!(map.measure_at(3840 + 1439), 2);
        assert_eq!(map.measure_at(3840 + 1440), 3);
    }

    #[test]
    fn test_change_mid_measure_starts_new_measure() {
        let map = MeasureMap::new(480, vec![(960, 2, 2)]).unwrap();
        assert_eq!(map.measure_at(959), 0);
        assert_eq!(map.measure_at(960), 1);
        assert_eq!(map.measure_at(960 + 960), 2);
    }

    #[test]
    fn test_unsorted_and_repeated_changes() {
        let map = MeasureMap::new(480, vec![(1920, 3, 2), (0, 2, 2), (0, 4, 2)]).unwrap();
        // 4/4 wins at tick 0, 3/4 from bar 1
        assert_eq!(map.measure_at(1919), 0);
        assert_eq!(map.measure_at(1920 + 1440), 2);
    }

    #[test]
    fn test_zero_numerator_ignored() {
        let map = MeasureMap::new(480, vec![(0, 0, 2)]).unwrap();
        assert_eq!(map.measure_at(1920), 1);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        assert!(matches!(MeasureMap::new(0, vec![]), Err(PartsError::Midi(_))));
    }
}
