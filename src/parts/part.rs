use std::collections::BTreeMap;

use serde::Serialize;

use super::run::Run;
use crate::role::Role;

/// Decoded hand assignment for one track.
///
/// `measures` maps a measure index to its runs, which cover the measure's
/// notes in order. Notes outside every run, and every note of a measure
/// with no entry, fall back to `default_role`. Key `-1` is reserved for the
/// track default and is never written by the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Part {
    pub default_role: Role,
    pub measures: BTreeMap<i32, Vec<Run>>,
}

impl Part {
    pub fn new(default_role: Role) -> Self {
        Self {
            default_role,
            measures: BTreeMap::new(),
        }
    }

    /// Role of the note at zero-based `ordinal` within `measure`.
    ///
    /// # Example
    /// ```rust
    /// use handparts::{Part, Role, Run};
    ///
    /// let mut part = Part::new(Role::Background);
    /// part.measures.insert(2, vec![Run::new(Role::Right, 2), Run::new(Role::Left, 1)]);
    ///
    /// assert_eq!(part.role_at(2, 1), Role::Right);
    /// assert_eq!(part.role_at(2, 2), Role::Left);
    /// assert_eq!(part.role_at(2, 3), Role::Background);
    /// ```
    pub fn role_at(&self, measure: i32, ordinal: usize) -> Role {
        let Some(runs) = self.measures.get(&measure) else {
            return self.default_role;
        };

        let mut covered = 0usize;
        for run in runs {
            covered += run.length as usize;
            if covered > ordinal {
                return run.role;
            }
        }

        self.default_role
    }

    /// Number of notes explicitly assigned `role` across every measure.
    pub fn total_length_by_role(&self, role: Role) -> u64 {
        self.measures
            .values()
            .flatten()
            .filter(|run| run.role == role)
            .map(|run| u64::from(run.length))
            .sum()
    }

    pub fn hand_totals(&self) -> HandTotals {
        HandTotals {
            left: self.total_length_by_role(Role::Left),
            right: self.total_length_by_role(Role::Right),
        }
    }
}

/// Left- and right-hand note totals of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HandTotals {
    pub left: u64,
    pub right: u64,
}

impl HandTotals {
    /// The hand with more assigned notes. Ties go to the right hand.
    pub fn dominant(&self) -> Role {
        if self.left > self.right {
            Role::Left
        } else {
            Role::Right
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part_with(default_role: Role, measure: i32, runs: Vec<Run>) -> Part {
        let mut part = Part::new(default_role);
        part.measures.insert(measure, runs);
        part
    }

    #[test]
    fn test_new_part_is_ignore() {
        let part = Part::default();
        assert_eq!(part.default_role, Role::Ignore);
        assert!(part.measures.is_empty());
    }

    #[test]
    fn test_default_role_everywhere_without_measures() {
        let part = Part::new(Role::Left);
        for measure in [-1, 0, 7, 1000] {
            for ordinal in [0, 1, 50] {
                assert_eq!(part.role_at(measure, ordinal), Role::Left);
            }
        }
    }

    #[test]
    fn test_cumulative_lookup() {
        let part = part_with(
            Role::Dispose,
            2,
            vec![Run::new(Role::Right, 2), Run::new(Role::Left, 1)],
        );
        assert_eq!(part.role_at(2, 0), Role::Right);
        assert_eq!(part.role_at(2, 1), Role::Right);
        assert_eq!(part.role_at(2, 2), Role::Left);
        assert_eq!(part.role_at(2, 3), Role::Dispose);
        assert_eq!(part.role_at(3, 0), Role::Dispose);
    }

    #[test]
    fn test_total_length_by_role() {
        let part = part_with(
            Role::Ignore,
            0,
            vec![
                Run::new(Role::Left, 3),
                Run::new(Role::Right, 2),
                Run::new(Role::Left, 4),
            ],
        );
        assert_eq!(part.total_length_by_role(Role::Left), 7);
        assert_eq!(part.total_length_by_role(Role::Right), 2);
        assert_eq!(part.total_length_by_role(Role::Background), 0);
    }

    #[test]
    fn test_totals_span_measures() {
        let mut part = part_with(Role::Ignore, 0, vec![Run::new(Role::Left, 3)]);
        part.measures.insert(1, vec![Run::new(Role::Left, 2), Run::new(Role::Right, 9)]);
        let totals = part.hand_totals();
        assert_eq!(totals, HandTotals { left: 5, right: 9 });
        assert_eq!(totals.dominant(), Role::Right);
    }

    #[test]
    fn test_dominant_hand() {
        assert_eq!(HandTotals { left: 4, right: 1 }.dominant(), Role::Left);
        assert_eq!(HandTotals { left: 1, right: 4 }.dominant(), Role::Right);
        assert_eq!(HandTotals { left: 3, right: 3 }.dominant(), Role::Right);
    }
}
