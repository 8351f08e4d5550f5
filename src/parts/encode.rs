use std::fmt::Write;

use log::debug;

use super::part::Part;
use super::run::Run;
use super::tracks::{PartTable, TRACK_DEFAULT};
use crate::role::Role;

/// Longest run a single letter token can carry (three digits).
const MAX_LETTER_RUN: u32 = 999;
/// Longest run a single `-` token can carry (two digits).
const MAX_IGNORE_RUN: u32 = 99;

/// Encode decoded parts back into a parts string.
///
/// Runs too long for one token are written as several tokens of the same
/// role, so the decoded result answers every role lookup the same way.
/// Runs stored under [`TRACK_DEFAULT`] in [`Part::measures`] have no
/// encoding and are skipped.
///
/// # Example
/// ```rust
/// use handparts::{decode_parts, encode_parts};
///
/// let parts = decode_parts("t0:m-1:Lm0:L3R2-4")?;
/// assert_eq!(encode_parts(&parts), "t0:m-1:Lm0:L3R2-4");
/// # Ok::<(), handparts::PartsError>(())
/// ```
pub fn encode_parts(parts: &PartTable) -> String {
    let mut out = String::new();
    for (track, part) in parts {
        encode_part(&mut out, *track, part);
    }
    out
}

fn encode_part(out: &mut String, track: usize, part: &Part) {
    let _ = write!(out, "t{}:", track);

    if part.default_role != Role::Ignore {
        let _ = write!(out, "m{}:{}", TRACK_DEFAULT, part.default_role.code());
    }

    for (measure, runs) in &part.measures {
        if *measure == TRACK_DEFAULT {
            debug!("Skipping runs stored under the track default of track {}", track);
            continue;
        }
        if runs.is_empty() {
            continue;
        }
        let _ = write!(out, "m{}:", measure);
        for run in runs {
            encode_run(out, run);
        }
    }
}

fn encode_run(out: &mut String, run: &Run) {
    let max = match run.role {
        Role::Ignore => MAX_IGNORE_RUN,
        _ => MAX_LETTER_RUN,
    };

    let mut remaining = run.length;
    while remaining > 0 {
        let chunk = remaining.min(max);
        out.push(run.role.code());
        if chunk > 1 {
            let _ = write!(out, "{}", chunk);
        }
        remaining -= chunk;
    }
}
