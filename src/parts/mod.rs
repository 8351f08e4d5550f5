//! # Parts Codec
//!
//! Decodes the "parts" string of a song's metadata: which hand (or other
//! role) plays each note, per track and per measure.
//!
//! ## Grammar
//! ```text
//! t<track>:(m<measure>:<runs>)*
//! ```
//! `<runs>` is a sequence of run tokens, each a role code with an optional
//! note count: `L3R2-4` is three Left notes, two Right notes, then four
//! ignored notes. Measure `-1` (or a code written straight after the track
//! header, as in `t0:Lm0:...`) sets the track's default role.
//!
//! ## Pipeline
//! 1. `tracks::decode_tracks` splits the string into per-track, per-measure substrings
//! 2. `tokenizer::split_runs` splits each measure substring into run tokens
//! 3. `run::decode_run` turns each token into a [`Run`]
//! 4. `tracks::build_part` assembles one [`Part`] per track
//!
//! ## Example
//! ```rust
//! use handparts::{decode_parts, Role};
//!
//! let parts = decode_parts("t0:m-1:Lm0:L3R2-4")?;
//! let part = &parts[&0];
//!
//! assert_eq!(part.role_at(0, 0), Role::Left);
//! assert_eq!(part.role_at(0, 3), Role::Right);
//! assert_eq!(part.role_at(0, 5), Role::Ignore);
//! assert_eq!(part.role_at(0, 9), Role::Left); // past the last run
//! # Ok::<(), handparts::PartsError>(())
//! ```

mod encode;
mod part;
mod run;
mod tokenizer;
mod tracks;

pub use encode::encode_parts;
pub use part::{HandTotals, Part};
pub use run::{decode_run, Run};
pub use tokenizer::split_runs;
pub use tracks::{build_part, decode_parts, decode_tracks, PartTable, TrackTable, TRACK_DEFAULT};
