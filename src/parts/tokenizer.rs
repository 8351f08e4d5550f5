//! Splits one measure's run codes into run tokens.
//!
//! A token is a role code followed by an optional digit count. Letter codes
//! (`L`, `R`, `B`, `X`) carry up to three digits, the `-` code up to two.
//! A new token starts at every uppercase letter or `-`, and whenever the
//! current token is full.
//!
//! When a full token is followed by a `0`, the next token would start with a
//! bare digit. The last digit of the full token is moved over to start the
//! next token instead (the orphan-digit correction).

/// Longest letter token: one role letter and three digits.
const MAX_LETTER_TOKEN: usize = 4;
/// Longest non-letter token: a `-` (or other lead character) and two digits.
const MAX_NUMBER_TOKEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AccumulatingLetterToken,
    AccumulatingNumberToken,
}

impl State {
    fn for_lead(c: char) -> State {
        if c.is_ascii_uppercase() {
            State::AccumulatingLetterToken
        } else {
            State::AccumulatingNumberToken
        }
    }

    fn max_len(self) -> usize {
        match self {
            State::AccumulatingLetterToken => MAX_LETTER_TOKEN,
            _ => MAX_NUMBER_TOKEN,
        }
    }
}

/// Tokenizer state for a single run string
struct RunSplitter {
    tokens: Vec<String>,
    buffer: String,
    buffer_len: usize,
    state: State,
}

impl RunSplitter {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            buffer: String::new(),
            buffer_len: 0,
            state: State::Start,
        }
    }

    fn push(&mut self, c: char) {
        if self.state == State::Start {
            self.begin(c);
            return;
        }

        let must_split =
            self.buffer_len == self.state.max_len() || c.is_ascii_uppercase() || c == '-';

        if !must_split {
            self.buffer.push(c);
            self.buffer_len += 1;
            return;
        }

        if c == '0' {
            // Only reachable on a full buffer, so at least two characters remain.
            if let Some(orphan) = self.buffer.pop() {
                self.close();
                self.begin(orphan);
                self.buffer.push(c);
                self.buffer_len += 1;
                return;
            }
        }

        self.close();
        self.begin(c);
    }

    fn begin(&mut self, c: char) {
        self.buffer.push(c);
        self.buffer_len = 1;
        self.state = State::for_lead(c);
    }

    fn close(&mut self) {
        self.tokens.push(std::mem::take(&mut self.buffer));
        self.buffer_len = 0;
        self.state = State::Start;
    }

    fn finish(mut self) -> Vec<String> {
        if self.state != State::Start {
            self.close();
        }
        self.tokens
    }
}

/// Split a measure's run codes into tokens.
///
/// # Example
/// ```rust
/// use handparts::split_runs;
///
/// assert_eq!(split_runs("L3R2-4"), vec!["L3", "R2", "-4"]);
/// ```
pub fn split_runs(value: &str) -> Vec<String> {
    let mut splitter = RunSplitter::new();
    for c in value.chars() {
        splitter.push(c);
    }
    splitter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(split_runs("").is_empty());
    }

    #[test]
    fn test_mixed_runs() {
        assert_eq!(split_runs("L3R2-4"), vec!["L3", "R2", "-4"]);
    }

    #[test]
    fn test_bare_letters() {
        assert_eq!(split_runs("LRBX"), vec!["L", "R", "B", "X"]);
    }

    #[test]
    fn test_bare_dashes() {
        assert_eq!(split_runs("--L"), vec!["-", "-", "L"]);
    }

    #[test]
    fn test_letter_token_holds_three_digits() {
        // a letter token only splits once it already holds 4 characters
        assert_eq!(split_runs("L100"), vec!["L100"]);
        assert_eq!(split_runs("R999B"), vec!["R999", "B"]);
    }

    #[test]
    fn test_letter_token_overflow_splits() {
        assert_eq!(split_runs("L1234"), vec!["L123", "4"]);
    }

    #[test]
    fn test_dash_token_holds_two_digits() {
        assert_eq!(split_runs("-99"), vec!["-99"]);
        assert_eq!(split_runs("-123"), vec!["-12", "3"]);
    }

    #[test]
    fn test_orphan_digit_on_letter_token() {
        // "L100" is full, so the trailing '0' pulls the last '0' along with it
        assert_eq!(split_runs("L1000"), vec!["L10", "00"]);
        assert_eq!(split_runs("L1230R"), vec!["L12", "30", "R"]);
    }

    #[test]
    fn test_orphan_digit_on_dash_token() {
        assert_eq!(split_runs("-120"), vec!["-1", "20"]);
    }

    #[test]
    fn test_orphan_digit_token_keeps_growing() {
        // the moved digit starts a non-letter token, limited to three characters
        assert_eq!(split_runs("L99900"), vec!["L99", "900"]);
        assert_eq!(split_runs("L999000"), vec!["L99", "90", "00"]);
    }

    #[test]
    fn test_first_character_always_starts_token() {
        assert_eq!(split_runs("0L"), vec!["0", "L"]);
        assert_eq!(split_runs("7"), vec!["7"]);
    }

    #[test]
    fn test_consecutive_letters_split_regardless_of_digits() {
        assert_eq!(split_runs("L1R12B123X"), vec!["L1", "R12", "B123", "X"]);
    }
}
