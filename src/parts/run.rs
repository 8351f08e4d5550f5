use serde::Serialize;

use crate::error::{Location, PartsError, Result};
use crate::role::Role;

/// `length` consecutive notes of one measure sharing `role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub role: Role,
    pub length: u32,
}

impl Run {
    pub fn new(role: Role, length: u32) -> Self {
        Self { role, length }
    }
}

/// Decode one run token such as `L3`, `-`, or `B120`.
///
/// The first character is the role code. A digit suffix gives the run
/// length; without one the run covers a single note.
///
/// # Example
/// ```rust
/// use handparts::{decode_run, Role, Run};
///
/// assert_eq!(decode_run("L3").unwrap(), Run::new(Role::Left, 3));
/// assert_eq!(decode_run("-").unwrap(), Run::new(Role::Ignore, 1));
/// ```
pub fn decode_run(token: &str) -> Result<Run> {
    let role = Role::from_token(token)?;

    let mut chars = token.chars();
    chars.next();
    let suffix = chars.as_str();

    if !suffix.chars().any(|c| c.is_ascii_digit()) {
        return Ok(Run::new(role, 1));
    }

    let length: u32 = suffix.parse().map_err(|_| PartsError::InvalidRunLength {
        token: token.to_string(),
        location: Location::default(),
    })?;

    if length == 0 {
        return Err(PartsError::InvalidRunLength {
            token: token.to_string(),
            location: Location::default(),
        });
    }

    Ok(Run::new(role, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_with_length() {
        assert_eq!(decode_run("L3").unwrap(), Run::new(Role::Left, 3));
        assert_eq!(decode_run("X120").unwrap(), Run::new(Role::Dispose, 120));
    }

    #[test]
    fn test_default_length() {
        assert_eq!(decode_run("-").unwrap(), Run::new(Role::Ignore, 1));
        assert_eq!(decode_run("B").unwrap(), Run::new(Role::Background, 1));
    }

    #[test]
    fn test_suffix_without_digits_is_single_note() {
        assert_eq!(decode_run("R?").unwrap(), Run::new(Role::Right, 1));
    }

    #[test]
    fn test_invalid_role() {
        let result = decode_run("Q2");
        assert!(matches!(
            result,
            Err(PartsError::InvalidRoleCode { code: 'Q', .. })
        ));
    }

    #[test]
    fn test_orphan_token_is_invalid_role() {
        assert!(matches!(
            decode_run("00"),
            Err(PartsError::InvalidRoleCode { code: '0', .. })
        ));
    }

    #[test]
    fn test_mixed_suffix_is_invalid_length() {
        let result = decode_run("L1a");
        match result {
            Err(PartsError::InvalidRunLength { token, .. }) => assert_eq!(token, "L1a"),
            other => panic!("Expected InvalidRunLength, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            decode_run("L0"),
            Err(PartsError::InvalidRunLength { .. })
        ));
    }

    #[test]
    fn test_empty_token() {
        assert!(matches!(
            decode_run(""),
            Err(PartsError::InvalidRoleCode { .. })
        ));
    }
}
