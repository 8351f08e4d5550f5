use std::fmt;

use serde::Serialize;

use crate::error::{Location, PartsError, Result};

/// The hand or purpose assigned to a note.
///
/// Each role has a single-character code in the parts string:
/// `-` Ignore, `L` Left, `R` Right, `B` Background, `X` Dispose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Ignore,
    Left,
    Right,
    Background,
    Dispose,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Ignore,
        Role::Left,
        Role::Right,
        Role::Background,
        Role::Dispose,
    ];

    pub fn code(self) -> char {
        match self {
            Role::Ignore => '-',
            Role::Left => 'L',
            Role::Right => 'R',
            Role::Background => 'B',
            Role::Dispose => 'X',
        }
    }

    pub fn from_code(code: char) -> Option<Role> {
        match code {
            '-' => Some(Role::Ignore),
            'L' => Some(Role::Left),
            'R' => Some(Role::Right),
            'B' => Some(Role::Background),
            'X' => Some(Role::Dispose),
            _ => None,
        }
    }

    /// Read the role from the first character of `token`.
    pub(crate) fn from_token(token: &str) -> Result<Role> {
        let code = token.chars().next().unwrap_or('\0');
        Role::from_code(code).ok_or_else(|| PartsError::InvalidRoleCode {
            code,
            token: token.to_string(),
            location: Location::default(),
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Ignore => "ignore",
            Role::Left => "left",
            Role::Right => "right",
            Role::Background => "background",
            Role::Dispose => "dispose",
        };
        f.write_str(name)
    }
}
