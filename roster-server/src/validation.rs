//! Checks on names the standalone host hands out as offline identities.

use arrayvec::ArrayString;
use thiserror::Error;

/// A name that passed [`parse_player_name`]. Fits inline, the game caps names at 16.
pub type PlayerName = ArrayString<16>;

#[derive(Debug, Error, PartialEq)]
pub enum NameError {
    #[error("player name is empty")]
    Empty,

    #[error("player name has {0} characters, the limit is 16")]
    TooLong(usize),

    #[error("player name contains {0:?}, only ASCII letters, digits and '_' are allowed")]
    BadChar(char),
}

/// Accept `name` as a player name.
///
/// Only ASCII letters, digits and underscores are allowed, at most 16 of them.
pub fn parse_player_name(name: &str) -> Result<PlayerName, NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if let Some(c) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(NameError::BadChar(c));
    }
    // ASCII only from here on, so bytes and characters agree.
    PlayerName::from(name).map_err(|_| NameError::TooLong(name.len()))
}
