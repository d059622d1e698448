//! Player keys and file-name sanitization.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, UserError};

/// Case-normalized player identifier used for every registry and cache lookup.
///
/// Two names that differ only in case produce the same key. A key is never empty.
/// Cloning is cheap; the normalized text is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    /// Normalize a display name into a key.
    ///
    /// The name is lower-cased with Unicode rules, independent of the process locale.
    /// Only the empty name is rejected; length limits belong to whoever creates names.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(UserError::EmptyName);
        }
        Ok(Key(Arc::from(name.to_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Map a raw player name to the base name of its record file.
///
/// The name is lower-cased and every character outside `[a-z0-9]` becomes `_`.
/// Record files written by older servers follow this exact rule, so it must not change.
pub fn sanitize_file_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_case_insensitive() {
        let lower = Key::new("steve").unwrap();
        assert_eq!(Key::new("Steve").unwrap(), lower);
        assert_eq!(Key::new("STEVE").unwrap(), lower);
        assert_eq!(lower.as_str(), "steve");
    }

    #[test]
    fn test_empty_key() {
        assert!(matches!(Key::new(""), Err(UserError::EmptyName)));
    }

    #[test]
    fn test_long_and_multibyte_keys() {
        let long = Key::new("AVeryVeryVeryLongName").unwrap();
        assert_eq!(long.as_str(), "averyveryverylongname");
        // Nine characters, eighteen bytes.
        let wide = Key::new("ÄÄÄÄÄÄÄÄÄ").unwrap();
        assert_eq!(wide.as_str(), "ä".repeat(9));
        assert_eq!(wide.as_str().len(), 18);
    }

    #[test]
    fn test_key_lowercases_unicode() {
        assert_eq!(Key::new("ÄRGER").unwrap().as_str(), "ärger");
    }

    #[test]
    fn test_key_ordering_is_lexicographic() {
        let mut keys = vec![
            Key::new("Notch").unwrap(),
            Key::new("alex").unwrap(),
            Key::new("jeb_").unwrap(),
        ];
        keys.sort();
        let names: Vec<&str> = keys.iter().map(Key::as_str).collect();
        assert_eq!(names, vec!["alex", "jeb_", "notch"]);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Steve"), "steve");
        assert_eq!(sanitize_file_name("Player_123"), "player_123");
        assert_eq!(sanitize_file_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_file_name("Ärger"), "_rger");
    }
}
