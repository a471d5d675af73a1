//! Two-letter language codes.

use std::fmt;
use std::str::FromStr;

use crate::error::LanguageCodeError;

/// Language used whenever nothing better is known, and the bundle fallback.
pub const DEFAULT_LANGUAGE: LanguageCode = LanguageCode(*b"en");

/// A lowercase two-letter language code such as `en` or `fr`.
///
/// Only ASCII letters are accepted, so a code is always safe to use as a
/// directory name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode([u8; 2]);

impl LanguageCode {
    /// Parse a complete code. Surrounding whitespace is ignored, case is folded.
    pub fn parse(raw: &str) -> Result<Self, LanguageCodeError> {
        let trimmed = raw.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 2 {
            return Err(LanguageCodeError(raw.to_string()));
        }
        Self::from_pair(bytes[0], bytes[1]).ok_or_else(|| LanguageCodeError(raw.to_string()))
    }

    /// Take the code from the first two characters of a value like an
    /// `Accept-Language` header (`fr-FR,fr;q=0.9` gives `fr`).
    ///
    /// Returns `None` for empty, truncated or non-alphabetic input.
    pub fn from_prefix(raw: &str) -> Option<Self> {
        let bytes = raw.trim().as_bytes();
        if bytes.len() < 2 {
            return None;
        }
        Self::from_pair(bytes[0], bytes[1])
    }

    fn from_pair(a: u8, b: u8) -> Option<Self> {
        if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() {
            Some(Self([a.to_ascii_lowercase(), b.to_ascii_lowercase()]))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        // ASCII by construction
        std::str::from_utf8(&self.0).unwrap_or("en")
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        DEFAULT_LANGUAGE
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_folds_case_and_trims() {
        assert_eq!(LanguageCode::parse(" DE ").unwrap().as_str(), "de");
        assert_eq!("fr".parse::<LanguageCode>().unwrap().as_str(), "fr");
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        for raw in ["", "e", "eng", "e1", "..", "*", "d/"] {
            assert!(LanguageCode::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_from_prefix_accept_language() {
        assert_eq!(
            LanguageCode::from_prefix("fr-FR,fr;q=0.9").map(|c| c.to_string()),
            Some("fr".to_string())
        );
        assert_eq!(LanguageCode::from_prefix("en").unwrap(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_from_prefix_malformed() {
        assert_eq!(LanguageCode::from_prefix(""), None);
        assert_eq!(LanguageCode::from_prefix("f"), None);
        assert_eq!(LanguageCode::from_prefix("*"), None);
        assert_eq!(LanguageCode::from_prefix("  "), None);
    }

    #[test]
    fn test_default_is_en() {
        assert_eq!(LanguageCode::default().as_str(), "en");
    }
}
