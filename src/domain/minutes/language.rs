//! Language hint value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidLanguageError;

/// Default recognition language
pub const DEFAULT_LANGUAGE: &str = "ja";

/// ISO 639 code fixing the recognition language.
///
/// Transcription never auto-detects: meetings are held in one language and
/// a pinned hint recognizes it more accurately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageHint {
    code: String,
}

impl LanguageHint {
    /// Japanese, the default
    pub fn japanese() -> Self {
        Self {
            code: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Get the ISO code
    pub fn as_str(&self) -> &str {
        &self.code
    }
}

impl Default for LanguageHint {
    fn default() -> Self {
        Self::japanese()
    }
}

impl FromStr for LanguageHint {
    type Err = InvalidLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        let valid = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_lowercase());
        if !valid {
            return Err(InvalidLanguageError {
                input: s.to_string(),
            });
        }
        Ok(Self { code })
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
