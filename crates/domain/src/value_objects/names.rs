//! Validated text newtypes for roster entries
//!
//! These newtypes ensure that text is valid by construction:
//! - Non-empty (except Notes)
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for character names
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for free-form notes
const MAX_NOTES_LENGTH: usize = 5000;

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 200 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Character name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name used for a duplicated roster entry, kept within the length limit.
    pub fn copy_name(&self) -> Self {
        const SUFFIX: &str = " (copy)";
        let keep = MAX_NAME_LENGTH - SUFFIX.len();
        let base: String = self.0.chars().take(keep).collect();
        Self(format!("{}{}", base.trim_end(), SUFFIX))
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

// ============================================================================
// Notes
// ============================================================================

/// Free-form character notes (may be empty, <=5000 chars)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Notes(String);

impl Notes {
    /// Create validated notes.
    ///
    /// Empty strings are valid for notes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the text exceeds 5000 characters.
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.chars().count() > MAX_NOTES_LENGTH {
            return Err(DomainError::validation(format!(
                "Notes cannot exceed {} characters",
                MAX_NOTES_LENGTH
            )));
        }
        Ok(Self(text))
    }

    /// Create empty notes.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the notes as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if there are no notes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Notes {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Notes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Notes {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Notes> for String {
    fn from(notes: Notes) -> String {
        notes.0
    }
}
