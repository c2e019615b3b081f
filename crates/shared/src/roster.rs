//! The roster document: the on-disk file format and the export/import body.

use serde::{Deserialize, Serialize};
use sheetkeep_domain::Character;

/// Current roster file format.
pub const ROSTER_FORMAT_VERSION: u32 = 1;

/// Every saved character, as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub characters: Vec<Character>,
}

impl RosterDocument {
    pub fn new(characters: Vec<Character>) -> Self {
        Self {
            version: ROSTER_FORMAT_VERSION,
            characters,
        }
    }
}

impl Default for RosterDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn default_version() -> u32 {
    ROSTER_FORMAT_VERSION
}
