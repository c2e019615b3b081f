//! Spell table entries.

use serde::{Deserialize, Serialize};

/// A spell from the spell table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDef {
    pub id: String,
    pub name: String,
    /// Spell tier; a class can learn it once its max tier reaches this
    pub tier: u8,
    #[serde(default)]
    pub school: Option<String>,
    /// Class ids whose spell list includes this spell
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl SpellDef {
    /// Whether the spell is on the given class's list.
    pub fn available_to(&self, class_id: &str) -> bool {
        self.classes.iter().any(|c| c.eq_ignore_ascii_case(class_id))
    }
}
