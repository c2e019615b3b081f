//! Weapon and armor stat blocks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponDef {
    pub id: String,
    pub name: String,
    /// e.g. "simple", "martial", "ranged"
    #[serde(default)]
    pub category: String,
    /// Damage expression, e.g. "1d8"
    pub damage: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorDef {
    pub id: String,
    pub name: String,
    pub armor_score: i32,
    /// Subtracted from evasion while worn
    #[serde(default)]
    pub evasion_penalty: i32,
    #[serde(default)]
    pub description: String,
}
