//! Class tables: level progression, class abilities and boon slots.

use serde::{Deserialize, Serialize};

/// A playable class and everything that is keyed by it.
///
/// Simple data struct: the catalog is read-only reference content, so fields
/// are public and consistency is checked once by `RulesCatalog::validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Evasion before boons and armor
    #[serde(default)]
    pub base_evasion: i32,
    /// Hit points before boons and the constitution modifier
    #[serde(default)]
    pub base_hit_points: i32,
    /// Selection limits, one entry per level where they change
    pub progression: Vec<LevelProgression>,
    #[serde(default)]
    pub abilities: Vec<AbilityDef>,
    #[serde(default)]
    pub boon_slots: Vec<BoonSlot>,
}

impl ClassDef {
    /// Highest level present in the progression table (at least 1).
    pub fn max_level(&self) -> u8 {
        self.progression
            .iter()
            .map(|p| p.level)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Selection limits in effect at `level`.
    ///
    /// Uses the last progression row at or below the level; rows only need to
    /// be listed where something changes.
    pub fn limits_at(&self, level: u8) -> LevelProgression {
        self.progression
            .iter()
            .filter(|p| p.level <= level)
            .max_by_key(|p| p.level)
            .cloned()
            .map(|mut p| {
                p.level = level;
                p
            })
            .unwrap_or_else(|| LevelProgression::empty(level))
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDef> {
        self.abilities.iter().find(|a| a.id == id)
    }

    /// Abilities unlocked at or below `level`, in table order.
    pub fn abilities_at(&self, level: u8) -> impl Iterator<Item = &AbilityDef> {
        self.abilities.iter().filter(move |a| a.min_level <= level)
    }

    pub fn boon_slot(&self, id: &str) -> Option<&BoonSlot> {
        self.boon_slots.iter().find(|s| s.id == id)
    }

    /// Boon slots unlocked at or below `level`, in table order.
    pub fn boon_slots_at(&self, level: u8) -> impl Iterator<Item = &BoonSlot> {
        self.boon_slots.iter().filter(move |s| s.level <= level)
    }

    /// Whether any level of this class learns spells.
    pub fn is_caster(&self) -> bool {
        self.progression.iter().any(|p| p.spells > 0)
    }
}

/// Selection limits for one level of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgression {
    pub level: u8,
    /// Selectable (non-granted) abilities known
    #[serde(default)]
    pub abilities: u8,
    /// Spells known, not counting boon-granted spells
    #[serde(default)]
    pub spells: u8,
    #[serde(default)]
    pub signature_spells: u8,
    /// Ability score bonus points to distribute
    #[serde(default)]
    pub bonus_points: u8,
    #[serde(default)]
    pub max_spell_tier: u8,
}

impl LevelProgression {
    /// No selections allowed.
    pub fn empty(level: u8) -> Self {
        Self {
            level,
            abilities: 0,
            spells: 0,
            signature_spells: 0,
            bonus_points: 0,
            max_spell_tier: 0,
        }
    }
}

/// A class ability from the class ability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityDef {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub min_level: u8,
    #[serde(default)]
    pub description: String,
    /// Always known once unlocked; does not count against the limit.
    #[serde(default)]
    pub granted: bool,
}

/// A class feature offering one boon out of several options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoonSlot {
    pub id: String,
    pub label: String,
    #[serde(default = "default_level")]
    pub level: u8,
    /// Boon ids that may fill this slot
    pub options: Vec<String>,
}

fn default_level() -> u8 {
    1
}
