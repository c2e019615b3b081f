//! The persisted selection model for one character.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::StatLine;

/// Default base score for every stat on a fresh character.
pub const DEFAULT_BASE_SCORE: i32 = 10;

/// Everything a player has picked for a character, as saved.
///
/// Simple data struct: any combination of values can come back from storage,
/// and `reconcile` is what brings it in line with the current rules tables.
/// Ids are catalog ids; order is pick order (earliest first), which decides
/// what survives when a limit shrinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterBuild {
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default = "default_base_scores")]
    pub base_scores: StatLine,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub signature_spells: Vec<String>,
    /// Boon slot id -> picked boon id
    #[serde(default)]
    pub boons: BTreeMap<String, String>,
    #[serde(default)]
    pub stat_bonuses: StatLine,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub armor: Option<String>,
}

impl Default for CharacterBuild {
    fn default() -> Self {
        Self {
            class_id: None,
            level: 1,
            base_scores: default_base_scores(),
            abilities: Vec::new(),
            spells: Vec::new(),
            signature_spells: Vec::new(),
            boons: BTreeMap::new(),
            stat_bonuses: StatLine::default(),
            weapons: Vec::new(),
            armor: None,
        }
    }
}

impl CharacterBuild {
    /// A fresh level 1 build for the given class.
    pub fn for_class(class_id: impl Into<String>) -> Self {
        Self {
            class_id: Some(class_id.into()),
            ..Self::default()
        }
    }

    /// Drop every selection that belongs to the class tables.
    ///
    /// Base scores and equipment are class-independent and survive.
    pub fn clear_class_selections(&mut self) {
        self.abilities.clear();
        self.spells.clear();
        self.signature_spells.clear();
        self.boons.clear();
        self.stat_bonuses = StatLine::default();
    }

    pub fn has_ability(&self, id: &str) -> bool {
        self.abilities.iter().any(|a| a == id)
    }

    pub fn has_spell(&self, id: &str) -> bool {
        self.spells.iter().any(|s| s == id)
    }

    pub fn is_signature(&self, id: &str) -> bool {
        self.signature_spells.iter().any(|s| s == id)
    }
}

fn default_level() -> u8 {
    1
}

fn default_base_scores() -> StatLine {
    StatLine::uniform(DEFAULT_BASE_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Stat;

    #[test]
    fn empty_json_gives_default_build() {
        let build: CharacterBuild = serde_json::from_str("{}").unwrap();
        assert_eq!(build, CharacterBuild::default());
        assert_eq!(build.level, 1);
        assert_eq!(build.base_scores.get(Stat::Cha), DEFAULT_BASE_SCORE);
    }

    #[test]
    fn clear_keeps_equipment_and_scores() {
        let mut build = CharacterBuild::for_class("seer");
        build.abilities.push("omen_reading".into());
        build.spells.push("mend".into());
        build.signature_spells.push("mend".into());
        build.boons.insert("seer_gift".into(), "hardy".into());
        build.stat_bonuses.set(Stat::Wis, 1);
        build.base_scores.set(Stat::Wis, 15);
        build.weapons.push("dagger".into());
        build.armor = Some("leather".into());

        build.clear_class_selections();

        assert!(build.abilities.is_empty());
        assert!(build.spells.is_empty());
        assert!(build.signature_spells.is_empty());
        assert!(build.boons.is_empty());
        assert_eq!(build.stat_bonuses.total(), 0);
        assert_eq!(build.base_scores.get(Stat::Wis), 15);
        assert_eq!(build.weapons, vec!["dagger".to_string()]);
        assert_eq!(build.armor.as_deref(), Some("leather"));
        assert_eq!(build.class_id.as_deref(), Some("seer"));
    }
}
