//! Rules catalog - the read-only content database.
//!
//! Holds the class, ability, spell, boon, weapon and armor tables that
//! character builds are reconciled against. The catalog is plain data; it is
//! loaded once (built-in or from a JSON file) and shared behind an `Arc`.
//!
//! # Consistency
//!
//! `RulesCatalog::validate` checks cross-table references once at load time so
//! the reconciliation engine can treat a missing reference as stale save data
//! rather than as a broken catalog.

mod boon;
mod class;
mod equipment;
mod filter;
mod spell;

pub use boon::{BoonDef, BoonEffect, BoonTotals};
pub use class::{AbilityDef, BoonSlot, ClassDef, LevelProgression};
pub use equipment::{ArmorDef, WeaponDef};
pub use filter::ContentFilter;
pub use spell::SpellDef;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The full set of rules tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesCatalog {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub spells: Vec<SpellDef>,
    #[serde(default)]
    pub boons: Vec<BoonDef>,
    #[serde(default)]
    pub weapons: Vec<WeaponDef>,
    #[serde(default)]
    pub armor: Vec<ArmorDef>,
}

/// Which table a catalog entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Class,
    Ability,
    Spell,
    Boon,
    Weapon,
    Armor,
}

/// Name and rules text for any catalog entry (what a tooltip shows).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub kind: EntryKind,
    pub id: String,
    pub name: String,
    pub description: String,
    /// Owning class for abilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

impl RulesCatalog {
    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn spell(&self, id: &str) -> Option<&SpellDef> {
        self.spells.iter().find(|s| s.id == id)
    }

    pub fn boon(&self, id: &str) -> Option<&BoonDef> {
        self.boons.iter().find(|b| b.id == id)
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponDef> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn armor(&self, id: &str) -> Option<&ArmorDef> {
        self.armor.iter().find(|a| a.id == id)
    }

    /// Spells matching the filter, ordered by tier then name.
    pub fn find_spells(&self, filter: &ContentFilter) -> Vec<&SpellDef> {
        let mut found: Vec<&SpellDef> = self
            .spells
            .iter()
            .filter(|s| filter.matches_spell(s))
            .collect();
        found.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.name.cmp(&b.name)));
        if let Some(limit) = filter.limit {
            found.truncate(limit);
        }
        found
    }

    /// Look up an entry by id across every table.
    ///
    /// Ids are expected to be unique across tables; if they are not, the first
    /// table in `EntryKind` order wins.
    pub fn describe(&self, id: &str) -> Option<CatalogEntry> {
        if let Some(c) = self.class(id) {
            return Some(entry(EntryKind::Class, &c.id, &c.name, &c.description, None));
        }
        for class in &self.classes {
            if let Some(a) = class.ability(id) {
                return Some(entry(
                    EntryKind::Ability,
                    &a.id,
                    &a.name,
                    &a.description,
                    Some(class.id.clone()),
                ));
            }
        }
        if let Some(s) = self.spell(id) {
            return Some(entry(EntryKind::Spell, &s.id, &s.name, &s.description, None));
        }
        if let Some(b) = self.boon(id) {
            return Some(entry(EntryKind::Boon, &b.id, &b.name, &b.description, None));
        }
        if let Some(w) = self.weapon(id) {
            return Some(entry(EntryKind::Weapon, &w.id, &w.name, &w.description, None));
        }
        self.armor(id)
            .map(|a| entry(EntryKind::Armor, &a.id, &a.name, &a.description, None))
    }

    /// Check cross-table references and id uniqueness.
    ///
    /// Collects every problem rather than stopping at the first so a broken
    /// catalog file can be fixed in one pass.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        duplicates("class", self.classes.iter().map(|c| c.id.as_str()), &mut problems);
        duplicates("spell", self.spells.iter().map(|s| s.id.as_str()), &mut problems);
        duplicates("boon", self.boons.iter().map(|b| b.id.as_str()), &mut problems);
        duplicates("weapon", self.weapons.iter().map(|w| w.id.as_str()), &mut problems);
        duplicates("armor", self.armor.iter().map(|a| a.id.as_str()), &mut problems);

        for class in &self.classes {
            duplicates(
                "ability",
                class.abilities.iter().map(|a| a.id.as_str()),
                &mut problems,
            );
            duplicates(
                "boon slot",
                class.boon_slots.iter().map(|s| s.id.as_str()),
                &mut problems,
            );

            if class.progression.is_empty() {
                problems.push(format!("class '{}' has no progression", class.id));
            }
            let levels: Vec<u8> = class.progression.iter().map(|p| p.level).collect();
            if levels.first().is_some_and(|l| *l != 1) {
                problems.push(format!("class '{}' progression must start at level 1", class.id));
            }
            if levels.windows(2).any(|w| w[0] >= w[1]) {
                problems.push(format!(
                    "class '{}' progression levels must be strictly increasing",
                    class.id
                ));
            }

            for slot in &class.boon_slots {
                if slot.options.is_empty() {
                    problems.push(format!(
                        "boon slot '{}' in class '{}' has no options",
                        slot.id, class.id
                    ));
                }
                for option in &slot.options {
                    if self.boon(option).is_none() {
                        problems.push(format!(
                            "boon slot '{}' in class '{}' references unknown boon '{}'",
                            slot.id, class.id, option
                        ));
                    }
                }
            }
        }

        for boon in &self.boons {
            if let BoonEffect::Spell { spell_id } = &boon.effect {
                if self.spell(spell_id).is_none() {
                    problems.push(format!(
                        "boon '{}' grants unknown spell '{}'",
                        boon.id, spell_id
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(problems.join("; ")))
        }
    }
}

fn entry(
    kind: EntryKind,
    id: &str,
    name: &str,
    description: &str,
    class_id: Option<String>,
) -> CatalogEntry {
    CatalogEntry {
        kind,
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        class_id,
    }
}

fn duplicates<'a>(table: &str, ids: impl Iterator<Item = &'a str>, problems: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            problems.push(format!("duplicate {} id '{}'", table, id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::catalog;

    #[test]
    fn fixture_catalog_is_valid() {
        assert!(catalog().validate().is_ok());
    }

    #[test]
    fn lookups_by_id() {
        let c = catalog();
        assert_eq!(c.class("seer").map(|c| c.name.as_str()), Some("Seer"));
        assert!(c.spell("ember_lance").is_some());
        assert!(c.boon("hardy").is_some());
        assert!(c.weapon("longsword").is_some());
        assert!(c.armor("chain").is_some());
        assert!(c.class("nope").is_none());
    }

    #[test]
    fn find_spells_sorts_and_limits() {
        let c = catalog();
        let filter = ContentFilter {
            class: Some("seer".into()),
            ..Default::default()
        };
        let found = c.find_spells(&filter);
        let tiers: Vec<u8> = found.iter().map(|s| s.tier).collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);

        let limited = c.find_spells(&ContentFilter {
            limit: Some(1),
            ..filter
        });
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn describe_finds_abilities_with_owner() {
        let entry = catalog().describe("second_sight").unwrap();
        assert_eq!(entry.kind, EntryKind::Ability);
        assert_eq!(entry.class_id.as_deref(), Some("seer"));
        assert!(catalog().describe("missing").is_none());
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut c = catalog();
        c.spells.push(c.spells[0].clone());
        c.classes[0].boon_slots[0].options.push("ghost".into());
        c.classes[0].progression[0].level = 2;

        let err = c.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate spell id"));
        assert!(err.contains("unknown boon 'ghost'"));
        assert!(err.contains("must start at level 1"));
    }

    #[test]
    fn validate_accepts_sparse_progression() {
        let c = catalog();
        let warden = c.class("warden").unwrap();
        let levels: Vec<u8> = warden.progression.iter().map(|p| p.level).collect();
        assert_eq!(levels, vec![1, 3, 5]);
        assert!(c.validate().is_ok());

        // Level 2 carries level 1's limits, level 4 carries level 3's
        assert_eq!(warden.limits_at(2).abilities, 2);
        assert_eq!(warden.limits_at(4).abilities, 3);
        assert_eq!(warden.limits_at(4).bonus_points, 1);
        assert_eq!(warden.max_level(), 5);
    }

    #[test]
    fn validate_rejects_unordered_progression() {
        let mut c = catalog();
        c.classes[1].progression.swap(1, 2);
        let err = c.validate().unwrap_err().to_string();
        assert!(err.contains("class 'warden' progression levels must be strictly increasing"));
    }

    #[test]
    fn validate_rejects_boon_granting_unknown_spell() {
        let mut c = catalog();
        c.boons.push(BoonDef {
            id: "lost".into(),
            name: "Lost".into(),
            description: String::new(),
            effect: BoonEffect::Spell {
                spell_id: "nowhere".into(),
            },
        });
        assert!(c.validate().is_err());
    }
}
