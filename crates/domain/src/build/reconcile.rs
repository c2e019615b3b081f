//! Build-state reconciliation.
//!
//! Saved builds outlive the rules tables they were made against: a class can
//! lose an ability, a spell can move tiers, a level can drop. `reconcile`
//! merges a saved build with the current catalog and returns a build that obeys
//! every limit, plus a report of what had to go.
//!
//! # Invariants
//!
//! - The output never exceeds any per-level selection limit.
//! - Granted abilities and boon-granted spells are always present and listed
//!   first.
//! - Signature spells are a subset of known spells.
//! - Reconciling an already reconciled build returns it unchanged with an
//!   empty report.

use serde::{Deserialize, Serialize};

use super::selection::CharacterBuild;
use crate::rules::{BoonEffect, ClassDef, RulesCatalog};
use crate::value_objects::Stat;

/// Most bonus points a single stat may take.
pub const MAX_BONUS_PER_STAT: i32 = 2;

/// Lowest allowed base score.
pub const MIN_BASE_SCORE: i32 = 1;

/// Highest allowed base score.
pub const MAX_BASE_SCORE: i32 = 20;

/// Weapons that can be equipped at once.
pub const MAX_EQUIPPED_WEAPONS: usize = 2;

/// Which part of the build a dropped selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Class,
    Level,
    Ability,
    Spell,
    SignatureSpell,
    Boon,
    StatBonus,
    BaseScore,
    Weapon,
    Armor,
}

/// Why a saved selection did not survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The class is not in the catalog
    UnknownClass,
    /// The build has no class, so class-bound picks cannot stand
    NoClass,
    /// The id is not in the relevant table
    UnknownEntry,
    /// The spell is not on the class's spell list
    NotOnClassList,
    /// Unlocks above the character's level
    AboveLevel,
    Duplicate,
    /// Past the limit for the character's level
    OverLimit,
    /// Signature spell that is not a known spell
    NotKnown,
    /// Boon that is not an option for its slot
    InvalidOption,
    /// A number outside its allowed range was pulled back into range
    Clamped,
}

/// One removed or adjusted selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedSelection {
    pub kind: SelectionKind,
    pub id: String,
    pub reason: DropReason,
}

impl DroppedSelection {
    fn new(kind: SelectionKind, id: impl Into<String>, reason: DropReason) -> Self {
        Self {
            kind,
            id: id.into(),
            reason,
        }
    }
}

/// Result of reconciling a build against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub build: CharacterBuild,
    pub dropped: Vec<DroppedSelection>,
}

impl Reconciliation {
    /// True when the saved build already matched the rules tables.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Merge a saved build with the current rules tables.
pub fn reconcile(catalog: &RulesCatalog, saved: &CharacterBuild) -> Reconciliation {
    let mut dropped = Vec::new();
    let mut build = CharacterBuild {
        class_id: None,
        level: 1,
        base_scores: saved.base_scores,
        abilities: Vec::new(),
        spells: Vec::new(),
        signature_spells: Vec::new(),
        boons: Default::default(),
        stat_bonuses: Default::default(),
        weapons: Vec::new(),
        armor: None,
    };

    let class = match saved.class_id.as_deref() {
        Some(id) => match catalog.class(id) {
            Some(class) => Some(class),
            None => {
                dropped.push(DroppedSelection::new(
                    SelectionKind::Class,
                    id,
                    DropReason::UnknownClass,
                ));
                None
            }
        },
        None => None,
    };

    match class {
        Some(class) => {
            build.class_id = Some(class.id.clone());
            build.level = clamp_level(saved.level, class.max_level(), &mut dropped);
            reconcile_class_selections(catalog, class, saved, &mut build, &mut dropped);
        }
        None => {
            build.level = clamp_level(saved.level, 1, &mut dropped);
            drop_class_selections(saved, &mut dropped);
        }
    }

    reconcile_equipment(catalog, saved, &mut build, &mut dropped);
    reconcile_base_scores(&mut build, &mut dropped);

    Reconciliation { build, dropped }
}

fn clamp_level(level: u8, max: u8, dropped: &mut Vec<DroppedSelection>) -> u8 {
    let clamped = level.clamp(1, max);
    if clamped != level {
        dropped.push(DroppedSelection::new(
            SelectionKind::Level,
            level.to_string(),
            DropReason::Clamped,
        ));
    }
    clamped
}

fn drop_class_selections(saved: &CharacterBuild, dropped: &mut Vec<DroppedSelection>) {
    let no_class = |kind, id: &String| DroppedSelection::new(kind, id.clone(), DropReason::NoClass);
    dropped.extend(saved.abilities.iter().map(|id| no_class(SelectionKind::Ability, id)));
    dropped.extend(saved.boons.keys().map(|id| no_class(SelectionKind::Boon, id)));
    dropped.extend(saved.spells.iter().map(|id| no_class(SelectionKind::Spell, id)));
    dropped.extend(
        saved
            .signature_spells
            .iter()
            .map(|id| no_class(SelectionKind::SignatureSpell, id)),
    );
    for stat in Stat::ALL {
        if saved.stat_bonuses.get(stat) != 0 {
            dropped.push(DroppedSelection::new(
                SelectionKind::StatBonus,
                stat.as_str(),
                DropReason::NoClass,
            ));
        }
    }
}

fn reconcile_class_selections(
    catalog: &RulesCatalog,
    class: &ClassDef,
    saved: &CharacterBuild,
    build: &mut CharacterBuild,
    dropped: &mut Vec<DroppedSelection>,
) {
    let level = build.level;
    let limits = class.limits_at(level);

    // Abilities: granted first, then picks in saved order up to the limit.
    build.abilities.extend(
        class
            .abilities_at(level)
            .filter(|a| a.granted)
            .map(|a| a.id.clone()),
    );
    let mut picked = 0u8;
    for id in &saved.abilities {
        let reason = match class.ability(id) {
            None => Some(DropReason::UnknownEntry),
            Some(a) if a.min_level > level => Some(DropReason::AboveLevel),
            Some(a) if a.granted => continue,
            Some(_) if build.has_ability(id) => Some(DropReason::Duplicate),
            Some(_) if picked >= limits.abilities => Some(DropReason::OverLimit),
            Some(_) => None,
        };
        match reason {
            Some(reason) => dropped.push(DroppedSelection::new(SelectionKind::Ability, id, reason)),
            None => {
                build.abilities.push(id.clone());
                picked += 1;
            }
        }
    }

    // Boons come before spells: a boon can grant a spell.
    for (slot_id, boon_id) in &saved.boons {
        let reason = match class.boon_slot(slot_id) {
            None => Some((slot_id, DropReason::UnknownEntry)),
            Some(slot) if slot.level > level => Some((slot_id, DropReason::AboveLevel)),
            Some(slot) if !slot.options.contains(boon_id) || catalog.boon(boon_id).is_none() => {
                Some((boon_id, DropReason::InvalidOption))
            }
            Some(_) => None,
        };
        match reason {
            Some((id, reason)) => {
                dropped.push(DroppedSelection::new(SelectionKind::Boon, id, reason))
            }
            None => {
                build.boons.insert(slot_id.clone(), boon_id.clone());
            }
        }
    }

    // Spells: boon-granted first, then picks from the class list.
    for spell_id in granted_spells(catalog, build) {
        if catalog.spell(&spell_id).is_some() && !build.has_spell(&spell_id) {
            build.spells.push(spell_id);
        }
    }
    let granted_count = build.spells.len();
    let mut picked = 0u8;
    for id in &saved.spells {
        let reason = match catalog.spell(id) {
            None => Some(DropReason::UnknownEntry),
            Some(_) if build.spells[..granted_count].contains(id) => continue,
            Some(s) if !s.available_to(&class.id) => Some(DropReason::NotOnClassList),
            Some(s) if s.tier > limits.max_spell_tier => Some(DropReason::AboveLevel),
            Some(_) if build.has_spell(id) => Some(DropReason::Duplicate),
            Some(_) if picked >= limits.spells => Some(DropReason::OverLimit),
            Some(_) => None,
        };
        match reason {
            Some(reason) => dropped.push(DroppedSelection::new(SelectionKind::Spell, id, reason)),
            None => {
                build.spells.push(id.clone());
                picked += 1;
            }
        }
    }

    // Signature spells: a subset of known spells.
    for id in &saved.signature_spells {
        let reason = if !build.has_spell(id) {
            Some(DropReason::NotKnown)
        } else if build.is_signature(id) {
            Some(DropReason::Duplicate)
        } else if build.signature_spells.len() >= usize::from(limits.signature_spells) {
            Some(DropReason::OverLimit)
        } else {
            None
        };
        match reason {
            Some(reason) => dropped.push(DroppedSelection::new(
                SelectionKind::SignatureSpell,
                id,
                reason,
            )),
            None => build.signature_spells.push(id.clone()),
        }
    }

    // Stat bonuses: per-stat cap, then the level budget from the last stat back.
    for stat in Stat::ALL {
        let points = saved.stat_bonuses.get(stat);
        let capped = points.clamp(0, MAX_BONUS_PER_STAT);
        if capped != points {
            dropped.push(DroppedSelection::new(
                SelectionKind::StatBonus,
                stat.as_str(),
                DropReason::Clamped,
            ));
        }
        build.stat_bonuses.set(stat, capped);
    }
    let budget = i32::from(limits.bonus_points);
    let mut excess = build.stat_bonuses.total() - budget;
    for stat in Stat::ALL.iter().rev() {
        if excess <= 0 {
            break;
        }
        let points = build.stat_bonuses.get(*stat);
        if points == 0 {
            continue;
        }
        let cut = points.min(excess);
        build.stat_bonuses.set(*stat, points - cut);
        excess -= cut;
        dropped.push(DroppedSelection::new(
            SelectionKind::StatBonus,
            stat.as_str(),
            DropReason::OverLimit,
        ));
    }
}

/// Spell ids granted by the boons currently picked in `build`.
pub(crate) fn granted_spells(catalog: &RulesCatalog, build: &CharacterBuild) -> Vec<String> {
    let mut spells = Vec::new();
    for boon_id in build.boons.values() {
        if let Some(BoonEffect::Spell { spell_id }) = catalog.boon(boon_id).map(|b| &b.effect) {
            if !spells.contains(spell_id) {
                spells.push(spell_id.clone());
            }
        }
    }
    spells
}

fn reconcile_equipment(
    catalog: &RulesCatalog,
    saved: &CharacterBuild,
    build: &mut CharacterBuild,
    dropped: &mut Vec<DroppedSelection>,
) {
    for id in &saved.weapons {
        let reason = if catalog.weapon(id).is_none() {
            Some(DropReason::UnknownEntry)
        } else if build.weapons.contains(id) {
            Some(DropReason::Duplicate)
        } else if build.weapons.len() >= MAX_EQUIPPED_WEAPONS {
            Some(DropReason::OverLimit)
        } else {
            None
        };
        match reason {
            Some(reason) => dropped.push(DroppedSelection::new(SelectionKind::Weapon, id, reason)),
            None => build.weapons.push(id.clone()),
        }
    }

    build.armor = match saved.armor.as_deref() {
        Some(id) if catalog.armor(id).is_none() => {
            dropped.push(DroppedSelection::new(
                SelectionKind::Armor,
                id,
                DropReason::UnknownEntry,
            ));
            None
        }
        other => other.map(str::to_string),
    };
}

fn reconcile_base_scores(build: &mut CharacterBuild, dropped: &mut Vec<DroppedSelection>) {
    for stat in Stat::ALL {
        let score = build.base_scores.get(stat);
        let clamped = score.clamp(MIN_BASE_SCORE, MAX_BASE_SCORE);
        if clamped != score {
            build.base_scores.set(stat, clamped);
            dropped.push(DroppedSelection::new(
                SelectionKind::BaseScore,
                stat.as_str(),
                DropReason::Clamped,
            ));
        }
    }
}
