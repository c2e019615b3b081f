//! Form edits applied back onto a build.
//!
//! Each `BuildEdit` is one form control change. `apply_edit` checks it
//! against the rules tables, applies it, and reconciles the result so the
//! returned build always obeys every limit.

use serde::{Deserialize, Serialize};

use super::reconcile::{
    granted_spells, reconcile, DroppedSelection, MAX_BASE_SCORE, MAX_BONUS_PER_STAT,
    MAX_EQUIPPED_WEAPONS, MIN_BASE_SCORE,
};
use super::selection::CharacterBuild;
use crate::error::DomainError;
use crate::rules::{ClassDef, RulesCatalog};
use crate::value_objects::Stat;

/// One form control change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BuildEdit {
    #[serde(rename_all = "camelCase")]
    SetClass { class_id: Option<String> },
    SetLevel { level: u8 },
    ToggleAbility { id: String, checked: bool },
    ToggleSpell { id: String, checked: bool },
    ToggleSignature { id: String, signature: bool },
    #[serde(rename_all = "camelCase")]
    SelectBoon {
        slot_id: String,
        boon_id: Option<String>,
    },
    SetStatBonus { stat: Stat, points: i32 },
    SetBaseScore { stat: Stat, score: i32 },
    EquipWeapon { id: String, equipped: bool },
    #[serde(rename_all = "camelCase")]
    SetArmor { armor_id: Option<String> },
}

/// Outcome of an accepted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildChange {
    pub build: CharacterBuild,
    /// False when the edit was a no-op
    pub changed: bool,
    /// Selections that fell out as a side effect (e.g. lowering the level)
    pub dropped: Vec<DroppedSelection>,
}

/// Apply one edit to a build.
///
/// The input build is reconciled first, so edits against stale save data
/// still produce a valid result.
pub fn apply_edit(
    catalog: &RulesCatalog,
    build: &CharacterBuild,
    edit: &BuildEdit,
) -> Result<BuildChange, DomainError> {
    let base = reconcile(catalog, build);
    let mut next = base.build.clone();

    match edit {
        BuildEdit::SetClass { class_id } => set_class(catalog, &mut next, class_id.as_deref())?,
        BuildEdit::SetLevel { level } => {
            let max = class_of(catalog, &next).map_or(1, ClassDef::max_level);
            if *level < 1 || *level > max {
                return Err(DomainError::validation(format!(
                    "Level must be between 1 and {}",
                    max
                )));
            }
            next.level = *level;
        }
        BuildEdit::ToggleAbility { id, checked } => {
            toggle_ability(require_class(catalog, &next)?, &mut next, id, *checked)?
        }
        BuildEdit::ToggleSpell { id, checked } => toggle_spell(catalog, &mut next, id, *checked)?,
        BuildEdit::ToggleSignature { id, signature } => {
            toggle_signature(catalog, &mut next, id, *signature)?
        }
        BuildEdit::SelectBoon { slot_id, boon_id } => {
            select_boon(catalog, &mut next, slot_id, boon_id.as_deref())?
        }
        BuildEdit::SetStatBonus { stat, points } => {
            set_stat_bonus(catalog, &mut next, *stat, *points)?
        }
        BuildEdit::SetBaseScore { stat, score } => {
            if !(MIN_BASE_SCORE..=MAX_BASE_SCORE).contains(score) {
                return Err(DomainError::validation(format!(
                    "{} must be between {} and {}",
                    stat.display_name(),
                    MIN_BASE_SCORE,
                    MAX_BASE_SCORE
                )));
            }
            next.base_scores.set(*stat, *score);
        }
        BuildEdit::EquipWeapon { id, equipped } => equip_weapon(catalog, &mut next, id, *equipped)?,
        BuildEdit::SetArmor { armor_id } => {
            if let Some(id) = armor_id {
                if catalog.armor(id).is_none() {
                    return Err(DomainError::not_found("Armor", id.as_str()));
                }
            }
            next.armor = armor_id.clone();
        }
    }

    let result = reconcile(catalog, &next);
    let mut dropped = base.dropped;
    dropped.extend(result.dropped);
    Ok(BuildChange {
        changed: result.build != *build,
        build: result.build,
        dropped,
    })
}

fn class_of<'a>(catalog: &'a RulesCatalog, build: &CharacterBuild) -> Option<&'a ClassDef> {
    build.class_id.as_deref().and_then(|id| catalog.class(id))
}

fn require_class<'a>(
    catalog: &'a RulesCatalog,
    build: &CharacterBuild,
) -> Result<&'a ClassDef, DomainError> {
    class_of(catalog, build).ok_or_else(|| DomainError::constraint("No class selected"))
}

fn limit_reached(kind: &'static str, current: usize, max: u8) -> DomainError {
    DomainError::limit_reached(kind, u32::try_from(current).unwrap_or(u32::MAX), u32::from(max))
}

fn set_class(
    catalog: &RulesCatalog,
    build: &mut CharacterBuild,
    class_id: Option<&str>,
) -> Result<(), DomainError> {
    if let Some(id) = class_id {
        if catalog.class(id).is_none() {
            return Err(DomainError::not_found("Class", id));
        }
    }
    if build.class_id.as_deref() == class_id {
        return Ok(());
    }
    build.class_id = class_id.map(str::to_string);
    build.clear_class_selections();
    Ok(())
}

fn toggle_ability(
    class: &ClassDef,
    build: &mut CharacterBuild,
    id: &str,
    checked: bool,
) -> Result<(), DomainError> {
    let ability = class
        .ability(id)
        .ok_or_else(|| DomainError::not_found("Ability", id))?;

    if !checked {
        if ability.granted {
            return Err(DomainError::constraint(format!(
                "{} is granted by the class and cannot be removed",
                ability.name
            )));
        }
        build.abilities.retain(|a| a != id);
        return Ok(());
    }

    if build.has_ability(id) {
        return Ok(());
    }
    if ability.min_level > build.level {
        return Err(DomainError::constraint(format!(
            "{} unlocks at level {}",
            ability.name, ability.min_level
        )));
    }
    let limit = class.limits_at(build.level).abilities;
    let picked = build
        .abilities
        .iter()
        .filter(|a| class.ability(a).is_some_and(|a| !a.granted))
        .count();
    if picked >= usize::from(limit) {
        return Err(limit_reached("abilities", picked, limit));
    }
    build.abilities.push(id.to_string());
    Ok(())
}

fn toggle_spell(
    catalog: &RulesCatalog,
    build: &mut CharacterBuild,
    id: &str,
    checked: bool,
) -> Result<(), DomainError> {
    let spell = catalog
        .spell(id)
        .ok_or_else(|| DomainError::not_found("Spell", id))?;
    let granted = granted_spells(catalog, build);

    if !checked {
        if granted.iter().any(|g| g == id) {
            return Err(DomainError::constraint(format!(
                "{} is granted by a boon and cannot be removed",
                spell.name
            )));
        }
        build.spells.retain(|s| s != id);
        build.signature_spells.retain(|s| s != id);
        return Ok(());
    }

    if build.has_spell(id) {
        return Ok(());
    }
    let class = require_class(catalog, build)?;
    if !spell.available_to(&class.id) {
        return Err(DomainError::constraint(format!(
            "{} is not on the {} spell list",
            spell.name, class.name
        )));
    }
    let limits = class.limits_at(build.level);
    if spell.tier > limits.max_spell_tier {
        return Err(DomainError::constraint(format!(
            "{} is a tier {} spell; level {} allows tier {}",
            spell.name, spell.tier, build.level, limits.max_spell_tier
        )));
    }
    let picked = build.spells.iter().filter(|s| !granted.contains(s)).count();
    if picked >= usize::from(limits.spells) {
        return Err(limit_reached("spells", picked, limits.spells));
    }
    build.spells.push(id.to_string());
    Ok(())
}

fn toggle_signature(
    catalog: &RulesCatalog,
    build: &mut CharacterBuild,
    id: &str,
    signature: bool,
) -> Result<(), DomainError> {
    let spell = catalog
        .spell(id)
        .ok_or_else(|| DomainError::not_found("Spell", id))?;

    if !signature {
        build.signature_spells.retain(|s| s != id);
        return Ok(());
    }
    if build.is_signature(id) {
        return Ok(());
    }
    if !build.has_spell(id) {
        return Err(DomainError::constraint(format!(
            "{} must be known before it can be a signature spell",
            spell.name
        )));
    }
    let limit = require_class(catalog, build)?
        .limits_at(build.level)
        .signature_spells;
    let current = build.signature_spells.len();
    if current >= usize::from(limit) {
        return Err(limit_reached("signature spells", current, limit));
    }
    build.signature_spells.push(id.to_string());
    Ok(())
}

fn select_boon(
    catalog: &RulesCatalog,
    build: &mut CharacterBuild,
    slot_id: &str,
    boon_id: Option<&str>,
) -> Result<(), DomainError> {
    let class = require_class(catalog, build)?;
    let slot = class
        .boon_slot(slot_id)
        .ok_or_else(|| DomainError::not_found("Boon slot", slot_id))?;
    if slot.level > build.level {
        return Err(DomainError::constraint(format!(
            "{} unlocks at level {}",
            slot.label, slot.level
        )));
    }
    if let Some(boon_id) = boon_id {
        if !slot.options.iter().any(|o| o == boon_id) {
            return Err(DomainError::validation(format!(
                "'{}' is not an option for {}",
                boon_id, slot.label
            )));
        }
        if catalog.boon(boon_id).is_none() {
            return Err(DomainError::not_found("Boon", boon_id));
        }
    }

    let granted_before = granted_spells(catalog, build);
    match boon_id {
        Some(boon_id) => {
            build.boons.insert(slot_id.to_string(), boon_id.to_string());
        }
        None => {
            build.boons.remove(slot_id);
        }
    }

    // Spells the old boon granted go with it.
    let granted_after = granted_spells(catalog, build);
    for lost in granted_before.iter().filter(|s| !granted_after.contains(s)) {
        build.spells.retain(|s| s != lost);
        build.signature_spells.retain(|s| s != lost);
    }
    Ok(())
}

fn set_stat_bonus(
    catalog: &RulesCatalog,
    build: &mut CharacterBuild,
    stat: Stat,
    points: i32,
) -> Result<(), DomainError> {
    if !(0..=MAX_BONUS_PER_STAT).contains(&points) {
        return Err(DomainError::validation(format!(
            "Bonus points per stat must be between 0 and {}",
            MAX_BONUS_PER_STAT
        )));
    }
    let budget = require_class(catalog, build)?
        .limits_at(build.level)
        .bonus_points;
    let others = build.stat_bonuses.total() - build.stat_bonuses.get(stat);
    if others + points > i32::from(budget) {
        return Err(DomainError::limit_reached(
            "bonus points",
            u32::try_from(others + points).unwrap_or(u32::MAX),
            u32::from(budget),
        ));
    }
    build.stat_bonuses.set(stat, points);
    Ok(())
}

fn equip_weapon(
    catalog: &RulesCatalog,
    build: &mut CharacterBuild,
    id: &str,
    equipped: bool,
) -> Result<(), DomainError> {
    if catalog.weapon(id).is_none() {
        return Err(DomainError::not_found("Weapon", id));
    }
    if !equipped {
        build.weapons.retain(|w| w != id);
        return Ok(());
    }
    if build.weapons.iter().any(|w| w == id) {
        return Ok(());
    }
    if build.weapons.len() >= MAX_EQUIPPED_WEAPONS {
        return Err(DomainError::limit_reached(
            "weapons",
            u32::try_from(build.weapons.len()).unwrap_or(u32::MAX),
            u32::try_from(MAX_EQUIPPED_WEAPONS).unwrap_or(u32::MAX),
        ));
    }
    build.weapons.push(id.to_string());
    Ok(())
}
