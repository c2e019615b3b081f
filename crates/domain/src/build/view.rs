//! Projection of a build onto form controls.
//!
//! The reference view is what a character sheet form renders: which boxes are
//! checked, which are locked or disabled, the "X of Y selected" counters, and
//! the derived numbers. It is computed from a reconciled build and never
//! stored.

use serde::{Deserialize, Serialize};

use super::reconcile::MAX_BONUS_PER_STAT;
use super::selection::CharacterBuild;
use crate::rules::{ArmorDef, BoonTotals, ClassDef, LevelProgression, RulesCatalog, WeaponDef};
use crate::value_objects::{score_modifier, Stat};

/// Selected vs allowed for one limited selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCount {
    pub selected: u32,
    pub limit: u32,
    /// e.g. "1 of 2 abilities selected"
    pub label: String,
}

impl SelectionCount {
    pub fn new(selected: u32, limit: u32, noun: &str) -> Self {
        Self {
            selected,
            limit,
            label: Self::summary(selected, limit, noun),
        }
    }

    pub fn summary(selected: u32, limit: u32, noun: &str) -> String {
        format!("{} of {} {} selected", selected, limit, noun)
    }

    pub fn is_full(&self) -> bool {
        self.selected >= self.limit
    }
}

/// A checkbox for a class ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub checked: bool,
    /// Granted by the class; always checked
    pub locked: bool,
    pub enabled: bool,
}

/// A spell row: the known checkbox plus the signature toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellChoiceView {
    pub id: String,
    pub name: String,
    pub tier: u8,
    pub description: String,
    pub checked: bool,
    pub enabled: bool,
    /// Known through a boon rather than picked
    pub granted: bool,
    pub signature: bool,
    pub signature_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoonOptionView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub selected: bool,
}

/// A one-of-several picker for an unlocked boon slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoonSlotView {
    pub id: String,
    pub label: String,
    pub selected: Option<String>,
    pub options: Vec<BoonOptionView>,
}

/// One stat row: base score, spent bonus points, boon bonus and the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatView {
    pub stat: Stat,
    pub name: String,
    pub base: i32,
    pub bonus: i32,
    pub boon: i32,
    pub total: i32,
    pub modifier: i32,
    /// Another bonus point can go here
    pub can_raise: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub evasion: i32,
    pub armor_score: i32,
    pub hit_points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentView {
    pub weapons: Vec<WeaponDef>,
    pub armor: Option<ArmorDef>,
}

/// The full reference view for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildView {
    pub class_id: Option<String>,
    pub class_name: Option<String>,
    pub level: u8,
    pub max_level: u8,
    pub abilities: Vec<ChoiceView>,
    pub ability_count: SelectionCount,
    pub spells: Vec<SpellChoiceView>,
    pub spell_count: SelectionCount,
    pub signature_count: SelectionCount,
    pub boon_slots: Vec<BoonSlotView>,
    pub stat_lines: Vec<StatView>,
    pub bonus_points: SelectionCount,
    pub derived: DerivedStats,
    pub equipment: EquipmentView,
}

impl BuildView {
    /// Project a build onto form state.
    ///
    /// Expects a reconciled build. Ids the catalog does not know are skipped
    /// rather than rendered.
    pub fn project(catalog: &RulesCatalog, build: &CharacterBuild) -> Self {
        let class = build.class_id.as_deref().and_then(|id| catalog.class(id));
        let limits = class
            .map(|c| c.limits_at(build.level))
            .unwrap_or_else(|| LevelProgression::empty(build.level));
        let boons = BoonTotals::from_boons(build.boons.values().filter_map(|id| catalog.boon(id)));

        let (abilities, ability_count) = match class {
            Some(class) => project_abilities(class, build, &limits),
            None => (Vec::new(), SelectionCount::new(0, 0, "abilities")),
        };
        let (spells, spell_count, signature_count) =
            project_spells(catalog, class, build, &limits, &boons);

        let bonus_points = SelectionCount::new(
            count(build.stat_bonuses.total()),
            u32::from(limits.bonus_points),
            "bonus points",
        );
        let stat_lines = Stat::ALL
            .iter()
            .map(|&stat| {
                let base = build.base_scores.get(stat);
                let bonus = build.stat_bonuses.get(stat);
                let boon = boons.stats.get(stat);
                let total = base + bonus + boon;
                StatView {
                    stat,
                    name: stat.display_name().to_string(),
                    base,
                    bonus,
                    boon,
                    total,
                    modifier: score_modifier(total),
                    can_raise: bonus < MAX_BONUS_PER_STAT && !bonus_points.is_full(),
                }
            })
            .collect();

        let boon_slots = class
            .map(|class| {
                class
                    .boon_slots_at(build.level)
                    .map(|slot| {
                        let selected = build.boons.get(&slot.id).cloned();
                        BoonSlotView {
                            id: slot.id.clone(),
                            label: slot.label.clone(),
                            options: slot
                                .options
                                .iter()
                                .filter_map(|id| catalog.boon(id))
                                .map(|boon| BoonOptionView {
                                    id: boon.id.clone(),
                                    name: boon.name.clone(),
                                    description: boon.description.clone(),
                                    selected: selected.as_deref() == Some(boon.id.as_str()),
                                })
                                .collect(),
                            selected,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let equipment = EquipmentView {
            weapons: build
                .weapons
                .iter()
                .filter_map(|id| catalog.weapon(id))
                .cloned()
                .collect(),
            armor: build.armor.as_deref().and_then(|id| catalog.armor(id)).cloned(),
        };

        let derived = derive(class, build, &boons, equipment.armor.as_ref());

        Self {
            class_id: class.map(|c| c.id.clone()),
            class_name: class.map(|c| c.name.clone()),
            level: build.level,
            max_level: class.map(ClassDef::max_level).unwrap_or(1),
            abilities,
            ability_count,
            spells,
            spell_count,
            signature_count,
            boon_slots,
            stat_lines,
            bonus_points,
            derived,
            equipment,
        }
    }

    pub fn stat(&self, stat: Stat) -> Option<&StatView> {
        self.stat_lines.iter().find(|s| s.stat == stat)
    }
}

fn count(n: impl TryInto<u32>) -> u32 {
    n.try_into().unwrap_or(0)
}

fn project_abilities(
    class: &ClassDef,
    build: &CharacterBuild,
    limits: &LevelProgression,
) -> (Vec<ChoiceView>, SelectionCount) {
    let picked = build
        .abilities
        .iter()
        .filter(|id| class.ability(id).is_some_and(|a| !a.granted))
        .count();
    let ability_count = SelectionCount::new(count(picked), u32::from(limits.abilities), "abilities");

    let views = class
        .abilities_at(build.level)
        .map(|a| {
            let checked = a.granted || build.has_ability(&a.id);
            ChoiceView {
                id: a.id.clone(),
                name: a.name.clone(),
                description: a.description.clone(),
                checked,
                locked: a.granted,
                enabled: !a.granted && (checked || !ability_count.is_full()),
            }
        })
        .collect();
    (views, ability_count)
}

fn project_spells(
    catalog: &RulesCatalog,
    class: Option<&ClassDef>,
    build: &CharacterBuild,
    limits: &LevelProgression,
    boons: &BoonTotals,
) -> (Vec<SpellChoiceView>, SelectionCount, SelectionCount) {
    let picked = build
        .spells
        .iter()
        .filter(|id| !boons.spells.contains(id))
        .count();
    let spell_count = SelectionCount::new(count(picked), u32::from(limits.spells), "spells");
    let signature_count = SelectionCount::new(
        count(build.signature_spells.len()),
        u32::from(limits.signature_spells),
        "signature spells",
    );

    // Granted spells first, then the class list within the tier cap.
    let granted = boons.spells.iter().filter_map(|id| catalog.spell(id));
    let listed = class.into_iter().flat_map(|class| {
        let mut spells: Vec<_> = catalog
            .spells
            .iter()
            .filter(|s| s.available_to(&class.id) && s.tier <= limits.max_spell_tier)
            .filter(|s| !boons.spells.contains(&s.id))
            .collect();
        spells.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.name.cmp(&b.name)));
        spells
    });

    let views = granted
        .map(|s| (s, true))
        .chain(listed.map(|s| (s, false)))
        .map(|(spell, granted)| {
            let checked = granted || build.has_spell(&spell.id);
            let signature = build.is_signature(&spell.id);
            SpellChoiceView {
                id: spell.id.clone(),
                name: spell.name.clone(),
                tier: spell.tier,
                description: spell.description.clone(),
                checked,
                enabled: !granted && (checked || !spell_count.is_full()),
                granted,
                signature,
                signature_enabled: checked && (signature || !signature_count.is_full()),
            }
        })
        .collect();
    (views, spell_count, signature_count)
}

fn derive(
    class: Option<&ClassDef>,
    build: &CharacterBuild,
    boons: &BoonTotals,
    armor: Option<&ArmorDef>,
) -> DerivedStats {
    let constitution = build.base_scores.get(Stat::Con)
        + build.stat_bonuses.get(Stat::Con)
        + boons.stats.get(Stat::Con);
    let (base_evasion, base_hit_points) = class
        .map(|c| (c.base_evasion, c.base_hit_points))
        .unwrap_or((0, 0));
    DerivedStats {
        evasion: base_evasion + boons.evasion - armor.map_or(0, |a| a.evasion_penalty),
        armor_score: armor.map_or(0, |a| a.armor_score) + boons.armor,
        hit_points: (base_hit_points + boons.hit_points + score_modifier(constitution)).max(1),
    }
}
