//! Boons - one-of-several bonuses picked through a class boon slot.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Stat, StatLine};

/// A boon definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoonDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub effect: BoonEffect,
}

/// What a boon does to the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoonEffect {
    /// Raise one stat
    Stat { stat: Stat, amount: i32 },
    Evasion { amount: i32 },
    Armor { amount: i32 },
    HitPoints { amount: i32 },
    /// Grant a known spell outside the normal spell limit
    #[serde(rename_all = "camelCase")]
    Spell { spell_id: String },
}

/// Summed effect of a set of boons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoonTotals {
    pub stats: StatLine,
    pub evasion: i32,
    pub armor: i32,
    pub hit_points: i32,
    pub spells: Vec<String>,
}

impl BoonTotals {
    pub fn from_boons<'a>(boons: impl IntoIterator<Item = &'a BoonDef>) -> Self {
        let mut totals = Self::default();
        for boon in boons {
            match &boon.effect {
                BoonEffect::Stat { stat, amount } => totals.stats.add(*stat, *amount),
                BoonEffect::Evasion { amount } => totals.evasion += amount,
                BoonEffect::Armor { amount } => totals.armor += amount,
                BoonEffect::HitPoints { amount } => totals.hit_points += amount,
                BoonEffect::Spell { spell_id } => {
                    if !totals.spells.contains(spell_id) {
                        totals.spells.push(spell_id.clone());
                    }
                }
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boon(id: &str, effect: BoonEffect) -> BoonDef {
        BoonDef {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            effect,
        }
    }

    #[test]
    fn effect_json_is_tagged() {
        let json = r#"{"id":"keen","name":"Keen","effect":{"kind":"stat","stat":"WIS","amount":1}}"#;
        let parsed: BoonDef = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.effect,
            BoonEffect::Stat {
                stat: Stat::Wis,
                amount: 1
            }
        );

        let json = r#"{"kind":"spell","spellId":"ward"}"#;
        let effect: BoonEffect = serde_json::from_str(json).unwrap();
        assert_eq!(
            effect,
            BoonEffect::Spell {
                spell_id: "ward".into()
            }
        );
    }

    #[test]
    fn totals_sum_each_kind() {
        let boons = [
            boon("a", BoonEffect::Stat { stat: Stat::Str, amount: 1 }),
            boon("b", BoonEffect::Stat { stat: Stat::Str, amount: 1 }),
            boon("c", BoonEffect::Evasion { amount: 1 }),
            boon("d", BoonEffect::Armor { amount: 2 }),
            boon("e", BoonEffect::HitPoints { amount: 3 }),
            boon("f", BoonEffect::Spell { spell_id: "ward".into() }),
            boon("g", BoonEffect::Spell { spell_id: "ward".into() }),
        ];
        let totals = BoonTotals::from_boons(boons.iter());
        assert_eq!(totals.stats.get(Stat::Str), 2);
        assert_eq!(totals.evasion, 1);
        assert_eq!(totals.armor, 2);
        assert_eq!(totals.hit_points, 3);
        assert_eq!(totals.spells, vec!["ward".to_string()]);
    }
}
