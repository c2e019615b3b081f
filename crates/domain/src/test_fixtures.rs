//! Shared rules tables for domain tests.
//!
//! Two classes: `seer` (caster, granted ability, spell-granting boon) and
//! `warden` (no spells, more abilities).

use crate::rules::RulesCatalog;

const CATALOG_JSON: &str = r#"{
  "classes": [
    {
      "id": "seer",
      "name": "Seer",
      "description": "Reads omens and bends small fates.",
      "baseEvasion": 10,
      "baseHitPoints": 6,
      "progression": [
        { "level": 1, "abilities": 1, "spells": 2, "signatureSpells": 1, "bonusPoints": 0, "maxSpellTier": 1 },
        { "level": 2, "abilities": 1, "spells": 3, "signatureSpells": 1, "bonusPoints": 1, "maxSpellTier": 1 },
        { "level": 3, "abilities": 2, "spells": 4, "signatureSpells": 2, "bonusPoints": 1, "maxSpellTier": 2 },
        { "level": 4, "abilities": 2, "spells": 5, "signatureSpells": 2, "bonusPoints": 2, "maxSpellTier": 2 },
        { "level": 5, "abilities": 3, "spells": 6, "signatureSpells": 3, "bonusPoints": 3, "maxSpellTier": 3 }
      ],
      "abilities": [
        { "id": "second_sight", "name": "Second Sight", "minLevel": 1, "granted": true, "description": "See through illusions." },
        { "id": "omen_reading", "name": "Omen Reading", "minLevel": 1, "description": "Roll twice on a divination." },
        { "id": "veil_step", "name": "Veil Step", "minLevel": 1, "description": "Blink a short distance." },
        { "id": "far_gaze", "name": "Far Gaze", "minLevel": 3, "description": "Scry a known place." },
        { "id": "fate_twist", "name": "Fate Twist", "minLevel": 5, "description": "Reroll any die once per day." }
      ],
      "boonSlots": [
        { "id": "seer_gift", "label": "Seer's Gift", "level": 1, "options": ["keen_mind", "hardy", "hidden_lore"] },
        { "id": "seer_mastery", "label": "Mastery", "level": 4, "options": ["nimble", "warded"] }
      ]
    },
    {
      "id": "warden",
      "name": "Warden",
      "description": "Holds the line.",
      "baseEvasion": 11,
      "baseHitPoints": 10,
      "progression": [
        { "level": 1, "abilities": 2 },
        { "level": 3, "abilities": 3, "bonusPoints": 1 },
        { "level": 5, "abilities": 4, "bonusPoints": 2 }
      ],
      "abilities": [
        { "id": "shield_wall", "name": "Shield Wall", "granted": true },
        { "id": "rally", "name": "Rally" },
        { "id": "hold_the_line", "name": "Hold the Line" },
        { "id": "cleave", "name": "Cleave" },
        { "id": "iron_will", "name": "Iron Will", "minLevel": 3 },
        { "id": "last_stand", "name": "Last Stand", "minLevel": 5 }
      ],
      "boonSlots": [
        { "id": "warden_oath", "label": "Oath", "options": ["hardy", "nimble", "warded"] }
      ]
    }
  ],
  "spells": [
    { "id": "ember_lance", "name": "Ember Lance", "tier": 1, "school": "evocation", "classes": ["seer"], "description": "A spear of cinders." },
    { "id": "mend", "name": "Mend", "tier": 1, "classes": ["seer"] },
    { "id": "ward", "name": "Ward", "tier": 1, "classes": ["seer"] },
    { "id": "whisper", "name": "Whisper", "tier": 1, "classes": ["seer"] },
    { "id": "frost_veil", "name": "Frost Veil", "tier": 2, "classes": ["seer"] },
    { "id": "starfall", "name": "Starfall", "tier": 3, "classes": ["seer"] },
    { "id": "stone_skin", "name": "Stone Skin", "tier": 2, "classes": [] }
  ],
  "boons": [
    { "id": "keen_mind", "name": "Keen Mind", "effect": { "kind": "stat", "stat": "WIS", "amount": 1 } },
    { "id": "hardy", "name": "Hardy", "effect": { "kind": "hit_points", "amount": 3 } },
    { "id": "hidden_lore", "name": "Hidden Lore", "effect": { "kind": "spell", "spellId": "stone_skin" } },
    { "id": "nimble", "name": "Nimble", "effect": { "kind": "evasion", "amount": 1 } },
    { "id": "warded", "name": "Warded", "effect": { "kind": "armor", "amount": 1 } }
  ],
  "weapons": [
    { "id": "longsword", "name": "Longsword", "category": "martial", "damage": "1d8", "properties": ["versatile"] },
    { "id": "dagger", "name": "Dagger", "category": "simple", "damage": "1d4", "properties": ["finesse", "thrown"] },
    { "id": "shortbow", "name": "Shortbow", "category": "ranged", "damage": "1d6" }
  ],
  "armor": [
    { "id": "leather", "name": "Leather", "armorScore": 1 },
    { "id": "chain", "name": "Chain Shirt", "armorScore": 3, "evasionPenalty": 1 }
  ]
}"#;

pub fn catalog() -> RulesCatalog {
    serde_json::from_str(CATALOG_JSON).expect("fixture catalog should parse")
}
