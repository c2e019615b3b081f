//! Stat value objects - the six ability scores and a per-stat line of values.
//!
//! Provides type safety for stat references instead of using magic strings like "STR", "DEX".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Character stats/abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stat {
    /// Strength - physical power
    Str,
    /// Dexterity - agility and reflexes
    Dex,
    /// Constitution - endurance and health
    Con,
    /// Intelligence - reasoning and memory
    Int,
    /// Wisdom - perception and insight
    Wis,
    /// Charisma - force of personality
    Cha,
}

impl Stat {
    /// Canonical order used for display and for trimming bonus points.
    pub const ALL: [Stat; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    /// Returns the short uppercase string representation (e.g., "STR", "DEX").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }

    /// Returns the full name of the stat (e.g., "Strength", "Dexterity").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Dex => "Dexterity",
            Self::Con => "Constitution",
            Self::Int => "Intelligence",
            Self::Wis => "Wisdom",
            Self::Cha => "Charisma",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STR" | "STRENGTH" => Ok(Self::Str),
            "DEX" | "DEXTERITY" => Ok(Self::Dex),
            "CON" | "CONSTITUTION" => Ok(Self::Con),
            "INT" | "INTELLIGENCE" => Ok(Self::Int),
            "WIS" | "WISDOM" => Ok(Self::Wis),
            "CHA" | "CHARISMA" => Ok(Self::Cha),
            _ => Err(DomainError::parse(format!("Unknown stat: {}", s))),
        }
    }
}

/// Ability score modifier: floor((score - 10) / 2).
pub fn score_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// One integer per stat (base scores, bonus points, boon bonuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLine {
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub dexterity: i32,
    #[serde(default)]
    pub constitution: i32,
    #[serde(default)]
    pub intelligence: i32,
    #[serde(default)]
    pub wisdom: i32,
    #[serde(default)]
    pub charisma: i32,
}

impl StatLine {
    /// The same value for every stat.
    pub fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            dexterity: value,
            constitution: value,
            intelligence: value,
            wisdom: value,
            charisma: value,
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Str => self.strength,
            Stat::Dex => self.dexterity,
            Stat::Con => self.constitution,
            Stat::Int => self.intelligence,
            Stat::Wis => self.wisdom,
            Stat::Cha => self.charisma,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        match stat {
            Stat::Str => self.strength = value,
            Stat::Dex => self.dexterity = value,
            Stat::Con => self.constitution = value,
            Stat::Int => self.intelligence = value,
            Stat::Wis => self.wisdom = value,
            Stat::Cha => self.charisma = value,
        }
    }

    pub fn add(&mut self, stat: Stat, amount: i32) {
        self.set(stat, self.get(stat) + amount);
    }

    /// Sum across all six stats.
    pub fn total(&self) -> i32 {
        Stat::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_as_str() {
        assert_eq!(Stat::Str.as_str(), "STR");
        assert_eq!(Stat::Dex.as_str(), "DEX");
        assert_eq!(Stat::Con.as_str(), "CON");
        assert_eq!(Stat::Int.as_str(), "INT");
        assert_eq!(Stat::Wis.as_str(), "WIS");
        assert_eq!(Stat::Cha.as_str(), "CHA");
    }

    #[test]
    fn test_stat_from_str() {
        assert_eq!(Stat::from_str("STR"), Ok(Stat::Str));
        assert_eq!(Stat::from_str("str"), Ok(Stat::Str));
        assert_eq!(Stat::from_str("Strength"), Ok(Stat::Str));
        assert_eq!(Stat::from_str("dexterity"), Ok(Stat::Dex));
        assert!(Stat::from_str("LUCK").is_err());
    }

    #[test]
    fn test_stat_serde_uses_short_codes() {
        let json = serde_json::to_string(&Stat::Dex).unwrap();
        assert_eq!(json, "\"DEX\"");
        let parsed: Stat = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Stat::Dex);
    }

    #[test]
    fn modifier_rounds_down() {
        assert_eq!(score_modifier(10), 0);
        assert_eq!(score_modifier(11), 0);
        assert_eq!(score_modifier(12), 1);
        assert_eq!(score_modifier(9), -1);
        assert_eq!(score_modifier(8), -1);
        assert_eq!(score_modifier(1), -5);
        assert_eq!(score_modifier(20), 5);
    }

    #[test]
    fn stat_line_get_set_total() {
        let mut line = StatLine::default();
        line.set(Stat::Wis, 2);
        line.add(Stat::Wis, 1);
        line.add(Stat::Str, 1);
        assert_eq!(line.get(Stat::Wis), 3);
        assert_eq!(line.total(), 4);
    }

    #[test]
    fn stat_line_missing_fields_default_to_zero() {
        let line: StatLine = serde_json::from_str(r#"{"wisdom": 2}"#).unwrap();
        assert_eq!(line.get(Stat::Wis), 2);
        assert_eq!(line.get(Stat::Str), 0);
    }
}
