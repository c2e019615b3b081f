//! Filter criteria for spell table queries.

use serde::{Deserialize, Serialize};

use super::spell::SpellDef;

/// Filter criteria for content queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    /// Class whose spell list must include the spell.
    #[serde(default)]
    pub class: Option<String>,
    /// Minimum spell tier.
    #[serde(default)]
    pub tier_min: Option<u8>,
    /// Maximum spell tier.
    #[serde(default)]
    pub tier_max: Option<u8>,
    /// Text search in name/description.
    #[serde(default)]
    pub search: Option<String>,
    /// Maximum results to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ContentFilter {
    /// Check if a spell matches this filter.
    pub fn matches_spell(&self, spell: &SpellDef) -> bool {
        if let Some(min) = self.tier_min {
            if spell.tier < min {
                return false;
            }
        }
        if let Some(max) = self.tier_max {
            if spell.tier > max {
                return false;
            }
        }

        if let Some(ref class) = self.class {
            if !spell.available_to(class) {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            let search_lower = search.trim().to_lowercase();
            if !search_lower.is_empty()
                && !spell.name.to_lowercase().contains(&search_lower)
                && !spell.description.to_lowercase().contains(&search_lower)
            {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(tier: u8, classes: &[&str]) -> SpellDef {
        SpellDef {
            id: "ember".into(),
            name: "Ember Lance".into(),
            tier,
            school: Some("evocation".into()),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            description: "A spear of cinders.".into(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ContentFilter::default().matches_spell(&spell(3, &[])));
    }

    #[test]
    fn tier_bounds_are_inclusive() {
        let filter = ContentFilter {
            tier_min: Some(2),
            tier_max: Some(3),
            ..Default::default()
        };
        assert!(!filter.matches_spell(&spell(1, &[])));
        assert!(filter.matches_spell(&spell(2, &[])));
        assert!(filter.matches_spell(&spell(3, &[])));
        assert!(!filter.matches_spell(&spell(4, &[])));
    }

    #[test]
    fn class_filter_uses_spell_list() {
        let filter = ContentFilter {
            class: Some("seer".into()),
            ..Default::default()
        };
        assert!(filter.matches_spell(&spell(1, &["seer"])));
        assert!(!filter.matches_spell(&spell(1, &["warden"])));
    }

    #[test]
    fn search_checks_name_and_description() {
        let by_name = ContentFilter {
            search: Some("lance".into()),
            ..Default::default()
        };
        let by_text = ContentFilter {
            search: Some("CINDERS".into()),
            ..Default::default()
        };
        let miss = ContentFilter {
            search: Some("frost".into()),
            ..Default::default()
        };
        assert!(by_name.matches_spell(&spell(1, &[])));
        assert!(by_text.matches_spell(&spell(1, &[])));
        assert!(!miss.matches_spell(&spell(1, &[])));
    }
}
