//! Read-only queries over the rules catalog.

use std::sync::Arc;

use sheetkeep_domain::rules::{ArmorDef, BoonDef, ClassDef, SpellDef, WeaponDef};
use sheetkeep_domain::{CatalogEntry, ContentFilter, RulesCatalog};

pub struct CatalogQueries {
    catalog: Arc<RulesCatalog>,
}

impl CatalogQueries {
    pub fn new(catalog: Arc<RulesCatalog>) -> Self {
        Self { catalog }
    }

    pub fn classes(&self) -> &[ClassDef] {
        &self.catalog.classes
    }

    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.catalog.class(id)
    }

    /// Spells matching `filter`, ordered by tier then name.
    pub fn spells(&self, filter: &ContentFilter) -> Vec<&SpellDef> {
        let found = self.catalog.find_spells(filter);
        tracing::debug!(
            class = ?filter.class,
            search = ?filter.search,
            count = found.len(),
            "Spell search"
        );
        found
    }

    pub fn spell(&self, id: &str) -> Option<&SpellDef> {
        self.catalog.spell(id)
    }

    pub fn boons(&self) -> &[BoonDef] {
        &self.catalog.boons
    }

    pub fn weapons(&self) -> &[WeaponDef] {
        &self.catalog.weapons
    }

    pub fn armor(&self) -> &[ArmorDef] {
        &self.catalog.armor
    }

    /// Any entry by id, for tooltips.
    pub fn describe(&self, id: &str) -> Option<CatalogEntry> {
        self.catalog.describe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::catalog::{parse_catalog, BUILTIN_CATALOG};
    use sheetkeep_domain::EntryKind;

    fn queries() -> CatalogQueries {
        CatalogQueries::new(Arc::new(parse_catalog(BUILTIN_CATALOG).unwrap()))
    }

    #[test]
    fn spells_filter_by_class_and_tier() {
        let q = queries();
        let filter = ContentFilter {
            class: Some("wayfinder".into()),
            tier_max: Some(1),
            ..Default::default()
        };
        let ids: Vec<&str> = q.spells(&filter).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["entangle", "hunters_sense", "mend", "whisper"]);
    }

    #[test]
    fn search_limit_truncates() {
        let q = queries();
        let filter = ContentFilter {
            search: Some("frost".into()),
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(q.spells(&filter).len(), 1);
    }

    #[test]
    fn describe_finds_entries_in_every_table() {
        let q = queries();
        assert_eq!(q.describe("arcanist").map(|e| e.kind), Some(EntryKind::Class));
        let ability = q.describe("cleave").unwrap();
        assert_eq!(ability.kind, EntryKind::Ability);
        assert_eq!(ability.class_id.as_deref(), Some("vanguard"));
        assert_eq!(q.describe("hidden_lore").map(|e| e.kind), Some(EntryKind::Boon));
        assert_eq!(q.describe("plate").map(|e| e.kind), Some(EntryKind::Armor));
        assert!(q.describe("nothing").is_none());
    }

    #[test]
    fn lookups_by_id() {
        let q = queries();
        assert_eq!(q.class("vanguard").map(|c| c.name.as_str()), Some("Vanguard"));
        assert!(q.spell("stone_skin").is_some());
        assert_eq!(q.weapons().len(), 6);
        assert_eq!(q.armor().len(), 4);
        assert!(!q.classes().is_empty());
        assert!(!q.boons().is_empty());
    }
}
