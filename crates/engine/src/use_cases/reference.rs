//! Reference view use cases: open a character's build as form state and
//! apply form edits back onto it.

use std::sync::Arc;

use sheetkeep_domain::{
    apply_edit, reconcile, BuildEdit, BuildView, Character, CharacterId, DomainError,
    DroppedSelection, RulesCatalog,
};

use crate::infrastructure::locks::CharacterLocks;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// A character's build projected onto the reference form.
#[derive(Debug, Clone)]
pub struct ReferenceSheet {
    pub character: Character,
    pub view: BuildView,
    /// Stale selections removed while opening
    pub dropped: Vec<DroppedSelection>,
}

/// Result of one accepted edit.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub character: Character,
    pub changed: bool,
    pub view: BuildView,
    pub dropped: Vec<DroppedSelection>,
}

pub struct ReferenceUseCases {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    catalog: Arc<RulesCatalog>,
    locks: Arc<CharacterLocks>,
}

impl ReferenceUseCases {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        catalog: Arc<RulesCatalog>,
        locks: Arc<CharacterLocks>,
    ) -> Self {
        Self {
            repo,
            clock,
            catalog,
            locks,
        }
    }

    /// Load, reconcile, and project. A build that no longer matches the
    /// rules tables is saved back in its reconciled form.
    pub async fn open(&self, id: CharacterId) -> Result<ReferenceSheet, ReferenceError> {
        let _guard = self.locks.lock(id).await;
        let mut character = self.load(id).await?;
        let result = reconcile(&self.catalog, character.build());

        for drop in &result.dropped {
            tracing::info!(
                character_id = %id,
                kind = ?drop.kind,
                selection = %drop.id,
                reason = ?drop.reason,
                "Dropped stale selection"
            );
        }
        // Grants added by reconciliation change the build without a drop
        if character.replace_build(result.build, self.clock.now()) {
            self.repo.save(&character).await?;
        }

        let view = BuildView::project(&self.catalog, character.build());
        Ok(ReferenceSheet {
            character,
            view,
            dropped: result.dropped,
        })
    }

    /// Apply one form edit and save when it changed anything.
    pub async fn apply(
        &self,
        id: CharacterId,
        edit: &BuildEdit,
    ) -> Result<EditOutcome, ReferenceError> {
        let _guard = self.locks.lock(id).await;
        let mut character = self.load(id).await?;
        let change = apply_edit(&self.catalog, character.build(), edit)?;

        let changed = character.replace_build(change.build, self.clock.now());
        if changed {
            self.repo.save(&character).await?;
            tracing::debug!(
                character_id = %id,
                edit = ?edit,
                dropped = change.dropped.len(),
                "Build edit applied"
            );
        }

        let view = BuildView::project(&self.catalog, character.build());
        Ok(EditOutcome {
            character,
            changed,
            view,
            dropped: change.dropped,
        })
    }

    async fn load(&self, id: CharacterId) -> Result<Character, ReferenceError> {
        self.repo.get(id).await?.ok_or(ReferenceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use sheetkeep_domain::{
        BuildEdit, Character, CharacterBuild, CharacterId, CharacterName, DomainError,
        DropReason, RulesCatalog, Stat,
    };

    use super::{ReferenceError, ReferenceUseCases};
    use crate::infrastructure::catalog::{parse_catalog, BUILTIN_CATALOG};
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::locks::CharacterLocks;
    use crate::infrastructure::ports::MockCharacterRepo;

    fn catalog() -> Arc<RulesCatalog> {
        Arc::new(parse_catalog(BUILTIN_CATALOG).unwrap())
    }

    fn use_case(repo: MockCharacterRepo) -> ReferenceUseCases {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap());
        ReferenceUseCases::new(
            Arc::new(repo),
            Arc::new(clock),
            catalog(),
            Arc::new(CharacterLocks::new()),
        )
    }

    fn arcanist(build: impl FnOnce(&mut CharacterBuild)) -> Character {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut b = CharacterBuild::for_class("arcanist");
        b.abilities = vec!["arcane_focus".into()];
        build(&mut b);
        Character::new(CharacterName::new("Ayla").unwrap(), created).with_build(b)
    }

    fn repo_with(character: Character) -> MockCharacterRepo {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(character.clone())));
        repo
    }

    #[tokio::test]
    async fn when_build_is_current_then_open_does_not_save() {
        let character = arcanist(|b| b.spells = vec!["ember_lance".into()]);
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        let sheet = use_case(repo).open(character.id()).await.unwrap();

        assert!(sheet.dropped.is_empty());
        assert_eq!(sheet.view.class_id.as_deref(), Some("arcanist"));
        assert_eq!(sheet.view.spell_count.selected, 1);
        assert_eq!(sheet.character, character);
    }

    #[tokio::test]
    async fn when_build_is_stale_then_open_reconciles_and_saves() {
        let character = arcanist(|b| {
            b.spells = vec!["ember_lance".into(), "starfall".into()];
        });
        let mut repo = repo_with(character.clone());
        repo.expect_save()
            .withf(|c| c.build().spells == vec!["ember_lance".to_string()])
            .times(1)
            .returning(|_| Ok(()));

        let sheet = use_case(repo).open(character.id()).await.unwrap();

        assert_eq!(sheet.dropped.len(), 1);
        assert_eq!(sheet.dropped[0].id, "starfall");
        assert_eq!(sheet.dropped[0].reason, DropReason::AboveLevel);
        assert!(sheet.character.updated_at() > character.updated_at());
    }

    #[tokio::test]
    async fn when_granted_ability_missing_then_open_adds_it_and_saves() {
        let character = arcanist(|b| b.abilities.clear());
        let mut repo = repo_with(character.clone());
        repo.expect_save()
            .withf(|c| c.build().has_ability("arcane_focus"))
            .times(1)
            .returning(|_| Ok(()));

        let sheet = use_case(repo).open(character.id()).await.unwrap();

        assert!(sheet.dropped.is_empty());
        assert!(sheet.view.abilities.iter().any(|a| a.id == "arcane_focus" && a.locked));
    }

    #[tokio::test]
    async fn when_character_missing_then_not_found() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(|_| Ok(None));

        let err = use_case(repo).open(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, ReferenceError::NotFound(_)));
    }

    #[tokio::test]
    async fn when_edit_accepted_then_saved_and_view_updated() {
        let character = arcanist(|_| {});
        let mut repo = repo_with(character.clone());
        repo.expect_save()
            .withf(|c| c.build().has_spell("mend"))
            .times(1)
            .returning(|_| Ok(()));

        let outcome = use_case(repo)
            .apply(
                character.id(),
                &BuildEdit::ToggleSpell {
                    id: "mend".into(),
                    checked: true,
                },
            )
            .await
            .unwrap();

        assert!(outcome.changed);
        assert!(outcome.view.spells.iter().any(|s| s.id == "mend" && s.checked));
    }

    #[tokio::test]
    async fn when_edit_is_noop_then_nothing_saved() {
        let character = arcanist(|b| b.spells = vec!["mend".into()]);
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        let outcome = use_case(repo)
            .apply(
                character.id(),
                &BuildEdit::ToggleSpell {
                    id: "mend".into(),
                    checked: true,
                },
            )
            .await
            .unwrap();
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn when_lowering_level_then_drops_reported() {
        let character = arcanist(|b| {
            b.level = 3;
            b.spells = vec!["mend".into(), "mirror_image".into()];
        });
        let mut repo = repo_with(character.clone());
        repo.expect_save().times(1).returning(|_| Ok(()));

        let outcome = use_case(repo)
            .apply(character.id(), &BuildEdit::SetLevel { level: 1 })
            .await
            .unwrap();

        assert!(outcome.dropped.iter().any(|d| d.id == "mirror_image"));
        assert_eq!(outcome.character.build().spells, vec!["mend".to_string()]);
    }

    #[tokio::test]
    async fn when_edit_rejected_then_domain_error_and_nothing_saved() {
        let character = arcanist(|_| {});
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        let err = use_case(repo)
            .apply(
                character.id(),
                &BuildEdit::SetStatBonus {
                    stat: Stat::Int,
                    points: 5,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReferenceError::Domain(DomainError::Validation(_))));
    }
}
