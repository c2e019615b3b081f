//! Roster use cases: character CRUD, duplicate, export and import.

use std::collections::HashMap;
use std::sync::Arc;

use sheetkeep_domain::{
    reconcile, Character, CharacterBuild, CharacterId, CharacterName, DomainError, GalleryLimits,
    Notes, RulesCatalog,
};
use sheetkeep_shared::{RosterDocument, ROSTER_FORMAT_VERSION};

use crate::infrastructure::locks::CharacterLocks;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Outcome of a roster import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub replaced: usize,
    pub dropped_selections: usize,
    /// Gallery images that broke the gallery limits
    pub dropped_images: usize,
    /// Earlier entries overridden by a later one with the same id
    pub duplicates: usize,
}

pub struct RosterUseCases {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    catalog: Arc<RulesCatalog>,
    limits: GalleryLimits,
    locks: Arc<CharacterLocks>,
}

impl RosterUseCases {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        catalog: Arc<RulesCatalog>,
        limits: GalleryLimits,
        locks: Arc<CharacterLocks>,
    ) -> Self {
        Self {
            repo,
            clock,
            catalog,
            limits,
            locks,
        }
    }

    /// Create a character, optionally starting in a class.
    pub async fn create(
        &self,
        name: String,
        class_id: Option<String>,
        notes: Option<String>,
    ) -> Result<Character, RosterError> {
        let name = CharacterName::new(name)?;
        let notes = notes.map(Notes::new).transpose()?.unwrap_or_default();

        let build = match class_id {
            Some(class_id) => {
                if self.catalog.class(&class_id).is_none() {
                    return Err(DomainError::not_found("Class", class_id).into());
                }
                // Reconciling a fresh build fills in granted abilities
                reconcile(&self.catalog, &CharacterBuild::for_class(class_id)).build
            }
            None => CharacterBuild::default(),
        };

        let character = Character::new(name, self.clock.now())
            .with_notes(notes)
            .with_build(build);
        self.repo.save(&character).await?;

        tracing::info!(
            character_id = %character.id(),
            name = %character.name(),
            class_id = ?character.build().class_id,
            "Character created"
        );
        Ok(character)
    }

    /// All characters, sorted by name (case-insensitive).
    pub async fn list(&self) -> Result<Vec<Character>, RosterError> {
        let mut characters = self.repo.list().await?;
        characters.sort_by(|a, b| {
            a.name()
                .as_str()
                .to_lowercase()
                .cmp(&b.name().as_str().to_lowercase())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        Ok(characters)
    }

    pub async fn get(&self, id: CharacterId) -> Result<Character, RosterError> {
        self.repo.get(id).await?.ok_or(RosterError::NotFound(id))
    }

    /// Rename and/or edit notes. `None` leaves a field unchanged.
    pub async fn update(
        &self,
        id: CharacterId,
        name: Option<String>,
        notes: Option<String>,
    ) -> Result<Character, RosterError> {
        let name = name.map(CharacterName::new).transpose()?;
        let notes = notes.map(Notes::new).transpose()?;

        let _guard = self.locks.lock(id).await;
        let mut character = self.get(id).await?;
        let now = self.clock.now();
        if let Some(name) = name {
            character.set_name(name, now);
        }
        if let Some(notes) = notes {
            character.set_notes(notes, now);
        }
        self.repo.save(&character).await?;

        tracing::info!(character_id = %id, "Character updated");
        Ok(character)
    }

    pub async fn delete(&self, id: CharacterId) -> Result<(), RosterError> {
        let guard = self.locks.lock(id).await;
        let result = self.repo.delete(id).await;
        drop(guard);
        self.locks.forget(id);

        match result {
            Ok(()) => {
                tracing::info!(character_id = %id, "Character deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(RosterError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Copy a character under a new id as "<name> (copy)".
    pub async fn duplicate(&self, id: CharacterId) -> Result<Character, RosterError> {
        let original = self.get(id).await?;
        let copy = original.duplicate(self.clock.now());
        self.repo.save(&copy).await?;

        tracing::info!(
            character_id = %copy.id(),
            source_id = %id,
            "Character duplicated"
        );
        Ok(copy)
    }

    /// The whole roster as one document.
    pub async fn export(&self) -> Result<RosterDocument, RosterError> {
        Ok(RosterDocument::new(self.repo.list().await?))
    }

    /// Merge a roster document by id.
    ///
    /// Imported builds are reconciled against the current catalog and
    /// galleries are held to the gallery limits before anything is saved.
    /// When an id appears more than once the last entry wins.
    pub async fn import(&self, doc: RosterDocument) -> Result<ImportSummary, RosterError> {
        if doc.version != ROSTER_FORMAT_VERSION {
            return Err(DomainError::validation(format!(
                "Unsupported roster version {} (expected {})",
                doc.version, ROSTER_FORMAT_VERSION
            ))
            .into());
        }

        let mut summary = ImportSummary::default();
        let now = self.clock.now();

        let mut characters: Vec<Character> = Vec::with_capacity(doc.characters.len());
        let mut positions: HashMap<CharacterId, usize> = HashMap::new();
        for character in doc.characters {
            match positions.get(&character.id()) {
                Some(&index) => {
                    tracing::warn!(
                        character_id = %character.id(),
                        "Duplicate id in imported roster"
                    );
                    summary.duplicates += 1;
                    characters[index] = character;
                }
                None => {
                    positions.insert(character.id(), characters.len());
                    characters.push(character);
                }
            }
        }

        for character in &mut characters {
            let result = reconcile(&self.catalog, character.build());
            if !result.is_clean() {
                tracing::info!(
                    character_id = %character.id(),
                    dropped = result.dropped.len(),
                    "Imported build reconciled"
                );
                summary.dropped_selections += result.dropped.len();
            }
            character.replace_build(result.build, now);

            for (image, reason) in character.enforce_gallery_limits(&self.limits, now) {
                tracing::warn!(
                    character_id = %character.id(),
                    image_id = %image.id(),
                    bytes = image.source().len(),
                    reason = %reason,
                    "Dropped imported image"
                );
                summary.dropped_images += 1;
            }
        }

        let _guards = self.locks.lock_all(characters.iter().map(Character::id)).await;
        for character in &characters {
            if self.repo.get(character.id()).await?.is_some() {
                summary.replaced += 1;
            } else {
                summary.added += 1;
            }
        }
        self.repo.save_many(&characters).await?;

        tracing::info!(
            added = summary.added,
            replaced = summary.replaced,
            dropped_selections = summary.dropped_selections,
            dropped_images = summary.dropped_images,
            duplicates = summary.duplicates,
            "Roster imported"
        );
        Ok(summary)
    }
}
