//! Gallery use cases: add, remove, cover, and reorder character images.

use std::sync::Arc;

use sheetkeep_domain::{Character, CharacterId, DomainError, GalleryImage, GalleryLimits, ImageId};

use crate::infrastructure::locks::CharacterLocks;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

pub struct GalleryUseCases {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    limits: GalleryLimits,
    locks: Arc<CharacterLocks>,
}

impl GalleryUseCases {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        limits: GalleryLimits,
        locks: Arc<CharacterLocks>,
    ) -> Self {
        Self {
            repo,
            clock,
            limits,
            locks,
        }
    }

    pub fn limits(&self) -> GalleryLimits {
        self.limits
    }

    /// Append an image. Returns the updated character and the new image.
    pub async fn add(
        &self,
        id: CharacterId,
        source: String,
        caption: Option<String>,
    ) -> Result<(Character, GalleryImage), GalleryError> {
        let _guard = self.locks.lock(id).await;
        let mut character = self.load(id).await?;
        let now = self.clock.now();
        let image = GalleryImage::new(source, caption, &self.limits, now)?;
        character.add_image(image.clone(), &self.limits, now)?;
        self.repo.save(&character).await?;

        tracing::info!(
            character_id = %id,
            image_id = %image.id(),
            bytes = image.source().len(),
            "Image added"
        );
        Ok((character, image))
    }

    pub async fn remove(&self, id: CharacterId, image_id: ImageId) -> Result<Character, GalleryError> {
        let _guard = self.locks.lock(id).await;
        let mut character = self.load(id).await?;
        character.remove_image(image_id, self.clock.now())?;
        self.repo.save(&character).await?;

        tracing::info!(character_id = %id, image_id = %image_id, "Image removed");
        Ok(character)
    }

    /// Make an image the cover.
    pub async fn set_cover(
        &self,
        id: CharacterId,
        image_id: ImageId,
    ) -> Result<Character, GalleryError> {
        let _guard = self.locks.lock(id).await;
        let mut character = self.load(id).await?;
        if character.cover().map(GalleryImage::id) == Some(image_id) {
            return Ok(character);
        }
        character.set_cover(image_id, self.clock.now())?;
        self.repo.save(&character).await?;

        tracing::debug!(character_id = %id, image_id = %image_id, "Cover changed");
        Ok(character)
    }

    pub async fn reorder(
        &self,
        id: CharacterId,
        order: &[ImageId],
    ) -> Result<Character, GalleryError> {
        let _guard = self.locks.lock(id).await;
        let mut character = self.load(id).await?;
        let before = character.updated_at();
        character.reorder_images(order, self.clock.now())?;
        if character.updated_at() != before {
            self.repo.save(&character).await?;
            tracing::debug!(character_id = %id, "Gallery reordered");
        }
        Ok(character)
    }

    async fn load(&self, id: CharacterId) -> Result<Character, GalleryError> {
        self.repo.get(id).await?.ok_or(GalleryError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use sheetkeep_domain::{
        Character, CharacterName, DomainError, GalleryImage, GalleryLimits, ImageId,
    };

    use super::{GalleryError, GalleryUseCases};
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::locks::CharacterLocks;
    use crate::infrastructure::ports::{CharacterRepo, MockCharacterRepo, MockClockPort};
    use crate::infrastructure::roster_store::JsonRosterStore;

    const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn limits() -> GalleryLimits {
        GalleryLimits {
            max_images: 2,
            max_source_bytes: 64,
        }
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap()))
    }

    fn use_case(repo: MockCharacterRepo) -> GalleryUseCases {
        GalleryUseCases::new(
            Arc::new(repo),
            clock(),
            limits(),
            Arc::new(CharacterLocks::new()),
        )
    }

    fn with_images(count: usize) -> Character {
        let mut character = Character::new(CharacterName::new("Ayla").unwrap(), created());
        for _ in 0..count {
            let image = GalleryImage::new(PNG, None, &limits(), created()).unwrap();
            character.add_image(image, &limits(), created()).unwrap();
        }
        character
    }

    fn repo_with(character: Character) -> MockCharacterRepo {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(character.clone())));
        repo
    }

    #[tokio::test]
    async fn when_image_added_then_saved_with_caption() {
        let character = with_images(0);
        let mut repo = repo_with(character.clone());
        repo.expect_save()
            .withf(|c| c.gallery().len() == 1)
            .times(1)
            .returning(|_| Ok(()));

        let (updated, image) = use_case(repo)
            .add(character.id(), PNG.into(), Some(" At the gate ".into()))
            .await
            .unwrap();

        assert_eq!(image.caption(), Some("At the gate"));
        assert_eq!(updated.cover().map(GalleryImage::id), Some(image.id()));
    }

    #[tokio::test]
    async fn when_gallery_full_then_constraint_and_nothing_saved() {
        let character = with_images(2);
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        let err = use_case(repo)
            .add(character.id(), PNG.into(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Domain(DomainError::Constraint(_))));
    }

    #[tokio::test]
    async fn when_source_too_large_then_validation_error() {
        let character = with_images(0);
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        let big = format!("data:image/png;base64,{}", "A".repeat(100));
        let err = use_case(repo)
            .add(character.id(), big, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn when_removing_unknown_image_then_not_found() {
        let character = with_images(1);
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        let err = use_case(repo)
            .remove(character.id(), ImageId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Domain(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn when_cover_set_then_image_moves_to_front() {
        let character = with_images(2);
        let second = character.gallery()[1].id();
        let mut repo = repo_with(character.clone());
        repo.expect_save()
            .withf(move |c| c.gallery()[0].id() == second)
            .times(1)
            .returning(|_| Ok(()));

        let updated = use_case(repo).set_cover(character.id(), second).await.unwrap();
        assert_eq!(updated.cover().map(GalleryImage::id), Some(second));
    }

    #[tokio::test]
    async fn when_image_already_cover_then_nothing_saved() {
        let character = with_images(2);
        let first = character.gallery()[0].id();
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        use_case(repo).set_cover(character.id(), first).await.unwrap();
    }

    #[tokio::test]
    async fn when_reordered_then_saved_in_new_order() {
        let character = with_images(2);
        let order: Vec<ImageId> = character.gallery().iter().rev().map(GalleryImage::id).collect();
        let expected = order.clone();
        let mut repo = repo_with(character.clone());
        repo.expect_save()
            .withf(move |c| c.gallery().iter().map(GalleryImage::id).collect::<Vec<_>>() == expected)
            .times(1)
            .returning(|_| Ok(()));

        let mut clock = MockClockPort::new();
        clock.expect_now().returning(|| Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        let use_case = GalleryUseCases::new(
            Arc::new(repo),
            Arc::new(clock),
            limits(),
            Arc::new(CharacterLocks::new()),
        );

        let updated = use_case.reorder(character.id(), &order).await.unwrap();
        assert_eq!(updated.gallery()[0].id(), order[0]);
    }

    #[tokio::test]
    async fn when_reorder_is_not_a_permutation_then_validation_error() {
        let character = with_images(2);
        let first = character.gallery()[0].id();
        let mut repo = repo_with(character.clone());
        repo.expect_save().never();

        let err = use_case(repo)
            .reorder(character.id(), &[first, first])
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn when_images_added_concurrently_then_none_are_lost() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Arc::new(
            JsonRosterStore::open(dir.path().join("roster.json"))
                .await
                .unwrap(),
        );
        let character = with_images(0);
        store.save(&character).await.unwrap();

        let limits = GalleryLimits {
            max_images: 8,
            max_source_bytes: 64,
        };
        let use_case = Arc::new(GalleryUseCases::new(
            store.clone(),
            clock(),
            limits,
            Arc::new(CharacterLocks::new()),
        ));

        let id = character.id();
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let use_case = use_case.clone();
                tokio::spawn(async move {
                    use_case.add(id, PNG.into(), Some(format!("#{}", i))).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let saved = store.get(id).await.unwrap().unwrap();
        assert_eq!(saved.gallery().len(), 8);
    }
}
