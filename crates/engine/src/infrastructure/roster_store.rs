//! JSON file roster storage.
//!
//! The whole roster lives in one JSON document (`RosterDocument`) kept in
//! memory and rewritten on every change. Writes go to a sibling temp file
//! that is then renamed over the roster, so a crash mid-write leaves the
//! previous roster intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sheetkeep_domain::{Character, CharacterId};
use sheetkeep_shared::RosterDocument;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CharacterRepo, RepoError};

/// File-backed `CharacterRepo`.
pub struct JsonRosterStore {
    path: PathBuf,
    cache: RwLock<HashMap<CharacterId, Character>>,
}

impl JsonRosterStore {
    /// Open the roster at `path`.
    ///
    /// A missing file is an empty roster. A file that cannot be parsed is
    /// moved aside to `<path>.corrupt` and the roster starts empty. Only a
    /// file that exists but cannot be read is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let path = path.into();
        let characters = match tokio::fs::read_to_string(&path).await {
            Ok(data) => match serde_json::from_str::<RosterDocument>(&data) {
                Ok(doc) => {
                    tracing::debug!(
                        path = %path.display(),
                        count = doc.characters.len(),
                        version = doc.version,
                        "Loaded roster"
                    );
                    doc.characters
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Roster file is corrupt");
                    set_aside(&path).await;
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No roster file yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(RepoError::storage("open", e)),
        };

        let cache = characters.into_iter().map(|c| (c.id(), c)).collect();
        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the roster. Callers hold the cache write lock so writes are
    /// serialized.
    async fn persist(&self, cache: &HashMap<CharacterId, Character>) -> Result<(), RepoError> {
        let doc = RosterDocument::new(sorted(cache.values().cloned().collect()));
        let data = serde_json::to_vec_pretty(&doc).map_err(RepoError::serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepoError::storage("create_dir", e))?;
        }

        let tmp = sibling(&self.path, "tmp");
        tokio::fs::write(&tmp, &data)
            .await
            .map_err(|e| RepoError::storage("write", e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepoError::storage("rename", e))?;

        tracing::debug!(path = %self.path.display(), count = cache.len(), "Roster saved");
        Ok(())
    }
}

#[async_trait]
impl CharacterRepo for JsonRosterStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.cache.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        Ok(sorted(self.cache.read().await.values().cloned().collect()))
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.save_many(std::slice::from_ref(character)).await
    }

    async fn save_many(&self, characters: &[Character]) -> Result<(), RepoError> {
        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        for character in characters {
            next.insert(character.id(), character.clone());
        }
        // Only publish to the cache once the file write succeeded
        self.persist(&next).await?;
        *cache = next;
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let mut cache = self.cache.write().await;
        if !cache.contains_key(&id) {
            return Err(RepoError::not_found("Character", id));
        }
        let mut next = cache.clone();
        next.remove(&id);
        self.persist(&next).await?;
        *cache = next;
        Ok(())
    }
}

/// Stable file order: creation time, then id.
fn sorted(mut characters: Vec<Character>) -> Vec<Character> {
    characters.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
    characters
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

async fn set_aside(path: &Path) {
    let target = sibling(path, "corrupt");
    match tokio::fs::rename(path, &target).await {
        Ok(()) => tracing::warn!(
            path = %path.display(),
            moved_to = %target.display(),
            "Moved corrupt roster aside; starting with an empty roster"
        ),
        Err(e) => tracing::error!(
            path = %path.display(),
            error = %e,
            "Could not move corrupt roster aside; it will be overwritten on next save"
        ),
    }
}
