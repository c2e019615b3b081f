//! Character aggregate - one roster entry
//!
//! A character pairs rules selections (`CharacterBuild`) with free-form data:
//! name, notes and an image gallery.
//!
//! # Design
//!
//! - **Private fields**: all state goes through methods so `updated_at` is
//!   always bumped on change.
//! - **Newtypes**: `CharacterName` and `Notes` are validated on construction.
//! - **Build is not validated here**: the aggregate stores whatever build it
//!   is given; reconciliation against the rules tables is the caller's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::build::CharacterBuild;
use crate::entities::{GalleryImage, GalleryLimits};
use crate::error::DomainError;
use crate::value_objects::{CharacterName, Notes};
use crate::{CharacterId, ImageId};

/// A user-created character
///
/// # Invariants
///
/// - `name` is always non-empty and <= 200 characters (enforced by `CharacterName`)
/// - `notes` is always <= 5000 characters (enforced by `Notes`)
/// - gallery image ids are unique; the first image is the cover
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use sheetkeep_domain::aggregates::Character;
/// use sheetkeep_domain::value_objects::CharacterName;
///
/// let name = CharacterName::new("Ayla").unwrap();
/// let character = Character::new(name, Utc::now());
///
/// assert_eq!(character.name().as_str(), "Ayla");
/// assert!(character.gallery().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    id: CharacterId,
    name: CharacterName,
    notes: Notes,
    build: CharacterBuild,
    gallery: Vec<GalleryImage>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a new character with an empty build.
    pub fn new(name: CharacterName, now: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            name,
            notes: Notes::empty(),
            build: CharacterBuild::default(),
            gallery: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style setter for the starting build.
    pub fn with_build(mut self, build: CharacterBuild) -> Self {
        self.build = build;
        self
    }

    pub fn with_notes(mut self, notes: Notes) -> Self {
        self.notes = notes;
        self
    }

    /// Copy this character under a new id and "<name> (copy)".
    ///
    /// Gallery images get fresh ids so the two galleries stay independent.
    pub fn duplicate(&self, now: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            name: self.name.copy_name(),
            notes: self.notes.clone(),
            build: self.build.clone(),
            gallery: self.gallery.iter().map(GalleryImage::duplicate).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    #[inline]
    pub fn build(&self) -> &CharacterBuild {
        &self.build
    }

    #[inline]
    pub fn gallery(&self) -> &[GalleryImage] {
        &self.gallery
    }

    /// The cover image (first in the gallery), if any.
    pub fn cover(&self) -> Option<&GalleryImage> {
        self.gallery.first()
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_name(&mut self, name: CharacterName, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    pub fn set_notes(&mut self, notes: Notes, now: DateTime<Utc>) {
        self.notes = notes;
        self.updated_at = now;
    }

    /// Replace the build. Returns false (and leaves `updated_at` alone) when
    /// the new build is identical.
    pub fn replace_build(&mut self, build: CharacterBuild, now: DateTime<Utc>) -> bool {
        if self.build == build {
            return false;
        }
        self.build = build;
        self.updated_at = now;
        true
    }

    /// Append an image, enforcing the gallery size cap.
    pub fn add_image(
        &mut self,
        image: GalleryImage,
        limits: &GalleryLimits,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.gallery.len() >= limits.max_images {
            return Err(DomainError::constraint(format!(
                "Gallery is full ({} images)",
                limits.max_images
            )));
        }
        if self.image_index(image.id()).is_some() {
            return Err(DomainError::constraint(format!(
                "Image {} is already in the gallery",
                image.id()
            )));
        }
        self.gallery.push(image);
        self.updated_at = now;
        Ok(())
    }

    pub fn remove_image(
        &mut self,
        image_id: ImageId,
        now: DateTime<Utc>,
    ) -> Result<GalleryImage, DomainError> {
        let index = self.require_image(image_id)?;
        let removed = self.gallery.remove(index);
        self.updated_at = now;
        Ok(removed)
    }

    /// Move an image to the front of the gallery.
    pub fn set_cover(&mut self, image_id: ImageId, now: DateTime<Utc>) -> Result<(), DomainError> {
        let index = self.require_image(image_id)?;
        if index > 0 {
            let image = self.gallery.remove(index);
            self.gallery.insert(0, image);
            self.updated_at = now;
        }
        Ok(())
    }

    /// Put the gallery in the given order.
    ///
    /// `order` must name every current image exactly once.
    pub fn reorder_images(
        &mut self,
        order: &[ImageId],
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if order.len() != self.gallery.len() {
            return Err(DomainError::validation(format!(
                "Expected {} image ids, got {}",
                self.gallery.len(),
                order.len()
            )));
        }
        let mut remaining = self.gallery.clone();
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            let index = remaining
                .iter()
                .position(|img| img.id() == *id)
                .ok_or_else(|| {
                    DomainError::validation(format!("Image {} is not in the gallery or is repeated", id))
                })?;
            reordered.push(remaining.remove(index));
        }
        if reordered != self.gallery {
            self.gallery = reordered;
            self.updated_at = now;
        }
        Ok(())
    }

    /// Drop images that fail `GalleryImage::check`, then any past
    /// `limits.max_images`, keeping gallery order. Returns each removed
    /// image with the reason it was removed.
    pub fn enforce_gallery_limits(
        &mut self,
        limits: &GalleryLimits,
        now: DateTime<Utc>,
    ) -> Vec<(GalleryImage, DomainError)> {
        let mut kept = Vec::with_capacity(self.gallery.len().min(limits.max_images));
        let mut removed = Vec::new();
        for image in std::mem::take(&mut self.gallery) {
            match image.check(limits) {
                Err(e) => removed.push((image, e)),
                Ok(()) if kept.len() >= limits.max_images => {
                    let full = DomainError::constraint(format!(
                        "Gallery is full ({} images)",
                        limits.max_images
                    ));
                    removed.push((image, full));
                }
                Ok(()) => kept.push(image),
            }
        }
        self.gallery = kept;
        if !removed.is_empty() {
            self.updated_at = now;
        }
        removed
    }

    fn image_index(&self, image_id: ImageId) -> Option<usize> {
        self.gallery.iter().position(|img| img.id() == image_id)
    }

    fn require_image(&self, image_id: ImageId) -> Result<usize, DomainError> {
        self.image_index(image_id)
            .ok_or_else(|| DomainError::not_found("GalleryImage", image_id.to_string()))
    }
}

// =============================================================================
// Serde Implementation
// =============================================================================

/// Intermediate format for serialization that matches the wire format
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterWireFormat {
    id: CharacterId,
    name: CharacterName,
    #[serde(default)]
    notes: Notes,
    #[serde(default)]
    build: CharacterBuild,
    #[serde(default)]
    gallery: Vec<GalleryImage>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            name: self.name.clone(),
            notes: self.notes.clone(),
            build: self.build.clone(),
            gallery: self.gallery.clone(),
            created_at: self.created_at,
            updated_at: Some(self.updated_at),
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;

        // Older rosters did not record updatedAt
        let updated_at = wire.updated_at.unwrap_or(wire.created_at);

        // Keep the first copy of any repeated image id
        let mut gallery: Vec<GalleryImage> = Vec::with_capacity(wire.gallery.len());
        for image in wire.gallery {
            if !gallery.iter().any(|g| g.id() == image.id()) {
                gallery.push(image);
            }
        }

        Ok(Character {
            id: wire.id,
            name: wire.name,
            notes: wire.notes,
            build: wire.build,
            gallery,
            created_at: wire.created_at,
            updated_at,
        })
    }
}
