//! GalleryImage entity - pictures attached to a character

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ImageId;

/// Longest caption accepted, in characters.
pub const MAX_CAPTION_LENGTH: usize = 500;

/// Size and count caps for a character gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryLimits {
    pub max_images: usize,
    /// Cap on the stored source string (a data URL counts in full)
    pub max_source_bytes: usize,
}

impl GalleryLimits {
    pub const DEFAULT_MAX_IMAGES: usize = 12;
    pub const DEFAULT_MAX_SOURCE_BYTES: usize = 2 * 1024 * 1024;
}

impl Default for GalleryLimits {
    fn default() -> Self {
        Self {
            max_images: Self::DEFAULT_MAX_IMAGES,
            max_source_bytes: Self::DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

/// An image in a character's gallery
///
/// `source` is either an inline `data:image/...` URL or a path/URL the client
/// can resolve. The first image in a gallery is its cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    id: ImageId,
    source: String,
    #[serde(default)]
    caption: Option<String>,
    added_at: DateTime<Utc>,
}

impl GalleryImage {
    /// Create a new image, checking the source against `limits`.
    pub fn new(
        source: impl Into<String>,
        caption: Option<String>,
        limits: &GalleryLimits,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let source = source.into();
        let source = source.trim();
        check_source(source, limits)?;

        let caption = caption
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        check_caption(caption.as_deref())?;

        Ok(Self {
            id: ImageId::new(),
            source: source.to_string(),
            caption,
            added_at: now,
        })
    }

    /// Re-run the checks `new` applies, for images that arrived through
    /// deserialization rather than `new`.
    pub fn check(&self, limits: &GalleryLimits) -> Result<(), DomainError> {
        check_source(self.source.trim(), limits)?;
        check_caption(self.caption.as_deref())
    }

    // --- Accessors ---

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Copy with a fresh id, for duplicated characters.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ImageId::new(),
            ..self.clone()
        }
    }
}

fn check_source(source: &str, limits: &GalleryLimits) -> Result<(), DomainError> {
    if source.is_empty() {
        return Err(DomainError::validation("Image source cannot be empty"));
    }
    if source.starts_with("data:") && !source.starts_with("data:image/") {
        return Err(DomainError::validation("Data URL must be an image"));
    }
    if source.len() > limits.max_source_bytes {
        return Err(DomainError::validation(format!(
            "Image is too large ({} bytes, limit {})",
            source.len(),
            limits.max_source_bytes
        )));
    }
    Ok(())
}

fn check_caption(caption: Option<&str>) -> Result<(), DomainError> {
    if caption.is_some_and(|c| c.chars().count() > MAX_CAPTION_LENGTH) {
        return Err(DomainError::validation(format!(
            "Caption cannot exceed {} characters",
            MAX_CAPTION_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn accepts_data_url_and_path() {
        let limits = GalleryLimits::default();
        let img = GalleryImage::new("data:image/png;base64,AAAA", None, &limits, now()).unwrap();
        assert_eq!(img.source(), "data:image/png;base64,AAAA");
        assert!(GalleryImage::new("portraits/ayla.webp", None, &limits, now()).is_ok());
    }

    #[test]
    fn rejects_empty_non_image_and_oversize_sources() {
        let limits = GalleryLimits {
            max_images: 1,
            max_source_bytes: 16,
        };
        assert!(GalleryImage::new("  ", None, &limits, now()).is_err());
        assert!(GalleryImage::new("data:text/plain,hi", None, &limits, now()).is_err());
        assert!(GalleryImage::new("data:image/png;base64,AAAAAAAA", None, &limits, now()).is_err());
    }

    #[test]
    fn caption_is_trimmed_and_blank_dropped() {
        let limits = GalleryLimits::default();
        let img = GalleryImage::new("a.png", Some("  at the gate ".into()), &limits, now()).unwrap();
        assert_eq!(img.caption(), Some("at the gate"));
        let img = GalleryImage::new("a.png", Some("   ".into()), &limits, now()).unwrap();
        assert_eq!(img.caption(), None);
        let long = "x".repeat(MAX_CAPTION_LENGTH + 1);
        assert!(GalleryImage::new("a.png", Some(long), &limits, now()).is_err());
    }

    #[test]
    fn check_catches_images_that_skipped_new() {
        let html: GalleryImage = serde_json::from_value(serde_json::json!({
            "id": ImageId::new(),
            "source": "data:text/html,<script>alert(1)</script>",
            "addedAt": now()
        }))
        .unwrap();
        assert!(matches!(
            html.check(&GalleryLimits::default()),
            Err(DomainError::Validation(_))
        ));

        let ok = GalleryImage::new("a.png", None, &GalleryLimits::default(), now()).unwrap();
        assert!(ok.check(&GalleryLimits::default()).is_ok());
        let tiny = GalleryLimits {
            max_images: 1,
            max_source_bytes: 2,
        };
        assert!(ok.check(&tiny).is_err());
    }

    #[test]
    fn duplicate_gets_new_id() {
        let img = GalleryImage::new("a.png", None, &GalleryLimits::default(), now()).unwrap();
        let copy = img.duplicate();
        assert_ne!(copy.id(), img.id());
        assert_eq!(copy.source(), img.source());
    }
}
