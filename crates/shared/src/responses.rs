//! Response bodies returned by the engine API.

use serde::{Deserialize, Serialize};
use sheetkeep_domain::{BuildView, Character, CharacterBuild, DroppedSelection, GalleryImage};
use uuid::Uuid;

// =============================================================================
// Errors
// =============================================================================

/// Error classification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request was malformed
    BadRequest,
    /// Requested resource not found
    NotFound,
    /// Request data failed validation or broke a rules limit
    ValidationError,
    /// Internal server error
    InternalError,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            code,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// =============================================================================
// Characters
// =============================================================================

/// One roster list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub id: Uuid,
    pub name: String,
    pub class_id: Option<String>,
    pub level: u8,
    /// Source of the cover image, if the gallery has one
    pub cover: Option<String>,
    pub image_count: usize,
    /// RFC 3339
    pub updated_at: String,
}

impl From<&Character> for CharacterSummary {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id().to_uuid(),
            name: c.name().to_string(),
            class_id: c.build().class_id.clone(),
            level: c.build().level,
            cover: c.cover().map(|img| img.source().to_string()),
            image_count: c.gallery().len(),
            updated_at: c.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageResponse {
    pub id: Uuid,
    pub source: String,
    pub caption: Option<String>,
    pub added_at: String,
}

impl From<&GalleryImage> for GalleryImageResponse {
    fn from(img: &GalleryImage) -> Self {
        Self {
            id: img.id().to_uuid(),
            source: img.source().to_string(),
            caption: img.caption().map(str::to_string),
            added_at: img.added_at().to_rfc3339(),
        }
    }
}

/// A full character record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterResponse {
    pub id: Uuid,
    pub name: String,
    pub notes: String,
    pub build: CharacterBuild,
    pub gallery: Vec<GalleryImageResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Character> for CharacterResponse {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id().to_uuid(),
            name: c.name().to_string(),
            notes: c.notes().to_string(),
            build: c.build().clone(),
            gallery: c.gallery().iter().map(GalleryImageResponse::from).collect(),
            created_at: c.created_at().to_rfc3339(),
            updated_at: c.updated_at().to_rfc3339(),
        }
    }
}

// =============================================================================
// Reference view
// =============================================================================

/// `GET /api/characters/{id}/reference`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResponse {
    pub character_id: Uuid,
    pub name: String,
    pub view: BuildView,
    /// Saved selections that no longer fit the rules tables and were removed
    pub dropped: Vec<DroppedSelection>,
}

/// `POST /api/characters/{id}/build`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildChangeResponse {
    pub character_id: Uuid,
    pub changed: bool,
    pub view: BuildView,
    pub dropped: Vec<DroppedSelection>,
}

// =============================================================================
// Roster import
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Characters that were new to the roster
    pub added: usize,
    /// Characters that replaced one with the same id
    pub replaced: usize,
    /// Selections removed while reconciling imported builds
    pub dropped_selections: usize,
    /// Gallery images removed for breaking the gallery limits
    pub dropped_images: usize,
    /// Entries skipped because a later entry had the same id
    pub duplicates: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "name": "Ayla",
            "createdAt": "2026-02-01T10:00:00Z",
            "build": { "classId": "seer", "level": 3 },
            "gallery": [
                { "id": Uuid::from_u128(1), "source": "cover.png", "addedAt": "2026-02-01T10:00:00Z" },
                { "id": Uuid::from_u128(2), "source": "b.png", "caption": "b", "addedAt": "2026-02-01T10:00:00Z" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn summary_uses_cover_and_build() {
        let summary = CharacterSummary::from(&character());
        assert_eq!(summary.name, "Ayla");
        assert_eq!(summary.class_id.as_deref(), Some("seer"));
        assert_eq!(summary.level, 3);
        assert_eq!(summary.cover.as_deref(), Some("cover.png"));
        assert_eq!(summary.image_count, 2);
    }

    #[test]
    fn character_response_is_camel_case() {
        let json = serde_json::to_value(CharacterResponse::from(&character())).unwrap();
        assert_eq!(json["gallery"][1]["caption"], "b");
        assert_eq!(json["build"]["classId"], "seer");
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn error_code_wire_names() {
        let body = ErrorResponse::new(ErrorCode::NotFound, "missing");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        let code: ErrorCode = serde_json::from_str(r#""TEAPOT""#).unwrap();
        assert_eq!(code, ErrorCode::Unknown);
    }
}
