//! Request bodies and query strings accepted by the engine API.

use serde::{Deserialize, Serialize};
use sheetkeep_domain::ContentFilter;
use uuid::Uuid;

/// `POST /api/characters`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterRequest {
    pub name: String,
    /// Starting class; the character starts classless when omitted
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `PATCH /api/characters/{id}` - absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateCharacterRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.notes.is_none()
    }
}

/// `POST /api/characters/{id}/images`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddImageRequest {
    /// A `data:image/...` URL or a path/URL
    pub source: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// `PUT /api/characters/{id}/images/order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderImagesRequest {
    pub order: Vec<Uuid>,
}

/// Query string for `GET /api/catalog/spells`.
///
/// Field names follow query-string convention (snake_case).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellQuery {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub tier_min: Option<u8>,
    #[serde(default)]
    pub tier_max: Option<u8>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<SpellQuery> for ContentFilter {
    fn from(q: SpellQuery) -> Self {
        ContentFilter {
            class: q.class.filter(|c| !c.is_empty()),
            tier_min: q.tier_min,
            tier_max: q.tier_max,
            search: q.search,
            limit: q.limit,
        }
    }
}
