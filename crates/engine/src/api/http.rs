//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use sheetkeep_domain::rules::{ArmorDef, BoonDef, ClassDef, SpellDef, WeaponDef};
use sheetkeep_domain::{BuildEdit, CatalogEntry, CharacterId, ContentFilter, DomainError, ImageId};
use sheetkeep_shared::{
    AddImageRequest, BuildChangeResponse, CharacterResponse, CharacterSummary,
    CreateCharacterRequest, ErrorCode, ErrorResponse, GalleryImageResponse, HealthResponse,
    ImportResponse, ReferenceResponse, ReorderImagesRequest, RosterDocument, SpellQuery,
    UpdateCharacterRequest,
};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::{GalleryError, ReferenceError, RosterError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        // Catalog
        .route("/api/catalog/classes", get(list_classes))
        .route("/api/catalog/classes/{id}", get(get_class))
        .route("/api/catalog/spells", get(list_spells))
        .route("/api/catalog/spells/{id}", get(get_spell))
        .route("/api/catalog/boons", get(list_boons))
        .route("/api/catalog/weapons", get(list_weapons))
        .route("/api/catalog/armor", get(list_armor))
        .route("/api/catalog/describe/{id}", get(describe))
        // Roster
        .route(
            "/api/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/characters/{id}",
            get(get_character)
                .patch(update_character)
                .delete(delete_character),
        )
        .route("/api/characters/{id}/duplicate", post(duplicate_character))
        // Reference view
        .route("/api/characters/{id}/reference", get(open_reference))
        .route("/api/characters/{id}/build", post(apply_build_edit))
        // Gallery
        .route("/api/characters/{id}/images", post(add_image))
        .route("/api/characters/{id}/images/order", put(reorder_images))
        .route(
            "/api/characters/{id}/images/{image_id}",
            axum::routing::delete(remove_image),
        )
        .route(
            "/api/characters/{id}/images/{image_id}/cover",
            post(set_cover),
        )
        // Export / import
        .route("/api/roster/export", get(export_roster))
        .route("/api/roster/import", post(import_roster))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_classes(State(app): State<Arc<App>>) -> Json<Vec<ClassDef>> {
    Json(app.use_cases.catalog.classes().to_vec())
}

async fn get_class(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<ClassDef>, ApiError> {
    app.use_cases
        .catalog
        .class(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Class", &id))
}

async fn list_spells(
    State(app): State<Arc<App>>,
    Query(query): Query<SpellQuery>,
) -> Json<Vec<SpellDef>> {
    let filter: ContentFilter = query.into();
    Json(
        app.use_cases
            .catalog
            .spells(&filter)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn get_spell(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<SpellDef>, ApiError> {
    app.use_cases
        .catalog
        .spell(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Spell", &id))
}

async fn list_boons(State(app): State<Arc<App>>) -> Json<Vec<BoonDef>> {
    Json(app.use_cases.catalog.boons().to_vec())
}

async fn list_weapons(State(app): State<Arc<App>>) -> Json<Vec<WeaponDef>> {
    Json(app.use_cases.catalog.weapons().to_vec())
}

async fn list_armor(State(app): State<Arc<App>>) -> Json<Vec<ArmorDef>> {
    Json(app.use_cases.catalog.armor().to_vec())
}

async fn describe(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<CatalogEntry>, ApiError> {
    app.use_cases
        .catalog
        .describe(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Catalog entry", &id))
}

// =============================================================================
// Roster
// =============================================================================

async fn list_characters(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<CharacterSummary>>, ApiError> {
    let characters = app.use_cases.roster.list().await?;
    Ok(Json(characters.iter().map(CharacterSummary::from).collect()))
}

async fn create_character(
    State(app): State<Arc<App>>,
    Json(req): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<CharacterResponse>), ApiError> {
    let character = app
        .use_cases
        .roster
        .create(req.name, req.class_id, req.notes)
        .await?;
    Ok((StatusCode::CREATED, Json(CharacterResponse::from(&character))))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let character = app
        .use_cases
        .roster
        .get(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(CharacterResponse::from(&character)))
}

async fn update_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCharacterRequest>,
) -> Result<Json<CharacterResponse>, ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }
    let character = app
        .use_cases
        .roster
        .update(CharacterId::from_uuid(id), req.name, req.notes)
        .await?;
    Ok(Json(CharacterResponse::from(&character)))
}

async fn delete_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .roster
        .delete(CharacterId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn duplicate_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<CharacterResponse>), ApiError> {
    let copy = app
        .use_cases
        .roster
        .duplicate(CharacterId::from_uuid(id))
        .await?;
    Ok((StatusCode::CREATED, Json(CharacterResponse::from(&copy))))
}

// =============================================================================
// Reference view
// =============================================================================

async fn open_reference(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReferenceResponse>, ApiError> {
    let sheet = app
        .use_cases
        .reference
        .open(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(ReferenceResponse {
        character_id: sheet.character.id().to_uuid(),
        name: sheet.character.name().to_string(),
        view: sheet.view,
        dropped: sheet.dropped,
    }))
}

async fn apply_build_edit(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(edit): Json<BuildEdit>,
) -> Result<Json<BuildChangeResponse>, ApiError> {
    let outcome = app
        .use_cases
        .reference
        .apply(CharacterId::from_uuid(id), &edit)
        .await?;
    Ok(Json(BuildChangeResponse {
        character_id: outcome.character.id().to_uuid(),
        changed: outcome.changed,
        view: outcome.view,
        dropped: outcome.dropped,
    }))
}

// =============================================================================
// Gallery
// =============================================================================

async fn add_image(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddImageRequest>,
) -> Result<(StatusCode, Json<GalleryImageResponse>), ApiError> {
    let (_, image) = app
        .use_cases
        .gallery
        .add(CharacterId::from_uuid(id), req.source, req.caption)
        .await?;
    Ok((StatusCode::CREATED, Json(GalleryImageResponse::from(&image))))
}

async fn remove_image(
    State(app): State<Arc<App>>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let character = app
        .use_cases
        .gallery
        .remove(CharacterId::from_uuid(id), ImageId::from_uuid(image_id))
        .await?;
    Ok(Json(CharacterResponse::from(&character)))
}

async fn set_cover(
    State(app): State<Arc<App>>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let character = app
        .use_cases
        .gallery
        .set_cover(CharacterId::from_uuid(id), ImageId::from_uuid(image_id))
        .await?;
    Ok(Json(CharacterResponse::from(&character)))
}

async fn reorder_images(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReorderImagesRequest>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let order: Vec<ImageId> = req.order.into_iter().map(ImageId::from_uuid).collect();
    let character = app
        .use_cases
        .gallery
        .reorder(CharacterId::from_uuid(id), &order)
        .await?;
    Ok(Json(CharacterResponse::from(&character)))
}

// =============================================================================
// Export / import
// =============================================================================

async fn export_roster(State(app): State<Arc<App>>) -> Result<Json<RosterDocument>, ApiError> {
    Ok(Json(app.use_cases.roster.export().await?))
}

async fn import_roster(
    State(app): State<Arc<App>>,
    Json(doc): Json<RosterDocument>,
) -> Result<Json<ImportResponse>, ApiError> {
    let summary = app.use_cases.roster.import(doc).await?;
    Ok(Json(ImportResponse {
        added: summary.added,
        replaced: summary.replaced,
        dropped_selections: summary.dropped_selections,
        dropped_images: summary.dropped_images,
        duplicates: summary.duplicates,
    }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// Input broke a domain rule or selection limit
    Validation(String),
    Internal(String),
}

impl ApiError {
    fn not_found(entity_type: &str, id: &str) -> Self {
        ApiError::NotFound(format!("{} not found: {}", entity_type, id))
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::NotFound, msg),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::BadRequest, msg),
            ),
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::ValidationError, msg),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::InternalError, "Internal error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound(e.to_string())
        } else {
            ApiError::Validation(e.to_string())
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<RosterError> for ApiError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::NotFound(id) => ApiError::not_found("Character", &id.to_string()),
            RosterError::Domain(e) => e.into(),
            RosterError::Repo(e) => e.into(),
        }
    }
}

impl From<ReferenceError> for ApiError {
    fn from(e: ReferenceError) -> Self {
        match e {
            ReferenceError::NotFound(id) => ApiError::not_found("Character", &id.to_string()),
            ReferenceError::Domain(e) => e.into(),
            ReferenceError::Repo(e) => e.into(),
        }
    }
}

impl From<GalleryError> for ApiError {
    fn from(e: GalleryError) -> Self {
        match e {
            GalleryError::NotFound(id) => ApiError::not_found("Character", &id.to_string()),
            GalleryError::Domain(e) => e.into(),
            GalleryError::Repo(e) => e.into(),
        }
    }
}
