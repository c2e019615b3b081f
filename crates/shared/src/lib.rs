//! SheetKeep Shared - wire types for the engine's HTTP API
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - only serde, uuid and the domain
//! 2. **No business logic** - pure data types and conversions
//! 3. **No domain IDs** - DTOs use raw `uuid::Uuid`

pub mod requests;
pub mod responses;
pub mod roster;

pub use requests::{
    AddImageRequest, CreateCharacterRequest, ReorderImagesRequest, SpellQuery,
    UpdateCharacterRequest,
};
pub use responses::{
    BuildChangeResponse, CharacterResponse, CharacterSummary, ErrorCode, ErrorResponse,
    GalleryImageResponse, HealthResponse, ImportResponse, ReferenceResponse,
};
pub use roster::{RosterDocument, ROSTER_FORMAT_VERSION};
