//! SheetKeep domain: rules content, characters and build-state reconciliation.
//!
//! Pure and synchronous. No I/O, no logging; callers get values and reports
//! back and decide what to do with them.

pub mod aggregates;
pub mod build;
pub mod entities;
pub mod error;
pub mod ids;
pub mod rules;
pub mod value_objects;

#[cfg(test)]
mod test_fixtures;

pub use aggregates::Character;
pub use build::{
    apply_edit, reconcile, BuildChange, BuildEdit, BuildView, CharacterBuild, DropReason,
    DroppedSelection, Reconciliation, SelectionKind,
};
pub use entities::{GalleryImage, GalleryLimits};
pub use error::DomainError;
pub use ids::{CharacterId, ImageId};
pub use rules::{CatalogEntry, ContentFilter, EntryKind, RulesCatalog};
pub use value_objects::{CharacterName, Notes, Stat, StatLine};
