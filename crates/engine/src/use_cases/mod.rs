//! Use cases - user story orchestration over the domain and storage ports.

pub mod catalog;
pub mod gallery;
pub mod reference;
pub mod roster;

pub use catalog::CatalogQueries;
pub use gallery::{GalleryError, GalleryUseCases};
pub use reference::{EditOutcome, ReferenceError, ReferenceSheet, ReferenceUseCases};
pub use roster::{ImportSummary, RosterError, RosterUseCases};
