//! Application state and composition.

use std::sync::Arc;

use sheetkeep_domain::{GalleryLimits, RulesCatalog};

use crate::infrastructure::{
    clock::SystemClock,
    locks::CharacterLocks,
    ports::{CharacterRepo, ClockPort},
};
use crate::use_cases;

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub catalog: Arc<RulesCatalog>,
}

/// Container for all use cases.
pub struct UseCases {
    pub roster: use_cases::RosterUseCases,
    pub reference: use_cases::ReferenceUseCases,
    pub gallery: use_cases::GalleryUseCases,
    pub catalog: use_cases::CatalogQueries,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        catalog: RulesCatalog,
        gallery_limits: GalleryLimits,
    ) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock::new()), catalog, gallery_limits)
    }

    /// Like `new`, with an explicit clock.
    pub fn with_clock(
        repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        catalog: RulesCatalog,
        gallery_limits: GalleryLimits,
    ) -> Self {
        let catalog = Arc::new(catalog);
        // Shared so every use case that saves a character takes the same lock
        let locks = Arc::new(CharacterLocks::new());

        let use_cases = UseCases {
            roster: use_cases::RosterUseCases::new(
                repo.clone(),
                clock.clone(),
                catalog.clone(),
                gallery_limits,
                locks.clone(),
            ),
            reference: use_cases::ReferenceUseCases::new(
                repo.clone(),
                clock.clone(),
                catalog.clone(),
                locks.clone(),
            ),
            gallery: use_cases::GalleryUseCases::new(repo, clock, gallery_limits, locks),
            catalog: use_cases::CatalogQueries::new(catalog.clone()),
        };

        Self { use_cases, catalog }
    }
}
