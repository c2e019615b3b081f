//! Character builds: the saved selections, reconciliation against the rules
//! tables, the form-state projection, and form edits.

mod edit;
mod reconcile;
mod selection;
mod view;

pub use edit::{apply_edit, BuildChange, BuildEdit};
pub use reconcile::{
    reconcile, DropReason, DroppedSelection, Reconciliation, SelectionKind, MAX_BASE_SCORE,
    MAX_BONUS_PER_STAT, MAX_EQUIPPED_WEAPONS, MIN_BASE_SCORE,
};
pub use selection::{CharacterBuild, DEFAULT_BASE_SCORE};
pub use view::{
    BoonOptionView, BoonSlotView, BuildView, ChoiceView, DerivedStats, EquipmentView,
    SelectionCount, SpellChoiceView, StatView,
};
