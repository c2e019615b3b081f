//! Value objects - Immutable objects defined by their attributes

mod names;
mod stat;

pub use names::{CharacterName, Notes};
pub use stat::{score_modifier, Stat, StatLine};
