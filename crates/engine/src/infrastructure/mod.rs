//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod catalog;
pub mod clock;
pub mod locks;
pub mod ports;
pub mod roster_store;
