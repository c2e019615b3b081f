//! SheetKeep Engine library.
//!
//! Server-side roster storage, rules catalog, and the HTTP API.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over the domain
//! - `infrastructure/` - Port traits and their implementations
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
