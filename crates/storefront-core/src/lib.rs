//! Storefront Core Library
//!
//! Shared functionality for Storefront components:
//! - Domain error taxonomy (validation, authorization, conflicts, gateway)
//! - Identity model produced by the external auth collaborator
//! - Configuration resolution and hierarchy
//! - `SQLite` pool helpers shared by storage layers

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod tracing_init;

pub use config::StorefrontConfig;
pub use error::{Error, Result};
pub use identity::{Identity, Role};
