//! `SQLite` storage for the Storefront catalog.
//!
//! Provides persistence for apps, categories, screenshots, reviews,
//! the download ledger, developer applications, and profiles.

mod db;
mod models;
mod queries_applications;
mod queries_apps;
mod queries_downloads;
mod queries_reviews;

#[cfg(test)]
mod tests;

pub use db::Database;
pub use models::*;
pub use queries_applications::ApplicationParams;
pub use queries_apps::{AppParams, AppQuery};
pub use queries_downloads::DownloadParams;
pub use storefront_core::db::DatabaseError;
