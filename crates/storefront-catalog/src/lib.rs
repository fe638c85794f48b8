//! Storefront catalog data layer.
//!
//! The stateless core behind a mobile-app marketplace storefront:
//! - [`catalog`] -- filtered/sorted catalog queries with merged relations
//! - [`reviews`] -- review upserts and the derived rating aggregate
//! - [`downloads`] -- the exactly-once download/purchase ledger
//! - [`workflow`] -- the developer-application approval state machine
//!
//! All four components share the [`storage`] layer and compose only
//! through its schema; the rating aggregator is additionally triggered
//! by review mutations.

pub mod catalog;
pub mod downloads;
pub mod reviews;
pub mod storage;
pub mod workflow;

pub use catalog::{AppFilter, CatalogEntry, CatalogQueryService, PriceRange, SortBy};
pub use downloads::{DownloadLedger, DownloadOutcome, PaymentInfo};
pub use reviews::{RatingAggregator, ReviewEntry, ReviewService};
pub use storage::Database;
pub use workflow::{ApplicationData, ApplicationWorkflow};
