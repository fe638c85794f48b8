//! Reviews: one-per-user upserts and the derived rating aggregate.

mod aggregator;
mod service;

pub use aggregator::RatingAggregator;
pub use service::{ReviewEntry, ReviewService};
