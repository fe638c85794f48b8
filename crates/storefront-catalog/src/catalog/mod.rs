//! Catalog browsing: filtered, sorted, relation-merged app queries.

mod filter;
mod service;

pub use filter::{AppFilter, PriceRange, SortBy};
pub use service::{CatalogEntry, CatalogQueryService};
