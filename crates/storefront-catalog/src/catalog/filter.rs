//! Catalog filter configuration.
//!
//! A closed structure with enumerated fields and defaults, so invalid
//! filter combinations are unrepresentable.

use crate::storage::AppStatus;

/// Price restriction applied service-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceRange {
    #[default]
    All,
    Free,
    Paid,
}

/// Sort key for catalog listings. Ties are broken by the prior
/// ordering's key via a stable sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// `created_at` descending (default).
    #[default]
    Newest,
    /// `download_count` descending.
    Popular,
    /// `rating_average` descending.
    Rating,
    /// Name ascending, case-insensitive.
    Name,
}

/// Catalog query filter.
#[derive(Debug, Clone, Default)]
pub struct AppFilter {
    /// Publication status restriction. Public browsing leaves this unset
    /// and sees only published apps; owner/developer views override it.
    pub status: Option<AppStatus>,
    /// Category slug; `"all"` or absent means no restriction.
    pub category_slug: Option<String>,
    /// When `true`, only featured apps.
    pub featured: bool,
    /// Restrict to apps owned by this developer.
    pub developer_id: Option<String>,
    /// Case-insensitive substring match against name or short description.
    pub search_text: Option<String>,
    pub price_range: PriceRange,
    /// Keep apps with `rating_average >= min_rating`.
    pub min_rating: Option<f64>,
    pub sort_by: SortBy,
    /// Page size; capped by `CatalogConfig::max_page_size` and defaulted
    /// to `CatalogConfig::default_page_size` when unset.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl AppFilter {
    /// Effective category restriction; the `"all"` sentinel clears it.
    pub fn effective_category(&self) -> Option<&str> {
        self.category_slug
            .as_deref()
            .filter(|slug| !slug.eq_ignore_ascii_case("all"))
    }
}
