//! Read-only catalog query service.

use tracing::debug;

use storefront_core::config::CatalogConfig;
use storefront_core::error::Result;

use super::filter::{AppFilter, PriceRange, SortBy};
use crate::storage::{App, AppQuery, AppScreenshot, AppStatus, Category, Database, Profile};

/// An app with its merged relations, as the storefront displays it.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub app: App,
    pub developer: Option<Profile>,
    pub category: Option<Category>,
    /// Always ordered by `sort_order` ascending.
    pub screenshots: Vec<AppScreenshot>,
}

/// Builds and executes filtered/sorted catalog queries. No side effects.
#[derive(Clone)]
pub struct CatalogQueryService {
    db: Database,
    config: CatalogConfig,
}

impl CatalogQueryService {
    pub const fn new(db: Database, config: CatalogConfig) -> Self {
        Self { db, config }
    }

    /// List apps matching the filter, with relations merged.
    ///
    /// Status, category, featured, developer, and search restrictions are
    /// pushed into SQL; price range and minimum rating are applied here,
    /// followed by a stable sort and pagination.
    pub async fn list_apps(&self, filter: &AppFilter) -> Result<Vec<CatalogEntry>> {
        let status = filter.status.unwrap_or(AppStatus::Published);
        let query = AppQuery {
            status: status.as_str(),
            category_slug: filter.effective_category(),
            featured: filter.featured,
            developer_id: filter.developer_id.as_deref(),
            search: filter.search_text.as_deref(),
        };

        let mut apps = self.db.list_apps(&query).await?;
        debug!(count = apps.len(), status = %status, "catalog query fetched");

        match filter.price_range {
            PriceRange::All => {}
            PriceRange::Free => apps.retain(|a| a.is_free != 0),
            PriceRange::Paid => apps.retain(|a| a.is_free == 0),
        }
        if let Some(min) = filter.min_rating {
            apps.retain(|a| a.rating_average >= min);
        }

        sort_apps(&mut apps, filter.sort_by);

        let limit = filter
            .limit
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size) as usize;
        let page: Vec<App> = apps
            .into_iter()
            .skip(filter.offset as usize)
            .take(limit)
            .collect();

        let mut entries = Vec::with_capacity(page.len());
        for app in page {
            entries.push(self.merge_relations(app).await?);
        }
        Ok(entries)
    }

    /// Resolve an app by opaque ID or human slug, with relations merged.
    pub async fn get_app(&self, id_or_slug: &str) -> Result<CatalogEntry> {
        let app = self.db.get_app_by_id_or_slug(id_or_slug).await?;
        self.merge_relations(app).await
    }

    /// Active categories ordered by their explicit sort order.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.db.list_categories().await?)
    }

    async fn merge_relations(&self, app: App) -> Result<CatalogEntry> {
        let developer = self.db.find_profile(&app.developer_id).await?;
        let category = self.db.find_category(&app.category_id).await?;
        let mut screenshots = self.db.list_screenshots(&app.id).await?;
        // The gateway already orders these, but display order is a service
        // guarantee, not a storage accident.
        screenshots.sort_by_key(|s| s.sort_order);

        Ok(CatalogEntry {
            app,
            developer,
            category,
            screenshots,
        })
    }
}

/// Stable sort over the base created-at-descending ordering, so ties keep
/// the prior ordering's key.
fn sort_apps(apps: &mut [App], sort_by: SortBy) {
    match sort_by {
        SortBy::Newest => {}
        SortBy::Popular => apps.sort_by(|a, b| b.download_count.cmp(&a.download_count)),
        SortBy::Rating => apps.sort_by(|a, b| b.rating_average.total_cmp(&a.rating_average)),
        SortBy::Name => apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
    }
}
