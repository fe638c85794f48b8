//! Catalog queries: apps, categories, screenshots, and profiles.

use storefront_core::db::{DatabaseError, unix_timestamp};

use super::db::Database;
use super::models::{App, AppScreenshot, AppStatus, Category, Profile};

/// Parameters for inserting an app row.
#[derive(Debug, Clone)]
pub struct AppParams<'a> {
    pub developer_id: &'a str,
    pub category_id: &'a str,
    pub name: &'a str,
    pub slug: &'a str,
    pub short_description: &'a str,
    pub full_description: &'a str,
    pub price_usd: f64,
    pub is_free: bool,
    pub status: AppStatus,
    pub featured: bool,
}

/// Server-side filter for [`Database::list_apps`].
///
/// Price-range and minimum-rating filtering, ordering beyond the base
/// created-at key, and pagination stay in the service layer.
#[derive(Debug, Clone, Default)]
pub struct AppQuery<'a> {
    pub status: &'a str,
    pub category_slug: Option<&'a str>,
    pub featured: bool,
    pub developer_id: Option<&'a str>,
    pub search: Option<&'a str>,
}

impl Database {
    // =========================================================================
    // App queries
    // =========================================================================

    /// Insert an app row.
    pub async fn create_app(&self, id: &str, params: &AppParams<'_>) -> Result<App, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            r"
            INSERT INTO apps (id, developer_id, category_id, name, slug, short_description,
                              full_description, price_usd, is_free, status, featured,
                              created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(id)
        .bind(params.developer_id)
        .bind(params.category_id)
        .bind(params.name)
        .bind(params.slug)
        .bind(params.short_description)
        .bind(params.full_description)
        .bind(params.price_usd)
        .bind(i64::from(params.is_free))
        .bind(params.status.as_str())
        .bind(i64::from(params.featured))
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_app(id).await
    }

    /// Get an app by ID.
    pub async fn get_app(&self, id: &str) -> Result<App, DatabaseError> {
        sqlx::query_as::<_, App>("SELECT * FROM apps WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("App {id}")))
    }

    /// Get an app by its opaque ID or its human slug, whichever matches.
    pub async fn get_app_by_id_or_slug(&self, id_or_slug: &str) -> Result<App, DatabaseError> {
        sqlx::query_as::<_, App>("SELECT * FROM apps WHERE id = ? OR slug = ?")
            .bind(id_or_slug)
            .bind(id_or_slug)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("App {id_or_slug}")))
    }

    /// List apps matching the server-side filter.
    ///
    /// Rows come back ordered by `created_at` descending with the row ID as
    /// a deterministic tie-break, so repeated queries over unchanged data
    /// return identical ordering.
    pub async fn list_apps(&self, filter: &AppQuery<'_>) -> Result<Vec<App>, DatabaseError> {
        let mut sql = String::from("SELECT * FROM apps WHERE status = ?");
        let mut binds: Vec<String> = vec![filter.status.to_string()];

        if let Some(slug) = filter.category_slug {
            sql.push_str(" AND category_id IN (SELECT id FROM categories WHERE slug = ?)");
            binds.push(slug.to_string());
        }
        if filter.featured {
            sql.push_str(" AND featured = 1");
        }
        if let Some(dev) = filter.developer_id {
            sql.push_str(" AND developer_id = ?");
            binds.push(dev.to_string());
        }
        if let Some(term) = filter.search {
            // SQLite LIKE is case-insensitive for ASCII.
            sql.push_str(" AND (name LIKE ? OR short_description LIKE ?)");
            let pattern = format!("%{term}%");
            binds.push(pattern.clone());
            binds.push(pattern);
        }
        sql.push_str(" ORDER BY created_at DESC, id ASC");

        let mut query = sqlx::query_as::<_, App>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        Ok(query.fetch_all(self.pool()).await?)
    }

    /// Update an app's publication status.
    pub async fn update_app_status(&self, id: &str, status: AppStatus) -> Result<(), DatabaseError> {
        let now = unix_timestamp();
        let published_at = matches!(status, AppStatus::Published).then_some(now);

        sqlx::query(
            "UPDATE apps SET status = ?, published_at = COALESCE(?, published_at), updated_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(published_at)
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    // =========================================================================
    // Category queries
    // =========================================================================

    /// Insert a category row (reference data, loaded at provisioning time).
    pub async fn create_category(
        &self,
        id: &str,
        name: &str,
        slug: &str,
        sort_order: i64,
    ) -> Result<Category, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO categories (id, name, slug, sort_order, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(sort_order)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_category(id).await
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: &str) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Category {id}")))
    }

    /// Find a category by ID without treating absence as an error.
    pub async fn find_category(&self, id: &str) -> Result<Option<Category>, DatabaseError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(category)
    }

    /// List active categories ordered by their explicit sort order.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE is_active = 1 ORDER BY sort_order ASC, slug ASC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(categories)
    }

    // =========================================================================
    // Screenshot queries
    // =========================================================================

    /// Insert a screenshot row.
    pub async fn create_screenshot(
        &self,
        id: &str,
        app_id: &str,
        image_url: &str,
        caption: Option<&str>,
        sort_order: i64,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO app_screenshots (id, app_id, image_url, caption, sort_order, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(app_id)
        .bind(image_url)
        .bind(caption)
        .bind(sort_order)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Screenshots for an app, ordered by `sort_order` ascending.
    pub async fn list_screenshots(&self, app_id: &str) -> Result<Vec<AppScreenshot>, DatabaseError> {
        let screenshots = sqlx::query_as::<_, AppScreenshot>(
            "SELECT * FROM app_screenshots WHERE app_id = ? ORDER BY sort_order ASC, id ASC",
        )
        .bind(app_id)
        .fetch_all(self.pool())
        .await?;

        Ok(screenshots)
    }

    // =========================================================================
    // Profile queries
    // =========================================================================

    /// Insert a profile row.
    pub async fn create_profile(
        &self,
        id: &str,
        email: &str,
        full_name: &str,
    ) -> Result<Profile, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO profiles (id, email, full_name, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_profile(id).await
    }

    /// Get a profile by ID.
    pub async fn get_profile(&self, id: &str) -> Result<Profile, DatabaseError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Profile {id}")))
    }

    /// Find a profile by ID without treating absence as an error.
    pub async fn find_profile(&self, id: &str) -> Result<Option<Profile>, DatabaseError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(profile)
    }

    /// Set a profile's role and developer display fields.
    ///
    /// Called when the moderation workflow approves a developer
    /// application; the promotion itself is owned by the identity system.
    pub async fn set_profile_role(
        &self,
        id: &str,
        role: &str,
        developer_name: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "UPDATE profiles SET role = ?, developer_name = COALESCE(?, developer_name), updated_at = ? WHERE id = ?",
        )
        .bind(role)
        .bind(developer_name)
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
