//! Developer application queries.

use storefront_core::db::{DatabaseError, unix_timestamp};

use super::db::Database;
use super::models::{ApplicationStatus, DeveloperApplication};

/// Parameters for inserting a developer application.
#[derive(Debug, Clone)]
pub struct ApplicationParams<'a> {
    pub user_id: &'a str,
    pub developer_name: &'a str,
    pub developer_website: Option<&'a str>,
    pub developer_bio: &'a str,
    /// JSON-encoded list of portfolio URLs.
    pub portfolio_links: &'a str,
    pub experience_years: Option<i64>,
    pub motivation: &'a str,
}

impl Database {
    /// Insert a developer application in its initial `pending` state.
    pub async fn create_application(
        &self,
        id: &str,
        params: &ApplicationParams<'_>,
    ) -> Result<DeveloperApplication, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            r"
            INSERT INTO developer_applications (id, user_id, developer_name, developer_website,
                                                developer_bio, portfolio_links, experience_years,
                                                motivation, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(id)
        .bind(params.user_id)
        .bind(params.developer_name)
        .bind(params.developer_website)
        .bind(params.developer_bio)
        .bind(params.portfolio_links)
        .bind(params.experience_years)
        .bind(params.motivation)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_application(id).await
    }

    /// Get an application by ID.
    pub async fn get_application(&self, id: &str) -> Result<DeveloperApplication, DatabaseError> {
        sqlx::query_as::<_, DeveloperApplication>(
            "SELECT * FROM developer_applications WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Application {id}")))
    }

    /// A user's applications, most recent first.
    pub async fn list_applications(
        &self,
        user_id: &str,
    ) -> Result<Vec<DeveloperApplication>, DatabaseError> {
        let applications = sqlx::query_as::<_, DeveloperApplication>(
            "SELECT * FROM developer_applications WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(applications)
    }

    /// A user's most recently created application, if any. The latest
    /// application is authoritative for display and policy checks.
    pub async fn latest_application(
        &self,
        user_id: &str,
    ) -> Result<Option<DeveloperApplication>, DatabaseError> {
        let application = sqlx::query_as::<_, DeveloperApplication>(
            "SELECT * FROM developer_applications WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(application)
    }

    /// Transition a pending application to a terminal state.
    ///
    /// The `status = 'pending'` guard makes the update a no-op when a
    /// concurrent moderator got there first; returns `false` in that case.
    pub async fn transition_application(
        &self,
        id: &str,
        status: ApplicationStatus,
        reviewed_by: &str,
        notes: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            r"
            UPDATE developer_applications
            SET status = ?, reviewed_by = ?, reviewed_at = ?, notes = ?
            WHERE id = ? AND status = 'pending'
            ",
        )
        .bind(status.as_str())
        .bind(reviewed_by)
        .bind(now)
        .bind(notes)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
