//! Download ledger queries.
//!
//! The ledger is append-only with a UNIQUE(app_id, user_id) constraint.
//! Inserting the row and bumping the app's counter happen in one
//! transaction, so the counter can never drift from the ledger.

use storefront_core::db::{DatabaseError, unix_timestamp};

use super::db::Database;
use super::models::{AppDownload, DownloadType};

/// Parameters for a ledger insert.
#[derive(Debug, Clone)]
pub struct DownloadParams<'a> {
    pub app_id: &'a str,
    pub user_id: &'a str,
    pub download_type: DownloadType,
    pub amount_paid_usd: f64,
    pub amount_paid_zwl: f64,
    pub payment_method: Option<&'a str>,
    pub payment_reference: Option<&'a str>,
}

impl Database {
    /// Record a download, returning the ledger row and whether it is fresh.
    ///
    /// The insert is guarded by the schema's uniqueness constraint rather
    /// than a membership check, so a concurrent duplicate or a client
    /// retry degrades to returning the existing row without touching the
    /// download counter.
    pub async fn record_download(
        &self,
        id: &str,
        params: &DownloadParams<'_>,
    ) -> Result<(AppDownload, bool), DatabaseError> {
        let now = unix_timestamp();
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO app_downloads (id, app_id, user_id, download_type, amount_paid_usd,
                                       amount_paid_zwl, payment_method, payment_reference,
                                       downloaded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (app_id, user_id) DO NOTHING
            ",
        )
        .bind(id)
        .bind(params.app_id)
        .bind(params.user_id)
        .bind(params.download_type.as_str())
        .bind(params.amount_paid_usd)
        .bind(params.amount_paid_zwl)
        .bind(params.payment_method)
        .bind(params.payment_reference)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let fresh = result.rows_affected() > 0;
        if fresh {
            sqlx::query(
                "UPDATE apps SET download_count = download_count + 1, updated_at = ? WHERE id = ?",
            )
            .bind(now)
            .bind(params.app_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let record = self
            .get_download(params.app_id, params.user_id)
            .await?
            .ok_or_else(|| {
                DatabaseError::NotFound(format!("Download for app {}", params.app_id))
            })?;

        Ok((record, fresh))
    }

    /// Find the ledger row for a (app, user) pair, if any.
    pub async fn get_download(
        &self,
        app_id: &str,
        user_id: &str,
    ) -> Result<Option<AppDownload>, DatabaseError> {
        let download = sqlx::query_as::<_, AppDownload>(
            "SELECT * FROM app_downloads WHERE app_id = ? AND user_id = ?",
        )
        .bind(app_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(download)
    }

    /// Membership test over the user's download set.
    pub async fn has_downloaded(&self, user_id: &str, app_id: &str) -> Result<bool, DatabaseError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM app_downloads WHERE app_id = ? AND user_id = ?)",
        )
        .bind(app_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        Ok(exists != 0)
    }

    /// A user's downloads, newest first.
    pub async fn list_downloads(&self, user_id: &str) -> Result<Vec<AppDownload>, DatabaseError> {
        let downloads = sqlx::query_as::<_, AppDownload>(
            "SELECT * FROM app_downloads WHERE user_id = ? ORDER BY downloaded_at DESC, id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(downloads)
    }
}
