//! Review queries and the rating-aggregate recompute.
//!
//! Every review mutation and its aggregate recompute share one
//! transaction, so concurrent submissions cannot publish an aggregate
//! that misses a committed review.

use sqlx::{Sqlite, Transaction};

use storefront_core::db::{DatabaseError, unix_timestamp};

use super::db::Database;
use super::models::Review;

impl Database {
    /// Upsert a review keyed by (`app_id`, `user_id`) and recompute the
    /// app's rating aggregate in the same transaction.
    ///
    /// A second submission by the same user replaces rating/title/comment
    /// of the existing row; the row ID and `created_at` are preserved.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_review(
        &self,
        id: &str,
        app_id: &str,
        user_id: &str,
        rating: i64,
        title: Option<&str>,
        comment: Option<&str>,
        is_verified_purchase: bool,
    ) -> Result<Review, DatabaseError> {
        let now = unix_timestamp();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            INSERT INTO reviews (id, app_id, user_id, rating, title, comment,
                                 is_verified_purchase, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (app_id, user_id) DO UPDATE SET
                rating = excluded.rating,
                title = excluded.title,
                comment = excluded.comment,
                is_verified_purchase = excluded.is_verified_purchase,
                updated_at = excluded.updated_at
            ",
        )
        .bind(id)
        .bind(app_id)
        .bind(user_id)
        .bind(rating)
        .bind(title)
        .bind(comment)
        .bind(i64::from(is_verified_purchase))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        recompute_rating_in_tx(&mut tx, app_id).await?;
        tx.commit().await?;

        self.get_review_for_user(app_id, user_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Review for app {app_id}")))
    }

    /// Delete a review and recompute the app's rating aggregate in the
    /// same transaction. Returns `false` if no row was deleted.
    pub async fn delete_review(&self, review_id: &str, app_id: &str) -> Result<bool, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;

        recompute_rating_in_tx(&mut tx, app_id).await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a review by ID.
    pub async fn get_review(&self, id: &str) -> Result<Review, DatabaseError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Review {id}")))
    }

    /// Find a user's review of an app, if any.
    pub async fn get_review_for_user(
        &self,
        app_id: &str,
        user_id: &str,
    ) -> Result<Option<Review>, DatabaseError> {
        let review = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE app_id = ? AND user_id = ?",
        )
        .bind(app_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(review)
    }

    /// Reviews for an app, newest first.
    pub async fn list_reviews(&self, app_id: &str) -> Result<Vec<Review>, DatabaseError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE app_id = ? ORDER BY created_at DESC, id ASC",
        )
        .bind(app_id)
        .fetch_all(self.pool())
        .await?;

        Ok(reviews)
    }

    /// Recompute `rating_average`/`rating_count` from the full review set.
    ///
    /// Unconditional and idempotent; an empty review set resets both
    /// fields to zero.
    pub async fn recompute_rating(&self, app_id: &str) -> Result<(), DatabaseError> {
        let mut tx = self.pool().begin().await?;
        recompute_rating_in_tx(&mut tx, app_id).await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Read the review set and write the aggregate inside the caller's
/// transaction, serializing against concurrent review writers.
async fn recompute_rating_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    app_id: &str,
) -> Result<(), DatabaseError> {
    let (count, average): (i64, f64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(AVG(rating), 0.0) FROM reviews WHERE app_id = ?",
    )
    .bind(app_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("UPDATE apps SET rating_average = ?, rating_count = ?, updated_at = ? WHERE id = ?")
        .bind(average)
        .bind(count)
        .bind(unix_timestamp())
        .bind(app_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
