//! Review submission, deletion, and listing.

use tracing::{debug, info};
use uuid::Uuid;

use storefront_core::error::{Error, Result};
use storefront_core::identity::Identity;

use crate::storage::{Database, Profile, Review};

/// A review with its author's profile merged.
#[derive(Debug, Clone)]
pub struct ReviewEntry {
    pub review: Review,
    pub author: Option<Profile>,
}

/// Review write path. Every mutation recomputes the app's rating
/// aggregate in the same transaction as the mutation itself.
#[derive(Clone)]
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Submit (or resubmit) a review for an app.
    ///
    /// Submission is an upsert keyed by (app, user): a second submission
    /// by the same user replaces the prior review's rating/title/comment
    /// instead of creating a duplicate. The review is marked a verified
    /// purchase when the user's download ledger contains the app.
    pub async fn submit_review(
        &self,
        identity: &Identity,
        app_id: &str,
        rating: i64,
        title: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Review> {
        if identity.user_id.is_empty() {
            return Err(Error::Unauthorized("review submission requires a user".into()));
        }
        if !(1..=5).contains(&rating) {
            return Err(Error::Validation(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }

        // NotFound surfaces before any write.
        let app = self.db.get_app_by_id_or_slug(app_id).await?;
        let verified = self.db.has_downloaded(&identity.user_id, &app.id).await?;

        let review = self
            .db
            .upsert_review(
                &Uuid::new_v4().to_string(),
                &app.id,
                &identity.user_id,
                rating,
                title,
                comment,
                verified,
            )
            .await?;

        info!(app_id = %app.id, user_id = %identity.user_id, rating, "review submitted");
        Ok(review)
    }

    /// Delete a review the caller owns; the aggregate recomputes in the
    /// same transaction as the delete.
    pub async fn delete_review(&self, identity: &Identity, review_id: &str) -> Result<()> {
        let review = self.db.get_review(review_id).await?;
        if review.user_id != identity.user_id {
            return Err(Error::Forbidden(
                "only the review's author may delete it".into(),
            ));
        }

        self.db.delete_review(&review.id, &review.app_id).await?;
        debug!(review_id, app_id = %review.app_id, "review deleted");
        Ok(())
    }

    /// Reviews for an app, newest first, with author profiles merged.
    pub async fn list_reviews(&self, app_id: &str) -> Result<Vec<ReviewEntry>> {
        let reviews = self.db.list_reviews(app_id).await?;
        let mut entries = Vec::with_capacity(reviews.len());
        for review in reviews {
            let author = self.db.find_profile(&review.user_id).await?;
            entries.push(ReviewEntry { review, author });
        }
        Ok(entries)
    }

    /// A user's review of an app, if they have one.
    pub async fn get_user_review(&self, app_id: &str, user_id: &str) -> Result<Option<Review>> {
        Ok(self.db.get_review_for_user(app_id, user_id).await?)
    }
}
