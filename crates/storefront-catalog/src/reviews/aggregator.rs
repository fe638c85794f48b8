//! Rating aggregate recomputation.

use tracing::warn;

use storefront_core::error::Result;

use crate::storage::Database;

/// Recomputes an app's `rating_average`/`rating_count` from its complete
/// review set.
///
/// The recompute runs inside a single transaction, so two concurrent
/// review submissions cannot both read a pre-update review set and have
/// the second write silently drop the first. Review mutations performed
/// through [`crate::reviews::ReviewService`] already recompute in their
/// own transaction; this entry point exists for explicit repair and for
/// triggers outside that write path.
#[derive(Clone)]
pub struct RatingAggregator {
    db: Database,
}

impl RatingAggregator {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Recompute and persist the aggregate for an app.
    ///
    /// Unconditional and idempotent: calling it twice with no intervening
    /// review change yields the same stored values. An empty review set
    /// resets both fields to zero rather than leaving stale values.
    ///
    /// A failure here means the stored aggregate may be stale; it is
    /// surfaced to the caller rather than logged away.
    pub async fn on_review_changed(&self, app_id: &str) -> Result<()> {
        // Verify the app exists so a recompute against a missing row is a
        // NotFound instead of a silent no-op UPDATE.
        self.db.get_app(app_id).await?;

        self.db.recompute_rating(app_id).await.map_err(|e| {
            warn!(app_id, error = %e, "rating recompute failed; aggregate may be stale");
            e.into()
        })
    }

    /// Display form of a stored average: one decimal place.
    ///
    /// The stored value keeps full precision; rounding is presentation
    /// only.
    pub fn display_average(average: f64) -> f64 {
        (average * 10.0).round() / 10.0
    }
}
