//! Download/purchase ledger.
//!
//! Records a download exactly once per (user, app) pair and keeps the
//! app's download counter in lockstep with the ledger.

use tracing::{debug, info};
use uuid::Uuid;

use storefront_core::error::{Error, Result};
use storefront_core::identity::Identity;

use crate::storage::{AppDownload, Database, DownloadParams, DownloadType};

/// Payment receipt details from the external payment collaborator.
///
/// The ledger never talks to a payment processor; a purchase call must
/// arrive with the receipt already in hand.
#[derive(Debug, Clone)]
pub struct PaymentInfo {
    pub amount_paid_usd: f64,
    pub amount_paid_zwl: f64,
    pub payment_method: Option<String>,
    pub payment_reference: String,
}

/// Result of [`DownloadLedger::record_download`].
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub record: AppDownload,
    /// `false` when the (user, app) pair already had a ledger row: the
    /// call was a re-open, with no charge and no counter change.
    pub fresh: bool,
}

/// Append-only download ledger.
#[derive(Clone)]
pub struct DownloadLedger {
    db: Database,
}

impl DownloadLedger {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a download or purchase.
    ///
    /// Idempotent per (user, app): repeats and concurrent retries return
    /// the existing ledger row without a second charge or counter
    /// increment. For a fresh download, the ledger insert and the
    /// counter increment commit as one unit.
    pub async fn record_download(
        &self,
        identity: &Identity,
        app_id: &str,
        kind: DownloadType,
        payment: Option<PaymentInfo>,
    ) -> Result<DownloadOutcome> {
        if identity.user_id.is_empty() {
            return Err(Error::Unauthorized("download requires a user".into()));
        }

        let payment = validate_payment(kind, payment)?;
        let app = self.db.get_app_by_id_or_slug(app_id).await?;

        let params = DownloadParams {
            app_id: &app.id,
            user_id: &identity.user_id,
            download_type: kind,
            amount_paid_usd: payment.as_ref().map_or(0.0, |p| p.amount_paid_usd),
            amount_paid_zwl: payment.as_ref().map_or(0.0, |p| p.amount_paid_zwl),
            payment_method: payment.as_ref().and_then(|p| p.payment_method.as_deref()),
            payment_reference: payment.as_ref().map(|p| p.payment_reference.as_str()),
        };

        let (record, fresh) = self
            .db
            .record_download(&Uuid::new_v4().to_string(), &params)
            .await?;

        if fresh {
            info!(app_id = %app.id, user_id = %identity.user_id, kind = %kind, "download recorded");
        } else {
            debug!(app_id = %app.id, user_id = %identity.user_id, "download re-opened");
        }

        Ok(DownloadOutcome { record, fresh })
    }

    /// Membership test over the user's own download set.
    pub async fn has_downloaded(&self, user_id: &str, app_id: &str) -> Result<bool> {
        Ok(self.db.has_downloaded(user_id, app_id).await?)
    }

    /// A user's downloads, newest first.
    pub async fn list_downloads(&self, user_id: &str) -> Result<Vec<AppDownload>> {
        Ok(self.db.list_downloads(user_id).await?)
    }
}

/// A purchase requires a receipt; a free download must not carry one.
fn validate_payment(
    kind: DownloadType,
    payment: Option<PaymentInfo>,
) -> Result<Option<PaymentInfo>> {
    match (kind, payment) {
        (DownloadType::Purchase, Some(p)) => {
            if p.payment_reference.trim().is_empty() {
                return Err(Error::Validation(
                    "purchase requires a payment reference".into(),
                ));
            }
            if p.amount_paid_usd < 0.0 || p.amount_paid_zwl < 0.0 {
                return Err(Error::Validation("paid amounts cannot be negative".into()));
            }
            Ok(Some(p))
        }
        (DownloadType::Purchase, None) => Err(Error::Validation(
            "purchase requires payment details".into(),
        )),
        (DownloadType::FreeDownload, Some(_)) => Err(Error::Validation(
            "free download must not carry payment details".into(),
        )),
        (DownloadType::FreeDownload, None) => Ok(None),
    }
}
