//! Developer-application approval workflow.
//!
//! State machine: `pending -> approved | rejected`, terminal thereafter.
//! Whether a rejected applicant may reapply is an explicit policy knob,
//! not an accident of the "has an application" check.

use tracing::info;
use uuid::Uuid;

use storefront_core::config::WorkflowConfig;
use storefront_core::error::{Error, Result};
use storefront_core::identity::{Identity, Role};

use crate::storage::{
    ApplicationParams, ApplicationStatus, Database, DatabaseError, DeveloperApplication,
};

/// Applicant-supplied form data.
#[derive(Debug, Clone, Default)]
pub struct ApplicationData {
    pub developer_name: String,
    pub developer_website: Option<String>,
    pub developer_bio: String,
    pub portfolio_links: Vec<String>,
    pub experience_years: Option<i64>,
    pub motivation: String,
}

/// Manages developer-application submission and moderator transitions.
#[derive(Clone)]
pub struct ApplicationWorkflow {
    db: Database,
    policy: WorkflowConfig,
}

impl ApplicationWorkflow {
    pub const fn new(db: Database, policy: WorkflowConfig) -> Self {
        Self { db, policy }
    }

    /// Submit a developer application in the initial `pending` state.
    ///
    /// `developer_name`, `developer_bio`, and `motivation` are required;
    /// blank portfolio links are discarded before storage. A prior
    /// application blocks resubmission unless the policy allows reapplying
    /// after a rejection; the Conflict carries the blocking application's
    /// current status.
    pub async fn submit_application(
        &self,
        identity: &Identity,
        data: &ApplicationData,
    ) -> Result<DeveloperApplication> {
        if identity.user_id.is_empty() {
            return Err(Error::Unauthorized("application requires a user".into()));
        }
        validate_required(&data.developer_name, "developer_name")?;
        validate_required(&data.developer_bio, "developer_bio")?;
        validate_required(&data.motivation, "motivation")?;

        if let Some(prior) = self.db.latest_application(&identity.user_id).await? {
            let may_reapply = self.policy.allow_resubmission_after_rejection
                && prior.status == ApplicationStatus::Rejected.as_str();
            if !may_reapply {
                return Err(Error::Conflict {
                    message: "user already has a developer application".into(),
                    current: prior.status,
                });
            }
        }

        let links: Vec<&str> = data
            .portfolio_links
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        let portfolio_links = serde_json::to_string(&links)?;

        let result = self
            .db
            .create_application(
                &Uuid::new_v4().to_string(),
                &ApplicationParams {
                    user_id: &identity.user_id,
                    developer_name: data.developer_name.trim(),
                    developer_website: data.developer_website.as_deref(),
                    developer_bio: data.developer_bio.trim(),
                    portfolio_links: &portfolio_links,
                    experience_years: data.experience_years,
                    motivation: data.motivation.trim(),
                },
            )
            .await;
        let application = match result {
            Ok(application) => application,
            Err(DatabaseError::Duplicate(_)) => {
                // A concurrent submission took the pending slot between the
                // policy check and the insert; the schema's one-pending-per-
                // user index caught it.
                return Err(Error::Conflict {
                    message: "user already has a developer application".into(),
                    current: ApplicationStatus::Pending.as_str().into(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %identity.user_id, application_id = %application.id, "developer application submitted");
        Ok(application)
    }

    /// Whether the user has ever submitted an application.
    pub async fn has_application(&self, user_id: &str) -> Result<bool> {
        Ok(self.db.latest_application(user_id).await?.is_some())
    }

    /// The user's most recent application; authoritative for display.
    pub async fn get_latest_application(
        &self,
        user_id: &str,
    ) -> Result<Option<DeveloperApplication>> {
        Ok(self.db.latest_application(user_id).await?)
    }

    /// All of a user's applications, most recent first.
    pub async fn list_applications(&self, user_id: &str) -> Result<Vec<DeveloperApplication>> {
        Ok(self.db.list_applications(user_id).await?)
    }

    /// Moderator transition of a pending application to a terminal state.
    ///
    /// On approval the workflow triggers the profile promotion to the
    /// `developer` role; that cross-entity side effect belongs to the
    /// identity system, and only the application record's consistency is
    /// guaranteed here.
    pub async fn transition(
        &self,
        moderator: &Identity,
        application_id: &str,
        new_status: ApplicationStatus,
        notes: Option<&str>,
    ) -> Result<DeveloperApplication> {
        if !moderator.is_moderator() {
            return Err(Error::Forbidden(
                "application transitions require the admin role".into(),
            ));
        }
        if new_status == ApplicationStatus::Pending {
            return Err(Error::Validation(
                "an application cannot transition back to pending".into(),
            ));
        }

        let application = self.db.get_application(application_id).await?;
        if application.status != ApplicationStatus::Pending.as_str() {
            return Err(Error::InvalidTransition {
                current: application.status,
                requested: new_status.as_str().into(),
            });
        }

        let updated = self
            .db
            .transition_application(application_id, new_status, &moderator.user_id, notes)
            .await?;
        if !updated {
            // A concurrent moderator got there first; the SQL guard made
            // this update a no-op.
            let current = self.db.get_application(application_id).await?;
            return Err(Error::InvalidTransition {
                current: current.status,
                requested: new_status.as_str().into(),
            });
        }

        let application = self.db.get_application(application_id).await?;
        if new_status == ApplicationStatus::Approved {
            self.db
                .set_profile_role(
                    &application.user_id,
                    Role::Developer.as_str(),
                    Some(&application.developer_name),
                )
                .await?;
            info!(
                user_id = %application.user_id,
                application_id,
                "application approved; developer role promotion triggered"
            );
        } else {
            info!(application_id, status = %new_status, "application rejected");
        }

        Ok(application)
    }
}

fn validate_required(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}
