//! Database models for the Storefront catalog.
//!
//! Row field names and enum string values are the interop contract with
//! the hosted store; they must not drift.

use serde::{Deserialize, Serialize};

/// User profile record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub developer_name: Option<String>,
    pub developer_website: Option<String>,
    pub developer_bio: Option<String>,
    pub is_verified: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Category record from the database. Read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    pub color: String,
    pub sort_order: i64,
    pub is_active: i64,
    pub created_at: i64,
}

/// App record from the database.
///
/// `rating_average`/`rating_count` are derived from the review set and
/// `download_count` from the ledger; neither is edited independently.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct App {
    pub id: String,
    pub developer_id: String,
    pub category_id: String,
    pub name: String,
    pub slug: String,
    pub short_description: String,
    pub full_description: String,
    pub icon_url: Option<String>,
    pub version: String,
    pub price_usd: f64,
    pub price_zwl: f64,
    pub is_free: i64,
    pub package_name: Option<String>,
    pub minimum_android_version: String,
    pub app_size_mb: Option<f64>,
    pub status: String,
    pub download_count: i64,
    pub rating_average: f64,
    pub rating_count: i64,
    pub featured: i64,
    pub apk_url: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub support_email: Option<String>,
    pub website_url: Option<String>,
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Screenshot record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AppScreenshot {
    pub id: String,
    pub app_id: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub sort_order: i64,
    pub created_at: i64,
}

/// Review record from the database. At most one per (app, user).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: String,
    pub app_id: String,
    pub user_id: String,
    pub rating: i64,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub is_verified_purchase: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Download ledger record. Append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AppDownload {
    pub id: String,
    pub app_id: String,
    pub user_id: String,
    pub download_type: String,
    pub amount_paid_usd: f64,
    pub amount_paid_zwl: f64,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub downloaded_at: i64,
}

/// Developer application record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeveloperApplication {
    pub id: String,
    pub user_id: String,
    pub developer_name: String,
    pub developer_website: Option<String>,
    pub developer_bio: String,
    pub portfolio_links: String,
    pub experience_years: Option<i64>,
    pub motivation: String,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl DeveloperApplication {
    /// Portfolio links decoded from their JSON column.
    pub fn portfolio(&self) -> Vec<String> {
        serde_json::from_str(&self.portfolio_links).unwrap_or_default()
    }
}

/// App publication status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Published,
}

impl AppStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Published => "published",
        }
    }
}

impl std::fmt::Display for AppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Download kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadType {
    FreeDownload,
    Purchase,
}

impl DownloadType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FreeDownload => "free_download",
            Self::Purchase => "purchase",
        }
    }
}

impl std::fmt::Display for DownloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Developer application status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
