//! Storage layer tests for the Storefront catalog.

use super::db::Database;
use super::models::{AppStatus, ApplicationStatus, DownloadType};
use super::queries_applications::ApplicationParams;
use super::queries_apps::{AppParams, AppQuery};
use super::queries_downloads::DownloadParams;

async fn test_db() -> Database {
    Database::open_in_memory().await.unwrap()
}

async fn seed_user(db: &Database, id: &str) {
    db.create_profile(id, &format!("{id}@example.com"), id)
        .await
        .unwrap();
}

async fn seed_category(db: &Database, id: &str, slug: &str) {
    db.create_category(id, slug, slug, 0).await.unwrap();
}

async fn seed_app(db: &Database, id: &str, category_id: &str, name: &str, status: AppStatus) {
    db.create_app(
        id,
        &AppParams {
            developer_id: "dev1",
            category_id,
            name,
            slug: &format!("{id}-slug"),
            short_description: "short",
            full_description: "full",
            price_usd: 0.0,
            is_free: true,
            status,
            featured: false,
        },
    )
    .await
    .unwrap();
}

async fn seed_base(db: &Database) {
    seed_user(db, "dev1").await;
    seed_user(db, "u1").await;
    seed_user(db, "u2").await;
    seed_category(db, "c1", "finance").await;
}

// === App tests ===

#[tokio::test]
async fn create_and_get_app() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    let app = db.get_app("a1").await.unwrap();
    assert_eq!(app.name, "Ledger");
    assert_eq!(app.status, "published");
    assert_eq!(app.download_count, 0);
    assert_eq!(app.rating_count, 0);
}

#[tokio::test]
async fn get_app_by_id_or_slug_resolves_both() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    assert_eq!(db.get_app_by_id_or_slug("a1").await.unwrap().id, "a1");
    assert_eq!(db.get_app_by_id_or_slug("a1-slug").await.unwrap().id, "a1");
    assert!(db.get_app_by_id_or_slug("nope").await.is_err());
}

#[tokio::test]
async fn list_apps_filters_by_status() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Live", AppStatus::Published).await;
    seed_app(&db, "a2", "c1", "Draft", AppStatus::Draft).await;

    let published = db
        .list_apps(&AppQuery {
            status: "published",
            ..AppQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, "a1");
}

#[tokio::test]
async fn list_apps_filters_by_category_slug() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_category(&db, "c2", "games").await;
    seed_app(&db, "a1", "c1", "Budget", AppStatus::Published).await;
    seed_app(&db, "a2", "c2", "Puzzle", AppStatus::Published).await;

    let finance = db
        .list_apps(&AppQuery {
            status: "published",
            category_slug: Some("finance"),
            ..AppQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(finance.len(), 1);
    assert_eq!(finance[0].id, "a1");
}

#[tokio::test]
async fn list_apps_search_is_case_insensitive() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Budget Tracker", AppStatus::Published).await;
    seed_app(&db, "a2", "c1", "Puzzle", AppStatus::Published).await;

    let hits = db
        .list_apps(&AppQuery {
            status: "published",
            search: Some("budget"),
            ..AppQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "a1");
}

#[tokio::test]
async fn list_apps_ordering_is_deterministic() {
    let db = test_db().await;
    seed_base(&db).await;
    // Same created_at second for all three; the id tie-break keeps order stable.
    seed_app(&db, "a1", "c1", "A", AppStatus::Published).await;
    seed_app(&db, "a2", "c1", "B", AppStatus::Published).await;
    seed_app(&db, "a3", "c1", "C", AppStatus::Published).await;

    let filter = AppQuery {
        status: "published",
        ..AppQuery::default()
    };
    let first = db.list_apps(&filter).await.unwrap();
    let second = db.list_apps(&filter).await.unwrap();
    let ids = |apps: &[super::models::App]| apps.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn publishing_an_app_stamps_published_at() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Draft).await;

    db.update_app_status("a1", AppStatus::Published).await.unwrap();
    let app = db.get_app("a1").await.unwrap();
    assert_eq!(app.status, "published");
    assert!(app.published_at.is_some());

    // Moving onward keeps the original publication stamp.
    let stamp = app.published_at;
    db.update_app_status("a1", AppStatus::UnderReview)
        .await
        .unwrap();
    assert_eq!(db.get_app("a1").await.unwrap().published_at, stamp);
}

// === Category and screenshot tests ===

#[tokio::test]
async fn categories_ordered_by_sort_order() {
    let db = test_db().await;
    db.create_category("c1", "Tools", "tools", 2).await.unwrap();
    db.create_category("c2", "Games", "games", 1).await.unwrap();

    let categories = db.list_categories().await.unwrap();
    assert_eq!(categories[0].slug, "games");
    assert_eq!(categories[1].slug, "tools");
}

#[tokio::test]
async fn screenshots_ordered_by_sort_order() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    db.create_screenshot("s2", "a1", "http://img/2", None, 2)
        .await
        .unwrap();
    db.create_screenshot("s1", "a1", "http://img/1", Some("home"), 1)
        .await
        .unwrap();

    let shots = db.list_screenshots("a1").await.unwrap();
    assert_eq!(shots.len(), 2);
    assert_eq!(shots[0].id, "s1");
    assert_eq!(shots[1].id, "s2");
}

// === Review tests ===

#[tokio::test]
async fn review_aggregate_follows_review_set() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_user(&db, "u3").await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    db.upsert_review("r1", "a1", "u1", 5, None, None, false)
        .await
        .unwrap();
    db.upsert_review("r2", "a1", "u2", 3, None, None, false)
        .await
        .unwrap();
    db.upsert_review("r3", "a1", "u3", 4, None, None, false)
        .await
        .unwrap();

    let app = db.get_app("a1").await.unwrap();
    assert!((app.rating_average - 4.0).abs() < f64::EPSILON);
    assert_eq!(app.rating_count, 3);

    // Deleting the rating-3 review moves the mean to 4.5 over 2 reviews.
    assert!(db.delete_review("r2", "a1").await.unwrap());
    let app = db.get_app("a1").await.unwrap();
    assert!((app.rating_average - 4.5).abs() < f64::EPSILON);
    assert_eq!(app.rating_count, 2);
}

#[tokio::test]
async fn second_submission_replaces_first() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    let first = db
        .upsert_review("r1", "a1", "u1", 2, Some("meh"), None, false)
        .await
        .unwrap();
    let second = db
        .upsert_review("r2", "a1", "u1", 5, Some("fixed!"), Some("much better"), false)
        .await
        .unwrap();

    // Same row, updated fields; the conflicting insert id is discarded.
    assert_eq!(second.id, first.id);
    assert_eq!(second.rating, 5);
    assert_eq!(second.title.as_deref(), Some("fixed!"));
    assert_eq!(db.list_reviews("a1").await.unwrap().len(), 1);

    let app = db.get_app("a1").await.unwrap();
    assert!((app.rating_average - 5.0).abs() < f64::EPSILON);
    assert_eq!(app.rating_count, 1);
}

#[tokio::test]
async fn empty_review_set_resets_aggregate() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    db.upsert_review("r1", "a1", "u1", 4, None, None, false)
        .await
        .unwrap();
    db.delete_review("r1", "a1").await.unwrap();

    let app = db.get_app("a1").await.unwrap();
    assert!(app.rating_average.abs() < f64::EPSILON);
    assert_eq!(app.rating_count, 0);
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;
    db.upsert_review("r1", "a1", "u1", 5, None, None, false)
        .await
        .unwrap();

    db.recompute_rating("a1").await.unwrap();
    db.recompute_rating("a1").await.unwrap();

    let app = db.get_app("a1").await.unwrap();
    assert!((app.rating_average - 5.0).abs() < f64::EPSILON);
    assert_eq!(app.rating_count, 1);
}

// === Download ledger tests ===

#[tokio::test]
async fn fresh_download_increments_counter() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    let (record, fresh) = db
        .record_download(
            "d1",
            &DownloadParams {
                app_id: "a1",
                user_id: "u1",
                download_type: DownloadType::FreeDownload,
                amount_paid_usd: 0.0,
                amount_paid_zwl: 0.0,
                payment_method: None,
                payment_reference: None,
            },
        )
        .await
        .unwrap();

    assert!(fresh);
    assert_eq!(record.download_type, "free_download");
    assert!(db.has_downloaded("u1", "a1").await.unwrap());
    assert_eq!(db.get_app("a1").await.unwrap().download_count, 1);
}

#[tokio::test]
async fn duplicate_download_is_a_noop() {
    let db = test_db().await;
    seed_base(&db).await;
    seed_app(&db, "a1", "c1", "Ledger", AppStatus::Published).await;

    let params = DownloadParams {
        app_id: "a1",
        user_id: "u1",
        download_type: DownloadType::FreeDownload,
        amount_paid_usd: 0.0,
        amount_paid_zwl: 0.0,
        payment_method: None,
        payment_reference: None,
    };
    let (first, fresh) = db.record_download("d1", &params).await.unwrap();
    assert!(fresh);

    // Retry with a different candidate id: same row comes back, no increment.
    let (second, fresh) = db.record_download("d2", &params).await.unwrap();
    assert!(!fresh);
    assert_eq!(second.id, first.id);
    assert_eq!(db.get_app("a1").await.unwrap().download_count, 1);
    assert_eq!(db.list_downloads("u1").await.unwrap().len(), 1);
}

// === Developer application tests ===

#[tokio::test]
async fn create_and_transition_application() {
    let db = test_db().await;
    seed_base(&db).await;

    let app = db
        .create_application(
            "ap1",
            &ApplicationParams {
                user_id: "u1",
                developer_name: "Acme",
                developer_website: None,
                developer_bio: "We build tools",
                portfolio_links: r#"["https://acme.test"]"#,
                experience_years: Some(3),
                motivation: "ship apps",
            },
        )
        .await
        .unwrap();
    assert_eq!(app.status, "pending");
    assert_eq!(app.portfolio(), vec!["https://acme.test".to_string()]);

    assert!(
        db.transition_application("ap1", ApplicationStatus::Approved, "admin1", Some("ok"))
            .await
            .unwrap()
    );
    let app = db.get_application("ap1").await.unwrap();
    assert_eq!(app.status, "approved");
    assert_eq!(app.reviewed_by.as_deref(), Some("admin1"));
    assert!(app.reviewed_at.is_some());

    // Terminal states reject further transitions at the SQL guard.
    assert!(
        !db.transition_application("ap1", ApplicationStatus::Rejected, "admin1", None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn latest_application_wins() {
    let db = test_db().await;
    seed_base(&db).await;

    let params = |name: &'static str| ApplicationParams {
        user_id: "u1",
        developer_name: name,
        developer_website: None,
        developer_bio: "bio",
        portfolio_links: "[]",
        experience_years: None,
        motivation: "motivation",
    };
    db.create_application("ap1", &params("First")).await.unwrap();
    db.transition_application("ap1", ApplicationStatus::Rejected, "admin1", None)
        .await
        .unwrap();
    db.create_application("ap2", &params("Second")).await.unwrap();

    let latest = db.latest_application("u1").await.unwrap().unwrap();
    assert_eq!(latest.developer_name, "Second");
    assert_eq!(db.list_applications("u1").await.unwrap().len(), 2);
    assert!(db.latest_application("u2").await.unwrap().is_none());
}

#[tokio::test]
async fn second_pending_application_trips_the_unique_index() {
    let db = test_db().await;
    seed_base(&db).await;

    let params = ApplicationParams {
        user_id: "u1",
        developer_name: "Acme",
        developer_website: None,
        developer_bio: "bio",
        portfolio_links: "[]",
        experience_years: None,
        motivation: "motivation",
    };
    db.create_application("ap1", &params).await.unwrap();

    let err = db.create_application("ap2", &params).await.unwrap_err();
    assert!(matches!(
        err,
        storefront_core::db::DatabaseError::Duplicate(_)
    ));
}
