//! Integration tests for the request aggregation store.
//!
//! Exercises the repository layer against a real database:
//! - Duplicate-key collapse and sibling counter equality
//! - Group status cascade touching exactly the group
//! - Low-demand sweep predicate (age + counter thresholds)
//! - Admin listing filters, sorting, pagination
//! - Administrative purge

use chrono::{Duration, Utc};
use sqlx::PgPool;

use reqcine_core::requests::{STATUS_COMPLETED, STATUS_PENDING, STATUS_REJECTED};
use reqcine_core::types::DbId;
use reqcine_db::models::request::CreateRequest;
use reqcine_db::models::user::CreateUser;
use reqcine_db::repositories::{RequestRepo, SettingsRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        whatsapp: None,
        role: "user".to_string(),
    }
}

fn new_request(media_id: i64, media_type: &str, request_type: &str) -> CreateRequest {
    CreateRequest {
        request_type: request_type.to_string(),
        media_id,
        media_type: media_type.to_string(),
        media_title: format!("Title {media_id}"),
        media_poster: None,
        description: None,
        notify_whatsapp: false,
    }
}

async fn seed_user(pool: &PgPool, email: &str) -> DbId {
    UserRepo::create(pool, &new_user(email)).await.unwrap().id
}

async fn backdate(pool: &PgPool, request_id: DbId, hours: i64) {
    sqlx::query("UPDATE requests SET created_at = $2 WHERE id = $1")
        .bind(request_id)
        .bind(Utc::now() - Duration::hours(hours))
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Duplicate-key aggregation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_submission_starts_group_at_one(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;

    let request = RequestRepo::create(&pool, user, &new_request(100, "movie", "add"))
        .await
        .unwrap();

    assert_eq!(request.counter, 1);
    assert_eq!(request.status, STATUS_PENDING);
    assert_eq!(request.rejection_reason, "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_submissions_keep_sibling_counters_equal(pool: PgPool) {
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;
    let carol = seed_user(&pool, "carol@example.com").await;

    let a = RequestRepo::create(&pool, alice, &new_request(100, "movie", "add"))
        .await
        .unwrap();
    let b = RequestRepo::create(&pool, bob, &new_request(100, "movie", "add"))
        .await
        .unwrap();
    assert_eq!(b.counter, 2);

    // The older sibling was bumped in the same transaction.
    let a_reloaded = RequestRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert_eq!(a_reloaded.counter, 2);

    let c = RequestRepo::create(&pool, carol, &new_request(100, "movie", "add"))
        .await
        .unwrap();
    assert_eq!(c.counter, 3);

    let group = RequestRepo::find_group(&pool, 100, "movie", "add").await.unwrap();
    assert_eq!(group.len(), 3);
    assert!(group.iter().all(|r| r.counter == 3));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn distinct_keys_do_not_share_counters(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;

    RequestRepo::create(&pool, user, &new_request(100, "movie", "add"))
        .await
        .unwrap();
    // Same media, different request type: a different ask.
    let fix = RequestRepo::create(&pool, user, &new_request(100, "movie", "fix"))
        .await
        .unwrap();
    // Same media id, different media type.
    let tv = RequestRepo::create(&pool, user, &new_request(100, "tv", "add"))
        .await
        .unwrap();

    assert_eq!(fix.counter, 1);
    assert_eq!(tv.counter, 1);
}

// ---------------------------------------------------------------------------
// Group status cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn group_update_touches_exactly_the_group(pool: PgPool) {
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;

    let a = RequestRepo::create(&pool, alice, &new_request(100, "movie", "add"))
        .await
        .unwrap();
    let b = RequestRepo::create(&pool, bob, &new_request(100, "movie", "add"))
        .await
        .unwrap();
    let outside = RequestRepo::create(&pool, alice, &new_request(200, "movie", "add"))
        .await
        .unwrap();

    let updated = RequestRepo::update_group_status(
        &pool,
        100,
        "movie",
        "add",
        STATUS_REJECTED,
        Some("Baixa demanda"),
    )
    .await
    .unwrap();
    assert_eq!(updated, 2);

    for id in [a.id, b.id] {
        let row = RequestRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(row.status, STATUS_REJECTED);
        assert_eq!(row.rejection_reason, "Baixa demanda");
    }

    let untouched = RequestRepo::find_by_id(&pool, outside.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, STATUS_PENDING);
    assert_eq!(untouched.rejection_reason, "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn group_update_is_idempotent(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;
    RequestRepo::create(&pool, user, &new_request(100, "movie", "add"))
        .await
        .unwrap();

    let first = RequestRepo::update_group_status(&pool, 100, "movie", "add", STATUS_COMPLETED, None)
        .await
        .unwrap();
    let second =
        RequestRepo::update_group_status(&pool, 100, "movie", "add", STATUS_COMPLETED, None)
            .await
            .unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 1);

    let group = RequestRepo::find_group(&pool, 100, "movie", "add").await.unwrap();
    assert!(group.iter().all(|r| r.status == STATUS_COMPLETED));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn single_update_keeps_reason_unless_replaced(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;
    let request = RequestRepo::create(&pool, user, &new_request(100, "movie", "add"))
        .await
        .unwrap();

    let rejected = RequestRepo::update_status(&pool, request.id, STATUS_REJECTED, Some("Sem fonte"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.rejection_reason, "Sem fonte");

    // Re-opening without a reason leaves the stored one in place.
    let reopened = RequestRepo::update_status(&pool, request.id, STATUS_PENDING, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.status, STATUS_PENDING);
    assert_eq!(reopened.rejection_reason, "Sem fonte");

    // Unknown id reports absence instead of failing.
    let missing = RequestRepo::update_status(&pool, 999_999, STATUS_PENDING, None)
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Low-demand sweep
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_rejects_only_stale_low_demand_pending(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;

    // Stale, low demand: swept.
    let stale_low = RequestRepo::create(&pool, user, &new_request(1, "movie", "add"))
        .await
        .unwrap();
    backdate(&pool, stale_low.id, 25).await;
    sqlx::query("UPDATE requests SET counter = 2 WHERE id = $1")
        .bind(stale_low.id)
        .execute(&pool)
        .await
        .unwrap();

    // Stale but high demand: spared.
    let stale_high = RequestRepo::create(&pool, user, &new_request(2, "movie", "add"))
        .await
        .unwrap();
    backdate(&pool, stale_high.id, 25).await;
    sqlx::query("UPDATE requests SET counter = 5 WHERE id = $1")
        .bind(stale_high.id)
        .execute(&pool)
        .await
        .unwrap();

    // Low demand but young: spared.
    let young = RequestRepo::create(&pool, user, &new_request(3, "movie", "add"))
        .await
        .unwrap();

    // Stale and low demand but already handled: spared.
    let completed = RequestRepo::create(&pool, user, &new_request(4, "movie", "add"))
        .await
        .unwrap();
    backdate(&pool, completed.id, 25).await;
    RequestRepo::update_status(&pool, completed.id, STATUS_COMPLETED, None)
        .await
        .unwrap();

    let cutoff = Utc::now() - Duration::hours(24);
    let swept = RequestRepo::sweep_low_demand(&pool, cutoff, 4, "Baixa demanda")
        .await
        .unwrap();

    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].id, stale_low.id);
    assert_eq!(swept[0].status, STATUS_REJECTED);
    assert_eq!(swept[0].rejection_reason, "Baixa demanda");

    for id in [stale_high.id, young.id] {
        let row = RequestRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(row.status, STATUS_PENDING);
    }
    let row = RequestRepo::find_by_id(&pool, completed.id).await.unwrap().unwrap();
    assert_eq!(row.status, STATUS_COMPLETED);
}

// ---------------------------------------------------------------------------
// Admin listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_filters_sorts_and_paginates(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;

    RequestRepo::create(&pool, user, &new_request(1, "movie", "add")).await.unwrap();
    RequestRepo::create(&pool, user, &new_request(2, "tv", "add")).await.unwrap();
    RequestRepo::create(&pool, user, &new_request(3, "movie", "fix")).await.unwrap();
    // Bump demand on media 2 so counter sorting is observable.
    let other = seed_user(&pool, "b@example.com").await;
    RequestRepo::create(&pool, other, &new_request(2, "tv", "add")).await.unwrap();

    // Unfiltered count covers every row.
    assert_eq!(RequestRepo::count_admin(&pool, None, None).await.unwrap(), 4);

    // Media-type filter.
    let movies = RequestRepo::list_admin(&pool, Some("movie"), None, None, "desc", 10, 0)
        .await
        .unwrap();
    assert_eq!(movies.len(), 2);
    assert!(movies.iter().all(|r| r.media_type == "movie"));
    assert_eq!(
        RequestRepo::count_admin(&pool, Some("movie"), None).await.unwrap(),
        2
    );

    // Request-type filter combined with media type.
    let fixes = RequestRepo::list_admin(&pool, Some("movie"), Some("fix"), None, "desc", 10, 0)
        .await
        .unwrap();
    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].media_id, 3);
    assert_eq!(fixes[0].user_email, "a@example.com");

    // Counter sort, highest demand first.
    let by_demand = RequestRepo::list_admin(&pool, None, None, Some("counter"), "desc", 10, 0)
        .await
        .unwrap();
    assert_eq!(by_demand[0].counter, 2);

    // Pagination slices without overlap.
    let page1 = RequestRepo::list_admin(&pool, None, None, None, "desc", 2, 0).await.unwrap();
    let page2 = RequestRepo::list_admin(&pool, None, None, None, "desc", 2, 2).await.unwrap();
    assert_eq!(page1.len(), 2);
    assert_eq!(page2.len(), 2);
    assert!(page1.iter().all(|a| page2.iter().all(|b| a.id != b.id)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn requesters_reflect_every_group_member(pool: PgPool) {
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;

    RequestRepo::create(&pool, alice, &new_request(100, "movie", "add")).await.unwrap();
    RequestRepo::create(&pool, bob, &new_request(100, "movie", "add")).await.unwrap();
    RequestRepo::create(&pool, bob, &new_request(200, "movie", "add")).await.unwrap();

    let requesters = UserRepo::list_requesters_for_group(&pool, 100, "movie", "add")
        .await
        .unwrap();
    assert_eq!(requesters.len(), 2);
    assert_eq!(requesters[0].email, "alice@example.com");
    assert_eq!(requesters[1].email, "bob@example.com");
}

// ---------------------------------------------------------------------------
// Purge, limits, settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn purge_removes_every_request(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;
    RequestRepo::create(&pool, user, &new_request(1, "movie", "add")).await.unwrap();
    RequestRepo::create(&pool, user, &new_request(2, "tv", "add")).await.unwrap();

    let deleted = RequestRepo::purge_all(&pool).await.unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(RequestRepo::count_admin(&pool, None, None).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_count_ignores_resolved_requests(pool: PgPool) {
    let user = seed_user(&pool, "a@example.com").await;
    RequestRepo::create(&pool, user, &new_request(1, "movie", "add")).await.unwrap();
    let done = RequestRepo::create(&pool, user, &new_request(2, "movie", "add")).await.unwrap();
    RequestRepo::update_status(&pool, done.id, STATUS_COMPLETED, None).await.unwrap();

    assert_eq!(
        RequestRepo::count_pending_for_user(&pool, user).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_seeded_and_partially_updatable(pool: PgPool) {
    let settings = SettingsRepo::get(&pool).await.unwrap();
    assert_eq!(settings.low_demand_rejection_hours, 24);
    assert_eq!(settings.high_demand_threshold, 4);
    assert_eq!(settings.low_demand_rejection_message, "Baixa demanda");

    let updated = SettingsRepo::update(
        &pool,
        &reqcine_db::models::settings::UpdateSettings {
            low_demand_rejection_hours: Some(48),
            high_demand_threshold: None,
            low_demand_rejection_message: None,
            max_pending_per_user: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.low_demand_rejection_hours, 48);
    assert_eq!(updated.high_demand_threshold, 4);
}
