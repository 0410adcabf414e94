//! Repository for the `requests` table.
//!
//! Requests sharing a (`media_id`, `media_type`, `request_type`) duplicate
//! key form a group with one shared demand counter. Every mutation that
//! touches more than one row is a single bulk statement, so group state is
//! atomic per call.

use sqlx::PgPool;

use reqcine_core::requests::{STATUS_PENDING, STATUS_REJECTED};
use reqcine_core::types::{DbId, Timestamp};

use crate::models::request::{CreateRequest, Request, RequestWithRequester};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const REQUEST_COLUMNS: &str = "\
    id, user_id, request_type, media_id, media_type, media_title, media_poster, \
    description, status, counter, rejection_reason, notify_whatsapp, \
    created_at, updated_at";

const LISTING_COLUMNS: &str = "\
    r.id, r.user_id, u.name AS user_name, u.email AS user_email, r.request_type, \
    r.media_id, r.media_type, r.media_title, r.media_poster, r.status, r.counter, \
    r.rejection_reason, r.notify_whatsapp, r.created_at, r.updated_at";

/// Provides aggregation-aware operations over content requests.
pub struct RequestRepo;

impl RequestRepo {
    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Create a request, collapsing duplicates into a counter bump.
    ///
    /// Runs in one transaction: every existing row in the group gets
    /// `counter + 1` (so siblings never disagree), then the new row is
    /// inserted with the same value, or 1 when the group is empty. Any
    /// failure aborts the whole transaction; no partial state survives.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        data: &CreateRequest,
    ) -> Result<Request, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let counters: Vec<(i32,)> = sqlx::query_as(
            "UPDATE requests SET counter = counter + 1, updated_at = NOW() \
             WHERE media_id = $1 AND media_type = $2 AND request_type = $3 \
             RETURNING counter",
        )
        .bind(data.media_id)
        .bind(&data.media_type)
        .bind(&data.request_type)
        .fetch_all(&mut *tx)
        .await?;

        let counter = counters.first().map(|c| c.0).unwrap_or(1);

        let query = format!(
            "INSERT INTO requests \
                 (user_id, request_type, media_id, media_type, media_title, \
                  media_poster, description, notify_whatsapp, counter) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {REQUEST_COLUMNS}"
        );
        let request = sqlx::query_as::<_, Request>(&query)
            .bind(user_id)
            .bind(&data.request_type)
            .bind(data.media_id)
            .bind(&data.media_type)
            .bind(&data.media_title)
            .bind(&data.media_poster)
            .bind(&data.description)
            .bind(data.notify_whatsapp)
            .bind(counter)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(request)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find a request by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Request>, sqlx::Error> {
        let query = format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = $1");
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one user's requests, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM requests \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// All rows in one duplicate-key group.
    pub async fn find_group(
        pool: &PgPool,
        media_id: i64,
        media_type: &str,
        request_type: &str,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM requests \
             WHERE media_id = $1 AND media_type = $2 AND request_type = $3"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(media_id)
            .bind(media_type)
            .bind(request_type)
            .fetch_all(pool)
            .await
    }

    /// Number of pending requests a user currently has open.
    pub async fn count_pending_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM requests WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(STATUS_PENDING)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    // -----------------------------------------------------------------------
    // Status updates
    // -----------------------------------------------------------------------

    /// Update one request's status.
    ///
    /// The rejection reason is only overwritten when a non-empty one is
    /// provided; otherwise the stored value stands.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET \
                 status = $2, \
                 rejection_reason = COALESCE(NULLIF($3, ''), rejection_reason), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(status)
            .bind(rejection_reason.unwrap_or(""))
            .fetch_optional(pool)
            .await
    }

    /// Bulk-update every row in a duplicate-key group in one statement.
    ///
    /// Returns the number of rows touched.
    pub async fn update_group_status(
        pool: &PgPool,
        media_id: i64,
        media_type: &str,
        request_type: &str,
        status: &str,
        rejection_reason: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE requests SET \
                 status = $4, \
                 rejection_reason = COALESCE(NULLIF($5, ''), rejection_reason), \
                 updated_at = NOW() \
             WHERE media_id = $1 AND media_type = $2 AND request_type = $3",
        )
        .bind(media_id)
        .bind(media_type)
        .bind(request_type)
        .bind(status)
        .bind(rejection_reason.unwrap_or(""))
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Reject stale pending requests whose demand never materialized.
    ///
    /// One bulk statement selecting `pending`, created before `cutoff`,
    /// with `counter` below `demand_threshold`. The updated rows are
    /// returned so callers can route them through notification fan-out.
    pub async fn sweep_low_demand(
        pool: &PgPool,
        cutoff: Timestamp,
        demand_threshold: i32,
        message: &str,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET \
                 status = $1, \
                 rejection_reason = $2, \
                 updated_at = NOW() \
             WHERE status = $3 AND created_at < $4 AND counter < $5 \
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(STATUS_REJECTED)
            .bind(message)
            .bind(STATUS_PENDING)
            .bind(cutoff)
            .bind(demand_threshold)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Admin listing
    // -----------------------------------------------------------------------

    /// Paginated, filtered, sorted listing with joined requester info.
    ///
    /// `sort_by = "counter"` sorts on demand (asc per `sort_order`, desc
    /// otherwise); everything else sorts newest first. The ORDER BY
    /// fragment comes from this fixed set, never from caller input.
    pub async fn list_admin(
        pool: &PgPool,
        media_type: Option<&str>,
        request_type: Option<&str>,
        sort_by: Option<&str>,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RequestWithRequester>, sqlx::Error> {
        let order_by = match (sort_by, sort_order) {
            (Some("counter"), "asc") => "r.counter ASC, r.created_at DESC",
            (Some("counter"), _) => "r.counter DESC, r.created_at DESC",
            _ => "r.created_at DESC",
        };
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM requests r \
             JOIN users u ON u.id = r.user_id \
             WHERE ($1::TEXT IS NULL OR r.media_type = $1) \
               AND ($2::TEXT IS NULL OR r.request_type = $2) \
             ORDER BY {order_by} LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, RequestWithRequester>(&query)
            .bind(media_type)
            .bind(request_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total rows matching the listing filters.
    pub async fn count_admin(
        pool: &PgPool,
        media_type: Option<&str>,
        request_type: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM requests \
             WHERE ($1::TEXT IS NULL OR media_type = $1) \
               AND ($2::TEXT IS NULL OR request_type = $2)",
        )
        .bind(media_type)
        .bind(request_type)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    // -----------------------------------------------------------------------
    // Administrative purge
    // -----------------------------------------------------------------------

    /// Delete every request. Returns how many rows were removed.
    pub async fn purge_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM requests").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
