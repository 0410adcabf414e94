//! Repository for the `users` table.

use sqlx::PgPool;

use reqcine_core::types::DbId;

use crate::models::user::{CreateUser, Requester, User};

const USER_COLUMNS: &str = "\
    id, name, email, whatsapp, role, is_active, created_at, updated_at";

/// Read-mostly access to the user directory.
pub struct UserRepo;

impl UserRepo {
    /// Create a user (seeding; account management lives outside this service).
    pub async fn create(pool: &PgPool, data: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, whatsapp, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&data.name)
            .bind(&data.email)
            .bind(&data.whatsapp)
            .bind(&data.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Everyone who submitted into one duplicate-key group, oldest first.
    pub async fn list_requesters_for_group(
        pool: &PgPool,
        media_id: i64,
        media_type: &str,
        request_type: &str,
    ) -> Result<Vec<Requester>, sqlx::Error> {
        sqlx::query_as::<_, Requester>(
            "SELECT u.id AS user_id, u.name, u.email, \
                    r.id AS request_id, r.status, r.created_at \
             FROM requests r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.media_id = $1 AND r.media_type = $2 AND r.request_type = $3 \
             ORDER BY r.created_at ASC",
        )
        .bind(media_id)
        .bind(media_type)
        .bind(request_type)
        .fetch_all(pool)
        .await
    }
}
