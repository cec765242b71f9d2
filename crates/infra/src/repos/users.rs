use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::UserRow;

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub email: String,
    pub display_name: Option<String>,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateUserData) -> SqlxResult<UserRow> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, display_name)
        VALUES ($1, $2)
        RETURNING id, email, display_name, created_at, updated_at
        "#,
    )
    .bind(data.email)
    .bind(data.display_name)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, display_name, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_email<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, display_name, created_at, updated_at FROM users WHERE LOWER(email) = LOWER($1)",
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, display_name, created_at, updated_at
        FROM users
        WHERE id = ANY($1::uuid[])
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn list_league_members<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
) -> SqlxResult<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT u.id, u.email, u.display_name, u.created_at, u.updated_at
        FROM users u
        JOIN memberships m ON m.user_id = u.id
        WHERE m.league_id = $1
        ORDER BY m.created_at ASC
        "#,
    )
    .bind(league_id)
    .fetch_all(executor)
    .await
}
