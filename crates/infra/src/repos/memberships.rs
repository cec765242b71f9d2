use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::MembershipRow;

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    league_id: Uuid,
) -> SqlxResult<MembershipRow> {
    sqlx::query_as::<_, MembershipRow>(
        r#"
        INSERT INTO memberships (user_id, league_id)
        VALUES ($1, $2)
        RETURNING id, user_id, league_id, display_name, created_at
        "#,
    )
    .bind(user_id)
    .bind(league_id)
    .fetch_one(executor)
    .await
}

pub async fn get<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    league_id: Uuid,
) -> SqlxResult<Option<MembershipRow>> {
    sqlx::query_as::<_, MembershipRow>(
        r#"
        SELECT id, user_id, league_id, display_name, created_at
        FROM memberships
        WHERE user_id = $1 AND league_id = $2
        "#,
    )
    .bind(user_id)
    .bind(league_id)
    .fetch_optional(executor)
    .await
}
