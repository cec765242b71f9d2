use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::PickRow;

const PICK_COLUMNS: &str = "id, league_id, user_id, team_id, week, created_at, invalidated_at";

#[derive(Debug, Clone)]
pub struct CreatePick {
    pub league_id: Uuid,
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub week: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PickFilter {
    pub league_id: Uuid,
    pub user_id: Option<Uuid>,
    pub week: Option<i32>,
    pub include_invalidated: bool,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreatePick) -> SqlxResult<PickRow> {
    sqlx::query_as::<_, PickRow>(&format!(
        r#"
        INSERT INTO picks (league_id, user_id, team_id, week)
        VALUES ($1, $2, $3, $4)
        RETURNING {PICK_COLUMNS}
        "#
    ))
    .bind(data.league_id)
    .bind(data.user_id)
    .bind(data.team_id)
    .bind(data.week)
    .fetch_one(executor)
    .await
}

/// Current picks a user holds in a league for every week except `week`.
pub async fn list_current_outside_week<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    user_id: Uuid,
    week: i32,
) -> SqlxResult<Vec<PickRow>> {
    sqlx::query_as::<_, PickRow>(&format!(
        r#"
        SELECT {PICK_COLUMNS}
        FROM picks
        WHERE league_id = $1 AND user_id = $2 AND week <> $3 AND invalidated_at IS NULL
        ORDER BY week ASC, created_at ASC
        "#
    ))
    .bind(league_id)
    .bind(user_id)
    .bind(week)
    .fetch_all(executor)
    .await
}

pub async fn list_current_for_week<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    user_id: Uuid,
    week: i32,
) -> SqlxResult<Vec<PickRow>> {
    sqlx::query_as::<_, PickRow>(&format!(
        r#"
        SELECT {PICK_COLUMNS}
        FROM picks
        WHERE league_id = $1 AND user_id = $2 AND week = $3 AND invalidated_at IS NULL
        ORDER BY created_at ASC
        "#
    ))
    .bind(league_id)
    .bind(user_id)
    .bind(week)
    .fetch_all(executor)
    .await
}

/// Mark the current picks for (league, user, week) as superseded. Returns the number of
/// rows invalidated.
pub async fn invalidate_current_for_week<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    user_id: Uuid,
    week: i32,
) -> SqlxResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE picks
        SET invalidated_at = NOW()
        WHERE league_id = $1 AND user_id = $2 AND week = $3 AND invalidated_at IS NULL
        "#,
    )
    .bind(league_id)
    .bind(user_id)
    .bind(week)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Claim the transaction-scoped lock guarding (league, user, week). Returns `false`
/// immediately when another open transaction already holds it.
pub async fn try_lock_week<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    user_id: Uuid,
    week: i32,
) -> SqlxResult<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT pg_try_advisory_xact_lock(hashtextextended($1::text || ':' || $2::text || ':' || $3::text, 0))",
    )
    .bind(league_id)
    .bind(user_id)
    .bind(week)
    .fetch_one(executor)
    .await
}

pub async fn list<'e>(executor: impl PgExecutor<'e>, filter: PickFilter) -> SqlxResult<Vec<PickRow>> {
    let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
        "SELECT {PICK_COLUMNS} FROM picks WHERE league_id = "
    ));
    query.push_bind(filter.league_id);

    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ");
        query.push_bind(user_id);
    }

    if let Some(week) = filter.week {
        query.push(" AND week = ");
        query.push_bind(week);
    }

    if !filter.include_invalidated {
        query.push(" AND invalidated_at IS NULL");
    }

    query.push(" ORDER BY week ASC, created_at ASC");

    query.build_query_as::<PickRow>().fetch_all(executor).await
}
