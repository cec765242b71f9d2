use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::FantasyLeagueRow;

#[derive(Debug, Clone)]
pub struct CreateFantasyLeague {
    pub owner_id: Uuid,
    pub name: String,
    pub game_mode: String,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateFantasyLeague,
) -> SqlxResult<FantasyLeagueRow> {
    sqlx::query_as::<_, FantasyLeagueRow>(
        r#"
        INSERT INTO fantasy_leagues (owner_id, name, game_mode)
        VALUES ($1, $2, $3)
        RETURNING id, name, owner_id, game_mode, created_at, updated_at
        "#,
    )
    .bind(data.owner_id)
    .bind(data.name)
    .bind(data.game_mode)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<FantasyLeagueRow>> {
    sqlx::query_as::<_, FantasyLeagueRow>(
        r#"
        SELECT id, name, owner_id, game_mode, created_at, updated_at
        FROM fantasy_leagues
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<FantasyLeagueRow>> {
    sqlx::query_as::<_, FantasyLeagueRow>(
        r#"
        SELECT id, name, owner_id, game_mode, created_at, updated_at
        FROM fantasy_leagues
        ORDER BY name ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn list_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> SqlxResult<Vec<FantasyLeagueRow>> {
    sqlx::query_as::<_, FantasyLeagueRow>(
        r#"
        SELECT fl.id, fl.name, fl.owner_id, fl.game_mode, fl.created_at, fl.updated_at
        FROM fantasy_leagues fl
        JOIN memberships m ON m.league_id = fl.id
        WHERE m.user_id = $1
        ORDER BY fl.name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn list_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<FantasyLeagueRow>> {
    sqlx::query_as::<_, FantasyLeagueRow>(
        r#"
        SELECT id, name, owner_id, game_mode, created_at, updated_at
        FROM fantasy_leagues
        WHERE id = ANY($1::uuid[])
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await
}
