use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::SportsTeamRow;

#[derive(Debug, Clone)]
pub struct CreateSportsTeam {
    pub name: String,
    pub short_name: String,
    pub sports_league: String,
    pub conference: Option<String>,
    pub division: Option<String>,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateSportsTeam,
) -> SqlxResult<SportsTeamRow> {
    sqlx::query_as::<_, SportsTeamRow>(
        r#"
        INSERT INTO sports_teams (name, short_name, sports_league, conference, division)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, short_name, sports_league, conference, division, created_at
        "#,
    )
    .bind(data.name)
    .bind(data.short_name)
    .bind(data.sports_league)
    .bind(data.conference)
    .bind(data.division)
    .fetch_one(executor)
    .await
}

pub async fn list<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<SportsTeamRow>> {
    sqlx::query_as::<_, SportsTeamRow>(
        r#"
        SELECT id, name, short_name, sports_league, conference, division, created_at
        FROM sports_teams
        ORDER BY sports_league ASC, name ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn list_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<SportsTeamRow>> {
    sqlx::query_as::<_, SportsTeamRow>(
        r#"
        SELECT id, name, short_name, sports_league, conference, division, created_at
        FROM sports_teams
        WHERE id = ANY($1::uuid[])
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await
}

/// Teams matching any of the given (sports league, short name) pairs.
pub async fn list_by_short_names<'e>(
    executor: impl PgExecutor<'e>,
    sports_leagues: &[String],
    short_names: &[String],
) -> SqlxResult<Vec<SportsTeamRow>> {
    sqlx::query_as::<_, SportsTeamRow>(
        r#"
        SELECT t.id, t.name, t.short_name, t.sports_league, t.conference, t.division, t.created_at
        FROM sports_teams t
        JOIN UNNEST($1::text[], $2::text[]) AS k(sports_league, short_name)
          ON t.sports_league = k.sports_league AND t.short_name = k.short_name
        "#,
    )
    .bind(sports_leagues)
    .bind(short_names)
    .fetch_all(executor)
    .await
}
