use sqlx::{PgExecutor, Result as SqlxResult};

use crate::models::SportsGameRow;

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    week: Option<i32>,
) -> SqlxResult<Vec<SportsGameRow>> {
    sqlx::query_as::<_, SportsGameRow>(
        r#"
        SELECT id, away_team_short_name, home_team_short_name, away_team_score,
               home_team_score, start_time, season, week, sports_league, created_at
        FROM sports_games
        WHERE ($1::int IS NULL OR week = $1)
        ORDER BY start_time ASC
        "#,
    )
    .bind(week)
    .fetch_all(executor)
    .await
}
