use async_graphql::{Context, Object, Result};

use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::repos::{sports_games, sports_teams};

use super::types::{SportsGame, SportsTeam};

#[derive(Default)]
pub struct SportsQuery;

#[Object]
impl SportsQuery {
    async fn sports_teams(&self, ctx: &Context<'_>) -> Result<Vec<SportsTeam>> {
        let state = ctx.data::<AppState>()?;
        let rows = sports_teams::list(&state.db)
            .await
            .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(SportsTeam::from).collect())
    }

    async fn sports_games(&self, ctx: &Context<'_>, week: Option<i32>) -> Result<Vec<SportsGame>> {
        let state = ctx.data::<AppState>()?;
        let rows = sports_games::list(&state.db, week)
            .await
            .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(SportsGame::from).collect())
    }
}
