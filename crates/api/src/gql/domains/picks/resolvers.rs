use async_graphql::{Context, Object, Result, ID};

use crate::gql::common::helpers::parse_id;
use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::repos::{picks, PickFilter};

use super::service::{self, SubmissionError, SubmissionResult};
use super::types::{Pick, SubmitPickInput, SubmitPickPayload};

#[derive(Default)]
pub struct PickQuery;

#[Object]
impl PickQuery {
    /// Picks in a league, optionally narrowed to one user and week. Superseded picks
    /// are only returned when `includeInvalidated` is true.
    async fn picks(
        &self,
        ctx: &Context<'_>,
        league_id: ID,
        user_id: Option<ID>,
        week: Option<i32>,
        include_invalidated: Option<bool>,
    ) -> Result<Vec<Pick>> {
        let state = ctx.data::<AppState>()?;

        let league_id = parse_id(&league_id, "league")?;
        let user_id = user_id.map(|id| parse_id(&id, "user")).transpose()?;

        let rows = picks::list(
            &state.db,
            PickFilter {
                league_id,
                user_id,
                week,
                include_invalidated: include_invalidated.unwrap_or(false),
            },
        )
        .await
        .map_err(GqlError::from)?;

        Ok(rows.into_iter().map(Pick::from).collect())
    }
}

#[derive(Default)]
pub struct PickMutation;

#[Object]
impl PickMutation {
    /// Submit a user's teams for one week, replacing any picks already made for it.
    async fn submit_pick(
        &self,
        ctx: &Context<'_>,
        input: SubmitPickInput,
    ) -> Result<SubmitPickPayload> {
        let state = ctx.data::<AppState>()?;

        let request = match input.into_request() {
            Ok(request) => request,
            Err(e) => {
                let error = SubmissionError::invalid_selection(format!("Invalid ID: {e}"));
                return Ok(SubmissionResult::Errors(vec![error]).into());
            }
        };

        let result = service::submit(&state.db, state.rules(), request).await;

        Ok(result.into())
    }
}
