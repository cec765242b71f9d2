use async_graphql::{Context, Object, Result, ID};

use crate::gql::common::helpers::parse_id;
use crate::gql::common::types::{MutationError, ERR_INVALID_INPUT, ERR_NOT_FOUND};
use crate::gql::domains::users::types::User;
use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::repos::{fantasy_leagues, memberships, users, CreateFantasyLeague};

use super::types::{
    AddUserToFantasyLeagueInput, CreateFantasyLeagueInput, FantasyLeague, FantasyLeaguePayload,
};

const MSG_OWNER_NOT_FOUND: &str = "The specified owner does not exist.";

#[derive(Default)]
pub struct LeagueQuery;

#[Object]
impl LeagueQuery {
    async fn league(&self, ctx: &Context<'_>, league_id: ID) -> Result<Option<FantasyLeague>> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;

        let row = fantasy_leagues::get_by_id(&state.db, league_id)
            .await
            .map_err(GqlError::from)?;

        Ok(row.map(FantasyLeague::from))
    }

    /// All leagues, or only those `userId` is a member of.
    async fn leagues(&self, ctx: &Context<'_>, user_id: Option<ID>) -> Result<Vec<FantasyLeague>> {
        let state = ctx.data::<AppState>()?;

        let rows = match user_id {
            Some(user_id) => {
                fantasy_leagues::list_for_user(&state.db, parse_id(&user_id, "user")?).await
            }
            None => fantasy_leagues::list(&state.db).await,
        }
        .map_err(GqlError::from)?;

        Ok(rows.into_iter().map(FantasyLeague::from).collect())
    }

    async fn league_members(&self, ctx: &Context<'_>, league_id: ID) -> Result<Vec<User>> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;

        let rows = users::list_league_members(&state.db, league_id)
            .await
            .map_err(GqlError::from)?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[derive(Default)]
pub struct LeagueMutation;

#[Object]
impl LeagueMutation {
    /// Create a league and enrol its owner as the first member.
    async fn create_fantasy_league(
        &self,
        ctx: &Context<'_>,
        input: CreateFantasyLeagueInput,
    ) -> Result<FantasyLeaguePayload> {
        let state = ctx.data::<AppState>()?;
        let owner_id = parse_id(&input.owner_id, "owner")?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Ok(FantasyLeaguePayload::error(MutationError::new(
                ERR_INVALID_INPUT,
                "League name must not be empty.",
            )));
        }

        let mut tx = state.db.begin().await.map_err(GqlError::from)?;

        let league = match fantasy_leagues::create(
            &mut *tx,
            CreateFantasyLeague {
                owner_id,
                name,
                game_mode: input.game_mode.as_str().to_string(),
            },
        )
        .await
        {
            Ok(league) => league,
            Err(e) if infra::db::is_foreign_key_violation(&e) => {
                return Ok(FantasyLeaguePayload::error(MutationError::new(
                    ERR_NOT_FOUND,
                    MSG_OWNER_NOT_FOUND,
                )))
            }
            Err(e) => {
                tracing::error!("Database error while creating league: {e}");
                return Ok(FantasyLeaguePayload::error(MutationError::unknown()));
            }
        };

        if let Err(e) = memberships::create(&mut *tx, owner_id, league.id).await {
            return Ok(FantasyLeaguePayload::error(MutationError::from_storage(
                &e,
                "The owner is already a member of this league.",
                MSG_OWNER_NOT_FOUND,
            )));
        }

        tx.commit().await.map_err(GqlError::from)?;

        tracing::info!(
            league_id = %league.id,
            owner_id = %owner_id,
            game_mode = %input.game_mode,
            "Created fantasy league"
        );

        Ok(FantasyLeaguePayload::ok(league.into()))
    }

    async fn add_user_to_fantasy_league(
        &self,
        ctx: &Context<'_>,
        input: AddUserToFantasyLeagueInput,
    ) -> Result<FantasyLeaguePayload> {
        let state = ctx.data::<AppState>()?;
        let user_id = parse_id(&input.user_id, "user")?;
        let league_id = parse_id(&input.league_id, "league")?;

        let Some(league) = fantasy_leagues::get_by_id(&state.db, league_id)
            .await
            .map_err(GqlError::from)?
        else {
            return Ok(FantasyLeaguePayload::error(MutationError::new(
                ERR_NOT_FOUND,
                "The specified fantasy league does not exist.",
            )));
        };

        if let Err(e) = memberships::create(&state.db, user_id, league_id).await {
            return Ok(FantasyLeaguePayload::error(MutationError::from_storage(
                &e,
                "That user is already a member of the specified league.",
                "The specified user does not exist.",
            )));
        }

        Ok(FantasyLeaguePayload::ok(league.into()))
    }
}
