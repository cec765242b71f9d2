use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, InputObject, SimpleObject, ID};
use uuid::Uuid;

use crate::gql::common::helpers::parse_id;
use crate::gql::common::types::MutationError;
use crate::gql::domains::picks::types::Pick;
use crate::gql::domains::picks::GameMode;
use crate::gql::domains::users::types::User;
use crate::gql::error::{GqlError, ResultExt};
use crate::gql::loaders::UserLoader;
use crate::state::AppState;
use infra::repos::{picks, users, PickFilter};

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct FantasyLeague {
    pub id: ID,
    pub name: String,
    /// Game-mode tag as stored; may name a mode that does not accept picks.
    pub game_mode: String,
    #[graphql(skip)]
    pub owner_id: Uuid,
}

impl From<infra::models::FantasyLeagueRow> for FantasyLeague {
    fn from(row: infra::models::FantasyLeagueRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            game_mode: row.game_mode,
            owner_id: row.owner_id,
        }
    }
}

#[ComplexObject]
impl FantasyLeague {
    async fn owner(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let loader = ctx.data::<DataLoader<UserLoader>>()?;

        Ok(loader
            .load_one(self.owner_id)
            .await
            .gql_err("Loading owner failed")?
            .map(User::from))
    }

    async fn members(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&self.id, "league")?;

        let rows = users::list_league_members(&state.db, league_id)
            .await
            .map_err(GqlError::from)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Current picks in this league.
    async fn picks(
        &self,
        ctx: &Context<'_>,
        user_id: Option<ID>,
        week: Option<i32>,
    ) -> async_graphql::Result<Vec<Pick>> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&self.id, "league")?;
        let user_id = user_id.map(|id| parse_id(&id, "user")).transpose()?;

        let rows = picks::list(
            &state.db,
            PickFilter {
                league_id,
                user_id,
                week,
                include_invalidated: false,
            },
        )
        .await
        .map_err(GqlError::from)?;

        Ok(rows.into_iter().map(Pick::from).collect())
    }

    async fn current_week(&self, ctx: &Context<'_>) -> async_graphql::Result<i32> {
        let state = ctx.data::<AppState>()?;
        Ok(state.config().current_week)
    }

    /// Whether submissions are accepted under this league's game mode.
    async fn accepts_picks(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        let state = ctx.data::<AppState>()?;
        Ok(state.rules().resolve(&self.game_mode).is_ok())
    }
}

#[derive(InputObject)]
pub struct CreateFantasyLeagueInput {
    pub owner_id: ID,
    pub name: String,
    pub game_mode: GameMode,
}

#[derive(InputObject)]
pub struct AddUserToFantasyLeagueInput {
    pub user_id: ID,
    pub league_id: ID,
}

#[derive(SimpleObject)]
pub struct FantasyLeaguePayload {
    pub league: Option<FantasyLeague>,
    pub errors: Option<Vec<MutationError>>,
}

impl FantasyLeaguePayload {
    pub fn ok(league: FantasyLeague) -> Self {
        Self {
            league: Some(league),
            errors: None,
        }
    }

    pub fn error(error: MutationError) -> Self {
        Self {
            league: None,
            errors: Some(vec![error]),
        }
    }
}
