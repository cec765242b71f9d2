use async_graphql::{ComplexObject, Context, InputObject, SimpleObject, ID};

use crate::gql::common::helpers::parse_id;
use crate::gql::common::types::MutationError;
use crate::gql::domains::leagues::types::FantasyLeague;
use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::repos::{fantasy_leagues, memberships};

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct User {
    pub id: ID,
    pub email: String,
    #[graphql(skip)]
    pub default_display_name: Option<String>,
}

impl From<infra::models::UserRow> for User {
    fn from(row: infra::models::UserRow) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            default_display_name: row.display_name,
        }
    }
}

#[ComplexObject]
impl User {
    /// Name shown for this user, preferring the one set for `leagueId` when given.
    async fn display_name(
        &self,
        ctx: &Context<'_>,
        league_id: Option<ID>,
    ) -> async_graphql::Result<Option<String>> {
        let Some(league_id) = league_id else {
            return Ok(self.default_display_name.clone());
        };

        let state = ctx.data::<AppState>()?;
        let user_id = parse_id(&self.id, "user")?;
        let league_id = parse_id(&league_id, "league")?;

        let membership = memberships::get(&state.db, user_id, league_id)
            .await
            .map_err(GqlError::from)?;

        Ok(membership
            .and_then(|m| m.display_name)
            .or_else(|| self.default_display_name.clone()))
    }

    async fn fantasy_leagues(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<FantasyLeague>> {
        let state = ctx.data::<AppState>()?;
        let user_id = parse_id(&self.id, "user")?;

        let rows = fantasy_leagues::list_for_user(&state.db, user_id)
            .await
            .map_err(GqlError::from)?;

        Ok(rows.into_iter().map(FantasyLeague::from).collect())
    }
}

#[derive(InputObject)]
pub struct CreateUserInput {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateUserPayload {
    pub user: Option<User>,
    pub errors: Option<Vec<MutationError>>,
}

impl CreateUserPayload {
    pub fn error(error: MutationError) -> Self {
        Self {
            user: None,
            errors: Some(vec![error]),
        }
    }
}
