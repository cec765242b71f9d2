use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};

use super::loaders::{LeagueLoader, TeamByShortNameLoader, TeamLoader, UserLoader};
use super::{MutationRoot, QueryRoot};
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema and inject shared state (AppState) into the context.
pub fn build_schema(state: AppState) -> AppSchema {
    let user_loader = DataLoader::new(UserLoader::new(state.db.clone()), tokio::spawn);
    let league_loader = DataLoader::new(LeagueLoader::new(state.db.clone()), tokio::spawn);
    let team_loader = DataLoader::new(TeamLoader::new(state.db.clone()), tokio::spawn);
    let team_by_short_name_loader =
        DataLoader::new(TeamByShortNameLoader::new(state.db.clone()), tokio::spawn);

    let introspection_enabled = state.config().gql_introspection;

    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state) // AppState is Clone; available in resolvers via ctx.data::<AppState>()
    .data(user_loader)
    .data(league_loader)
    .data(team_loader)
    .data(team_by_short_name_loader)
    .limit_depth(15)
    .limit_complexity(200);

    if !introspection_enabled {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
