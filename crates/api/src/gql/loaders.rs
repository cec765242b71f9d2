use async_graphql::dataloader::Loader;
use infra::{
    db::Db,
    models::{FantasyLeagueRow, SportsTeamRow, UserRow},
    repos::{fantasy_leagues, sports_teams, users},
};
use std::{collections::HashMap, future::Future, sync::Arc};
use uuid::Uuid;

// UserLoader - batch load users by ID
#[derive(Clone)]
pub struct UserLoader {
    pool: Db,
}

impl UserLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for UserLoader {
    type Value = UserRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = users::list_by_ids(&pool, &ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

// LeagueLoader - batch load fantasy leagues by ID
#[derive(Clone)]
pub struct LeagueLoader {
    pool: Db,
}

impl LeagueLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for LeagueLoader {
    type Value = FantasyLeagueRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = fantasy_leagues::list_by_ids(&pool, &ids)
                .await
                .map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

// TeamLoader - batch load sports teams by ID
#[derive(Clone)]
pub struct TeamLoader {
    pool: Db,
}

impl TeamLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for TeamLoader {
    type Value = SportsTeamRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = sports_teams::list_by_ids(&pool, &ids)
                .await
                .map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

/// Natural key of a sports team, as referenced by games.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TeamShortName {
    pub sports_league: String,
    pub short_name: String,
}

// TeamByShortNameLoader - batch load sports teams by (league, short name)
#[derive(Clone)]
pub struct TeamByShortNameLoader {
    pool: Db,
}

impl TeamByShortNameLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<TeamShortName> for TeamByShortNameLoader {
    type Value = SportsTeamRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[TeamShortName],
    ) -> impl Future<Output = std::result::Result<HashMap<TeamShortName, Self::Value>, Self::Error>>
           + Send {
        let pool = self.pool.clone();
        let (sports_leagues, short_names): (Vec<String>, Vec<String>) = keys
            .iter()
            .map(|k| (k.sports_league.clone(), k.short_name.clone()))
            .unzip();

        async move {
            if short_names.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = sports_teams::list_by_short_names(&pool, &sports_leagues, &short_names)
                .await
                .map_err(Arc::new)?;

            Ok(rows
                .into_iter()
                .map(|r| {
                    let key = TeamShortName {
                        sports_league: r.sports_league.clone(),
                        short_name: r.short_name.clone(),
                    };
                    (key, r)
                })
                .collect())
        }
    }
}
