use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, SimpleObject, ID};
use chrono::{DateTime, Utc};

use crate::gql::error::ResultExt;
use crate::gql::loaders::{TeamByShortNameLoader, TeamShortName};

#[derive(SimpleObject, Clone)]
pub struct SportsTeam {
    pub id: ID,
    pub name: String,
    pub short_name: String,
    pub sports_league: String,
    pub conference: Option<String>,
    pub division: Option<String>,
}

impl From<infra::models::SportsTeamRow> for SportsTeam {
    fn from(row: infra::models::SportsTeamRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            short_name: row.short_name,
            sports_league: row.sports_league,
            conference: row.conference,
            division: row.division,
        }
    }
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct SportsGameResult {
    pub away_team_score: i32,
    pub home_team_score: i32,
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct SportsGame {
    pub id: ID,
    pub sports_league: String,
    pub starts_at: DateTime<Utc>,
    pub season: i32,
    pub week: Option<i32>,
    #[graphql(skip)]
    pub away_team_short_name: String,
    #[graphql(skip)]
    pub home_team_short_name: String,
    #[graphql(skip)]
    pub away_team_score: Option<i32>,
    #[graphql(skip)]
    pub home_team_score: Option<i32>,
}

impl From<infra::models::SportsGameRow> for SportsGame {
    fn from(row: infra::models::SportsGameRow) -> Self {
        Self {
            id: row.id.into(),
            sports_league: row.sports_league,
            starts_at: row.start_time,
            season: row.season,
            week: row.week,
            away_team_short_name: row.away_team_short_name,
            home_team_short_name: row.home_team_short_name,
            away_team_score: row.away_team_score,
            home_team_score: row.home_team_score,
        }
    }
}

impl SportsGame {
    /// Final score, once both sides have one.
    pub fn final_result(&self) -> Option<SportsGameResult> {
        Some(SportsGameResult {
            away_team_score: self.away_team_score?,
            home_team_score: self.home_team_score?,
        })
    }

    async fn team_by_short_name(
        &self,
        ctx: &Context<'_>,
        short_name: &str,
    ) -> async_graphql::Result<Option<SportsTeam>> {
        let loader = ctx.data::<DataLoader<TeamByShortNameLoader>>()?;
        let key = TeamShortName {
            sports_league: self.sports_league.clone(),
            short_name: short_name.to_string(),
        };

        Ok(loader
            .load_one(key)
            .await
            .gql_err("Loading team failed")?
            .map(SportsTeam::from))
    }
}

#[ComplexObject]
impl SportsGame {
    async fn away_team(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<SportsTeam>> {
        self.team_by_short_name(ctx, &self.away_team_short_name).await
    }

    async fn home_team(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<SportsTeam>> {
        self.team_by_short_name(ctx, &self.home_team_short_name).await
    }

    async fn result(&self) -> Option<SportsGameResult> {
        self.final_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(away: Option<i32>, home: Option<i32>) -> SportsGame {
        SportsGame {
            id: ID::from("g1"),
            sports_league: "NFL".to_string(),
            starts_at: Utc::now(),
            season: 2024,
            week: Some(1),
            away_team_short_name: "KC".to_string(),
            home_team_short_name: "BAL".to_string(),
            away_team_score: away,
            home_team_score: home,
        }
    }

    #[test]
    fn result_requires_both_scores() {
        assert_eq!(game(None, None).final_result(), None);
        assert_eq!(game(Some(27), None).final_result(), None);
        assert_eq!(
            game(Some(27), Some(20)).final_result(),
            Some(SportsGameResult {
                away_team_score: 27,
                home_team_score: 20,
            })
        );
    }
}
