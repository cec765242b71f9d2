use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::domains::leagues::types::FantasyLeague;
use crate::gql::domains::sports::types::SportsTeam;
use crate::gql::domains::users::types::User;
use crate::gql::error::ResultExt;
use crate::gql::loaders::{LeagueLoader, TeamLoader, UserLoader};

use super::service::{SubmissionError, SubmissionResult};
use super::PickRequest;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PickErrorKind {
    LeagueNotFound,
    UnsupportedMode,
    TeamAlreadyUsed,
    InvalidSelection,
    /// Storage failed or lost a concurrent submission; resubmitting is safe.
    RegistrationFailed,
}

/// Terminal state of a submission.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SubmissionStatus {
    /// Validation failed, nothing was written.
    Rejected,
    Committed,
    /// Registration failed and was rolled back.
    RolledBack,
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Pick {
    pub id: ID,
    pub league_id: ID,
    pub user_id: ID,
    pub team_id: ID,
    pub week: i32,
    pub created_at: DateTime<Utc>,
    pub invalidated_at: Option<DateTime<Utc>>,
    pub is_invalidated: bool,
}

impl From<infra::models::PickRow> for Pick {
    fn from(row: infra::models::PickRow) -> Self {
        Self {
            id: row.id.into(),
            league_id: row.league_id.into(),
            user_id: row.user_id.into(),
            team_id: row.team_id.into(),
            week: row.week,
            created_at: row.created_at,
            is_invalidated: row.invalidated_at.is_some(),
            invalidated_at: row.invalidated_at,
        }
    }
}

#[ComplexObject]
impl Pick {
    async fn user(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let user_id = Uuid::parse_str(self.user_id.as_str()).gql_err("Invalid user ID")?;
        let loader = ctx.data::<DataLoader<UserLoader>>()?;

        Ok(loader
            .load_one(user_id)
            .await
            .gql_err("Loading user failed")?
            .map(User::from))
    }

    async fn league(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<FantasyLeague>> {
        let league_id = Uuid::parse_str(self.league_id.as_str()).gql_err("Invalid league ID")?;
        let loader = ctx.data::<DataLoader<LeagueLoader>>()?;

        Ok(loader
            .load_one(league_id)
            .await
            .gql_err("Loading league failed")?
            .map(FantasyLeague::from))
    }

    async fn team(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<SportsTeam>> {
        let team_id = Uuid::parse_str(self.team_id.as_str()).gql_err("Invalid team ID")?;
        let loader = ctx.data::<DataLoader<TeamLoader>>()?;

        Ok(loader
            .load_one(team_id)
            .await
            .gql_err("Loading team failed")?
            .map(SportsTeam::from))
    }
}

#[derive(InputObject)]
pub struct SubmitPickInput {
    pub user_id: ID,
    pub league_id: ID,
    pub team_ids: Vec<ID>,
    pub week: i32,
}

impl SubmitPickInput {
    pub fn into_request(self) -> Result<PickRequest, uuid::Error> {
        let team_ids = self
            .team_ids
            .iter()
            .map(|id| Uuid::parse_str(id.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PickRequest {
            user_id: Uuid::parse_str(self.user_id.as_str())?,
            league_id: Uuid::parse_str(self.league_id.as_str())?,
            team_ids,
            week: self.week,
        })
    }
}

#[derive(SimpleObject, Clone)]
pub struct PickError {
    pub kind: PickErrorKind,
    pub code: String,
    pub message: String,
    pub team_id: Option<ID>,
}

impl From<SubmissionError> for PickError {
    fn from(err: SubmissionError) -> Self {
        Self {
            kind: err.kind,
            code: err.code.to_string(),
            message: err.message,
            team_id: err.team_id.map(ID::from),
        }
    }
}

/// Exactly one of `picks` and `errors` is set.
#[derive(SimpleObject)]
pub struct SubmitPickPayload {
    pub status: SubmissionStatus,
    pub picks: Option<Vec<Pick>>,
    pub errors: Option<Vec<PickError>>,
}

impl From<SubmissionResult> for SubmitPickPayload {
    fn from(result: SubmissionResult) -> Self {
        let status = result.status();
        match result {
            SubmissionResult::Picks(rows) => Self {
                status,
                picks: Some(rows.into_iter().map(Pick::from).collect()),
                errors: None,
            },
            SubmissionResult::Errors(errors) => Self {
                status,
                picks: None,
                errors: Some(errors.into_iter().map(PickError::from).collect()),
            },
        }
    }
}
