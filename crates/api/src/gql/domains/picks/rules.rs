use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_graphql::Enum;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use sqlx::PgConnection;
use thiserror::Error;

use infra::db::Db;
use infra::models::PickRow;
use infra::repos::picks;

use super::register::{replace_week_picks, RegisterError};
use super::validator::{find_reused_team, ValidationError};
use super::PickRequest;

/// Game-mode tags a league can be created with through the API. Stored leagues keep
/// the tag as text, so the rule table is keyed by tag rather than by this enum.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GameMode {
    /// Two distinct teams per week; a team can only be used once per season.
    PickTwo,
    Streakin,
    Survivor,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::PickTwo => PICK_TWO,
            GameMode::Streakin => "STREAKIN",
            GameMode::Survivor => "SURVIVOR",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("game mode {0} is not supported")]
pub struct UnsupportedMode(pub String);

/// Behaviour a game mode plugs into the submission pipeline.
///
/// `validate` runs outside the registration transaction and must not write.
/// `register` runs inside it, after the (league, user, week) lock is held, and
/// replaces the current pick set for that key.
pub trait GameModeRules: Send + Sync {
    /// Tag stored on leagues using this mode, e.g. `PICK_TWO`.
    fn tag(&self) -> &str;

    fn validate<'a>(
        &'a self,
        db: &'a Db,
        request: &'a PickRequest,
    ) -> BoxFuture<'a, Result<(), ValidationError>>;

    fn register<'a>(
        &'a self,
        conn: &'a mut PgConnection,
        request: &'a PickRequest,
    ) -> BoxFuture<'a, Result<Vec<PickRow>, RegisterError>>;
}

/// Registry of game modes that accept picks, keyed by tag.
#[derive(Clone)]
pub struct RuleTable {
    entries: HashMap<String, Arc<dyn GameModeRules>>,
}

impl RuleTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `rules` under its tag, replacing any rules already registered for it.
    pub fn with(mut self, rules: impl GameModeRules + 'static) -> Self {
        self.entries.insert(rules.tag().to_string(), Arc::new(rules));
        self
    }

    pub fn resolve(&self, tag: &str) -> Result<Arc<dyn GameModeRules>, UnsupportedMode> {
        self.entries
            .get(tag)
            .cloned()
            .ok_or_else(|| UnsupportedMode(tag.to_string()))
    }

    pub fn supports(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::empty().with(PickTwoRules)
    }
}

pub const PICK_TWO: &str = "PICK_TWO";
pub const PICK_TWO_TEAM_COUNT: usize = 2;

/// `PICK_TWO`: exactly two distinct teams each week, never a team already used in
/// another week of the same league.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickTwoRules;

impl PickTwoRules {
    pub fn check_selection(request: &PickRequest) -> Result<(), ValidationError> {
        if request.week < 1 {
            return Err(ValidationError::InvalidSelection(format!(
                "Week must be 1 or later, got {}",
                request.week
            )));
        }

        if request.team_ids.len() != PICK_TWO_TEAM_COUNT {
            return Err(ValidationError::InvalidSelection(format!(
                "Exactly {} teams must be picked, got {}",
                PICK_TWO_TEAM_COUNT,
                request.team_ids.len()
            )));
        }

        if request.team_ids[0] == request.team_ids[1] {
            return Err(ValidationError::InvalidSelection(
                "The same team cannot be picked twice in one week".to_string(),
            ));
        }

        Ok(())
    }
}

impl GameModeRules for PickTwoRules {
    fn tag(&self) -> &str {
        PICK_TWO
    }

    fn validate<'a>(
        &'a self,
        db: &'a Db,
        request: &'a PickRequest,
    ) -> BoxFuture<'a, Result<(), ValidationError>> {
        async move {
            Self::check_selection(request)?;

            let history = picks::list_current_outside_week(
                db,
                request.league_id,
                request.user_id,
                request.week,
            )
            .await?;

            if let Some(used) = find_reused_team(&request.team_ids, &history) {
                return Err(ValidationError::TeamAlreadyUsed {
                    team_id: used.team_id,
                    week: used.week,
                });
            }

            Ok(())
        }
        .boxed()
    }

    fn register<'a>(
        &'a self,
        conn: &'a mut PgConnection,
        request: &'a PickRequest,
    ) -> BoxFuture<'a, Result<Vec<PickRow>, RegisterError>> {
        replace_week_picks(conn, request).boxed()
    }
}
