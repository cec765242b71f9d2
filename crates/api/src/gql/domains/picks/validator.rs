use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use infra::db::Db;
use infra::models::PickRow;
use infra::repos::fantasy_leagues;

use super::rules::{GameModeRules, RuleTable, UnsupportedMode};
use super::PickRequest;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("fantasy league {0} not found")]
    LeagueNotFound(Uuid),

    #[error(transparent)]
    UnsupportedMode(#[from] UnsupportedMode),

    #[error("team {team_id} was already picked in week {week}")]
    TeamAlreadyUsed { team_id: Uuid, week: i32 },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("database error")]
    Db(#[from] sqlx::Error),
}

/// Decide whether `request` is a legal pick for its league's game mode.
///
/// Read-only. On success returns the rules of the league's mode so the caller can
/// register the pick under the same mode. The check is advisory: a concurrent
/// submission can still use a team between validation and registration.
pub async fn validate(
    db: &Db,
    rules: &RuleTable,
    request: &PickRequest,
) -> Result<Arc<dyn GameModeRules>, ValidationError> {
    let league = fantasy_leagues::get_by_id(db, request.league_id)
        .await?
        .ok_or(ValidationError::LeagueNotFound(request.league_id))?;

    let mode_rules = rules.resolve(&league.game_mode)?;

    mode_rules.validate(db, request).await?;

    Ok(mode_rules)
}

/// First historical pick whose team appears in `requested`, in history order.
pub fn find_reused_team<'h>(requested: &[Uuid], history: &'h [PickRow]) -> Option<&'h PickRow> {
    history
        .iter()
        .filter(|pick| pick.is_current())
        .find(|pick| requested.contains(&pick.team_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pick(team_id: Uuid, week: i32) -> PickRow {
        PickRow {
            id: Uuid::new_v4(),
            league_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            team_id,
            week,
            created_at: Utc::now(),
            invalidated_at: None,
        }
    }

    #[test]
    fn no_history_means_no_reuse() {
        assert!(find_reused_team(&[Uuid::new_v4()], &[]).is_none());
    }

    #[test]
    fn reports_the_reused_team_and_its_week() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let history = vec![pick(b, 1), pick(c, 1), pick(a, 2)];

        let used = find_reused_team(&[a, Uuid::new_v4()], &history).expect("a was used");
        assert_eq!(used.team_id, a);
        assert_eq!(used.week, 2);
    }

    #[test]
    fn superseded_picks_do_not_count() {
        let a = Uuid::new_v4();
        let mut old = pick(a, 1);
        old.invalidated_at = Some(Utc::now());

        assert!(find_reused_team(&[a], &[old]).is_none());
    }

    #[test]
    fn unsupported_mode_message_names_the_tag() {
        let err = ValidationError::from(UnsupportedMode("SURVIVOR".to_string()));
        assert_eq!(err.to_string(), "game mode SURVIVOR is not supported");
    }
}
