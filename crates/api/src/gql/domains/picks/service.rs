use uuid::Uuid;

use infra::db::Db;
use infra::models::PickRow;

use super::register::{self, RegisterError};
use super::rules::RuleTable;
use super::types::{PickErrorKind, SubmissionStatus};
use super::validator::{self, ValidationError};
use super::PickRequest;
use crate::gql::common::types::{
    ERR_INVALID_INPUT, ERR_NOT_FOUND, ERR_UNKNOWN, ERR_UNSUPPORTED_MODE,
};

pub const MSG_LEAGUE_NOT_FOUND: &str = "The specified fantasy league does not exist.";
pub const MSG_REGISTRATION_FAILED: &str = "Storing the pick failed. Please retry.";

/// Externally visible failure of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionError {
    pub kind: PickErrorKind,
    pub code: &'static str,
    pub message: String,
    /// Offending team, set for `TeamAlreadyUsed`.
    pub team_id: Option<Uuid>,
    /// Set when the failure happened inside the registration transaction.
    rolled_back: bool,
}

impl SubmissionError {
    fn new(kind: PickErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            team_id: None,
            rolled_back: false,
        }
    }

    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::new(PickErrorKind::InvalidSelection, ERR_INVALID_INPUT, message)
    }

    /// Storage failed before anything was written.
    pub fn storage_unavailable() -> Self {
        Self::new(
            PickErrorKind::RegistrationFailed,
            ERR_UNKNOWN,
            MSG_REGISTRATION_FAILED,
        )
    }

    /// The registration transaction failed and was rolled back.
    pub fn registration_failed() -> Self {
        Self {
            rolled_back: true,
            ..Self::storage_unavailable()
        }
    }

    pub fn rolled_back(&self) -> bool {
        self.rolled_back
    }
}

impl From<ValidationError> for SubmissionError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::LeagueNotFound(_) => Self::new(
                PickErrorKind::LeagueNotFound,
                ERR_NOT_FOUND,
                MSG_LEAGUE_NOT_FOUND,
            ),
            ValidationError::UnsupportedMode(mode) => Self::new(
                PickErrorKind::UnsupportedMode,
                ERR_UNSUPPORTED_MODE,
                format!("Game mode {} does not accept picks.", mode.0),
            ),
            ValidationError::TeamAlreadyUsed { team_id, week } => Self {
                team_id: Some(team_id),
                ..Self::new(
                    PickErrorKind::TeamAlreadyUsed,
                    ERR_INVALID_INPUT,
                    format!("Team {team_id} has already been picked in week {week}."),
                )
            },
            ValidationError::InvalidSelection(reason) => Self::invalid_selection(reason),
            ValidationError::Db(e) => {
                tracing::error!("Database error while validating pick: {e}");
                Self::storage_unavailable()
            }
        }
    }
}

impl From<RegisterError> for SubmissionError {
    fn from(err: RegisterError) -> Self {
        match &err {
            RegisterError::Conflict => {
                tracing::warn!("Pick registration lost a concurrent submission: {err}")
            }
            RegisterError::Db(e) => tracing::error!("Database error while registering pick: {e}"),
        }
        Self::registration_failed()
    }
}

/// Outcome of one submission: the created picks, or the reasons it failed.
#[derive(Debug, Clone)]
pub enum SubmissionResult {
    Picks(Vec<PickRow>),
    Errors(Vec<SubmissionError>),
}

impl SubmissionResult {
    pub fn picks(&self) -> Option<&[PickRow]> {
        match self {
            SubmissionResult::Picks(picks) => Some(picks),
            SubmissionResult::Errors(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&[SubmissionError]> {
        match self {
            SubmissionResult::Picks(_) => None,
            SubmissionResult::Errors(errors) => Some(errors),
        }
    }

    /// Terminal state the submission ended in. Storage failures during validation
    /// are `Rejected`: they carry the retryable `RegistrationFailed` kind, but nothing
    /// reached the registration transaction.
    pub fn status(&self) -> SubmissionStatus {
        match self {
            SubmissionResult::Picks(_) => SubmissionStatus::Committed,
            SubmissionResult::Errors(errors) if errors.iter().any(SubmissionError::rolled_back) => {
                SubmissionStatus::RolledBack
            }
            SubmissionResult::Errors(_) => SubmissionStatus::Rejected,
        }
    }
}

/// Validate `request` and, when legal, register it.
///
/// Storage is untouched unless validation passes. Nothing is retried here: a
/// `RolledBack` result is safe to resubmit unchanged.
pub async fn submit(db: &Db, rules: &RuleTable, request: PickRequest) -> SubmissionResult {
    tracing::debug!(
        league_id = %request.league_id,
        user_id = %request.user_id,
        week = request.week,
        "Validating pick submission"
    );

    let mode_rules = match validator::validate(db, rules, &request).await {
        Ok(mode_rules) => mode_rules,
        Err(err) => {
            tracing::info!(
                league_id = %request.league_id,
                user_id = %request.user_id,
                week = request.week,
                "Rejected pick submission: {err}"
            );
            return SubmissionResult::Errors(vec![err.into()]);
        }
    };

    match register::apply(db, mode_rules.as_ref(), &request).await {
        Ok(picks) => SubmissionResult::Picks(picks),
        Err(err) => SubmissionResult::Errors(vec![err.into()]),
    }
}
