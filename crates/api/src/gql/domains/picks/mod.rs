pub mod register;
pub mod resolvers;
pub mod rules;
pub mod service;
pub mod types;
pub mod validator;

use uuid::Uuid;

pub use resolvers::{PickMutation, PickQuery};
pub use rules::{GameMode, GameModeRules, PickTwoRules, RuleTable};
pub use service::{submit, SubmissionError, SubmissionResult};

/// A proposed pick for one league and week. Teams are kept in the order the caller
/// sent them; created picks come back in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub user_id: Uuid,
    pub league_id: Uuid,
    pub team_ids: Vec<Uuid>,
    pub week: i32,
}
