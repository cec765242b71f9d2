use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FantasyLeagueRow {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    /// Raw game-mode tag; interpreted by the application rule table.
    pub game_mode: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MembershipRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub league_id: Uuid,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SportsTeamRow {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    pub sports_league: String,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SportsGameRow {
    pub id: Uuid,
    pub away_team_short_name: String,
    pub home_team_short_name: String,
    pub away_team_score: Option<i32>,
    pub home_team_score: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub season: i32,
    pub week: Option<i32>,
    pub sports_league: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PickRow {
    pub id: Uuid,
    pub league_id: Uuid,
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub week: i32,
    pub created_at: DateTime<Utc>,
    pub invalidated_at: Option<DateTime<Utc>>,
}

impl PickRow {
    /// A pick stays current until a later submission for the same week supersedes it.
    pub fn is_current(&self) -> bool {
        self.invalidated_at.is_none()
    }
}
