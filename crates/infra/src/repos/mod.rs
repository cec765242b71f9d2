pub mod fantasy_leagues;
pub mod memberships;
pub mod picks;
pub mod sports_games;
pub mod sports_teams;
pub mod users;

pub use fantasy_leagues::CreateFantasyLeague;
pub use picks::{CreatePick, PickFilter};
pub use sports_teams::CreateSportsTeam;
pub use users::CreateUserData;
