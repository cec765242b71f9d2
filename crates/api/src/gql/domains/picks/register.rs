use sqlx::PgConnection;
use thiserror::Error;

use infra::db::{self, Db};
use infra::models::PickRow;
use infra::repos::{picks, CreatePick};

use super::rules::GameModeRules;
use super::PickRequest;

#[derive(Debug, Error)]
pub enum RegisterError {
    /// Another transaction is registering picks for the same league, user and week.
    #[error("a concurrent submission for this week is in progress")]
    Conflict,

    #[error("database error: {0}")]
    Db(sqlx::Error),
}

impl From<sqlx::Error> for RegisterError {
    fn from(e: sqlx::Error) -> Self {
        if db::is_conflict(&e) {
            RegisterError::Conflict
        } else {
            RegisterError::Db(e)
        }
    }
}

/// Persist `request` under `rules` in a single transaction.
///
/// The (league, user, week) lock is claimed before the mode's `register` runs, so
/// every registered mode is serialized per key. Any failure drops the transaction,
/// which rolls back every invalidation and insert made by this call.
pub async fn apply(
    db: &Db,
    rules: &dyn GameModeRules,
    request: &PickRequest,
) -> Result<Vec<PickRow>, RegisterError> {
    let mut tx = db.begin().await?;

    lock_week(&mut *tx, request).await?;

    let created = rules.register(&mut *tx, request).await?;

    tx.commit().await?;

    tracing::info!(
        league_id = %request.league_id,
        user_id = %request.user_id,
        week = request.week,
        picks = created.len(),
        "Registered picks"
    );

    Ok(created)
}

/// Claim the transaction-scoped lock for the request's (league, user, week).
///
/// A second transaction for the same key fails fast with [`RegisterError::Conflict`]
/// instead of waiting; different keys never wait on each other.
pub async fn lock_week(conn: &mut PgConnection, request: &PickRequest) -> Result<(), RegisterError> {
    let locked =
        picks::try_lock_week(&mut *conn, request.league_id, request.user_id, request.week).await?;
    if !locked {
        tracing::debug!(
            league_id = %request.league_id,
            user_id = %request.user_id,
            week = request.week,
            "Pick registration already in progress for this week"
        );
        return Err(RegisterError::Conflict);
    }
    Ok(())
}

/// Invalidate the current picks for the request's (league, user, week) and insert
/// one pick per requested team, in request order.
///
/// Runs inside the transaction opened by [`apply`], after the week lock is held.
pub async fn replace_week_picks(
    conn: &mut PgConnection,
    request: &PickRequest,
) -> Result<Vec<PickRow>, RegisterError> {
    let superseded = picks::invalidate_current_for_week(
        &mut *conn,
        request.league_id,
        request.user_id,
        request.week,
    )
    .await?;

    if superseded > 0 {
        tracing::debug!(
            league_id = %request.league_id,
            user_id = %request.user_id,
            week = request.week,
            superseded,
            "Invalidated previous picks"
        );
    }

    let mut created = Vec::with_capacity(request.team_ids.len());
    for team_id in &request.team_ids {
        let row = picks::create(
            &mut *conn,
            CreatePick {
                league_id: request.league_id,
                user_id: request.user_id,
                team_id: *team_id,
                week: request.week,
            },
        )
        .await?;
        created.push(row);
    }

    Ok(created)
}
