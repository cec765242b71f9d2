mod common;

use api::gql::domains::picks::register::{self, RegisterError};
use api::gql::domains::picks::types::{PickErrorKind, SubmissionStatus};
use api::gql::domains::picks::validator::ValidationError;
use api::gql::domains::picks::{submit, GameModeRules, PickRequest, RuleTable, SubmissionResult};
use common::*;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use infra::db::Db;
use infra::models::PickRow;
use infra::repos::{picks, CreatePick};
use sqlx::PgConnection;
use uuid::Uuid;

/// One team per week under `tag`, no reuse check.
struct OneTeamRules {
    tag: &'static str,
}

impl GameModeRules for OneTeamRules {
    fn tag(&self) -> &str {
        self.tag
    }

    fn validate<'a>(
        &'a self,
        _db: &'a Db,
        request: &'a PickRequest,
    ) -> BoxFuture<'a, Result<(), ValidationError>> {
        async move {
            if request.team_ids.len() != 1 {
                return Err(ValidationError::InvalidSelection(
                    "Exactly one team must be picked".to_string(),
                ));
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
        async move {
            picks::invalidate_current_for_week(
                &mut *conn,
                request.league_id,
                request.user_id,
                request.week,
            )
            .await?;

            let row = picks::create(
                &mut *conn,
                CreatePick {
                    league_id: request.league_id,
                    user_id: request.user_id,
                    team_id: request.team_ids[0],
                    week: request.week,
                },
            )
            .await?;

            Ok(vec![row])
        }
        .boxed()
    }
}

fn expect_picks(result: &SubmissionResult) -> Vec<Uuid> {
    match result {
        SubmissionResult::Picks(rows) => rows.iter().map(|p| p.team_id).collect(),
        SubmissionResult::Errors(errors) => panic!("Submission should succeed: {:?}", errors),
    }
}

fn expect_error_kind(result: &SubmissionResult) -> PickErrorKind {
    match result {
        SubmissionResult::Picks(rows) => panic!("Submission should fail, created {:?}", rows),
        SubmissionResult::Errors(errors) => {
            assert_eq!(errors.len(), 1, "Expected a single error: {:?}", errors);
            errors[0].kind
        }
    }
}

#[tokio::test]
async fn test_first_submission_creates_current_picks() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "first").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b] = create_test_teams::<2>(&app_state).await;

    let result = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await;

    // Created picks come back in request order
    assert_eq!(expect_picks(&result), vec![a, b]);
    assert_eq!(result.status(), SubmissionStatus::Committed);
    assert!(result.errors().is_none());

    assert_eq!(current_teams(&app_state, league_id, user_id, 1).await, sorted(&[a, b]));
    for pick in result.picks().unwrap() {
        assert!(pick.invalidated_at.is_none());
        assert_eq!(pick.league_id, league_id);
        assert_eq!(pick.user_id, user_id);
        assert_eq!(pick.week, 1);
    }
}

#[tokio::test]
async fn test_resubmission_supersedes_previous_week_picks() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "supersede").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c, d] = create_test_teams::<4>(&app_state).await;

    let first = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await;
    expect_picks(&first);
    let second = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[c, d], 1)).await;
    expect_picks(&second);

    assert_eq!(current_teams(&app_state, league_id, user_id, 1).await, sorted(&[c, d]));

    // Superseded picks stay retrievable with an invalidation timestamp
    let history = all_picks(&app_state, league_id, user_id).await;
    assert_eq!(history.len(), 4);
    for pick in &history {
        if pick.team_id == a || pick.team_id == b {
            assert!(pick.invalidated_at.is_some(), "First picks should be superseded");
        } else {
            assert!(pick.invalidated_at.is_none(), "Second picks should be current");
        }
    }
}

#[tokio::test]
async fn test_same_week_resubmission_may_keep_a_team() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "sameweek").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c] = create_test_teams::<3>(&app_state).await;

    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 4)).await);

    let result = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, c], 4)).await;

    assert_eq!(expect_picks(&result), vec![a, c]);
    assert_eq!(current_teams(&app_state, league_id, user_id, 4).await, sorted(&[a, c]));
}

#[tokio::test]
async fn test_team_used_in_another_week_is_rejected() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "reuse").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c] = create_test_teams::<3>(&app_state).await;

    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await);

    let result = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[c, b], 2)).await;

    assert_eq!(expect_error_kind(&result), PickErrorKind::TeamAlreadyUsed);
    assert_eq!(result.status(), SubmissionStatus::Rejected);
    assert_eq!(result.errors().unwrap()[0].team_id, Some(b));
    assert!(current_teams(&app_state, league_id, user_id, 2).await.is_empty());
}

#[tokio::test]
async fn test_reuse_rule_is_scoped_to_user_and_league() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "scope-a").await;
    let other_user = create_test_user(&app_state, "scope-b").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let other_league = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c] = create_test_teams::<3>(&app_state).await;

    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await);

    // Another user in the same league may pick the same team
    expect_picks(&submit(&app_state.db, &rules, pick_request(other_user, league_id, &[a, c], 2)).await);

    // The same user in another league may pick it as well
    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, other_league, &[a, c], 2)).await);
}

#[tokio::test]
async fn test_team_freed_by_supersession_can_be_used_elsewhere() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "freed").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c, d] = create_test_teams::<4>(&app_state).await;

    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await);
    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, league_id, &[c, d], 1)).await);

    // `a` only appears in a superseded week-1 pick now
    let result = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 2)).await;
    assert_eq!(expect_picks(&result), vec![a, b]);
}

#[tokio::test]
async fn test_unknown_league_is_rejected() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "noleague").await;
    let [a, b] = create_test_teams::<2>(&app_state).await;

    let result = submit(
        &app_state.db,
        &rules,
        pick_request(user_id, Uuid::new_v4(), &[a, b], 1),
    )
    .await;

    assert_eq!(expect_error_kind(&result), PickErrorKind::LeagueNotFound);
    assert_eq!(result.status(), SubmissionStatus::Rejected);
}

#[tokio::test]
async fn test_modes_without_rules_are_unsupported() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "mode").await;
    let [a, b] = create_test_teams::<2>(&app_state).await;

    for tag in ["SURVIVOR", "STREAKIN", "KNOCKOUT"] {
        let league_id = create_test_league(&app_state, user_id, tag).await;
        let result = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await;

        assert_eq!(expect_error_kind(&result), PickErrorKind::UnsupportedMode);
        assert!(result.errors().unwrap()[0].message.contains(tag));
        assert!(all_picks(&app_state, league_id, user_id).await.is_empty());
    }
}

#[tokio::test]
async fn test_selection_shape_is_enforced() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "shape").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c] = create_test_teams::<3>(&app_state).await;

    for (teams, week) in [
        (vec![a], 1),
        (vec![a, b, c], 1),
        (vec![a, a], 1),
        (vec![a, b], 0),
    ] {
        let result = submit(&app_state.db, &rules, pick_request(user_id, league_id, &teams, week)).await;
        assert_eq!(expect_error_kind(&result), PickErrorKind::InvalidSelection);
    }

    assert!(all_picks(&app_state, league_id, user_id).await.is_empty());
}

#[tokio::test]
async fn test_rejected_submissions_do_not_touch_stored_picks() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "untouched").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c] = create_test_teams::<3>(&app_state).await;

    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await);
    let before = all_picks(&app_state, league_id, user_id).await;

    let rejected = [
        pick_request(user_id, league_id, &[a, c], 2),
        pick_request(user_id, league_id, &[c], 1),
        pick_request(user_id, Uuid::new_v4(), &[a, c], 1),
    ];
    for request in rejected {
        let result = submit(&app_state.db, &rules, request).await;
        assert_eq!(result.status(), SubmissionStatus::Rejected);
    }

    let after = all_picks(&app_state, league_id, user_id).await;
    let snapshot = |rows: &[PickRow]| {
        let mut rows: Vec<_> = rows.iter().map(|p| (p.id, p.invalidated_at)).collect();
        rows.sort();
        rows
    };
    assert_eq!(snapshot(&before), snapshot(&after));
}

#[tokio::test]
async fn test_failed_insert_rolls_back_whole_submission() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "atomic").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c] = create_test_teams::<3>(&app_state).await;

    expect_picks(&submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await);
    let before = all_picks(&app_state, league_id, user_id).await;

    // The second team does not exist, so the second insert violates the foreign key
    // after the invalidation and the first insert already ran.
    let missing_team = Uuid::new_v4();
    let result = submit(
        &app_state.db,
        &rules,
        pick_request(user_id, league_id, &[c, missing_team], 1),
    )
    .await;

    assert_eq!(expect_error_kind(&result), PickErrorKind::RegistrationFailed);
    assert_eq!(result.status(), SubmissionStatus::RolledBack);

    assert_eq!(current_teams(&app_state, league_id, user_id, 1).await, sorted(&[a, b]));
    let after = all_picks(&app_state, league_id, user_id).await;
    assert_eq!(after.len(), before.len());
    assert!(after.iter().all(|p| p.team_id != c));
    assert!(after.iter().all(|p| p.invalidated_at.is_none()));
}

#[tokio::test]
async fn test_overlapping_registrations_for_same_week_conflict() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();
    let mode_rules = rules.resolve("PICK_TWO").expect("PICK_TWO is registered");

    let user_id = create_test_user(&app_state, "race").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c, d] = create_test_teams::<4>(&app_state).await;

    let first_request = pick_request(user_id, league_id, &[a, b], 1);
    let second_request = pick_request(user_id, league_id, &[c, d], 1);

    // Same steps as `register::apply`, with the transaction left open
    let mut first_tx = app_state.db.begin().await.unwrap();
    register::lock_week(&mut *first_tx, &first_request)
        .await
        .expect("First registration should claim the week");
    mode_rules
        .register(&mut *first_tx, &first_request)
        .await
        .expect("First registration should proceed");

    let second = register::apply(&app_state.db, mode_rules.as_ref(), &second_request).await;
    assert!(
        matches!(second, Err(RegisterError::Conflict)),
        "Second registration should conflict: {:?}",
        second
    );

    first_tx.commit().await.unwrap();

    assert_eq!(current_teams(&app_state, league_id, user_id, 1).await, sorted(&[a, b]));
    assert_eq!(all_picks(&app_state, league_id, user_id).await.len(), 2);
}

#[tokio::test]
async fn test_open_registration_does_not_block_other_weeks() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();
    let mode_rules = rules.resolve("PICK_TWO").expect("PICK_TWO is registered");

    let user_id = create_test_user(&app_state, "otherweek").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c, d] = create_test_teams::<4>(&app_state).await;

    let week_one = pick_request(user_id, league_id, &[a, b], 1);
    let mut week_one_tx = app_state.db.begin().await.unwrap();
    register::lock_week(&mut *week_one_tx, &week_one)
        .await
        .expect("Week 1 registration should claim the week");
    mode_rules
        .register(&mut *week_one_tx, &week_one)
        .await
        .expect("Week 1 registration should proceed");

    // Week 1 is still uncommitted and locked
    let week_two = register::apply(
        &app_state.db,
        mode_rules.as_ref(),
        &pick_request(user_id, league_id, &[c, d], 2),
    )
    .await;
    assert!(week_two.is_ok(), "Other weeks must not wait: {:?}", week_two.err());

    week_one_tx.commit().await.unwrap();

    assert_eq!(current_teams(&app_state, league_id, user_id, 1).await, sorted(&[a, b]));
    assert_eq!(current_teams(&app_state, league_id, user_id, 2).await, sorted(&[c, d]));
}

#[tokio::test]
async fn test_concurrent_submissions_leave_one_current_set() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "concurrent").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c, d] = create_test_teams::<4>(&app_state).await;

    let (first, second) = tokio::join!(
        submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)),
        submit(&app_state.db, &rules, pick_request(user_id, league_id, &[c, d], 1)),
    );

    let committed: Vec<_> = [&first, &second]
        .into_iter()
        .filter(|r| r.status() == SubmissionStatus::Committed)
        .collect();
    assert!(!committed.is_empty(), "At least one submission should commit");

    for result in [&first, &second] {
        assert!(matches!(
            result.status(),
            SubmissionStatus::Committed | SubmissionStatus::RolledBack
        ));
    }

    let current = current_teams(&app_state, league_id, user_id, 1).await;
    assert!(
        current == sorted(&[a, b]) || current == sorted(&[c, d]),
        "Exactly one pick set should be current, got {:?}",
        current
    );
}

#[tokio::test]
async fn test_end_to_end_season() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default();

    let user_id = create_test_user(&app_state, "season").await;
    let league_id = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let [a, b, c, d] = create_test_teams::<4>(&app_state).await;

    let week_one = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await;
    assert_eq!(expect_picks(&week_one), vec![a, b]);

    let reused = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, c], 2)).await;
    assert_eq!(expect_error_kind(&reused), PickErrorKind::TeamAlreadyUsed);
    assert_eq!(reused.errors().unwrap()[0].team_id, Some(a));

    let week_two = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[c, d], 2)).await;
    assert_eq!(expect_picks(&week_two), vec![c, d]);

    assert_eq!(current_teams(&app_state, league_id, user_id, 1).await, sorted(&[a, b]));
    assert_eq!(current_teams(&app_state, league_id, user_id, 2).await, sorted(&[c, d]));
}

#[tokio::test]
async fn test_registered_mode_accepts_picks() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default().with(OneTeamRules { tag: "SURVIVOR" });

    let user_id = create_test_user(&app_state, "survivor").await;
    let league_id = create_test_league(&app_state, user_id, "SURVIVOR").await;
    let [a, b] = create_test_teams::<2>(&app_state).await;

    let rejected = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a, b], 1)).await;
    assert_eq!(expect_error_kind(&rejected), PickErrorKind::InvalidSelection);

    let result = submit(&app_state.db, &rules, pick_request(user_id, league_id, &[a], 1)).await;
    assert_eq!(expect_picks(&result), vec![a]);

    // PICK_TWO leagues keep their own rules
    let pick_two = create_test_league(&app_state, user_id, "PICK_TWO").await;
    let result = submit(&app_state.db, &rules, pick_request(user_id, pick_two, &[a], 1)).await;
    assert_eq!(expect_error_kind(&result), PickErrorKind::InvalidSelection);
}

#[tokio::test]
async fn test_week_lock_covers_registered_modes() {
    let app_state = setup_test_db().await;
    let rules = RuleTable::default().with(OneTeamRules { tag: "SURVIVOR" });
    let mode_rules = rules.resolve("SURVIVOR").expect("SURVIVOR is registered");

    let user_id = create_test_user(&app_state, "custom-race").await;
    let league_id = create_test_league(&app_state, user_id, "SURVIVOR").await;
    let [a, b] = create_test_teams::<2>(&app_state).await;

    let first_request = pick_request(user_id, league_id, &[a], 1);
    let mut first_tx = app_state.db.begin().await.unwrap();
    register::lock_week(&mut *first_tx, &first_request)
        .await
        .expect("First registration should claim the week");
    mode_rules
        .register(&mut *first_tx, &first_request)
        .await
        .expect("First registration should proceed");

    // The mode's own register takes no lock; apply must still refuse the overlap
    let second = register::apply(
        &app_state.db,
        mode_rules.as_ref(),
        &pick_request(user_id, league_id, &[b], 1),
    )
    .await;
    assert!(
        matches!(second, Err(RegisterError::Conflict)),
        "Overlapping registration should conflict: {:?}",
        second
    );

    first_tx.commit().await.unwrap();

    assert_eq!(current_teams(&app_state, league_id, user_id, 1).await, vec![a]);
    assert_eq!(all_picks(&app_state, league_id, user_id).await.len(), 1);
}

#[tokio::test]
async fn test_new_tag_accepts_picks_once_registered() {
    let app_state = setup_test_db().await;

    let user_id = create_test_user(&app_state, "knockout").await;
    let league_id = create_test_league(&app_state, user_id, "KNOCKOUT").await;
    let [a] = create_test_teams::<1>(&app_state).await;
    let request = || pick_request(user_id, league_id, &[a], 1);

    let before = submit(&app_state.db, &RuleTable::default(), request()).await;
    assert_eq!(expect_error_kind(&before), PickErrorKind::UnsupportedMode);

    let rules = RuleTable::default().with(OneTeamRules { tag: "KNOCKOUT" });
    let after = submit(&app_state.db, &rules, request()).await;
    assert_eq!(expect_picks(&after), vec![a]);
}
