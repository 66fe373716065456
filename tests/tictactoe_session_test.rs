//! Tests for the match state machine.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use whisker_games::{
    Board, GameError, GameSession, MatchResult, MoveError, MovePolicy, Outcome, SessionState,
};

/// Player plays the first free square; the computer answers until the match ends.
fn play_out(session: &mut GameSession, policy: &MovePolicy, rng: &mut SmallRng) -> MatchResult {
    loop {
        match session.state() {
            SessionState::AwaitingPlayerMove => {
                let index = session.board().legal_moves()[0];
                session.apply_player_move(index).unwrap();
            }
            SessionState::AwaitingComputerMove => {
                session.request_computer_move(policy, rng).unwrap();
            }
            SessionState::Finished(result) => return result,
        }
    }
}

#[test]
fn test_full_match_reaches_finished() {
    let policy = MovePolicy::perfect();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut session = GameSession::new();

    let result = play_out(&mut session, &policy, &mut rng);

    // A perfect engine never loses.
    assert_ne!(result, MatchResult::PlayerWins);
    assert_eq!(session.snapshot().outcome(), &Outcome::from(result));
}

#[test]
fn test_finished_match_rejects_everything() {
    let policy = MovePolicy::perfect();
    let mut rng = SmallRng::seed_from_u64(9);
    let mut session = GameSession::new();
    play_out(&mut session, &policy, &mut rng);

    let board: Board = *session.board();
    let state = session.state();
    let revision = session.revision();

    for index in 0..9 {
        assert_eq!(session.apply_player_move(index), Err(MoveError::GameOver));
    }
    assert_eq!(
        session.request_computer_move(&policy, &mut rng),
        Err(GameError::IllegalMove(MoveError::GameOver))
    );

    assert_eq!(session.board(), &board);
    assert_eq!(session.state(), state);
    assert_eq!(session.revision(), revision);
}

#[test]
fn test_turn_order_enforced() {
    let policy = MovePolicy::perfect();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut session = GameSession::new();

    assert_eq!(
        session.request_computer_move(&policy, &mut rng),
        Err(GameError::IllegalMove(MoveError::NotYourTurn))
    );

    session.apply_player_move(4).unwrap();
    assert_eq!(session.apply_player_move(0), Err(MoveError::NotYourTurn));
    assert_eq!(session.state(), SessionState::AwaitingComputerMove);
}

#[test]
fn test_rejected_moves_leave_session_untouched() {
    let mut session = GameSession::new();
    session.apply_player_move(4).unwrap();
    let mut rng = SmallRng::seed_from_u64(5);
    session
        .request_computer_move(&MovePolicy::perfect(), &mut rng)
        .unwrap();

    let before = session.clone();
    assert_eq!(session.apply_player_move(4), Err(MoveError::SquareOccupied(4)));
    assert_eq!(session.apply_player_move(9), Err(MoveError::OutOfRange(9)));
    assert_eq!(session, before);
}

#[test]
fn test_reset_discards_planned_move() {
    let policy = MovePolicy::perfect();
    let mut rng = SmallRng::seed_from_u64(11);
    let mut session = GameSession::new();
    session.apply_player_move(0).unwrap();

    let plan = session.plan_computer_move(&policy, &mut rng).unwrap();
    session.reset();

    assert_eq!(session.commit_computer_move(plan), Err(MoveError::StalePlan));
    assert_eq!(session.board(), &Board::new());
    assert_eq!(session.state(), SessionState::AwaitingPlayerMove);
}

#[test]
fn test_center_opening_finishes_with_stored_result() {
    let mut session = GameSession::new();
    let mut rng = SmallRng::seed_from_u64(21);
    let policy = MovePolicy::default();

    session.apply_player_move(4).unwrap();
    session.request_computer_move(&policy, &mut rng).unwrap();
    let result = play_out(&mut session, &policy, &mut rng);

    assert_eq!(session.state(), SessionState::Finished(result));
    assert!(session.state().is_finished());
}
