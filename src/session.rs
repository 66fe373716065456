//! Match rooms for the REST server.
//!
//! Each room owns one [`GameSession`] plus the things the player sees around
//! it: a scoreboard that survives resets, the cat's last remark and the last
//! promo code the rewards service handed out.

use crate::mascot::{self, CatLine};
use crate::reporter::ResultReporter;
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use whisker_tictactoe::{
    Board, GameError, GameSession, Mark, MatchResult, MoveError, MovePolicy, NoLegalMoveError,
    Outcome, Placement, SessionState, Square,
};

/// Unique identifier for a match room.
pub type SessionId = String;

/// Wins, losses and draws across every match played in a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize)]
pub struct Scoreboard {
    /// Matches the player won.
    player: u32,
    /// Matches the computer won.
    computer: u32,
    /// Drawn matches.
    draw: u32,
}

impl Scoreboard {
    /// Counts one finished match.
    pub fn record(&mut self, result: MatchResult) {
        match result {
            MatchResult::PlayerWins => self.player += 1,
            MatchResult::ComputerWins => self.computer += 1,
            MatchResult::Draw => self.draw += 1,
        }
    }
}

/// One player's table: the current match and its surroundings.
#[derive(Debug, Clone, Default)]
pub struct MatchRoom {
    session: GameSession,
    scoreboard: Scoreboard,
    cat: Option<CatLine>,
    promo_code: Option<String>,
    already_has_promo: bool,
}

/// What a client sees of a room.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct RoomView {
    /// Room identifier.
    id: SessionId,
    /// Nine squares: `"X"`, `"O"` or null.
    board: Vec<Option<&'static str>>,
    /// Whose turn, or the final result.
    state: SessionState,
    /// Outcome derived from the board.
    outcome: Outcome,
    /// Totals for this room.
    scoreboard: Scoreboard,
    /// The cat's remark on the last finished match, cleared on reset.
    cat: Option<CatLine>,
    /// Last promo code received from the rewards service.
    promo_code: Option<String>,
    /// The rewards service said a code was already issued earlier.
    already_has_promo: bool,
}

fn board_cells(board: &Board) -> Vec<Option<&'static str>> {
    board
        .squares()
        .iter()
        .map(|square| match square {
            Square::Empty => None,
            Square::Occupied(Mark::Player) => Some("X"),
            Square::Occupied(Mark::Computer) => Some("O"),
        })
        .collect()
}

impl MatchRoom {
    fn view(&self, id: &str) -> RoomView {
        let snapshot = self.session.snapshot();
        RoomView {
            id: id.to_string(),
            board: board_cells(snapshot.board()),
            state: *snapshot.state(),
            outcome: *snapshot.outcome(),
            scoreboard: self.scoreboard,
            cat: self.cat.clone(),
            promo_code: self.promo_code.clone(),
            already_has_promo: self.already_has_promo,
        }
    }

    fn finish<R: Rng + ?Sized>(&mut self, result: MatchResult, rng: &mut R) {
        self.scoreboard.record(result);
        self.cat = Some(mascot::react(result, rng));
    }
}

/// Errors from room operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// No room with that id.
    #[display("Session {} not found", _0)]
    #[from(skip)]
    NotFound(#[error(not(source))] SessionId),
    /// The move was rejected by the state machine.
    #[display("{}", _0)]
    IllegalMove(MoveError),
    /// The engine was asked to move on a full board.
    #[display("{}", _0)]
    NoLegalMove(NoLegalMoveError),
}

/// Flattens the computer-path wrapper into the room error.
impl From<GameError> for SessionError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::IllegalMove(e) => SessionError::IllegalMove(e),
            GameError::NoLegalMove(e) => SessionError::NoLegalMove(e),
        }
    }
}

/// Manages all match rooms.
#[derive(Clone)]
pub struct SessionManager {
    rooms: Arc<Mutex<HashMap<SessionId, Arc<Mutex<MatchRoom>>>>>,
    policy: MovePolicy,
    computer_delay: Duration,
    reporter: Arc<dyn ResultReporter>,
    rng: Arc<Mutex<SmallRng>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("policy", &self.policy)
            .field("computer_delay", &self.computer_delay)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a session manager with an entropy-seeded generator.
    #[instrument(skip(reporter))]
    pub fn new(
        policy: MovePolicy,
        computer_delay: Duration,
        reporter: Arc<dyn ResultReporter>,
    ) -> Self {
        Self::with_rng(policy, computer_delay, reporter, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Creates a session manager with a given generator (seeded in tests).
    pub fn with_rng(
        policy: MovePolicy,
        computer_delay: Duration,
        reporter: Arc<dyn ResultReporter>,
        rng: SmallRng,
    ) -> Self {
        info!(mistake_chance = *policy.mistake_chance(), "Creating session manager");
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            policy,
            computer_delay,
            reporter,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Opens a new room with a fresh match.
    #[instrument(skip(self))]
    pub async fn create(&self) -> RoomView {
        let id = format!("{:016x}", self.rng.lock().await.random::<u64>());
        let room = MatchRoom::default();
        let view = room.view(&id);
        self.rooms
            .lock()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(room)));
        info!(session_id = %id, "Created new session");
        view
    }

    /// Lists all room ids.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Vec<SessionId> {
        self.rooms.lock().await.keys().cloned().collect()
    }

    /// Current view of a room.
    #[instrument(skip(self))]
    pub async fn view(&self, id: &str) -> Result<RoomView, SessionError> {
        let room = self.room(id).await?;
        let room = room.lock().await;
        Ok(room.view(id))
    }

    /// Places the player's mark. Returns the new view and whether the computer
    /// is now to move.
    #[instrument(skip(self))]
    pub async fn player_move(
        &self,
        id: &str,
        index: usize,
    ) -> Result<(RoomView, bool), SessionError> {
        let room = self.room(id).await?;
        let (placement, view) = {
            let mut room = room.lock().await;
            let placement = room.session.apply_player_move(index)?;
            if let Some(result) = placement.result {
                let mut rng = self.rng.lock().await;
                room.finish(result, &mut *rng);
            }
            (placement, room.view(id))
        };

        let computer_next = *view.state() == SessionState::AwaitingComputerMove;
        if let Some(result) = placement.result {
            self.report(&room, result).await;
            return Ok((self.view(id).await?, computer_next));
        }
        Ok((view, computer_next))
    }

    /// Runs the computer's turn: plan, wait the cosmetic delay, commit.
    ///
    /// Returns `Ok(None)` when the room was reset while waiting; the planned
    /// move is then dropped.
    #[instrument(skip(self))]
    pub async fn computer_turn(&self, id: &str) -> Result<Option<Placement>, SessionError> {
        let room = self.room(id).await?;

        let plan = {
            let room = room.lock().await;
            let mut rng = self.rng.lock().await;
            room.session
                .plan_computer_move(&self.policy, &mut *rng)
                .inspect_err(|e| {
                    if matches!(e, GameError::NoLegalMove(_)) {
                        error!(session_id = id, "Computer asked to move on a full board");
                    }
                })?
        };

        if !self.computer_delay.is_zero() {
            tokio::time::sleep(self.computer_delay).await;
        }

        let placement = {
            let mut room = room.lock().await;
            match room.session.commit_computer_move(plan) {
                Ok(placement) => {
                    if let Some(result) = placement.result {
                        let mut rng = self.rng.lock().await;
                        room.finish(result, &mut *rng);
                    }
                    placement
                }
                Err(MoveError::StalePlan) => {
                    debug!(session_id = id, "Room changed while computer was thinking");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        };

        if let Some(result) = placement.result {
            self.report(&room, result).await;
        }
        Ok(Some(placement))
    }

    /// Starts a fresh match in the room. The scoreboard is kept.
    #[instrument(skip(self))]
    pub async fn reset(&self, id: &str) -> Result<RoomView, SessionError> {
        let room = self.room(id).await?;
        let mut room = room.lock().await;
        room.session.reset();
        room.cat = None;
        Ok(room.view(id))
    }

    async fn room(&self, id: &str) -> Result<Arc<Mutex<MatchRoom>>, SessionError> {
        self.rooms.lock().await.get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound(id.to_string())
        })
    }

    async fn report(&self, room: &Mutex<MatchRoom>, result: MatchResult) {
        match self.reporter.report(result).await {
            Ok(receipt) => {
                let mut room = room.lock().await;
                if let Some(code) = receipt.promo_code() {
                    room.promo_code = Some(code.clone());
                }
                room.already_has_promo = *receipt.already_has_promo();
            }
            Err(e) => warn!(error = %e, %result, "Failed to report match result"),
        }
    }
}
