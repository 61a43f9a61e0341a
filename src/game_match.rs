//! Per-match turn loop.
//!
//! A [`GameMatch`] is owned by exactly one task. It is the only code that
//! touches its board, so the board needs no lock.

use strictly_tictactoe::{Board, Cell, Mark, Outcome};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, instrument, warn};

use crate::connection::{Connection, ConnectionError};
use crate::history::{ResultLog, ResultSummary};
use crate::protocol::{ServerMessage, parse_move};
use crate::registry::MatchId;

/// Seat at the table. The first seat plays X and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// First accepted connection.
    First,
    /// Second accepted connection.
    Second,
}

impl Slot {
    /// The other seat.
    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    /// Mark played from this seat.
    pub fn mark(self) -> Mark {
        match self {
            Slot::First => Mark::X,
            Slot::Second => Mark::O,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Turns are still being played.
    InProgress,
    /// A terminal outcome was reached and recorded.
    Finished(Outcome),
    /// A participant's connection failed; nothing was recorded.
    Aborted,
}

/// One seated participant.
#[derive(Debug)]
pub struct Participant<S> {
    name: String,
    conn: Connection<S>,
}

impl<S> Participant<S> {
    /// Seats a connection under a display name.
    pub fn new(conn: Connection<S>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conn,
        }
    }

    /// Display name as typed by the participant.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S> Participant<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    /// Closes the participant's connection.
    pub async fn close(&mut self) {
        self.conn.close().await;
    }
}

/// How a match ended, returned by [`GameMatch::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    /// Match id.
    pub id: MatchId,
    /// Terminal state, never [`MatchState::InProgress`].
    pub state: MatchState,
    /// Moves placed on the board.
    pub moves_applied: usize,
    /// Board at the end of the match.
    pub board: Board,
}

/// A running two-player match.
#[derive(Debug)]
pub struct GameMatch<S> {
    id: MatchId,
    board: Board,
    participants: [Participant<S>; 2],
    active: Slot,
    state: MatchState,
    moves_applied: usize,
    results: ResultLog,
}

impl<S> GameMatch<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    /// Creates a match with an empty board; `first` moves first as X.
    #[instrument(skip_all, fields(match_id = %id, player1 = %first.name(), player2 = %second.name()))]
    pub fn new(
        id: MatchId,
        first: Participant<S>,
        second: Participant<S>,
        results: ResultLog,
    ) -> Self {
        info!("Creating match");
        Self {
            id,
            board: Board::new(),
            participants: [first, second],
            active: Slot::First,
            state: MatchState::InProgress,
            moves_applied: 0,
            results,
        }
    }

    /// Match id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Seat whose move is awaited.
    pub fn active_slot(&self) -> Slot {
        self.active
    }

    /// Lifecycle state.
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Moves placed so far.
    pub fn moves_applied(&self) -> usize {
        self.moves_applied
    }

    /// Participant in `slot`.
    pub fn participant(&self, slot: Slot) -> &Participant<S> {
        &self.participants[slot.index()]
    }

    /// Plays turns until the match finishes or a connection fails.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub async fn run(mut self) -> MatchReport {
        info!("Match started");

        while self.state == MatchState::InProgress {
            match self.play_turn().await {
                Ok(None) => {}
                Ok(Some(outcome)) => self.finish(outcome).await,
                Err(e) => self.abort(e).await,
            }
        }

        info!(state = ?self.state, moves = self.moves_applied, "Match ended");
        MatchReport {
            id: self.id,
            state: self.state,
            moves_applied: self.moves_applied,
            board: self.board,
        }
    }

    /// Plays one turn: render to both, collect a valid move from the active
    /// seat, apply it, and evaluate.
    ///
    /// Returns the outcome if the move ended the game; otherwise the active
    /// seat has switched. Invalid input is answered and re-prompted inside
    /// this call, so it never changes the board or the seat.
    ///
    /// # Errors
    ///
    /// Any [`ConnectionError`] on either participant. The caller decides how
    /// to abort; [`GameMatch::run`] does so.
    #[instrument(skip(self), fields(match_id = %self.id, active = ?self.active))]
    pub async fn play_turn(&mut self) -> Result<Option<Outcome>, ConnectionError> {
        self.broadcast(&ServerMessage::Board(self.board.clone()))
            .await?;

        let cell = self.await_valid_move().await?;
        let mark = self.active.mark();
        self.board.apply_move(cell, mark);
        self.moves_applied += 1;
        debug!(row = cell.row(), col = cell.col(), %mark, "Move applied");

        let outcome = self.board.evaluate_outcome();
        if outcome.is_none() {
            self.active = self.active.other();
        }
        Ok(outcome)
    }

    async fn await_valid_move(&mut self) -> Result<Cell, ConnectionError> {
        let idx = self.active.index();
        loop {
            let conn = &mut self.participants[idx].conn;
            conn.send_message(&ServerMessage::TurnPrompt).await?;
            let line = conn.read_line().await?;

            let rejection = match parse_move(&line) {
                Ok(input) => match self.board.validate_move(input.row(), input.col()) {
                    Ok(cell) => return Ok(cell),
                    Err(e) => e.to_string(),
                },
                Err(e) => e.to_string(),
            };

            debug!(line = %line, reason = %rejection, "Move rejected");
            self.participants[idx]
                .conn
                .send_message(&ServerMessage::InvalidMove(rejection))
                .await?;
        }
    }

    async fn broadcast(&mut self, message: &ServerMessage) -> Result<(), ConnectionError> {
        for participant in &mut self.participants {
            participant.conn.send_message(message).await?;
        }
        Ok(())
    }

    /// Sends to everyone, ignoring individual failures.
    async fn notify_all(&mut self, message: &ServerMessage) {
        for participant in &mut self.participants {
            if let Err(e) = participant.conn.send_message(message).await {
                debug!(peer = participant.conn.peer(), error = %e, "Notification not delivered");
            }
        }
    }

    async fn close_all(&mut self) {
        for participant in &mut self.participants {
            participant.conn.close().await;
        }
    }

    #[instrument(skip(self), fields(match_id = %self.id))]
    async fn finish(&mut self, outcome: Outcome) {
        let summary = ResultSummary::completed(
            self.id.clone(),
            self.participants[0].name.clone(),
            self.participants[1].name.clone(),
            outcome,
            self.board.clone(),
        );
        self.results.append(summary).await;

        self.notify_all(&ServerMessage::Finished(outcome)).await;
        self.close_all().await;
        self.state = MatchState::Finished(outcome);
        info!(%outcome, "Match finished");
    }

    #[instrument(skip(self), fields(match_id = %self.id))]
    async fn abort(&mut self, cause: ConnectionError) {
        warn!(error = %cause, active = ?self.active, "Player disconnected, aborting match");
        self.notify_all(&ServerMessage::Disconnected).await;
        self.close_all().await;
        self.state = MatchState::Aborted;
    }
}
