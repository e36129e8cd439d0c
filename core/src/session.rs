//! Session bookkeeping: goals, the move budget and the top-level game state.
//!
//! A swap is resolved as one episode. `request_swap` evaluates the swap and, when it
//! matches, removes the first batch and enters [`SessionState::Resolving`]. From there
//! each [`Session::step`] performs exactly one unit of work, so a presenter can animate
//! between calls:
//!
//! 1. one cascade pass, if it moves anything;
//! 2. otherwise a detection on the settled board, removing what it finds;
//! 3. otherwise the end of the episode: the move is charged, then win and loss are checked.
//!
//! [`Session::swap`] runs the whole episode at once.

use alloc::collections::BTreeMap;
use alloc::vec::{Drain, Vec};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Ready,
    Resolving,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_resolving(self) -> bool {
        matches!(self, Self::Resolving)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Ready
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: PieceType,
    pub target: u32,
    pub current: u32,
}

impl Goal {
    pub const fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

/// What a single [`Session::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveStep {
    /// A cascade pass moved these pieces.
    Fell(PassReport),
    /// The settled board still had matches; these pieces were removed.
    Cleared(Vec<Piece>),
    /// Nothing left to fall or match. The episode is over and the session is in this state.
    Finished(SessionState),
}

#[derive(Clone, Debug)]
pub struct Session<S = RandomPieceSource> {
    board: Board,
    palette: Palette,
    spawn_policy: SpawnPolicy,
    source: S,
    ids: PieceIds,
    goals: BTreeMap<PieceType, Goal>,
    moves_left: u32,
    state: SessionState,
    charge_move: bool,
    events: Vec<GameEvent>,
}

impl Session<RandomPieceSource> {
    pub fn new(level: Level, seed: u64) -> Self {
        Self::with_source(level, RandomPieceSource::new(seed))
    }

    pub fn from_json(text: &str, seed: u64) -> Result<Self> {
        Ok(Self::new(Level::from_json(text)?, seed))
    }
}

impl<S: PieceSource> Session<S> {
    /// Fills the level's layout from `source` and starts in [`SessionState::Ready`].
    pub fn with_source(level: Level, mut source: S) -> Self {
        let mut ids = PieceIds::default();
        let board = Board::from_layout(
            &level.layout,
            &level.palette.playable(),
            &mut source,
            &mut ids,
        );
        Self::assemble(level, board, source, ids)
    }

    /// Starts from a prepared board, which must have exactly the level's blocked cells.
    pub fn with_board(level: Level, board: Board, source: S) -> Result<Self> {
        if !board.matches_layout(&level.layout) {
            return Err(ConfigError::BoardMismatch.into());
        }
        let next_id = board.max_piece_id().map_or(0, |id| id.get() + 1);
        Ok(Self::assemble(
            level,
            board,
            source,
            PieceIds::starting_at(next_id),
        ))
    }

    fn assemble(level: Level, board: Board, source: S, ids: PieceIds) -> Self {
        let spawn_policy = SpawnPolicy::from_level(&level);
        let goals = level
            .goals
            .iter()
            .map(|(&kind, &target)| {
                (
                    kind,
                    Goal {
                        kind,
                        target,
                        current: 0,
                    },
                )
            })
            .collect();
        Self {
            board,
            palette: level.palette,
            spawn_policy,
            source,
            ids,
            goals,
            moves_left: level.moves,
            state: SessionState::Ready,
            charge_move: false,
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.values()
    }

    pub fn goal(&self, kind: PieceType) -> Option<&Goal> {
        self.goals.get(&kind)
    }

    /// Events queued since the last drain, oldest first.
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Clears matches already present on a freshly filled board, as a resolution episode
    /// that costs no move. Returns false, leaving the session `Ready`, when there is
    /// nothing to clear.
    pub fn begin_initial_resolve(&mut self) -> Result<bool> {
        self.check_ready()?;
        let matches = find_matches(&self.board);
        if matches.is_empty() {
            return Ok(false);
        }
        self.state = SessionState::Resolving;
        self.charge_move = false;
        self.remove_matches(&matches);
        Ok(true)
    }

    pub fn resolve_initial(&mut self) -> Result<SessionState> {
        if self.begin_initial_resolve()? {
            self.settle()
        } else {
            Ok(self.state)
        }
    }

    /// Evaluates a swap. On success the first matches are already removed and the session
    /// is `Resolving` until [`step`](Self::step) reports the episode finished.
    ///
    /// Fails with [`GameError::Resolving`] or [`GameError::AlreadyEnded`] without touching
    /// anything while another episode runs or after the game ended.
    pub fn request_swap(&mut self, first: Coord2, second: Coord2) -> Result<SwapOutcome> {
        self.check_ready()?;
        let verdict = swap::evaluate(&mut self.board, SwapAttempt::new(first, second));
        let outcome = verdict.outcome();
        if let SwapVerdict::Matched(matches) = verdict {
            self.state = SessionState::Resolving;
            self.charge_move = true;
            self.remove_matches(&matches);
        }
        Ok(outcome)
    }

    /// Evaluates a swap and resolves it completely.
    pub fn swap(&mut self, first: Coord2, second: Coord2) -> Result<SwapOutcome> {
        let outcome = self.request_swap(first, second)?;
        if outcome.has_update() {
            self.settle()?;
        }
        Ok(outcome)
    }

    pub fn step(&mut self) -> Result<ResolveStep> {
        if !self.state.is_resolving() {
            return Err(GameError::NotResolving);
        }

        let report = CascadeResolver::new(
            &mut self.board,
            &self.spawn_policy,
            &mut self.source,
            &mut self.ids,
        )
        .advance_pass();
        if !report.is_settled() {
            self.record_moves(&report);
            return Ok(ResolveStep::Fell(report));
        }

        let matches = find_matches(&self.board);
        if !matches.is_empty() {
            return Ok(ResolveStep::Cleared(self.remove_matches(&matches)));
        }

        Ok(ResolveStep::Finished(self.finish_resolution()))
    }

    /// Steps until the running episode finishes.
    pub fn settle(&mut self) -> Result<SessionState> {
        loop {
            if let ResolveStep::Finished(state) = self.step()? {
                return Ok(state);
            }
        }
    }

    fn check_ready(&self) -> Result<()> {
        match self.state {
            SessionState::Ready => Ok(()),
            SessionState::Resolving => Err(GameError::Resolving),
            SessionState::Won | SessionState::Lost => Err(GameError::AlreadyEnded),
        }
    }

    fn remove_matches(&mut self, matches: &[Coord2]) -> Vec<Piece> {
        let mut removed = Vec::with_capacity(matches.len());
        for &coords in matches {
            let piece = self
                .board
                .take(coords)
                .unwrap_or_else(|| panic!("match source {coords:?} holds no piece"));
            let goal = self.goals.get_mut(&piece.kind);
            self.events.push(GameEvent::PieceRemoved {
                piece,
                routed_to_goal: goal.is_some(),
            });
            if let Some(goal) = goal {
                goal.current += 1;
                self.events.push(GameEvent::GoalUpdated {
                    kind: goal.kind,
                    current: goal.current,
                });
            }
            removed.push(piece);
        }
        log::debug!("Removed {} matched pieces", removed.len());
        removed
    }

    fn record_moves(&mut self, report: &PassReport) {
        for step in &report.moves {
            if step.kind == FallKind::Spawned {
                self.events.push(GameEvent::PieceSpawned {
                    piece: step.piece,
                    column: step.to.0,
                });
            }
            self.events.push(GameEvent::PieceMoved {
                piece: step.piece,
                from: step.from,
                to: step.to,
            });
        }
    }

    fn finish_resolution(&mut self) -> SessionState {
        if self.charge_move {
            self.charge_move = false;
            self.moves_left = self.moves_left.saturating_sub(1);
            self.events.push(GameEvent::MovesUpdated {
                moves_left: self.moves_left,
            });
        }

        self.state = if self.goals.values().all(Goal::is_complete) {
            log::info!("All goals complete, game won");
            self.events.push(GameEvent::GameWon);
            SessionState::Won
        } else if self.moves_left == 0 {
            log::info!("Out of moves, game lost");
            self.events.push(GameEvent::GameLost);
            SessionState::Lost
        } else {
            SessionState::Ready
        };
        self.state
    }
}
