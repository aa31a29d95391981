//! Game state, move legality and turn flow

use crate::board::{Board, Hex, CELLS, DIRECTIONS, SOURCE_PIECES, TOTAL_PIECES};
use crate::pieces::{Piece, Player};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Colour of each placement in Phase 1: three Sources, then White and Black
/// alternating with White first
pub const PLACEMENT_ORDER: [Piece; TOTAL_PIECES] = build_placement_order();

const fn build_placement_order() -> [Piece; TOTAL_PIECES] {
    let mut order = [Piece::Source; TOTAL_PIECES];
    let mut i = SOURCE_PIECES;
    while i < TOTAL_PIECES {
        order[i] = if (i - SOURCE_PIECES) % 2 == 0 {
            Piece::White
        } else {
            Piece::Black
        };
        i += 1;
    }
    order
}

// ============================================================================
// CORE TYPES
// ============================================================================

/// Whose turn it is and what they are doing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    Start,
    PlacingSource,
    PlacingWhite,
    PlacingBlack,
    MoveWhite,
    MoveBlack,
    End,
}

impl TurnState {
    /// Player acting in this state (None for Source placement, Start and End)
    pub fn player(self) -> Option<Player> {
        match self {
            TurnState::PlacingWhite | TurnState::MoveWhite => Some(Player::White),
            TurnState::PlacingBlack | TurnState::MoveBlack => Some(Player::Black),
            TurnState::Start | TurnState::PlacingSource | TurnState::End => None,
        }
    }

    /// Movement turn for a player
    pub fn moving(player: Player) -> Self {
        match player {
            Player::White => TurnState::MoveWhite,
            Player::Black => TurnState::MoveBlack,
        }
    }

    fn placing(piece: Piece) -> Self {
        match piece {
            Piece::Source => TurnState::PlacingSource,
            Piece::White => TurnState::PlacingWhite,
            Piece::Black => TurnState::PlacingBlack,
        }
    }

    /// Short instruction for a front end
    pub fn prompt(self) -> &'static str {
        match self {
            TurnState::Start => "New game",
            TurnState::PlacingSource => "Place a source piece",
            TurnState::PlacingWhite => "Place a white piece",
            TurnState::PlacingBlack => "Place a black piece",
            TurnState::MoveWhite => "White move",
            TurnState::MoveBlack => "Black move",
            TurnState::End => "Game over",
        }
    }
}

/// Phase1 = placement, Phase2 = movement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Phase1,
    Phase2,
}

/// A move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Phase 1: put a single piece on an empty cell
    Place { piece: Piece, at: Hex },
    /// Phase 2: move a whole stack onto another stack
    Jump { player: Player, from: Hex, to: Hex },
}

/// Which legality check a move failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("not allowed in the current phase")]
    WrongPhase,
    #[error("all pieces have been placed")]
    PlacementComplete,
    #[error("that piece is not next in the placement order")]
    OutOfOrder,
    #[error("{0} is off the board")]
    OffBoard(Hex),
    #[error("{0} is already occupied")]
    Occupied(Hex),
    #[error("no stack at {0}")]
    EmptyOrigin(Hex),
    #[error("stack at {0} belongs to someone else")]
    NotOwner(Hex),
    #[error("stack at {0} is surrounded")]
    Surrounded(Hex),
    #[error("{to} is not a straight jump of the stack height from {from}")]
    WrongDistance { from: Hex, to: Hex },
    #[error("cannot land on empty cell {0}")]
    EmptyDestination(Hex),
    #[error("not that player's turn")]
    NotYourTurn,
    #[error("the game is over")]
    GameOver,
}

/// Game errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] Rejection),
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

// ============================================================================
// LEGALITY
// ============================================================================

fn jump_rejection(board: &Board, player: Player, from: Hex, to: Hex) -> Option<Rejection> {
    if !from.is_valid() {
        return Some(Rejection::OffBoard(from));
    }
    let Some(stack) = board.get(from) else {
        return Some(Rejection::EmptyOrigin(from));
    };
    if stack.owner() != Some(player) {
        return Some(Rejection::NotOwner(from));
    }
    if board.is_surrounded(from) {
        return Some(Rejection::Surrounded(from));
    }

    let height = match i8::try_from(stack.height()) {
        Ok(h) => h,
        Err(_) => return Some(Rejection::WrongDistance { from, to }),
    };
    if !(0..DIRECTIONS.len()).any(|dir| from.offset(dir, height) == to) {
        return Some(Rejection::WrongDistance { from, to });
    }
    if !to.is_valid() {
        return Some(Rejection::OffBoard(to));
    }
    if !board.is_occupied(to) {
        return Some(Rejection::EmptyDestination(to));
    }
    None
}

/// Check a move against the board alone (no turn or phase context)
pub fn check_move(board: &Board, mv: Move) -> Result<(), GameError> {
    let rejection = match mv {
        Move::Place { at, .. } => {
            if !at.is_valid() {
                Some(Rejection::OffBoard(at))
            } else if board.is_occupied(at) {
                Some(Rejection::Occupied(at))
            } else {
                None
            }
        }
        Move::Jump { player, from, to } => jump_rejection(board, player, from, to),
    };
    match rejection {
        Some(r) => Err(r.into()),
        None => Ok(()),
    }
}

pub fn valid_move(board: &Board, mv: Move) -> bool {
    check_move(board, mv).is_ok()
}

/// Legal jumps from one cell (empty unless it holds a movable stack)
fn jumps_from(board: &Board, from: Hex, moves: &mut Vec<Move>) {
    let Some(stack) = board.get(from) else { return };
    let Some(player) = stack.owner() else { return };
    if board.is_surrounded(from) {
        return;
    }
    let Ok(height) = i8::try_from(stack.height()) else {
        return;
    };
    for dir in 0..DIRECTIONS.len() {
        let to = from.offset(dir, height);
        if to.is_valid() && board.is_occupied(to) {
            moves.push(Move::Jump { player, from, to });
        }
    }
}

/// Every legal jump for both players, in cell then direction order
pub fn possible_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, _) in board.stacks() {
        jumps_from(board, from, &mut moves);
    }
    moves
}

/// Legal jumps for one player
pub fn moves_for(board: &Board, player: Player) -> Vec<Move> {
    possible_moves(board)
        .into_iter()
        .filter(|mv| matches!(mv, Move::Jump { player: p, .. } if *p == player))
        .collect()
}

pub fn has_legal_moves(board: &Board, player: Player) -> bool {
    let mut scratch = Vec::with_capacity(6);
    board.stacks().any(|(from, stack)| {
        if stack.owner() != Some(player) {
            return false;
        }
        scratch.clear();
        jumps_from(board, from, &mut scratch);
        !scratch.is_empty()
    })
}

/// Turn after `just_played` jumped: alternate if the opponent can move,
/// otherwise the same player again, otherwise the game ends
pub fn next_turn(board: &Board, just_played: Player) -> TurnState {
    let opponent = just_played.opponent();
    if has_legal_moves(board, opponent) {
        TurnState::moving(opponent)
    } else if has_legal_moves(board, just_played) {
        TurnState::moving(just_played)
    } else {
        TurnState::End
    }
}

// ============================================================================
// APPLY MOVE
// ============================================================================

impl Board {
    /// Apply a move without validation. A jump merges the stacks and then
    /// discards everything cut off from the Sources.
    pub fn apply(&mut self, mv: Move) {
        match mv {
            Move::Jump { from, to, .. } => {
                let before = self.total_pieces();
                self.merge(from, to);
                self.cleanup();
                debug_assert_eq!(self.total_pieces(), before, "jump changed the piece count");
            }
            Move::Place { piece, at } => {
                self.place(piece, at);
            }
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Full game state, owned and driven by the caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub turn: TurnState,
    pub phase: GamePhase,
    /// Number of pieces placed so far (0-49)
    pub place_step: usize,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh game: empty board, Phase 1, Source placement first
pub fn start_state() -> GameState {
    GameState::new()
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: TurnState::PlacingSource,
            phase: GamePhase::Phase1,
            place_step: 0,
        }
    }

    /// Phase 2 state from an existing position, `player` to move
    pub fn from_position(board: Board, player: Player) -> Self {
        let mut state = Self {
            board,
            turn: TurnState::moving(player),
            phase: GamePhase::Phase2,
            place_step: TOTAL_PIECES,
        };
        if !has_legal_moves(&state.board, player) {
            state.turn = next_turn(&state.board, player.opponent());
        }
        state
    }

    /// Player acting now
    pub fn current_player(&self) -> Option<Player> {
        self.turn.player()
    }

    /// Piece the next placement will put down
    pub fn next_piece(&self) -> Option<Piece> {
        PLACEMENT_ORDER.get(self.place_step).copied()
    }

    pub fn is_game_over(&self) -> bool {
        self.turn == TurnState::End
    }

    /// Player controlling more pieces; None on a draw.
    /// Only meaningful once the game is over.
    pub fn winner(&self) -> Option<Player> {
        self.board.leader()
    }

    // ========================================================================
    // PHASE 1
    // ========================================================================

    /// Place the next scripted piece at `at`. On error nothing changes.
    pub fn run_placement_phase(&mut self, at: Hex) -> Result<(), GameError> {
        if self.phase != GamePhase::Phase1 {
            return Err(Rejection::WrongPhase.into());
        }
        let piece = self.next_piece().ok_or(Rejection::PlacementComplete)?;
        check_move(&self.board, Move::Place { piece, at })?;

        self.board.apply(Move::Place { piece, at });
        self.place_step += 1;

        match self.next_piece() {
            Some(next) => self.turn = TurnState::placing(next),
            None => {
                self.phase = GamePhase::Phase2;
                self.turn = TurnState::MoveBlack;
            }
        }
        Ok(())
    }

    /// Complete Phase 1 by placing every remaining piece on a random empty cell
    pub fn fill_placement_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.phase == GamePhase::Phase1 {
            let empties: Vec<Hex> = CELLS
                .iter()
                .copied()
                .filter(|&hex| !self.board.is_occupied(hex))
                .collect();
            let Some(&at) = empties.choose(rng) else { break };
            if self.run_placement_phase(at).is_err() {
                break;
            }
        }
    }

    // ========================================================================
    // PHASE 2
    // ========================================================================

    /// Jump the current player's stack at `from` onto `to`.
    /// On error nothing changes.
    pub fn run_movement_phase(&mut self, from: Hex, to: Hex) -> Result<(), GameError> {
        if self.phase != GamePhase::Phase2 {
            return Err(Rejection::WrongPhase.into());
        }
        let player = self.current_player().ok_or(Rejection::GameOver)?;
        check_move(&self.board, Move::Jump { player, from, to })?;
        self.play_jump(player, from, to);
        Ok(())
    }

    /// Apply a jump already known to be legal and advance the turn
    pub(crate) fn play_jump(&mut self, player: Player, from: Hex, to: Hex) {
        self.board.apply(Move::Jump { player, from, to });
        self.turn = next_turn(&self.board, player);
    }

    /// Validate and apply any move, returning the new state
    pub fn apply_move(&self, mv: Move) -> Result<Self, GameError> {
        let mut next = self.clone();
        match mv {
            Move::Place { piece, at } => {
                if self.next_piece() != Some(piece) {
                    return Err(Rejection::OutOfOrder.into());
                }
                next.run_placement_phase(at)?;
            }
            Move::Jump { player, from, to } => {
                if self.current_player() != Some(player) || self.phase != GamePhase::Phase2 {
                    return Err(Rejection::NotYourTurn.into());
                }
                next.run_movement_phase(from, to)?;
            }
        }
        Ok(next)
    }

    /// Legal jumps for the player to move
    pub fn legal_moves(&self) -> Vec<Move> {
        match (self.phase, self.turn) {
            (GamePhase::Phase2, TurnState::MoveWhite) => moves_for(&self.board, Player::White),
            (GamePhase::Phase2, TurnState::MoveBlack) => moves_for(&self.board, Player::Black),
            _ => Vec::new(),
        }
    }

    /// Cells the player to move can jump from
    pub fn movable_origins(&self) -> Vec<Hex> {
        let mut origins: Vec<Hex> = Vec::new();
        for mv in self.legal_moves() {
            if let Move::Jump { from, .. } = mv {
                if origins.last() != Some(&from) {
                    origins.push(from);
                }
            }
        }
        origins
    }

    /// Cells the stack at `from` can land on this turn
    pub fn destinations(&self, from: Hex) -> Vec<Hex> {
        self.legal_moves()
            .into_iter()
            .filter_map(|mv| match mv {
                Move::Jump { from: f, to, .. } if f == from => Some(to),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
