//! Hex board geometry with axial coordinates, and the 49-cell DVONN board

use crate::game::GameError;
use crate::pieces::{Piece, Player, Stack};
use serde::{Deserialize, Serialize};

/// Number of playable cells
pub const NUM_CELLS: usize = 49;

/// Pieces in a full set (board + discard always sum to this)
pub const TOTAL_PIECES: usize = 49;

/// Source pieces in a full set
pub const SOURCE_PIECES: usize = 3;

/// Pieces of each player colour in a full set
pub const PLAYER_PIECES: usize = (TOTAL_PIECES - SOURCE_PIECES) / 2;

/// Rows run from r = -ROW_RADIUS to r = ROW_RADIUS
const ROW_RADIUS: i8 = 2;

/// Bound on |q| and |q + r|
const Q_RADIUS: i8 = 5;

/// First cell index of each row
const ROW_OFFSETS: [usize; 5] = [0, 9, 19, 30, 40];

/// Largest hex distance between two playable cells
pub const BOARD_DIAMETER: i32 = 10;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

/// Direction vectors in axial coordinates (dq, dr)
pub const DIRECTIONS: [(i8, i8); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Check if this hex is on the board
    pub fn is_valid(&self) -> bool {
        let (q, r) = (self.q as i16, self.r as i16);
        r.abs() <= ROW_RADIUS as i16 && q.abs() <= Q_RADIUS as i16 && (q + r).abs() <= Q_RADIUS as i16
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = self.q as i32 - other.q as i32;
        let dr = self.r as i32 - other.r as i32;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
    }

    /// Hex `steps` cells away along direction (0-5); may be off board
    pub fn offset(&self, direction: usize, steps: i8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(
            self.q.saturating_add(dq.saturating_mul(steps)),
            self.r.saturating_add(dr.saturating_mul(steps)),
        )
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        self.offset(direction, 1)
    }

    /// Cell index, `None` off board
    pub fn index(&self) -> Option<usize> {
        if !self.is_valid() {
            return None;
        }
        let row = (self.r + ROW_RADIUS) as usize;
        Some(ROW_OFFSETS[row] + (self.q - row_min_q(self.r)) as usize)
    }
}

const fn row_min_q(r: i8) -> i8 {
    if -Q_RADIUS - r > -Q_RADIUS {
        -Q_RADIUS - r
    } else {
        -Q_RADIUS
    }
}

const fn row_max_q(r: i8) -> i8 {
    if Q_RADIUS - r < Q_RADIUS {
        Q_RADIUS - r
    } else {
        Q_RADIUS
    }
}

const fn build_cells() -> [Hex; NUM_CELLS] {
    let mut cells = [Hex::new(0, 0); NUM_CELLS];
    let mut i = 0;
    let mut r = -ROW_RADIUS;
    while r <= ROW_RADIUS {
        let mut q = row_min_q(r);
        while q <= row_max_q(r) {
            cells[i] = Hex::new(q, r);
            i += 1;
            q += 1;
        }
        r += 1;
    }
    cells
}

/// All playable cells in index order (row by row, q ascending)
pub static CELLS: [Hex; NUM_CELLS] = build_cells();

// ============================================================================
// BOARD
// ============================================================================

/// Board contents: one optional stack per playable cell plus the discard pile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Stack>; NUM_CELLS],
    discard: Vec<Piece>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| None),
            discard: Vec::new(),
        }
    }

    /// Build a position from stacks (top first). Pieces of the full set that
    /// are not on the board are put in the discard pile.
    pub fn from_stacks(stacks: &[(Hex, Vec<Piece>)]) -> Result<Self, GameError> {
        let mut board = Self::new();
        let mut remaining = [SOURCE_PIECES, PLAYER_PIECES, PLAYER_PIECES];

        for (hex, pieces) in stacks {
            let idx = hex
                .index()
                .ok_or_else(|| GameError::MalformedInput(format!("{hex} is off the board")))?;
            if board.cells[idx].is_some() {
                return Err(GameError::MalformedInput(format!("{hex} given twice")));
            }
            for piece in pieces {
                let left = &mut remaining[piece.index()];
                if *left == 0 {
                    return Err(GameError::MalformedInput(format!(
                        "too many {piece:?} pieces"
                    )));
                }
                *left -= 1;
            }
            board.cells[idx] = Stack::from_pieces(pieces.clone());
        }

        for (piece, &count) in [Piece::Source, Piece::White, Piece::Black]
            .iter()
            .zip(remaining.iter())
        {
            board.discard.extend(std::iter::repeat(*piece).take(count));
        }
        Ok(board)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Stack at hex (None if empty or off board)
    pub fn get(&self, hex: Hex) -> Option<&Stack> {
        hex.index().and_then(|idx| self.cells[idx].as_ref())
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.get(hex).is_some()
    }

    /// Height of the stack at hex (0 if empty)
    pub fn height(&self, hex: Hex) -> usize {
        self.get(hex).map_or(0, Stack::height)
    }

    /// Iterate occupied cells in index order
    pub fn stacks(&self) -> impl Iterator<Item = (Hex, &Stack)> + '_ {
        CELLS
            .iter()
            .zip(self.cells.iter())
            .filter_map(|(&hex, cell)| cell.as_ref().map(|stack| (hex, stack)))
    }

    pub fn discard(&self) -> &[Piece] {
        &self.discard
    }

    pub fn active_pieces(&self) -> usize {
        self.stacks().map(|(_, stack)| stack.height()).sum()
    }

    pub fn discarded_pieces(&self) -> usize {
        self.discard.len()
    }

    pub fn total_pieces(&self) -> usize {
        self.active_pieces() + self.discarded_pieces()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Cells holding at least one Source piece
    pub fn source_coordinates(&self) -> Vec<Hex> {
        self.stacks()
            .filter(|(_, stack)| stack.contains_source())
            .map(|(hex, _)| hex)
            .collect()
    }

    /// Total height of stacks topped by `player`
    pub fn controlled_pieces(&self, player: Player) -> usize {
        self.stacks()
            .filter(|(_, stack)| stack.owner() == Some(player))
            .map(|(_, stack)| stack.height())
            .sum()
    }

    /// Player controlling more pieces, None on a tie
    pub fn leader(&self) -> Option<Player> {
        let white = self.controlled_pieces(Player::White);
        let black = self.controlled_pieces(Player::Black);
        match white.cmp(&black) {
            std::cmp::Ordering::Greater => Some(Player::White),
            std::cmp::Ordering::Less => Some(Player::Black),
            std::cmp::Ordering::Equal => None,
        }
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Put a single piece on an empty playable cell. Returns false (and leaves
    /// the board unchanged) if the cell is off board or occupied.
    pub fn place(&mut self, piece: Piece, at: Hex) -> bool {
        match at.index() {
            Some(idx) if self.cells[idx].is_none() => {
                self.cells[idx] = Some(Stack::single(piece));
                true
            }
            _ => false,
        }
    }

    /// Move the stack at `from` on top of the stack at `to`
    pub(crate) fn merge(&mut self, from: Hex, to: Hex) {
        let (Some(from_idx), Some(to_idx)) = (from.index(), to.index()) else {
            return;
        };
        if from_idx == to_idx {
            return;
        }
        let Some(upper) = self.cells[from_idx].take() else {
            return;
        };
        self.cells[to_idx] = Some(match self.cells[to_idx].take() {
            Some(lower) => upper.stack_onto(lower),
            None => upper,
        });
    }

    /// Move every stack on the given cells to the discard pile
    pub(crate) fn discard_cells(&mut self, cells: &[Hex]) {
        for hex in cells {
            if let Some(stack) = hex.index().and_then(|idx| self.cells[idx].take()) {
                self.discard.extend(stack.into_pieces());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_validity() {
        assert!(Hex::new(0, 0).is_valid());
        assert!(Hex::new(-3, -2).is_valid());
        assert!(Hex::new(5, -2).is_valid());
        assert!(Hex::new(-5, 2).is_valid());
        assert!(Hex::new(3, 2).is_valid());
        assert!(!Hex::new(-4, -2).is_valid());
        assert!(!Hex::new(4, 2).is_valid());
        assert!(!Hex::new(0, 3).is_valid());
        assert!(!Hex::new(6, 0).is_valid());
    }

    #[test]
    fn test_mask_rows() {
        let mut rows = [0usize; 5];
        for hex in CELLS.iter() {
            rows[(hex.r + 2) as usize] += 1;
        }
        assert_eq!(rows, [9, 10, 11, 10, 9]);
    }

    #[test]
    fn test_cell_indices() {
        for (i, hex) in CELLS.iter().enumerate() {
            assert!(hex.is_valid());
            assert_eq!(hex.index(), Some(i));
        }
        assert_eq!(Hex::new(0, 3).index(), None);
    }

    #[test]
    fn test_distance() {
        let a = Hex::new(-3, -2);
        let b = Hex::new(2, 1);
        assert_eq!(a.distance_to(b), b.distance_to(a));
        assert_eq!(a.distance_to(a), 0);
        assert_eq!(Hex::new(0, 0).distance_to(Hex::new(2, -2)), 2);
        assert_eq!(Hex::new(0, 0).distance_to(Hex::new(1, 1)), 2);
    }

    #[test]
    fn test_distance_symmetric_and_zero_only_on_self() {
        for a in CELLS.iter() {
            for b in CELLS.iter() {
                let d = a.distance_to(*b);
                assert_eq!(d, b.distance_to(*a));
                assert_eq!(d == 0, a == b);
            }
        }
    }

    #[test]
    fn test_board_diameter() {
        let max = CELLS
            .iter()
            .flat_map(|a| CELLS.iter().map(move |b| a.distance_to(*b)))
            .max()
            .unwrap();
        assert_eq!(max, BOARD_DIAMETER);
    }

    #[test]
    fn test_place_and_reject() {
        let mut board = Board::new();
        assert!(board.place(Piece::White, Hex::new(0, 0)));
        assert!(!board.place(Piece::Black, Hex::new(0, 0)));
        assert!(!board.place(Piece::Black, Hex::new(9, 9)));
        assert_eq!(board.height(Hex::new(0, 0)), 1);
        assert_eq!(board.empty_count(), NUM_CELLS - 1);
    }

    #[test]
    fn test_from_stacks_conserves_pieces() {
        let board = Board::from_stacks(&[
            (Hex::new(0, 0), vec![Piece::White, Piece::Source]),
            (Hex::new(1, 0), vec![Piece::Black]),
        ])
        .unwrap();
        assert_eq!(board.active_pieces(), 3);
        assert_eq!(board.total_pieces(), TOTAL_PIECES);
        assert_eq!(board.source_coordinates(), vec![Hex::new(0, 0)]);
    }

    #[test]
    fn test_from_stacks_rejects_off_board() {
        assert!(Board::from_stacks(&[(Hex::new(7, 0), vec![Piece::White])]).is_err());
        let sources = vec![Piece::Source; 4];
        assert!(Board::from_stacks(&[(Hex::new(0, 0), sources)]).is_err());
    }

    #[test]
    fn test_leader() {
        let board = Board::from_stacks(&[
            (Hex::new(0, 0), vec![Piece::White, Piece::Black]),
            (Hex::new(1, 0), vec![Piece::Black]),
            (Hex::new(2, 0), vec![Piece::Source]),
        ])
        .unwrap();
        assert_eq!(board.controlled_pieces(Player::White), 2);
        assert_eq!(board.controlled_pieces(Player::Black), 1);
        assert_eq!(board.leader(), Some(Player::White));
    }
}
