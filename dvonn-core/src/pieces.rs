//! Piece colours, players and stacks

use serde::{Deserialize, Serialize};

/// Piece colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    Source = 0,
    White = 1,
    Black = 2,
}

impl Piece {
    /// Player controlling a stack topped by this piece
    pub fn owner(self) -> Option<Player> {
        match self {
            Piece::Source => None,
            Piece::White => Some(Player::White),
            Piece::Black => Some(Player::Black),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Player colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Piece colour this player owns
    pub fn piece(self) -> Piece {
        match self {
            Player::White => Piece::White,
            Player::Black => Piece::Black,
        }
    }
}

/// Pieces on one cell, top first. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack(Vec<Piece>);

impl Stack {
    pub fn single(piece: Piece) -> Self {
        Self(vec![piece])
    }

    /// Build from pieces listed top first; `None` if empty
    pub fn from_pieces(pieces: Vec<Piece>) -> Option<Self> {
        if pieces.is_empty() {
            None
        } else {
            Some(Self(pieces))
        }
    }

    pub fn top(&self) -> Piece {
        self.0[0]
    }

    pub fn height(&self) -> usize {
        self.0.len()
    }

    /// Player controlling this stack (None when a Source piece is on top)
    pub fn owner(&self) -> Option<Player> {
        self.top().owner()
    }

    pub fn contains_source(&self) -> bool {
        self.0.contains(&Piece::Source)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.0
    }

    /// Put `self` on top of `below`, keeping both internal orders
    pub fn stack_onto(mut self, below: Stack) -> Stack {
        self.0.extend(below.0);
        self
    }

    pub fn into_pieces(self) -> Vec<Piece> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner() {
        assert_eq!(Piece::Source.owner(), None);
        assert_eq!(Piece::White.owner(), Some(Player::White));
        assert_eq!(Player::Black.piece(), Piece::Black);
        assert_eq!(Player::White.opponent(), Player::Black);
    }

    #[test]
    fn test_stack_onto_keeps_order() {
        let upper = Stack::from_pieces(vec![Piece::White, Piece::Source]).unwrap();
        let lower = Stack::from_pieces(vec![Piece::Black, Piece::White]).unwrap();
        let merged = upper.stack_onto(lower);
        assert_eq!(
            merged.pieces(),
            &[Piece::White, Piece::Source, Piece::Black, Piece::White]
        );
        assert_eq!(merged.owner(), Some(Player::White));
        assert!(merged.contains_source());
    }

    #[test]
    fn test_empty_stack_rejected() {
        assert!(Stack::from_pieces(Vec::new()).is_none());
    }
}
