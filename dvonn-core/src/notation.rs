//! Text form of coordinates and moves
//!
//! Coordinates print as `(q,r)`; a jump prints as `(q,r)->(q,r)`.
//! Parsing accepts `q,r` with or without parentheses, and `a->b` or `a to b`
//! for jumps. Anything that does not describe a playable cell is
//! [`GameError::MalformedInput`].

use std::fmt;
use std::str::FromStr;

use crate::board::Hex;
use crate::game::{GameError, Move};
use crate::pieces::{Piece, Player};

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.q, self.r)
    }
}

impl FromStr for Hex {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GameError::MalformedInput(format!("bad coordinate {s:?}"));

        let inner = s.trim();
        let inner = inner
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(inner);
        let (q, r) = inner.split_once(',').ok_or_else(malformed)?;
        let q: i8 = q.trim().parse().map_err(|_| malformed())?;
        let r: i8 = r.trim().parse().map_err(|_| malformed())?;

        let hex = Hex::new(q, r);
        if !hex.is_valid() {
            return Err(GameError::MalformedInput(format!("{hex} is not on the board")));
        }
        Ok(hex)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Piece::Source => 'S',
            Piece::White => 'W',
            Piece::Black => 'B',
        };
        write!(f, "{c}")
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place { piece, at } => write!(f, "{piece}@{at}"),
            Move::Jump { from, to, .. } => write!(f, "{from}->{to}"),
        }
    }
}

/// Parse `from->to` (or `from to to`) as a jump by `player`
pub fn parse_jump(s: &str, player: Player) -> Result<Move, GameError> {
    let (from, to) = s
        .split_once("->")
        .or_else(|| s.split_once(" to "))
        .ok_or_else(|| GameError::MalformedInput(format!("bad move {s:?}")))?;
    Ok(Move::Jump {
        player,
        from: from.parse()?,
        to: to.parse()?,
    })
}
