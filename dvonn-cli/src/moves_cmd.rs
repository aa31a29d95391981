//! Moves command - list the legal jumps after a seeded random placement

use anyhow::Result;
use clap::Args;

use dvonn_core::{Hex, Move};

use crate::play_cmd::{create_rng, opening_position};

#[derive(Args)]
pub struct MovesArgs {
    /// Only list jumps from this cell, e.g. "2,-1" or "(2,-1)"
    #[arg(long, allow_hyphen_values = true)]
    pub from: Option<Hex>,

    /// Print the board stacks as well
    #[arg(long)]
    pub board: bool,
}

pub fn run(args: MovesArgs, seed: Option<u64>) -> Result<()> {
    let state = opening_position(&mut create_rng(seed));

    if args.board {
        for (hex, stack) in state.board.stacks() {
            let pieces: String = stack.pieces().iter().map(|p| p.to_string()).collect();
            println!("{:>8} {}", hex.to_string(), pieces);
        }
        println!();
    }

    println!("{}", state.turn.prompt());
    let moves = filter_moves(state.legal_moves(), args.from);
    tracing::info!("{} legal moves", moves.len());
    for mv in &moves {
        println!("  {}", mv);
    }

    Ok(())
}

/// Keep the jumps starting at `from`, or everything when unset
fn filter_moves(moves: Vec<Move>, from: Option<Hex>) -> Vec<Move> {
    match from {
        Some(origin) => moves
            .into_iter()
            .filter(|mv| matches!(mv, Move::Jump { from, .. } if *from == origin))
            .collect(),
        None => moves,
    }
}
