//! Play command - one AI vs AI game from a random placement
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_players(), play_single_game(), report_game()
//! - Level 3: opening_position(), play_out()
//! - Level 4: config loading, RNG, formatting

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use dvonn_core::{AiConfig, AlphaBetaAI, GameState, Move, Player, ZobristKeys};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Search depth for White (overrides the config file)
    #[arg(long)]
    pub white_depth: Option<u32>,

    /// Search depth for Black (overrides the config file)
    #[arg(long)]
    pub black_depth: Option<u32>,

    /// AI config JSON file (depth, weights, threads)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub game_number: usize,
    pub seed: Option<u64>,
    pub winner: Option<Player>,
    pub white_pieces: usize,
    pub black_pieces: usize,
    pub discarded: usize,
    pub moves: Vec<String>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let base = load_config(args.config.as_deref())?;
    let (white, black) = build_players(&base, args.white_depth, args.black_depth);

    tracing::info!(
        "Starting game: White depth={} vs Black depth={} (seed={:?})",
        white.depth,
        black.depth,
        seed
    );

    let record = play_single_game(&white, &black, 1, seed)?;
    report_game(&record, args.json)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Two players sharing one Zobrist key set, depths overridden where given
pub(crate) fn build_players(
    base: &AiConfig,
    white_depth: Option<u32>,
    black_depth: Option<u32>,
) -> (AlphaBetaAI, AlphaBetaAI) {
    let keys = Arc::new(ZobristKeys::new());
    let player = |depth: Option<u32>| {
        let mut config = base.clone();
        if let Some(d) = depth {
            config.depth = d;
        }
        AlphaBetaAI::from_config(&config).with_keys(keys.clone())
    };
    (player(white_depth), player(black_depth))
}

/// Random placement from `seed`, then the two players jump until the game ends
pub(crate) fn play_single_game(
    white: &AlphaBetaAI,
    black: &AlphaBetaAI,
    game_number: usize,
    seed: Option<u64>,
) -> Result<GameRecord> {
    let mut rng = create_rng(seed);
    let state = opening_position(&mut rng);
    let (final_state, moves) = play_out(white, black, state)?;

    Ok(GameRecord {
        game_number,
        seed,
        winner: final_state.winner(),
        white_pieces: final_state.board.controlled_pieces(Player::White),
        black_pieces: final_state.board.controlled_pieces(Player::Black),
        discarded: final_state.board.discarded_pieces(),
        moves: moves.iter().map(|m| m.to_string()).collect(),
    })
}

fn report_game(record: &GameRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print_text_record(record);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// All 49 pieces placed at random; Black moves first
pub(crate) fn opening_position(rng: &mut ChaCha8Rng) -> GameState {
    let mut state = GameState::new();
    state.fill_placement_random(rng);
    state
}

/// Alternate the two players until neither side can jump
fn play_out(white: &AlphaBetaAI, black: &AlphaBetaAI, initial: GameState) -> Result<(GameState, Vec<Move>)> {
    let mut state = initial;
    let mut moves = Vec::new();

    while let Some(player) = state.current_player() {
        let ai = match player {
            Player::White => white,
            Player::Black => black,
        };
        let result = ai.search(&state);
        let Some(Move::Jump { from, to, .. }) = result.best_move else {
            break;
        };
        state
            .run_movement_phase(from, to)
            .with_context(|| format!("{} played an illegal move {}->{}", player, from, to))?;

        tracing::info!(
            "{:>3}. {} {}->{} (score={}, nodes={})",
            moves.len() + 1,
            player,
            from,
            to,
            result.score,
            result.nodes
        );
        moves.push(Move::Jump { player, from, to });
    }

    Ok((state, moves))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Config from file, or defaults
pub(crate) fn load_config(path: Option<&Path>) -> Result<AiConfig> {
    match path {
        Some(p) => AiConfig::load(p).with_context(|| format!("Failed to load AI config: {}", p.display())),
        None => Ok(AiConfig::default()),
    }
}

/// Create RNG from seed or random
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

pub(crate) fn winner_label(winner: Option<Player>) -> String {
    match winner {
        Some(p) => format!("{} wins", p),
        None => "Draw".to_string(),
    }
}

fn print_text_record(record: &GameRecord) {
    println!("\n=== Game Result ===");
    println!("Result:     {}", winner_label(record.winner));
    println!("White:      {} pieces", record.white_pieces);
    println!("Black:      {} pieces", record.black_pieces);
    println!("Discarded:  {} pieces", record.discarded);
    println!("Moves:      {}", record.moves.len());
}

// ============================================================================
// TESTS
// ============================================================================
