//! Match command - a series of AI vs AI games between two search depths
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use serde::Serialize;

use dvonn_core::Player;

use crate::play_cmd::{build_players, create_rng, load_config, play_single_game, winner_label, GameRecord};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play (will alternate colours)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Search depth of the first player (White in odd-numbered games)
    #[arg(long)]
    pub first_depth: Option<u32>,

    /// Search depth of the second player (Black in odd-numbered games)
    #[arg(long)]
    pub second_depth: Option<u32>,

    /// AI config JSON file (depth, weights, threads)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One game together with which side the first player took
#[derive(Clone, Debug, Serialize)]
struct MatchGame {
    first_plays: Player,
    #[serde(flatten)]
    record: GameRecord,
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    first_wins: usize,
    second_wins: usize,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    avg_moves: f32,
    games: Vec<MatchGame>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build both players from the config
/// 2. Play the match (one seeded placement per game)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let base = load_config(args.config.as_deref())?;

    tracing::info!(
        "Starting match: {} games, depth {} vs {}",
        args.games,
        args.first_depth.unwrap_or(base.depth),
        args.second_depth.unwrap_or(base.depth)
    );

    let results = play_match(&args, &base, seed)?;
    report_results(&results, args.json)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(args: &MatchArgs, base: &dvonn_core::AiConfig, seed: Option<u64>) -> Result<MatchResults> {
    let (first, second) = build_players(base, args.first_depth, args.second_depth);
    let base_seed = seed.unwrap_or_else(|| create_rng(None).gen());

    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games {msg}")?
            .progress_chars("##-"),
    );

    let mut games = Vec::with_capacity(args.games);
    for game_num in 0..args.games {
        // Alternate colours for fairness
        let swap_colors = game_num % 2 == 1;
        let game_seed = base_seed.wrapping_add(game_num as u64);

        let record = if swap_colors {
            play_single_game(&second, &first, game_num + 1, Some(game_seed))?
        } else {
            play_single_game(&first, &second, game_num + 1, Some(game_seed))?
        };

        tracing::info!(
            "Game {}: {} ({} moves, {} vs {})",
            record.game_number,
            winner_label(record.winner),
            record.moves.len(),
            record.white_pieces,
            record.black_pieces
        );
        progress.inc(1);

        games.push(MatchGame {
            first_plays: if swap_colors { Player::Black } else { Player::White },
            record,
        });
    }
    progress.finish_and_clear();

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<MatchGame>) -> MatchResults {
    let won_by = |player: Player| games.iter().filter(|g| g.record.winner == Some(player)).count();
    let white_wins = won_by(Player::White);
    let black_wins = won_by(Player::Black);
    let draws = games.iter().filter(|g| g.record.winner.is_none()).count();
    let first_wins = games
        .iter()
        .filter(|g| g.record.winner == Some(g.first_plays))
        .count();

    let total_moves: usize = games.iter().map(|g| g.record.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        first_wins,
        second_wins: white_wins + black_wins - first_wins,
        white_wins,
        black_wins,
        draws,
        avg_moves,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:  {}", total);
    println!("First wins:   {} ({:.1}%)", results.first_wins, percent(results.first_wins, total));
    println!("Second wins:  {} ({:.1}%)", results.second_wins, percent(results.second_wins, total));
    println!("White wins:   {} ({:.1}%)", results.white_wins, percent(results.white_wins, total));
    println!("Black wins:   {} ({:.1}%)", results.black_wins, percent(results.black_wins, total));
    println!("Draws:        {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg moves:    {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} (first as {}): {} in {} moves, {}-{}",
            game.record.game_number,
            game.first_plays,
            winner_label(game.record.winner),
            game.record.moves.len(),
            game.record.white_pieces,
            game.record.black_pieces
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
