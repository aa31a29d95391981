//! DVONN CLI - Command-line interface
//!
//! Commands:
//! - play: Random placement, then one AI vs AI game
//! - match: A series of seeded AI vs AI games
//! - moves: List legal jumps in a random opening position

mod match_cmd;
mod moves_cmd;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dvonn")]
#[command(about = "DVONN rules engine and alpha-beta AI")]
struct Cli {
    /// Seed for the random placement phase (entropy when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single AI vs AI game
    Play(play_cmd::PlayArgs),
    /// Play a series of games, alternating colours
    Match(match_cmd::MatchArgs),
    /// List legal moves for the side to move
    Moves(moves_cmd::MovesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Moves(args) => moves_cmd::run(args, cli.seed),
    }
}
