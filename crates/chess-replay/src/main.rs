//! Chess Replay - drives the rules engine the way a front end would.
//!
//! Moves are fed either as UCI strings or as screen clicks that go through
//! the configured board layout, and the resulting board and status are
//! printed as text or JSON.

mod render;
mod report;

use anyhow::Context;
use chess_core::{Move, PieceKind, PieceTable};
use chess_rules::{
    perft_divide, ClickOutcome, ConfigError, EngineConfig, EngineError, Game, PixelPos,
};
use clap::{Parser, Subcommand};
use report::{Rejection, ReplayReport};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-replay")]
#[command(about = "Replays moves or clicks through the chess rules engine")]
struct Cli {
    /// Path to the engine configuration [default: chess.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start position in FEN, overriding the configuration
    #[arg(long)]
    fen: Option<String>,

    /// Print a JSON report instead of the board
    #[arg(long)]
    json: bool,

    /// Draw pieces with FEN letters instead of Unicode glyphs
    #[arg(long)]
    ascii: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play moves given in UCI notation
    Moves {
        /// Moves such as e2e4 or e7e8q
        moves: Vec<String>,
    },
    /// Click screen pixels, as x,y pairs, in the configured layout
    Clicks {
        /// Pixels such as 637.5,540
        #[arg(value_parser = parse_pixel, allow_hyphen_values = true)]
        pixels: Vec<PixelPos>,
        /// Piece chosen when a click reaches a promotion square
        #[arg(long, default_value = "q", value_parser = parse_promotion)]
        promote: PieceKind,
    },
    /// Count leaf nodes of the legal move tree below the start position
    Perft {
        #[arg(short, long, default_value = "3")]
        depth: u32,
    },
}

fn parse_pixel(s: &str) -> Result<PixelPos, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {:?}", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x in {:?}: {}", s, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y in {:?}: {}", s, e))?;
    Ok(PixelPos::new(x, y))
}

fn parse_promotion(s: &str) -> Result<PieceKind, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PieceKind::from_fen_char(c)
            .map(|(kind, _)| kind)
            .filter(|kind| kind.is_promotion_target())
            .ok_or_else(|| format!("not a promotion piece: {:?}", s)),
        _ => Err(format!("expected one of q, r, b, n, got {:?}", s)),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    match path {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).with_context(|| {
        let path = cli.config.clone().unwrap_or_else(EngineConfig::config_path);
        format!("loading {}", path.display())
    })?;
    if let Some(fen) = &cli.fen {
        config.start_fen = Some(fen.clone());
    }
    let mut game = Game::with_config(&config).context("setting up the game")?;
    tracing::info!(fen = %game.to_fen(), "game ready");

    let rejected = match &cli.command {
        Commands::Moves { moves } => play_moves(&mut game, moves),
        Commands::Clicks { pixels, promote } => play_clicks(&mut game, &config, pixels, *promote),
        Commands::Perft { depth } => {
            run_perft(&game, *depth);
            return Ok(());
        }
    };

    if cli.json {
        println!("{}", ReplayReport::new(&game, rejected).to_json()?);
    } else {
        let glyphs = if cli.ascii {
            PieceTable::fen()
        } else {
            PieceTable::unicode()
        };
        print!("{}", render::draw(game.board(), &glyphs, game.selected()));
        println!("{}", game.to_fen());
        println!("status: {}", game.status());
        if let Some(rejection) = rejected {
            println!("rejected {}: {}", rejection.input, rejection.error);
        }
    }
    Ok(())
}

/// Plays each move in order, stopping at the first one the engine refuses.
fn play_moves(game: &mut Game, moves: &[String]) -> Option<Rejection> {
    for uci in moves {
        if let Err(e) = game.execute_uci(uci) {
            return Some(reject(uci, e));
        }
    }
    None
}

/// Feeds each pixel through the click state machine.
fn play_clicks(
    game: &mut Game,
    config: &EngineConfig,
    pixels: &[PixelPos],
    promote: PieceKind,
) -> Option<Rejection> {
    for pixel in pixels {
        let input = format!("{},{}", pixel.x, pixel.y);
        match game.click_at(*pixel, &config.layout) {
            Ok(ClickOutcome::PromotionRequired { from, to }) => {
                if let Err(e) = game.execute(Move::promoting(from, to, promote)) {
                    return Some(reject(&input, e));
                }
            }
            Ok(outcome) => tracing::debug!(?outcome, "click handled"),
            Err(e) => return Some(reject(&input, e)),
        }
    }
    None
}

fn reject(input: &str, error: EngineError) -> Rejection {
    tracing::warn!(input, %error, "replay stopped");
    Rejection {
        input: input.to_string(),
        error: error.to_string(),
    }
}

fn run_perft(game: &Game, depth: u32) {
    tracing::info!(depth, fen = %game.to_fen(), "running perft");
    let results = perft_divide(game.board(), depth);
    let total: u64 = results.iter().map(|(_, n)| n).sum();
    for (uci, nodes) in &results {
        println!("{}: {}", uci, nodes);
    }
    println!("\nNodes searched: {}", total);
}
