//! JSON summary of a replay.

use chess_rules::Game;
use serde::Serialize;

/// The state of a game after a replay, for machine consumption.
///
/// ```json
/// {
///   "fen": "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
///   "status": "in progress",
///   "terminal": false,
///   "winner": null,
///   "moves": ["e2e4", "e7e5"],
///   "rejected": null
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub fen: String,
    pub status: String,
    pub terminal: bool,
    pub winner: Option<String>,
    /// Applied moves in UCI notation.
    pub moves: Vec<String>,
    /// The first input the engine refused, which ended the replay.
    pub rejected: Option<Rejection>,
}

#[derive(Debug, Serialize)]
pub struct Rejection {
    pub input: String,
    pub error: String,
}

impl ReplayReport {
    pub fn new(game: &Game, rejected: Option<Rejection>) -> Self {
        let status = game.status();
        ReplayReport {
            fen: game.to_fen(),
            status: status.to_string(),
            terminal: status.is_terminal(),
            winner: status.winner().map(|side| side.to_string()),
            moves: game.history().iter().map(|m| m.mv.to_uci()).collect(),
            rejected,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
