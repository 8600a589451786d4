//! Chess rules engine with an array board.
//!
//! This crate provides:
//! - [`Board`] - the 8×8 grid of cells plus side to move, castling rights,
//!   en-passant target and move clocks
//! - Pseudo-legal move generation and the legality filter
//! - [`Game`] - the select-then-execute state machine with history tracking
//! - [`RuleSet`] - the seam between the state machine and the rules
//! - Pixel to square mapping for click-driven front ends
//!
//! # Example
//!
//! ```
//! use chess_rules::{Game, GameStatus};
//! use chess_core::{Move, Square};
//!
//! let mut game = Game::new();
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//!
//! let legal = game.select(e2).unwrap();
//! assert!(legal.contains(e4));
//! assert_eq!(game.execute(Move::new(e2, e4)).unwrap(), GameStatus::InProgress);
//! println!("{}", game.board());
//! ```

mod board;
mod config;
mod coords;
mod error;
mod game;
pub mod legality;
pub mod movegen;
pub mod rules;
mod zobrist;

pub use board::{Board, BoardError, CastlingRights};
pub use config::{ConfigError, EngineConfig, RulesConfig};
pub use coords::{to_square, BoardLayout, PixelPos};
pub use error::EngineError;
pub use game::{ClickOutcome, Game, GameMove, LegalMoveSet, SelectionState};
pub use legality::{filter_legal, is_in_check, legal_moves, legal_moves_from};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{make_move, pseudo_legal_moves, MoveList};
pub use rules::{GameStatus, RuleSet, StandardRules};
