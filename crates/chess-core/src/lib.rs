//! Core value types for the chess rules engine.
//!
//! This crate provides the fundamental types shared by the engine and
//! its front ends:
//! - [`PieceKind`], [`Piece`], [`Cell`] and [`Side`] for board contents
//! - [`Square`] for board coordinates
//! - [`Move`] for move values
//! - FEN field parsing
//! - [`PieceTable`] for presenter-owned per-piece data

mod fen;
mod mov;
mod piece;
mod side;
mod square;
mod table;

pub use fen::{FenError, FenParser};
pub use mov::Move;
pub use piece::{Cell, Piece, PieceKind};
pub use side::Side;
pub use square::Square;
pub use table::PieceTable;
