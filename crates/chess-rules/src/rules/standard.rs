//! Standard chess rules implementation.

use super::{GameStatus, RuleSet};
use crate::config::RulesConfig;
use crate::legality::{has_legal_move, is_in_check, legal_moves, legal_moves_from};
use crate::{movegen, Board, MoveList};
use chess_core::{Move, PieceKind, Side, Square};

/// Standard chess rules.
///
/// - Standard piece movement
/// - Castling (kingside and queenside)
/// - En passant
/// - Pawn promotion
/// - Check, checkmate and stalemate detection
/// - Repetition, fifty-move and insufficient-material draws, with the
///   thresholds taken from [`RulesConfig`]
#[derive(Debug, Clone, Default)]
pub struct StandardRules {
    config: RulesConfig,
    start: Option<Board>,
}

impl StandardRules {
    /// Standard rules with the given draw thresholds.
    pub fn new(config: RulesConfig) -> Self {
        StandardRules {
            config,
            start: None,
        }
    }

    /// Starts new games from `board` instead of the standard setup.
    pub fn with_start(mut self, board: Board) -> Self {
        self.start = Some(board);
        self
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }
}

impl RuleSet for StandardRules {
    fn initial_board(&self) -> Board {
        self.start.clone().unwrap_or_else(Board::startpos)
    }

    fn legal_moves(&self, board: &Board) -> MoveList {
        legal_moves(board)
    }

    fn legal_moves_from(&self, board: &Board, from: Square) -> MoveList {
        legal_moves_from(board, from)
    }

    fn is_legal(&self, board: &Board, m: Move) -> bool {
        board.piece_at(m.from).map(|p| p.side) == Some(board.side_to_move)
            && legal_moves_from(board, m.from).find_matching(&m).is_some()
    }

    fn make_move(&self, board: &Board, m: Move) -> Board {
        movegen::make_move(board, m)
    }

    fn is_check(&self, board: &Board) -> bool {
        is_in_check(board, board.side_to_move)
    }

    fn status(&self, board: &Board, repetitions: usize) -> GameStatus {
        let side = board.side_to_move;
        let in_check = is_in_check(board, side);

        if !has_legal_move(board, side) {
            return if in_check {
                GameStatus::Checkmate(side)
            } else {
                GameStatus::Stalemate
            };
        }

        let limit = self.config.repetition_limit;
        if limit > 0 && repetitions >= limit {
            return GameStatus::DrawByRepetition;
        }

        let halfmoves = self.config.fifty_move_halfmoves;
        if halfmoves > 0 && board.halfmove_clock >= halfmoves {
            return GameStatus::DrawByFiftyMove;
        }

        if self.config.insufficient_material && self.is_insufficient_material(board) {
            return GameStatus::DrawByInsufficientMaterial;
        }

        if in_check {
            GameStatus::Check(side)
        } else {
            GameStatus::InProgress
        }
    }

    fn is_insufficient_material(&self, board: &Board) -> bool {
        // Any pawn, rook or queen is enough
        for side in Side::BOTH {
            for kind in [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen] {
                if board.count(kind, side) > 0 {
                    return false;
                }
            }
        }

        let knights = board.count(PieceKind::Knight, Side::White)
            + board.count(PieceKind::Knight, Side::Black);
        let bishop_shades: Vec<bool> = Side::BOTH
            .into_iter()
            .flat_map(|side| {
                board
                    .pieces(side)
                    .filter(|(_, p)| p.kind == PieceKind::Bishop)
                    .map(|(sq, _)| sq.is_dark())
            })
            .collect();

        match (knights, bishop_shades.as_slice()) {
            // K v K, or K + knight v K
            (0 | 1, []) => true,
            // Bishops alone, all on one square colour, can never mate
            (0, [first, rest @ ..]) => rest.iter().all(|shade| shade == first),
            _ => false,
        }
    }
}
