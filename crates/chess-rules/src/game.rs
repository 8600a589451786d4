//! Game management: the two-click selection state machine and history.
//!
//! A [`Game`] owns the board for the life of one game. The presentation
//! layer reads it through [`Game::board`] and changes it only through
//! [`Game::select`], [`Game::execute`] and the click helpers built on
//! them.

use crate::board::{Board, BoardError};
use crate::config::{ConfigError, EngineConfig};
use crate::coords::{BoardLayout, PixelPos};
use crate::error::EngineError;
use crate::rules::{GameStatus, RuleSet, StandardRules};
use crate::MoveList;
use chess_core::{Move, Piece, Square};

/// The legal moves of one selected piece.
#[derive(Debug, Clone)]
pub struct LegalMoveSet {
    from: Square,
    moves: MoveList,
}

impl LegalMoveSet {
    /// The square of the selected piece.
    pub fn from(&self) -> Square {
        self.from
    }

    pub fn moves(&self) -> &MoveList {
        &self.moves
    }

    /// Squares to highlight. A promotion square appears once.
    pub fn destinations(&self) -> Vec<Square> {
        self.moves.destinations()
    }

    /// Returns true if some legal move lands on `to`.
    pub fn contains(&self, to: Square) -> bool {
        self.moves.targets(to)
    }

    /// The legal move with `m`'s from, to and promotion, flags filled in.
    pub fn find(&self, m: &Move) -> Option<Move> {
        self.moves.find_matching(m)
    }

    /// Every legal move landing on `to`; more than one means a promotion.
    pub fn moves_to(&self, to: Square) -> Vec<Move> {
        self.moves.as_slice().iter().copied().filter(|m| m.to == to).collect()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Where the game is in the select-then-confirm cycle.
#[derive(Debug, Clone)]
pub enum SelectionState {
    /// Waiting for the side to move to pick a piece.
    AwaitingSelection,
    /// A piece is picked and its legal moves are known.
    PieceSelected {
        legal: LegalMoveSet,
        /// Plies played when the selection was made.
        ply: usize,
    },
    /// No more moves are accepted.
    GameOver(GameStatus),
}

/// Result of a single click on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The piece on the square is now selected.
    Selected(Square),
    /// The previous selection was cancelled.
    Deselected,
    /// Nothing selectable was clicked.
    Ignored,
    /// A move was executed.
    Moved { mv: Move, status: GameStatus },
    /// The destination is a promotion square; the caller must choose a kind
    /// and submit the move through [`Game::execute`]. The selection is kept.
    PromotionRequired { from: Square, to: Square },
}

/// A recorded move in game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMove {
    /// The move as applied, flags included.
    pub mv: Move,
    /// The piece that moved, as it was before moving.
    pub piece: Piece,
    /// The piece removed by the move, if any.
    pub captured: Option<Piece>,
    /// Zobrist hash of the position before the move.
    pub hash_before: u64,
}

/// A complete chess game with history tracking.
///
/// Unlike [`Board`], which is a single snapshot, `Game` tracks the
/// selection, the position history needed for repetition detection, and
/// the status derived after every move.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current board.
    board: Board,
    rules: StandardRules,
    state: SelectionState,
    /// Position hashes, starting position first.
    positions: Vec<u64>,
    /// Moves played, in order.
    moves: Vec<GameMove>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game from the standard starting position.
    pub fn new() -> Self {
        Self::with_rules(StandardRules::default())
    }

    /// Creates a new game from the rules' initial board.
    pub fn with_rules(rules: StandardRules) -> Self {
        let board = rules.initial_board();
        Self::start(board, rules)
    }

    /// Creates a new game with the configured start position and draw rules.
    pub fn with_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let board = config.start_board()?;
        Ok(Self::with_rules(
            StandardRules::new(config.rules).with_start(board),
        ))
    }

    /// Creates a game from a FEN string under the standard rules.
    ///
    /// The position is also what [`Game::reset`] returns to.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let board = Board::from_fen(fen)?;
        Ok(Self::with_rules(StandardRules::default().with_start(board)))
    }

    fn start(board: Board, rules: StandardRules) -> Self {
        let hash = board.zobrist_hash();
        let mut game = Game {
            board,
            rules,
            state: SelectionState::AwaitingSelection,
            positions: vec![hash],
            moves: Vec::new(),
            status: GameStatus::InProgress,
        };
        // A loaded position may already be finished
        game.update_status();
        game
    }

    /// Discards the current game and restores the initial board.
    pub fn reset(&mut self) {
        *self = Self::with_rules(self.rules.clone());
        tracing::info!("new game");
    }

    /// Returns the current board, for rendering.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn rules(&self) -> &StandardRules {
        &self.rules
    }

    /// Returns the selection state.
    pub fn selection(&self) -> &SelectionState {
        &self.state
    }

    /// The legal moves of the selected piece, if one is selected.
    pub fn selected(&self) -> Option<&LegalMoveSet> {
        match &self.state {
            SelectionState::PieceSelected { legal, .. } => Some(legal),
            _ => None,
        }
    }

    /// Returns the move history.
    pub fn history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.rules.is_check(&self.board)
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        self.rules.legal_moves(&self.board)
    }

    /// Counts how many times the current position has occurred.
    pub fn position_count(&self) -> usize {
        let current = self.board.zobrist_hash();
        self.positions.iter().filter(|&&h| h == current).count()
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Selects the piece on `square` and returns its legal moves.
    ///
    /// On error the previous selection, if any, is kept.
    pub fn select(&mut self, square: Square) -> Result<LegalMoveSet, EngineError> {
        self.ensure_in_play()?;

        let piece = self
            .board
            .piece_at(square)
            .ok_or(EngineError::EmptySquareSelected(square))?;
        if piece.side != self.board.side_to_move {
            return Err(EngineError::WrongSideToMove {
                square,
                side: piece.side,
            });
        }

        let legal = LegalMoveSet {
            from: square,
            moves: self.rules.legal_moves_from(&self.board, square),
        };
        tracing::debug!(
            square = %square,
            piece = %piece.kind,
            moves = legal.len(),
            "piece selected"
        );
        self.state = SelectionState::PieceSelected {
            legal: legal.clone(),
            ply: self.ply_count(),
        };
        Ok(legal)
    }

    /// Cancels the current selection, if any.
    pub fn deselect(&mut self) {
        if let SelectionState::PieceSelected { legal, .. } = &self.state {
            tracing::debug!(square = %legal.from, "selection cancelled");
            self.state = SelectionState::AwaitingSelection;
        }
    }

    /// Executes `m` and returns the new status.
    ///
    /// The move is matched by from, to and promotion against the legal set
    /// of the current selection, or against a freshly generated set when
    /// nothing is selected. The engine's own castle and en-passant flags
    /// are applied. A pawn reaching the far rank needs `m.promotion`.
    pub fn execute(&mut self, m: Move) -> Result<GameStatus, EngineError> {
        self.ensure_in_play()?;

        let legal_move = match &self.state {
            SelectionState::PieceSelected { legal, ply } => {
                if *ply != self.ply_count() {
                    tracing::warn!(mv = %m, "rejected move against a stale selection");
                    return Err(EngineError::StaleSelection);
                }
                legal.find(&m)
            }
            _ => {
                let piece = self
                    .board
                    .piece_at(m.from)
                    .ok_or(EngineError::EmptySquareSelected(m.from))?;
                if piece.side != self.board.side_to_move {
                    return Err(EngineError::WrongSideToMove {
                        square: m.from,
                        side: piece.side,
                    });
                }
                self.rules
                    .legal_moves_from(&self.board, m.from)
                    .find_matching(&m)
            }
        };

        match legal_move {
            Some(legal_move) => Ok(self.apply_move(legal_move)),
            None => {
                tracing::warn!(mv = %m, "rejected illegal move");
                Err(EngineError::IllegalMove(m))
            }
        }
    }

    /// Executes a move given in UCI notation, such as `e2e4` or `e7e8q`.
    pub fn execute_uci(&mut self, uci: &str) -> Result<GameStatus, EngineError> {
        let m = Move::from_uci(uci)
            .ok_or_else(|| EngineError::InvalidNotation(uci.to_string()))?;
        self.execute(m)
    }

    /// Handles a click on `square` according to the selection state.
    ///
    /// With nothing selected, clicking an own piece selects it and anything
    /// else is ignored. With a piece selected, clicking a destination plays
    /// the move, clicking another own piece switches the selection, and any
    /// other click cancels it.
    pub fn click(&mut self, square: Square) -> Result<ClickOutcome, EngineError> {
        self.ensure_in_play()?;

        if let SelectionState::PieceSelected { legal, .. } = &self.state {
            let candidates = legal.moves_to(square);
            match candidates.as_slice() {
                [] => {}
                [m] => {
                    let mv = *m;
                    let status = self.execute(mv)?;
                    return Ok(ClickOutcome::Moved { mv, status });
                }
                _ => {
                    return Ok(ClickOutcome::PromotionRequired {
                        from: legal.from,
                        to: square,
                    });
                }
            }

            let reselect = legal.from != square && self.owns(square);
            if !reselect {
                self.deselect();
                return Ok(ClickOutcome::Deselected);
            }
        }

        if self.owns(square) {
            self.select(square)?;
            Ok(ClickOutcome::Selected(square))
        } else {
            Ok(ClickOutcome::Ignored)
        }
    }

    /// Resolves a screen pixel through `layout` and handles the click.
    ///
    /// Returns [`EngineError::OutOfBounds`] when the pixel is off the board;
    /// the selection is left as it was.
    pub fn click_at(
        &mut self,
        pixel: PixelPos,
        layout: &BoardLayout,
    ) -> Result<ClickOutcome, EngineError> {
        let square = layout.to_square(pixel);
        tracing::debug!(
            x = pixel.x,
            y = pixel.y,
            square = ?square.map(Square::to_algebraic),
            "pixel resolved"
        );
        self.click(square.ok_or(EngineError::OutOfBounds)?)
    }

    fn owns(&self, square: Square) -> bool {
        self.board.cell(square).is_owned_by(self.board.side_to_move)
    }

    fn ensure_in_play(&self) -> Result<(), EngineError> {
        if self.status.is_terminal() {
            Err(EngineError::GameOver(self.status))
        } else {
            Ok(())
        }
    }

    /// Applies a move already known to be legal.
    fn apply_move(&mut self, m: Move) -> GameStatus {
        let piece = match self.board.piece_at(m.from) {
            Some(piece) => piece,
            None => unreachable!("legal move {} starts on an empty square", m),
        };
        let captured = if m.is_en_passant {
            Square::new(m.to.file(), m.from.rank()).and_then(|sq| self.board.piece_at(sq))
        } else {
            self.board.piece_at(m.to)
        };
        let hash_before = self.board.zobrist_hash();

        self.moves.push(GameMove {
            mv: m,
            piece,
            captured,
            hash_before,
        });
        self.board = self.rules.make_move(&self.board, m);
        self.positions.push(self.board.zobrist_hash());

        tracing::info!(
            ply = self.moves.len(),
            mv = %m,
            side = %piece.side,
            piece = %piece.kind,
            captured = ?captured.map(|p| p.kind),
            "move executed"
        );

        self.state = SelectionState::AwaitingSelection;
        self.update_status();
        self.status
    }

    /// Recomputes the status and moves to `GameOver` when it is terminal.
    fn update_status(&mut self) {
        let status = self.rules.status(&self.board, self.position_count());
        if status != self.status {
            tracing::info!(from = %self.status, to = %status, "status changed");
        }
        self.status = status;
        if status.is_terminal() {
            self.state = SelectionState::GameOver(status);
        }
    }
}
