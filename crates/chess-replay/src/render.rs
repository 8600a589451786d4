//! Text rendering of the board for terminals.

use chess_core::{PieceTable, Square};
use chess_rules::{Board, LegalMoveSet};

/// Draws the board with rank 8 on top, using `glyphs` for pieces.
///
/// Destinations of `highlight` are marked with `*` on empty squares and
/// the piece glyph in brackets on captures.
pub fn draw(board: &Board, glyphs: &PieceTable<char>, highlight: Option<&LegalMoveSet>) -> String {
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8u8 {
            let Some(square) = Square::new(file, rank) else {
                continue;
            };
            let marked = highlight.map(|h| h.contains(square)).unwrap_or(false);
            let cell = match board.piece_at(square) {
                Some(piece) => {
                    let glyph = *glyphs.get(piece.kind, piece.side);
                    if marked {
                        format!("[{}]", glyph)
                    } else {
                        format!(" {} ", glyph)
                    }
                }
                None if marked => " * ".to_string(),
                None => " . ".to_string(),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str("   a  b  c  d  e  f  g  h\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::Game;

    #[test]
    fn startpos_rows() {
        let text = draw(&Board::startpos(), &PieceTable::fen(), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  r  n  b  q  k  b  n  r ");
        assert_eq!(lines[4], "4  .  .  .  .  .  .  .  . ");
        assert_eq!(lines[7], "1  R  N  B  Q  K  B  N  R ");
    }

    #[test]
    fn highlights_destinations() {
        let mut game = Game::new();
        let g1 = Square::from_algebraic("g1").unwrap();
        let legal = game.select(g1).unwrap();
        let text = draw(game.board(), &PieceTable::fen(), Some(&legal));
        let rank3 = text.lines().nth(5).unwrap();
        assert_eq!(rank3, "3  .  .  .  .  .  *  .  * ");
    }
}
