//! ASCII board rendering

use std::fmt;

use crate::board::Hex;
use crate::game::Board;

/// A board paired with its radius, printable with `{}`
///
/// Rows run from the highest `r` down, each shifted right by its distance
/// from the top so the hexagon reads naturally. Stones print as `B`/`R`,
/// empty cells as `.`.
pub struct BoardView<'a> {
    pub board: &'a Board,
    pub radius: i8,
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.radius - 1;

        write!(f, " r     q ")?;
        for q in -span..=span {
            write!(f, " {:2}", q)?;
        }
        writeln!(f)?;

        for r in (-span..=span).rev() {
            write!(f, "{:2} {}", r, " ".repeat((r + span) as usize))?;
            for q in -span..=span {
                let cell = Hex::new(q, r);
                match self.board.get(cell) {
                    Some(player) => write!(f, " {} ", player.symbol())?,
                    None if cell.in_bounds(self.radius) => write!(f, " . ")?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Draw the board as text, highest `r` row first
pub fn render_board(board: &Board, radius: i8) -> String {
    BoardView { board, radius }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::Player;

    #[test]
    fn test_render_counts_cells() {
        let game = GameConfig::dodo(4).unwrap();
        let text = render_board(&Board::initial(&game), game.radius());
        assert_eq!(text.lines().count(), 8);
        assert_eq!(text.matches('B').count(), 13);
        assert_eq!(text.matches('R').count(), 13);
        assert_eq!(text.matches('.').count(), 37 - 26);
    }

    #[test]
    fn test_render_top_row_first() {
        let game = GameConfig::gopher(3).unwrap();
        let board = Board::from_cells([(Hex::new(0, 2), Player::First)], &game).unwrap();
        let text = render_board(&board, game.radius());
        let second_line = text.lines().nth(1).unwrap();
        assert!(second_line.starts_with(" 2"));
        assert!(second_line.contains('B'));
    }

    #[test]
    fn test_view_formats_like_render() {
        let game = GameConfig::gopher(2).unwrap();
        let board = Board::from_cells([(Hex::new(0, 0), Player::Second)], &game).unwrap();
        let view = BoardView { board: &board, radius: game.radius() };
        assert_eq!(format!("{view}"), render_board(&board, game.radius()));
        assert_eq!(
            render_board(&board, 2),
            concat!(
                " r     q  -1  0  1\n",
                " 1    .  .    \n",
                " 0   .  R  . \n",
                "-1     .  . \n",
            )
        );
    }
}
