pub mod chess_board;
pub mod perft;

use chess_board::{ChessBoard, Color, GameState, Move, PROMOTION_CHOICES};
use crate::error::ChessResult;

/// What a driver (CLI, perft, playouts) needs from a rules engine.
pub trait Board {
    fn make_move(&mut self, mv: &Move) -> ChessResult<GameState>;
    fn hash(&self) -> u64;
    fn active_color(&self) -> Color;
    fn game_state(&self) -> GameState;
    fn render_to_string(&self) -> String;

    /// Every move the side to move may play, one per promotion choice.
    fn get_legal_moves(&self) -> Vec<Move>;

    fn is_check(&self) -> bool {
        matches!(self.game_state(), GameState::InCheck(_) | GameState::Checkmate(_))
    }

    fn is_checkmate(&self) -> bool {
        matches!(self.game_state(), GameState::Checkmate(_))
    }

    fn is_stalemate(&self) -> bool {
        matches!(self.game_state(), GameState::Stalemate(_))
    }
}

impl Board for ChessBoard {
    fn make_move(&mut self, mv: &Move) -> ChessResult<GameState> {
        ChessBoard::make_move(self, mv)
    }

    fn hash(&self) -> u64 {
        self.position_hash()
    }

    fn active_color(&self) -> Color {
        ChessBoard::active_color(self)
    }

    fn game_state(&self) -> GameState {
        ChessBoard::game_state(self)
    }

    fn render_to_string(&self) -> String {
        ChessBoard::render_to_string(self)
    }

    fn get_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for id in self.pieces_of(ChessBoard::active_color(self)) {
            let Some(piece) = self.piece(id) else {
                continue;
            };
            for to in self.legal_destinations(id).iter() {
                let mv = Move::new(piece.field, to);
                if piece.special_moves.get(&to).is_some_and(|special| special.is_promotion()) {
                    moves.extend(PROMOTION_CHOICES.iter().map(|kind| mv.with_promotion(*kind)));
                } else {
                    moves.push(mv);
                }
            }
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::chess_board::test_utils::{board_from, field};
    use super::chess_board::PieceType;
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    #[test]
    fn test_legal_moves_expand_promotions() {
        let board = board_from(Color::White, &["Pa7", "Kh1", "kh8"]);
        let moves: Vec<_> = board
            .get_legal_moves()
            .into_iter()
            .filter(|m| m.from == field("a7"))
            .collect();
        assert_eq!(moves.len(), 4);
        assert!(moves.contains(&Move::new(field("a7"), field("a8")).with_promotion(PieceType::Knight)));
    }

    #[test]
    fn test_trait_state_queries() {
        let board = board_from(Color::White, &["kb8", "rb3", "rh2", "Ka1"]);
        assert!(board.is_stalemate());
        assert!(!board.is_check());
        assert!(board.get_legal_moves().is_empty());

        let board = board_from(Color::White, &["Kh1", "Pg2", "Ph2", "ra1", "ka8"]);
        assert!(board.is_check());
        assert!(board.is_checkmate());
    }

    #[test]
    fn test_random_playouts_keep_invariants() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..5 {
            let mut board = ChessBoard::new();
            for _ in 0..120 {
                if board.game_state().is_terminal() {
                    break;
                }
                let moves = board.get_legal_moves();
                assert!(!moves.is_empty(), "{} without moves", board.game_state());
                for mv in &moves {
                    let mover = board.piece_at(mv.from).unwrap();
                    assert_eq!(mover.color, board.active_color());
                    assert!(board
                        .piece_at(mv.to)
                        .map_or(true, |p| p.color != mover.color && p.kind != PieceType::King));
                }

                let mv = moves[rng.gen_range(0..moves.len())];
                let hash = board.hash();
                board.make_move(&mv).unwrap();
                assert_ne!(board.hash(), hash);
                assert!(board.pending_promotion().is_none());
            }
        }
    }
}
