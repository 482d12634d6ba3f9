use std::collections::BTreeSet;

use log::{info, trace};

use super::{ChessBoard, ChessField, Color, GameState, PieceId};

impl ChessBoard {
    /// Evaluates the position for the side to move and prunes its destinations.
    ///
    /// The king's steps and castles are tried one by one on the live board and
    /// every destination that leaves it attacked is dropped. When the king is in
    /// check, every other piece of its color may only capture one of the
    /// attackers. Blocking a sliding attacker is not considered a response, and
    /// outside of check pinned pieces keep all their moves.
    ///
    /// Expects freshly regenerated moves; leaves them regenerated and pruned.
    pub(crate) fn resolve_check(&mut self) -> GameState {
        let color = self.active_color;
        let king = self.king(color);
        self.restrict_king_escapes(king);

        let attackers = self.attacker_squares(color);
        let state = if attackers.is_empty() {
            if self.pieces_of(color).into_iter().any(|id| !self.cached_destinations(id).is_empty()) {
                GameState::Normal
            } else {
                GameState::Stalemate(color)
            }
        } else {
            let others_respond = self.restrict_to_captures(color, king, &attackers);
            let king_escapes = self.piece(king).is_some_and(|k| !k.special_moves.is_empty());
            if !king_escapes && (attackers.len() > 1 || !others_respond) {
                GameState::Checkmate(color)
            } else {
                GameState::InCheck(color)
            }
        };

        if state != self.state {
            info!("{}", state);
        }
        self.state = state;
        state
    }

    fn restrict_king_escapes(&mut self, king: PieceId) {
        let candidates: Vec<ChessField> = self
            .piece(king)
            .map(|k| k.special_moves.keys().copied().collect())
            .unwrap_or_default();
        let rejected: Vec<ChessField> = candidates
            .into_iter()
            .filter(|destination| !self.king_destination_is_safe(king, *destination))
            .collect();

        // Trying the destinations left the caches describing the last simulated position
        self.regenerate_all_moves();
        if let Some(k) = self.piece_mut(king) {
            for destination in rejected {
                k.special_moves.remove(&destination);
            }
        }
    }

    /// Tries the king on `destination` and reports whether it would be safe there.
    ///
    /// Only grid slots change during the trial. The grid and the king's field are
    /// restored before returning, the move caches are not.
    pub(crate) fn king_destination_is_safe(&mut self, king: PieceId, destination: ChessField) -> bool {
        let Some((origin, color)) = self.piece(king).map(|k| (k.field, k.color)) else {
            return false;
        };
        let snapshot = self.squares;
        let fingerprint = cfg!(debug_assertions).then(|| self.position_hash());

        // Whatever stands on the destination is only shadowed, not captured
        self.remove(origin);
        self.set_slot(destination, king);
        if let Some(k) = self.piece_mut(king) {
            k.field = destination;
        }
        self.regenerate_all_moves();
        let safe = self.attacked(destination, color).is_empty();

        self.squares = snapshot;
        if let Some(k) = self.piece_mut(king) {
            k.field = origin;
        }
        debug_assert_eq!(fingerprint, Some(self.position_hash()), "king destination trial did not roll back");

        if !safe {
            trace!("{} king cannot go from {} to {}", color, origin, destination);
        }
        safe
    }

    /// Keeps only captures of an attacker for every piece of `color` but the
    /// king. Returns whether any of them still has a destination.
    fn restrict_to_captures(&mut self, color: Color, king: PieceId, attackers: &BTreeSet<ChessField>) -> bool {
        let mut any_response = false;
        for id in self.pieces_of(color) {
            if id == king {
                continue;
            }
            if let Some(piece) = self.piece_mut(id) {
                piece.plain_moves.retain(|field| attackers.contains(field));
                piece.special_moves.retain(|field, _| attackers.contains(field));
                any_response |= !piece.plain_moves.is_empty() || !piece.special_moves.is_empty();
            }
        }
        any_response
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use super::*;

    #[test]
    fn test_king_destination_check_rolls_back() {
        let mut board = board_from(Color::White, &["Ke1", "rd2", "kh8"]);
        let king = id_at(&board, "e1");
        let rook = id_at(&board, "d2");
        let squares = board.squares;
        let hash = board.position_hash();

        assert!(!board.king_destination_is_safe(king, field("e2")));
        assert_eq!(board.squares, squares);
        assert_eq!(board.position_hash(), hash);
        assert_eq!(board.piece(king).unwrap().field, field("e1"));

        // Capturing the rook on d2 is safe, and the rook is back afterwards
        assert!(board.king_destination_is_safe(king, field("d2")));
        assert_eq!(board.occupant(field("d2")), Some(rook));
        assert_eq!(board.squares, squares);
    }

    #[test]
    fn test_king_never_steps_into_attack() {
        let board = board_from(Color::White, &["Ke1", "ra2", "kh8"]);
        assert_eq!(board.game_state(), GameState::Normal);
        assert_fields(board.legal_destinations(id_at(&board, "e1")).iter(), vec!["d1", "f1"]);
    }

    #[test]
    fn test_single_capture_response_is_check() {
        let board = board_from(Color::White, &["Kh1", "Pg2", "Ph2", "Nb3", "ra1", "ka8"]);
        assert_eq!(board.game_state(), GameState::InCheck(Color::White));
        assert_fields(board.legal_destinations(id_at(&board, "b3")).iter(), vec!["a1"]);
        assert!(board.legal_destinations(id_at(&board, "g2")).is_empty());
        assert!(board.legal_destinations(id_at(&board, "h1")).is_empty());
    }

    #[test]
    fn test_back_rank_checkmate() {
        let board = board_from(Color::White, &["Kh1", "Pg2", "Ph2", "ra1", "ka8"]);
        assert_eq!(board.game_state(), GameState::Checkmate(Color::White));
        assert!(board
            .pieces_of(Color::White)
            .into_iter()
            .all(|id| board.legal_destinations(id).is_empty()));
    }

    #[test]
    fn test_double_check_needs_a_king_move() {
        // The knight could take the rook but the king is still attacked by the other knight
        let board = board_from(Color::White, &["Kh1", "Pg2", "Ph2", "Nb3", "ra1", "nf2", "ka8"]);
        assert_eq!(board.attacker_squares(Color::White).len(), 2);
        assert_eq!(board.game_state(), GameState::Checkmate(Color::White));
    }

    #[test]
    fn test_interposition_is_not_a_response() {
        // Rc2-c1 would block, but only captures of the attacker count
        let board = board_from(Color::White, &["Kh1", "Pg2", "Ph2", "Rc2", "ra1", "ka8"]);
        assert_eq!(board.game_state(), GameState::Checkmate(Color::White));
    }

    #[test]
    fn test_king_captures_the_checking_piece() {
        let board = board_from(Color::Black, &["Ke1", "Qg7", "kh8"]);
        assert_eq!(board.game_state(), GameState::InCheck(Color::Black));
        assert_fields(board.legal_destinations(id_at(&board, "h8")).iter(), vec!["g7"]);

        // Defended by the pawn, so g7 is no escape either
        let board = board_from(Color::Black, &["Ke1", "Qg7", "Pf6", "kh8"]);
        assert_eq!(board.game_state(), GameState::Checkmate(Color::Black));
    }

    #[test]
    fn test_stalemate() {
        let board = board_from(Color::White, &["Ka1", "rb3", "rh2", "kb8"]);
        assert_eq!(board.game_state(), GameState::Stalemate(Color::White));
        assert!(board.game_state().is_terminal());
    }

    #[test]
    fn test_pieces_are_not_pinned_outside_check() {
        let mut board = board_from(Color::White, &["Ke1", "Be2", "re8", "ka8"]);
        assert_eq!(board.game_state(), GameState::Normal);
        let bishop = id_at(&board, "e2");
        assert!(board.legal_destinations(bishop).contains(&field("d3")));

        // Leaving the file uncovers the king, and the move is still accepted
        assert_eq!(board.commit_move(bishop, field("d3")), Ok(GameState::Normal));
        assert!(board.is_in_check(Color::White));
        let rook = board.legal_destinations(id_at(&board, "e8"));
        assert!(rook.contains(&field("e2")));
        assert!(!rook.contains(&field("e1")));
    }
}
