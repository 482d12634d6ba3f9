use log::{debug, info};

use super::{ChessBoard, ChessField, Color, Destinations, GameState, Move, Piece, PieceId, PieceType, PromotionRequest, PROMOTION_CHOICES};
use crate::error::{ChessError, ChessResult};

impl ChessBoard {
    /// Where `id` may go this turn.
    ///
    /// Empty for pieces of the side not to move, while a promotion is pending and
    /// once the game is over. The square of the enemy king is never offered.
    pub fn legal_destinations(&self, id: PieceId) -> Destinations {
        if self.state.is_terminal() || self.pending_promotion.is_some() || !self.is_on_board(id) {
            return Destinations::default();
        }
        match self.piece(id) {
            Some(piece) if piece.color == self.active_color => self.cached_destinations(id),
            _ => Destinations::default(),
        }
    }

    /// The current caches of `id` without the enemy king's square.
    pub(crate) fn cached_destinations(&self, id: PieceId) -> Destinations {
        let Some(piece) = self.piece(id) else {
            return Destinations::default();
        };
        let enemy_king = self.piece(self.king(piece.color.opposite())).map(|k| k.field);
        Destinations {
            plain: piece.plain_moves.iter().filter(|f| Some(**f) != enemy_king).copied().collect(),
            special: piece.special_moves.keys().filter(|f| Some(**f) != enemy_king).copied().collect(),
        }
    }

    /// Applies a destination previously offered by `legal_destinations` and passes
    /// the turn. A pawn reaching the last rank keeps the turn until `promote` is
    /// called. Rejected moves leave the board untouched.
    pub fn commit_move(&mut self, id: PieceId, destination: ChessField) -> ChessResult<GameState> {
        if let Some(pending) = self.pending_promotion() {
            return Err(ChessError::PromotionPending(pending.field));
        }
        let piece = self.piece(id).filter(|_| self.is_on_board(id)).ok_or(ChessError::PieceNotOnBoard(id))?;
        let (from, color, kind) = (piece.field, piece.color, piece.kind);
        let special = piece.special_moves.get(&destination).copied();
        if !self.legal_destinations(id).contains(&destination) {
            return Err(ChessError::IllegalDestination { from, to: destination });
        }

        let captured = match special {
            Some(special) => self.apply_special_move(id, special, destination),
            None => self.relocate(id, destination),
        };
        match captured {
            Some(captured) => debug!("{} {:?} {}x{} takes {:?}", color, kind, from, destination, captured.kind),
            None => debug!("{} {:?} {}-{}", color, kind, from, destination),
        }

        if self.pending_promotion.is_some() {
            return Ok(self.refresh_pending_state(color));
        }
        Ok(self.finish_turn())
    }

    /// The mover keeps the turn while its pawn waits on the last rank, but the
    /// pawn may have captured the piece that gave check.
    fn refresh_pending_state(&mut self, color: Color) -> GameState {
        self.regenerate_all_moves();
        let state = if self.is_in_check(color) {
            GameState::InCheck(color)
        } else {
            GameState::Normal
        };
        if state != self.state {
            info!("{}", state);
        }
        self.state = state;
        state
    }

    fn finish_turn(&mut self) -> GameState {
        self.active_color = self.active_color.opposite();
        self.regenerate_all_moves();
        self.resolve_check()
    }

    /// Set when `id` is a pawn that has just reached the last rank.
    pub fn promotion_required(&self, id: PieceId) -> Option<PromotionRequest> {
        if self.pending_promotion != Some(id) {
            return None;
        }
        let pawn = self.piece(id)?;
        Some(PromotionRequest {
            pawn: id,
            color: pawn.color,
            field: pawn.field,
            choices: PROMOTION_CHOICES,
        })
    }

    pub fn pending_promotion(&self) -> Option<PromotionRequest> {
        self.pending_promotion.and_then(|id| self.promotion_required(id))
    }

    /// Replaces the waiting pawn with a new piece of kind `choice` and passes the turn.
    pub fn promote(&mut self, choice: PieceType) -> ChessResult<GameState> {
        let request = self.pending_promotion().ok_or(ChessError::NoPromotionPending)?;
        if !request.choices.contains(&choice) {
            return Err(ChessError::InvalidPromotionChoice(choice));
        }

        self.remove(request.field);
        self.destroy(request.pawn);
        let mut piece = Piece::new(request.color, choice, request.field);
        piece.has_moved = true;
        let id = self.spawn(piece);
        self.place(id, request.field);
        self.pending_promotion = None;
        debug!("{} pawn on {} promoted to {:?}", request.color, request.field, choice);

        Ok(self.finish_turn())
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    /// Commits a coordinate move, answering the promotion in the same call.
    ///
    /// Moves onto the last rank must name the new kind, other moves must not.
    pub fn make_move(&mut self, mv: &Move) -> ChessResult<GameState> {
        if let Some(pending) = self.pending_promotion() {
            return Err(ChessError::PromotionPending(pending.field));
        }
        let illegal = ChessError::IllegalDestination { from: mv.from, to: mv.to };
        let id = self.occupant(mv.from).ok_or_else(|| illegal.clone())?;
        if !self.legal_destinations(id).contains(&mv.to) {
            return Err(illegal);
        }

        let promotes = self
            .piece(id)
            .and_then(|p| p.special_moves.get(&mv.to))
            .is_some_and(|special| special.is_promotion());
        match (promotes, mv.promotion) {
            (true, None) => Err(ChessError::PromotionChoiceRequired(mv.to)),
            (true, Some(choice)) if !PROMOTION_CHOICES.contains(&choice) => Err(ChessError::InvalidPromotionChoice(choice)),
            (false, Some(choice)) => Err(ChessError::InvalidPromotionChoice(choice)),
            (true, Some(choice)) => {
                self.commit_move(id, mv.to)?;
                self.promote(choice)
            }
            (false, None) => self.commit_move(id, mv.to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use super::*;

    #[test]
    fn test_starting_destinations() {
        let board = ChessBoard::new();
        let total: usize = board
            .pieces_of(Color::White)
            .into_iter()
            .map(|id| board.legal_destinations(id).len())
            .sum();
        assert_eq!(total, 20);
        // Black pieces are not on the move
        assert!(board.legal_destinations(id_at(&board, "b8")).is_empty());
        assert_eq!(board.game_state(), GameState::Normal);
    }

    #[test]
    fn test_commit_passes_the_turn() {
        let mut board = ChessBoard::new();
        let pawn = id_at(&board, "e2");
        assert_eq!(board.commit_move(pawn, field("e4")), Ok(GameState::Normal));
        assert_eq!(board.active_color(), Color::Black);
        assert_eq!(board.occupant(field("e4")), Some(pawn));
        assert!(board.legal_destinations(pawn).is_empty());
        assert_fields(board.legal_destinations(id_at(&board, "g8")).iter(), vec!["f6", "h6"]);
    }

    #[test]
    fn test_illegal_destination_leaves_board_unchanged() {
        let mut board = ChessBoard::new();
        let hash = board.position_hash();
        let knight = id_at(&board, "g1");
        assert_eq!(
            board.commit_move(knight, field("g3")),
            Err(ChessError::IllegalDestination { from: field("g1"), to: field("g3") })
        );
        // Not White's piece
        let err = board.commit_move(id_at(&board, "e7"), field("e5")).unwrap_err();
        assert_eq!(err, ChessError::IllegalDestination { from: field("e7"), to: field("e5") });
        assert_eq!(board.position_hash(), hash);
        assert_eq!(board.active_color(), Color::White);
    }

    #[test]
    fn test_promotion_flow() {
        let mut board = board_from(Color::White, &["Pb7", "Ke1", "ke8"]);
        let pawn = id_at(&board, "b7");
        assert_eq!(board.promote(PieceType::Queen), Err(ChessError::NoPromotionPending));

        board.commit_move(pawn, field("b8")).unwrap();
        assert_eq!(board.active_color(), Color::White);
        let request = board.promotion_required(pawn).unwrap();
        assert_eq!(request.field, field("b8"));
        assert_eq!(request.choices, PROMOTION_CHOICES);
        assert!(board.legal_destinations(id_at(&board, "e1")).is_empty());
        assert_eq!(
            board.commit_move(id_at(&board, "e1"), field("d1")),
            Err(ChessError::PromotionPending(field("b8")))
        );

        assert_eq!(board.promote(PieceType::King), Err(ChessError::InvalidPromotionChoice(PieceType::King)));
        assert!(board.pending_promotion().is_some());

        // The new rook gives check along the back rank
        assert_eq!(board.promote(PieceType::Rook), Ok(GameState::InCheck(Color::Black)));
        let rook = board.piece_at(field("b8")).unwrap();
        assert_eq!((rook.color, rook.kind, rook.has_moved), (Color::White, PieceType::Rook, true));
        assert!(board.piece(pawn).is_none());
        assert_eq!(board.active_color(), Color::Black);
        assert_fields(board.legal_destinations(id_at(&board, "e8")).iter(), vec!["d7", "e7", "f7"]);
    }

    #[test]
    fn test_make_move_with_promotion() {
        let mut board = board_from(Color::Black, &["pc2", "Ke5", "ke8"]);
        let err = board.make_move(&Move::from_algebraic("c2c1").unwrap()).unwrap_err();
        assert_eq!(err, ChessError::PromotionChoiceRequired(field("c1")));
        let err = board.make_move(&Move::from_algebraic("e8e7q").unwrap()).unwrap_err();
        assert_eq!(err, ChessError::InvalidPromotionChoice(PieceType::Queen));

        board.make_move(&Move::from_algebraic("c2c1n").unwrap()).unwrap();
        assert_eq!(board.piece_at(field("c1")).map(|p| p.kind), Some(PieceType::Knight));
        assert_eq!(board.active_color(), Color::White);
    }

    #[test]
    fn test_no_moves_after_checkmate() {
        // Fool's mate
        let mut board = ChessBoard::new();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            board.make_move(&Move::from_algebraic(mv).unwrap()).unwrap();
        }
        assert_eq!(board.game_state(), GameState::Checkmate(Color::White));
        assert!(board
            .pieces_of(Color::White)
            .into_iter()
            .all(|id| board.legal_destinations(id).is_empty()));
        let err = board.make_move(&Move::from_algebraic("e1f2").unwrap()).unwrap_err();
        assert_eq!(err, ChessError::IllegalDestination { from: field("e1"), to: field("f2") });
    }

    #[test]
    fn test_castling_through_commit() {
        let mut board = board_from(Color::White, &["Ke1", "Rh1", "ke8"]);
        let king = id_at(&board, "e1");
        assert!(board.legal_destinations(king).contains(&field("g1")));
        board.commit_move(king, field("g1")).unwrap();
        assert_eq!(board.piece_at(field("f1")).map(|p| p.kind), Some(PieceType::Rook));
        assert_eq!(board.occupant(field("h1")), None);
    }

    #[test]
    fn test_enemy_king_square_is_never_offered() {
        // Adjacent rook could "capture" the king if the position were not already lost
        let board = board_from(Color::White, &["Ke1", "Ra8", "kb8", "pb7"]);
        let rook = id_at(&board, "a8");
        assert!(board.piece(rook).unwrap().plain_moves.contains(&field("b8")));
        assert!(!board.legal_destinations(rook).contains(&field("b8")));
    }

    #[test]
    fn test_dead_piece_is_rejected() {
        let mut board = board_from(Color::White, &["Ke1", "Ra1", "ke8", "na8"]);
        let knight = id_at(&board, "a8");
        board.commit_move(id_at(&board, "a1"), field("a8")).unwrap();
        assert_eq!(board.commit_move(knight, field("b6")), Err(ChessError::PieceNotOnBoard(knight)));
    }

    #[test]
    fn test_promotion_capture_clears_check() {
        let mut board = board_from(Color::White, &["Ka1", "Pb7", "ra8", "kh8"]);
        assert_eq!(board.game_state(), GameState::InCheck(Color::White));
        let pawn = id_at(&board, "b7");
        assert!(board.legal_destinations(pawn).contains(&field("a8")));

        assert_eq!(board.commit_move(pawn, field("a8")), Ok(GameState::Normal));
        assert_eq!(board.game_state(), GameState::Normal);
        assert!(board.pending_promotion().is_some());

        assert_eq!(board.promote(PieceType::Queen), Ok(GameState::InCheck(Color::Black)));
    }
}
