//! Predicates and actions of the special-move kinds.

use super::move_vocabulary::SpecialMove;
use super::{ChessBoard, ChessField, Piece, PieceId, PieceType};

const KING_HOME_COL: u8 = 4;

impl ChessBoard {
    /// Whether `kind` may currently take the piece to `target`.
    pub(crate) fn special_move_applies(&self, id: PieceId, kind: SpecialMove, target: ChessField) -> bool {
        let Some(piece) = self.piece(id) else {
            return false;
        };
        let on_approach_row = piece.field.row == piece.color.promotion_approach_row();

        match kind {
            SpecialMove::PawnStep => self.occupant(target).is_none(),
            SpecialMove::PawnDoubleStep => {
                !piece.has_moved
                    && self.occupant(target).is_none()
                    && piece
                        .field
                        .translate(0, piece.color.forward())
                        .is_ok_and(|between| self.occupant(between).is_none())
            }
            SpecialMove::StraightPromotion => on_approach_row && self.occupant(target).is_none(),
            SpecialMove::DiagonalCapture => self.is_enemy(target, piece.color),
            SpecialMove::DiagonalCapturePromotion => on_approach_row && self.is_enemy(target, piece.color),
            SpecialMove::KingStep => !self.is_friendly(target, piece.color),
            SpecialMove::CastleLeft => self.can_castle(piece, 0),
            SpecialMove::CastleRight => self.can_castle(piece, 7),
        }
    }

    /// King and the rook in `rook_col` of the same row are both unmoved, the
    /// squares between them are empty, and neither the king's square nor the two
    /// it crosses are attacked.
    fn can_castle(&self, king: &Piece, rook_col: u8) -> bool {
        let row = king.color.back_row();
        if king.has_moved || king.field != ChessField::new(row, KING_HOME_COL) {
            return false;
        }
        let rook_is_ready = self
            .piece_at(ChessField::new(row, rook_col))
            .is_some_and(|rook| rook.kind == PieceType::Rook && rook.color == king.color && !rook.has_moved);
        if !rook_is_ready {
            return false;
        }

        let (low, high) = if rook_col < KING_HOME_COL {
            (rook_col + 1, KING_HOME_COL)
        } else {
            (KING_HOME_COL + 1, rook_col)
        };
        if (low..high).any(|col| self.occupant(ChessField::new(row, col)).is_some()) {
            return false;
        }

        let direction: i8 = if rook_col < KING_HOME_COL { -1 } else { 1 };
        (0..=2).all(|step| {
            king.field
                .translate(direction * step, 0)
                .is_ok_and(|field| self.attacked(field, king.color).is_empty())
        })
    }

    /// Carries out a special move for real. Returns the captured piece, if any.
    pub(crate) fn apply_special_move(&mut self, id: PieceId, kind: SpecialMove, target: ChessField) -> Option<Piece> {
        let from = self.piece(id)?.field;
        match kind {
            SpecialMove::CastleLeft | SpecialMove::CastleRight => {
                let (rook_col, direction) = if kind == SpecialMove::CastleLeft { (0, -1) } else { (7, 1) };
                let rook = self.occupant(ChessField::new(from.row, rook_col));
                let captured = self.relocate(id, target);
                if let (Some(rook), Ok(rook_target)) = (rook, from.translate(direction, 0)) {
                    self.relocate(rook, rook_target);
                }
                captured
            }
            SpecialMove::StraightPromotion | SpecialMove::DiagonalCapturePromotion => {
                let captured = self.relocate(id, target);
                self.pending_promotion = Some(id);
                captured
            }
            SpecialMove::PawnStep | SpecialMove::PawnDoubleStep | SpecialMove::DiagonalCapture | SpecialMove::KingStep => {
                self.relocate(id, target)
            }
        }
    }
}
