use std::collections::BTreeSet;

use super::move_vocabulary::SpecialMove;
use super::{ChessBoard, ChessField, Color, Piece, PieceId, PieceType};

impl ChessBoard {
    /// Every piece of the other color that currently threatens `field`.
    ///
    /// Reads the destination caches of sliders and knights, so it must only be
    /// called after the moves have been regenerated for the current grid.
    pub fn attacked(&self, field: ChessField, defending: Color) -> Vec<PieceId> {
        self.pieces_with_coordinates()
            .filter_map(|(_, id)| self.piece(id).map(|piece| (id, piece)))
            .filter(|(_, piece)| piece.color != defending && Self::threatens(piece, field))
            .map(|(id, _)| id)
            .collect()
    }

    fn threatens(piece: &Piece, target: ChessField) -> bool {
        match piece.kind {
            // Only the forward diagonals, never the pushes
            PieceType::Pawn => [-1, 1]
                .iter()
                .any(|&dx| piece.field.translate(dx, piece.color.forward()) == Ok(target)),
            // The raw step shape; the king's current destinations depend on check detection
            PieceType::King => piece
                .specials
                .iter()
                .filter(|(_, entries)| entries.contains(&SpecialMove::KingStep))
                .any(|(&((dx, dy), _), _)| piece.field.translate(dx, dy) == Ok(target)),
            _ => piece.plain_moves.contains(&target) || piece.special_moves.contains_key(&target),
        }
    }

    pub fn is_square_attacked_by_color(&self, field: ChessField, attacker: Color) -> bool {
        !self.attacked(field, attacker.opposite()).is_empty()
    }

    /// Squares holding the pieces that give check to `color`'s king.
    pub fn attacker_squares(&self, color: Color) -> BTreeSet<ChessField> {
        let Some(king) = self.piece(self.king(color)) else {
            return BTreeSet::new();
        };
        self.attacked(king.field, color)
            .into_iter()
            .filter_map(|id| self.piece(id).map(|p| p.field))
            .collect()
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        !self.attacker_squares(color).is_empty()
    }
}
