use std::collections::{BTreeMap, BTreeSet};

use super::move_vocabulary::{MoveVector, SpecialMove};
use super::{ChessBoard, ChessField, Color, PieceId, PieceType};

impl ChessBoard {
    /// Recomputes the plain and special destinations of every piece on the board.
    pub fn regenerate_all_moves(&mut self) {
        let (kings, others): (Vec<PieceId>, Vec<PieceId>) = self
            .pieces_with_coordinates()
            .map(|(_, id)| id)
            .partition(|id| self.piece(*id).is_some_and(|p| p.kind == PieceType::King));

        // Castling asks the attack scanner about empty squares, which reads the
        // destinations of the other pieces, so kings go last.
        for id in others.into_iter().chain(kings) {
            self.regenerate_moves(id);
        }
    }

    pub fn regenerate_moves(&mut self, id: PieceId) {
        let plain = self.generate_plain_moves(id);
        let special = self.generate_special_moves(id);
        if let Some(piece) = self.piece_mut(id) {
            piece.plain_moves = plain;
            piece.special_moves = special;
        }
    }

    /// Squares reached by walking the piece's move set.
    pub fn generate_plain_moves(&self, id: PieceId) -> BTreeSet<ChessField> {
        let mut moves = BTreeSet::new();
        let Some(piece) = self.piece(id) else {
            return moves;
        };

        for vector in piece.move_set {
            if vector.is_sliding() {
                self.generate_sliding_moves(piece.field, piece.color, vector, &mut moves);
            } else {
                let (dx, dy) = vector.step();
                if let Ok(target) = piece.field.translate(dx, dy) {
                    if !self.is_friendly(target, piece.color) {
                        moves.insert(target);
                    }
                }
            }
        }
        moves
    }

    fn generate_sliding_moves(&self, from: ChessField, color: Color, vector: &MoveVector, moves: &mut BTreeSet<ChessField>) {
        let (dx, dy) = vector.step();
        let mut current = from;
        while let Ok(next) = current.translate(dx, dy) {
            match self.piece_at(next) {
                None => {
                    moves.insert(next);
                }
                Some(p) => {
                    if p.color != color {
                        moves.insert(next);
                    }
                    break; // Block sliding
                }
            }
            current = next;
        }
    }

    /// Destinations of the special table: per entry, the first kind whose
    /// predicate holds wins and the rest are skipped.
    pub fn generate_special_moves(&self, id: PieceId) -> BTreeMap<ChessField, SpecialMove> {
        let mut moves = BTreeMap::new();
        let Some(piece) = self.piece(id) else {
            return moves;
        };

        for (&((dx, dy), _), entries) in &piece.specials {
            let Ok(target) = piece.field.translate(dx, dy) else {
                continue;
            };
            if let Some(kind) = entries
                .iter()
                .copied()
                .find(|kind| self.special_move_applies(id, *kind, target))
            {
                moves.insert(target, kind);
            }
        }
        moves
    }

    pub(crate) fn is_friendly(&self, field: ChessField, color: Color) -> bool {
        self.piece_at(field).is_some_and(|p| p.color == color)
    }

    pub(crate) fn is_enemy(&self, field: ChessField, color: Color) -> bool {
        self.piece_at(field).is_some_and(|p| p.color != color)
    }
}
