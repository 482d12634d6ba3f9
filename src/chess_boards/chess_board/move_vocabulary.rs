//! Data describing how each kind of piece moves.
//!
//! A piece carries a *move set* of offset vectors walked by the generic
//! generator, and a *special table* of entries whose moves are only
//! available while their predicate holds. Kings have no move set at all: every
//! king move, including the plain one-square steps, goes through the special
//! table so that it can be tried for safety.

use std::collections::BTreeMap;

use super::model::{Color, PieceType};

/// One axis of an offset vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// A literal displacement.
    Fixed(i8),
    /// Keep walking in the positive direction until blocked.
    PosInfinite,
    /// Keep walking in the negative direction until blocked.
    NegInfinite,
}

impl Axis {
    fn step(&self) -> i8 {
        match self {
            Axis::Fixed(d) => *d,
            Axis::PosInfinite => 1,
            Axis::NegInfinite => -1,
        }
    }

    fn is_infinite(&self) -> bool {
        !matches!(self, Axis::Fixed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveVector {
    pub dx: Axis,
    pub dy: Axis,
}

impl MoveVector {
    pub const fn fixed(dx: i8, dy: i8) -> Self {
        Self {
            dx: Axis::Fixed(dx),
            dy: Axis::Fixed(dy),
        }
    }

    pub const fn ray(dx: Axis, dy: Axis) -> Self {
        Self { dx, dy }
    }

    /// A vector with at least one infinite axis is a sliding ray.
    pub fn is_sliding(&self) -> bool {
        self.dx.is_infinite() || self.dy.is_infinite()
    }

    /// Displacement of a single step (fixed vectors take exactly one).
    pub fn step(&self) -> (i8, i8) {
        (self.dx.step(), self.dy.step())
    }
}

use Axis::{Fixed, NegInfinite as Neg, PosInfinite as Pos};

pub const ROOK_RAYS: [MoveVector; 4] = [
    MoveVector::ray(Fixed(0), Pos),
    MoveVector::ray(Fixed(0), Neg),
    MoveVector::ray(Pos, Fixed(0)),
    MoveVector::ray(Neg, Fixed(0)),
];

pub const BISHOP_RAYS: [MoveVector; 4] = [
    MoveVector::ray(Pos, Pos),
    MoveVector::ray(Pos, Neg),
    MoveVector::ray(Neg, Pos),
    MoveVector::ray(Neg, Neg),
];

pub const QUEEN_RAYS: [MoveVector; 8] = [
    MoveVector::ray(Fixed(0), Pos),
    MoveVector::ray(Fixed(0), Neg),
    MoveVector::ray(Pos, Fixed(0)),
    MoveVector::ray(Neg, Fixed(0)),
    MoveVector::ray(Pos, Pos),
    MoveVector::ray(Pos, Neg),
    MoveVector::ray(Neg, Pos),
    MoveVector::ray(Neg, Neg),
];

pub const KNIGHT_JUMPS: [MoveVector; 8] = [
    MoveVector::fixed(1, 2),
    MoveVector::fixed(1, -2),
    MoveVector::fixed(-1, 2),
    MoveVector::fixed(-1, -2),
    MoveVector::fixed(2, 1),
    MoveVector::fixed(2, -1),
    MoveVector::fixed(-2, 1),
    MoveVector::fixed(-2, -1),
];

pub const KING_STEPS: [(i8, i8); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

pub fn move_set(kind: PieceType) -> &'static [MoveVector] {
    match kind {
        PieceType::Knight => &KNIGHT_JUMPS,
        PieceType::Bishop => &BISHOP_RAYS,
        PieceType::Rook => &ROOK_RAYS,
        PieceType::Queen => &QUEEN_RAYS,
        PieceType::Pawn | PieceType::King => &[],
    }
}

/// Closed set of conditional moves. Each kind has its own predicate and
/// action, see `special_moves.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialMove {
    PawnStep,
    PawnDoubleStep,
    DiagonalCapture,
    DiagonalCapturePromotion,
    StraightPromotion,
    CastleLeft,
    CastleRight,
    KingStep,
}

impl SpecialMove {
    pub fn is_promotion(&self) -> bool {
        matches!(self, SpecialMove::DiagonalCapturePromotion | SpecialMove::StraightPromotion)
    }
}

/// Key of a special table entry: the displacement the move produces and a
/// discriminant keeping apart entries that share a displacement.
pub type SpecialKey = ((i8, i8), u8);

/// Candidate kinds per key, in priority order.
pub type SpecialTable = BTreeMap<SpecialKey, &'static [SpecialMove]>;

const DOUBLE_STEP: &[SpecialMove] = &[SpecialMove::PawnDoubleStep];
const DIAGONAL: &[SpecialMove] = &[SpecialMove::DiagonalCapturePromotion, SpecialMove::DiagonalCapture];
const STRAIGHT: &[SpecialMove] = &[SpecialMove::StraightPromotion, SpecialMove::PawnStep];
const STEP: &[SpecialMove] = &[SpecialMove::KingStep];
const CASTLE_LEFT: &[SpecialMove] = &[SpecialMove::CastleLeft];
const CASTLE_RIGHT: &[SpecialMove] = &[SpecialMove::CastleRight];

pub fn special_table(kind: PieceType, color: Color) -> SpecialTable {
    match kind {
        PieceType::Pawn => {
            let forward = color.forward();
            SpecialTable::from([
                (((0, 2 * forward), 0), DOUBLE_STEP),
                (((-1, forward), 1), DIAGONAL),
                (((1, forward), 2), DIAGONAL),
                (((0, forward), 3), STRAIGHT),
            ])
        }
        PieceType::King => {
            let mut table: SpecialTable = KING_STEPS
                .iter()
                .enumerate()
                .map(|(i, &offset)| ((offset, i as u8), STEP))
                .collect();
            table.insert(((-2, 0), 8), CASTLE_LEFT);
            table.insert(((2, 0), 9), CASTLE_RIGHT);
            table
        }
        _ => SpecialTable::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_vectors() {
        assert!(ROOK_RAYS.iter().all(|v| v.is_sliding()));
        assert!(QUEEN_RAYS.iter().all(|v| v.is_sliding()));
        assert!(!KNIGHT_JUMPS.iter().any(|v| v.is_sliding()));
        assert_eq!(MoveVector::ray(Neg, Fixed(0)).step(), (-1, 0));
        assert_eq!(MoveVector::fixed(2, -1).step(), (2, -1));
    }

    #[test]
    fn test_king_has_no_move_set() {
        assert!(move_set(PieceType::King).is_empty());
        let table = special_table(PieceType::King, Color::White);
        assert_eq!(table.len(), 10);
        assert_eq!(table.values().filter(|entries| **entries == STEP).count(), 8);
        assert_eq!(table.get(&((2, 0), 9)), Some(&CASTLE_RIGHT));
    }

    #[test]
    fn test_pawn_table_follows_color() {
        let white = special_table(PieceType::Pawn, Color::White);
        let black = special_table(PieceType::Pawn, Color::Black);
        assert!(white.contains_key(&((0, 2), 0)));
        assert!(black.contains_key(&((0, -2), 0)));
        // promotion entries pre-empt the ordinary ones
        assert_eq!(white[&((0, 1), 3)][0], SpecialMove::StraightPromotion);
        assert_eq!(black[&((-1, -1), 1)][0], SpecialMove::DiagonalCapturePromotion);
        assert!(special_table(PieceType::Rook, Color::Black).is_empty());
    }
}
