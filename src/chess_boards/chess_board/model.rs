use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::move_vocabulary::{self, MoveVector, SpecialMove, SpecialTable};
use super::ChessBoard;
use crate::error::{ChessError, ChessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Row direction in which this color's pawns advance.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn back_row(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_row(&self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// The row a pawn must stand on for its next step to reach the last rank.
    pub fn promotion_approach_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// The kinds a pawn may turn into on the last rank.
pub const PROMOTION_CHOICES: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

impl PieceType {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

/// A square on the board. `row` 0 is White's back rank, `col` 0 is the a-file.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct ChessField {
    pub row: u8,
    pub col: u8,
}

impl ChessField {
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8, "field ({}, {}) is off the board", row, col);
        Self { row, col }
    }

    /// Builds a field from signed coordinates, failing when they leave the grid.
    pub fn try_new(row: i8, col: i8) -> ChessResult<Self> {
        if ChessBoard::in_bounds(row, col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(ChessError::OutOfBounds { col, row })
        }
    }

    /// The field displaced by `dx` files and `dy` ranks.
    pub fn translate(&self, dx: i8, dy: i8) -> ChessResult<Self> {
        Self::try_new(self.row as i8 + dy, self.col as i8 + dx)
    }

    pub fn from_algebraic(algebraic: &str) -> Option<Self> {
        let mut chars = algebraic.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Some(Self {
            row: rank as u8 - b'1',
            col: file as u8 - b'a',
        })
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.row, self.col)
    }
}

impl fmt::Display for ChessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

/// A coordinate pair move as typed at the command line, e.g. `e2e4` or `e7e8q`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct Move {
    pub from: ChessField,
    pub to: ChessField,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: ChessField, to: ChessField) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion);
        self
    }

    pub fn as_algebraic(&self) -> String {
        let base_move = format!("{}{}", self.from, self.to);
        if let Some(promo) = self.promotion {
            base_move + &promo.to_string().to_lowercase()
        } else {
            base_move
        }
    }

    pub fn from_algebraic(algebraic: &str) -> Option<Self> {
        if !algebraic.is_ascii() || !(4..=5).contains(&algebraic.len()) {
            return None;
        }
        let from = ChessField::from_algebraic(&algebraic[0..2])?;
        let to = ChessField::from_algebraic(&algebraic[2..4])?;
        let promotion = match algebraic.chars().nth(4) {
            Some(c) => Some(PieceType::from_char(c)?),
            None => None,
        };
        Some(Self { from, to, promotion })
    }
}

pub fn to_algebraic_square(row: u8, col: u8) -> String {
    let file = (b'a' + col) as char;
    let rank = row + 1;
    format!("{}{}", file, rank)
}

/// Stable handle of a piece inside the board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
    pub field: ChessField,
    pub has_moved: bool,
    pub move_set: &'static [MoveVector],
    pub specials: SpecialTable,
    /// Destinations reached through the move set, valid for the current turn only.
    pub plain_moves: BTreeSet<ChessField>,
    /// Destinations reached through the special table, valid for the current turn only.
    pub special_moves: BTreeMap<ChessField, SpecialMove>,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType, field: ChessField) -> Self {
        Self {
            color,
            kind,
            field,
            has_moved: false,
            move_set: move_vocabulary::move_set(kind),
            specials: move_vocabulary::special_table(kind, color),
            plain_moves: BTreeSet::new(),
            special_moves: BTreeMap::new(),
        }
    }

    pub fn to_char(&self) -> char {
        let c = self.kind.to_string().chars().next().unwrap_or('?');
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Upper case is White, lower case is Black.
    pub fn from_char(c: char) -> Option<(Color, PieceType)> {
        let kind = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some((color, kind))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Normal,
    InCheck(Color),
    Checkmate(Color),
    Stalemate(Color),
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::Checkmate(_) | GameState::Stalemate(_))
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Normal => write!(f, "normal"),
            GameState::InCheck(color) => write!(f, "{} is in check", color),
            GameState::Checkmate(color) => write!(f, "{} is checkmated", color),
            GameState::Stalemate(color) => write!(f, "{} is stalemated", color),
        }
    }
}

/// Raised when a pawn has reached the last rank and waits for its new kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRequest {
    pub pawn: PieceId,
    pub color: Color,
    pub field: ChessField,
    pub choices: [PieceType; 4],
}

/// The squares a piece may move to this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destinations {
    pub plain: BTreeSet<ChessField>,
    pub special: BTreeSet<ChessField>,
}

impl Destinations {
    pub fn contains(&self, field: &ChessField) -> bool {
        self.plain.contains(field) || self.special.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.special.is_empty()
    }

    pub fn len(&self) -> usize {
        self.plain.len() + self.special.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ChessField> + '_ {
        self.plain.iter().chain(self.special.iter()).copied()
    }
}
