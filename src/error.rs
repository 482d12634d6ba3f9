//! Error types for the rules engine.
//!
//! Out-of-bounds squares never escape move generation; the remaining variants
//! are caller mistakes that leave the board untouched.

use thiserror::Error;

use crate::chess_boards::chess_board::{ChessField, Color, PieceId, PieceType};

/// Errors that can occur while driving a game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A computed square falls outside the 8x8 grid
    #[error("Square out of bounds: col {col}, row {row}")]
    OutOfBounds { col: i8, row: i8 },

    /// Destination was not offered by `legal_destinations` this turn
    #[error("Illegal destination: {from} to {to}")]
    IllegalDestination { from: ChessField, to: ChessField },

    /// Promotion answered with a kind outside queen, rook, bishop and knight
    #[error("Invalid promotion choice: {0:?}")]
    InvalidPromotionChoice(PieceType),

    /// A pawn on this square is waiting for its promotion choice
    #[error("Pawn on {0} is waiting for a promotion choice")]
    PromotionPending(ChessField),

    #[error("No pawn is waiting for a promotion choice")]
    NoPromotionPending,

    /// A move onto the last rank was submitted without naming the new kind
    #[error("Move to {0} needs a promotion choice")]
    PromotionChoiceRequired(ChessField),

    #[error("Piece {0:?} is not on the board")]
    PieceNotOnBoard(PieceId),

    /// Two pieces were placed on the same square during setup
    #[error("Square {0} is already occupied")]
    SquareOccupied(ChessField),

    /// Setup did not provide exactly one king for a color
    #[error("Expected exactly one {color:?} king, found {count}")]
    KingCount { color: Color, count: usize },
}

/// Result type alias for rules engine operations
pub type ChessResult<T> = Result<T, ChessError>;
