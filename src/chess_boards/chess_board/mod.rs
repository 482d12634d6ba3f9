pub mod zobrist_hash;
pub use zobrist_hash::ZobristHash;
pub use zobrist_hash::ZOBRIST;
pub mod model;
pub use model::{ChessField, Color, Destinations, GameState, Move, Piece, PieceId, PieceType, PromotionRequest, PROMOTION_CHOICES};
pub mod move_vocabulary;
pub use move_vocabulary::{Axis, MoveVector, SpecialKey, SpecialMove, SpecialTable};

mod attacks;
mod check_resolution;
mod chess_board;
mod move_generation;
mod special_moves;
mod turn;
#[cfg(test)]
pub mod test_utils;
pub use chess_board::ChessBoard;
