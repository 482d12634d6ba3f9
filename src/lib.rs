pub mod chess_boards;
pub mod config;
pub mod error;

pub use chess_boards::chess_board::{ChessBoard, ChessField, Color, Destinations, GameState, Move, PieceId, PieceType, PromotionRequest};
pub use chess_boards::Board;
pub use error::{ChessError, ChessResult};
