use super::{ChessBoard, Color};
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::sync::Arc;

const BOARD_SIZE: usize = 8;

pub struct ZobristHash {
    piece_keys: [[[u64; BOARD_SIZE * BOARD_SIZE]; 6]; 2],
    moved_keys: [u64; BOARD_SIZE * BOARD_SIZE],
    side_to_move_key: u64,
}

impl ZobristHash {
    fn new(seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);

        let mut piece_keys = [[[0; BOARD_SIZE * BOARD_SIZE]; 6]; 2];
        for color_keys in &mut piece_keys {
            for piece_type_keys in color_keys {
                for square_key in piece_type_keys {
                    *square_key = rng.gen();
                }
            }
        }

        // Castling eligibility and pawn double steps hang on the moved flag of
        // whatever stands on the square
        let mut moved_keys = [0; BOARD_SIZE * BOARD_SIZE];
        for key in &mut moved_keys {
            *key = rng.gen();
        }

        let side_to_move_key = rng.gen();

        ZobristHash {
            piece_keys,
            moved_keys,
            side_to_move_key,
        }
    }

    pub fn calculate_hash(&self, board: &ChessBoard) -> u64 {
        let mut hash = 0;

        for (field, id) in board.pieces_with_coordinates() {
            let Some(piece) = board.piece(id) else {
                continue;
            };
            let square_index = field.row as usize * BOARD_SIZE + field.col as usize;
            hash ^= self.piece_keys[piece.color.index()][piece.kind.index()][square_index];
            if piece.has_moved {
                hash ^= self.moved_keys[square_index];
            }
        }

        if board.active_color == Color::Black {
            hash ^= self.side_to_move_key;
        }

        hash
    }
}

lazy_static! {
    pub static ref ZOBRIST: Arc<ZobristHash> = Arc::new(ZobristHash::new(42));
}
