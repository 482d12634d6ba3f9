use super::Board;

/// Counts the positions reachable in exactly `depth` moves.
pub fn perft<B: Board + Clone>(board: &B, depth: u8) -> u64 {
    let mut node_count = 0u64;

    if depth == 0 {
        return 1u64;
    }

    for mv in board.get_legal_moves() {
        let mut new_board = board.clone();
        if new_board.make_move(&mv).is_ok() {
            node_count += perft(&new_board, depth - 1);
        }
    }
    node_count
}

/// Perft split by root move, sorted by the move's coordinates.
pub fn divide<B: Board + Clone>(board: &B, depth: u8) -> Vec<(String, u64)> {
    let mut result_moves = Vec::new();
    for mv in board.get_legal_moves() {
        let mut new_board = board.clone();
        if new_board.make_move(&mv).is_ok() {
            result_moves.push((mv.as_algebraic(), perft(&new_board, depth.saturating_sub(1))));
        }
    }
    result_moves.sort();
    result_moves
}
