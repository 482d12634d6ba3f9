use super::{ChessBoard, ChessField, Color, Piece, PieceId};

pub fn assert_fields<I: IntoIterator<Item = ChessField>>(generated: I, mut expected: Vec<&str>) {
    let mut generated_converted: Vec<_> = generated.into_iter().map(|f| f.as_algebraic()).collect();
    generated_converted.sort();
    expected.sort();

    assert_eq!(generated_converted, expected);
}

pub fn field(square: &str) -> ChessField {
    ChessField::from_algebraic(square).unwrap()
}

/// Builds a board from tokens like `"Ke1"` (White king) or `"pd7"` (Black pawn).
pub fn board_from(active_color: Color, tokens: &[&str]) -> ChessBoard {
    let placements = tokens.iter().map(|token| {
        let mut chars = token.chars();
        let (color, kind) = Piece::from_char(chars.next().unwrap()).unwrap();
        (color, kind, field(chars.as_str()))
    });
    ChessBoard::from_placements(active_color, placements).unwrap()
}

pub fn id_at(board: &ChessBoard, square: &str) -> PieceId {
    board.occupant(field(square)).unwrap()
}
