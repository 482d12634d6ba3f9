use log::debug;

use super::model::{ChessField, Color, GameState, Piece, PieceId, PieceType};
use super::zobrist_hash::ZOBRIST;
use crate::error::{ChessError, ChessResult};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Board state: the piece arena, a grid of indices into it, and whose turn it is.
///
/// The grid is the only source of truth for which pieces are alive. A piece that
/// is still in the arena but not referenced from the grid takes no part in move
/// generation or attack scanning.
#[derive(Debug, Clone)]
pub struct ChessBoard {
    pub(crate) squares: [[Option<PieceId>; 8]; 8],
    pub(crate) active_color: Color,
    pub(crate) pieces: Vec<Option<Piece>>,
    pub(crate) kings: [PieceId; 2],
    pub(crate) pending_promotion: Option<PieceId>,
    pub(crate) state: GameState,
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessBoard {
    /// Creates a board in the standard starting position, White to move.
    pub fn new() -> Self {
        let mut placements = Vec::with_capacity(32);
        for color in [Color::White, Color::Black] {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                placements.push((color, *kind, ChessField::new(color.back_row(), col as u8)));
                placements.push((color, PieceType::Pawn, ChessField::new(color.pawn_row(), col as u8)));
            }
        }
        Self::build(Color::White, placements)
    }

    /// Creates a board from arbitrary placements.
    ///
    /// Exactly one king per color is required. Pawns off their starting row and
    /// kings or rooks off their home squares are marked as already moved.
    pub fn from_placements<I>(active_color: Color, placements: I) -> ChessResult<Self>
    where
        I: IntoIterator<Item = (Color, PieceType, ChessField)>,
    {
        let placements: Vec<_> = placements.into_iter().collect();
        let mut occupied = [[false; 8]; 8];
        for (_, _, field) in &placements {
            if occupied[field.row as usize][field.col as usize] {
                return Err(ChessError::SquareOccupied(*field));
            }
            occupied[field.row as usize][field.col as usize] = true;
        }
        for color in [Color::White, Color::Black] {
            let count = placements
                .iter()
                .filter(|(c, kind, _)| *c == color && *kind == PieceType::King)
                .count();
            if count != 1 {
                return Err(ChessError::KingCount { color, count });
            }
        }
        Ok(Self::build(active_color, placements))
    }

    fn build(active_color: Color, placements: Vec<(Color, PieceType, ChessField)>) -> Self {
        let mut squares = [[None; 8]; 8];
        let mut pieces = Vec::with_capacity(placements.len());
        let mut kings = [PieceId(0); 2];

        for (color, kind, field) in placements {
            let id = PieceId(pieces.len());
            let mut piece = Piece::new(color, kind, field);
            piece.has_moved = !Self::is_home_square(color, kind, field);
            if kind == PieceType::King {
                kings[color.index()] = id;
            }
            squares[field.row as usize][field.col as usize] = Some(id);
            pieces.push(Some(piece));
        }

        let mut board = Self {
            squares,
            active_color,
            pieces,
            kings,
            pending_promotion: None,
            state: GameState::Normal,
        };
        board.regenerate_all_moves();
        board.resolve_check();
        board
    }

    fn is_home_square(color: Color, kind: PieceType, field: ChessField) -> bool {
        match kind {
            PieceType::Pawn => field.row == color.pawn_row(),
            PieceType::King => field == ChessField::new(color.back_row(), 4),
            PieceType::Rook => field.row == color.back_row() && (field.col == 0 || field.col == 7),
            _ => true,
        }
    }

    pub fn in_bounds(row: i8, col: i8) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    pub fn occupant(&self, field: ChessField) -> Option<PieceId> {
        self.squares[field.row as usize][field.col as usize]
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0).and_then(|p| p.as_ref())
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.0).and_then(|p| p.as_mut())
    }

    pub fn piece_at(&self, field: ChessField) -> Option<&Piece> {
        self.occupant(field).and_then(|id| self.piece(id))
    }

    /// True when `id` is referenced from the grid.
    pub fn is_on_board(&self, id: PieceId) -> bool {
        self.piece(id).is_some_and(|p| self.occupant(p.field) == Some(id))
    }

    pub fn king(&self, color: Color) -> PieceId {
        self.kings[color.index()]
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    /// Puts `id` on `field` and clears the slot it stood on. A piece already on
    /// `field` is captured: it leaves the arena and is returned.
    pub fn place(&mut self, id: PieceId, field: ChessField) -> Option<Piece> {
        let from = self.piece(id)?.field;
        if self.occupant(from) == Some(id) {
            self.remove(from);
        }
        let previous = self.set_slot(field, id);
        if let Some(piece) = self.piece_mut(id) {
            piece.field = field;
        }
        previous.filter(|&other| other != id).and_then(|other| self.destroy(other))
    }

    pub fn remove(&mut self, field: ChessField) -> Option<PieceId> {
        self.squares[field.row as usize][field.col as usize].take()
    }

    /// Writes a single grid slot and nothing else. Only for simulations that
    /// restore the whole grid afterwards.
    pub(crate) fn set_slot(&mut self, field: ChessField, id: PieceId) -> Option<PieceId> {
        self.squares[field.row as usize][field.col as usize].replace(id)
    }

    /// Moves a piece for real, destroying and returning any piece it lands on.
    pub(crate) fn relocate(&mut self, id: PieceId, to: ChessField) -> Option<Piece> {
        let captured = self.place(id, to);
        if let Some(piece) = self.piece_mut(id) {
            piece.has_moved = true;
        }
        captured
    }

    pub(crate) fn spawn(&mut self, piece: Piece) -> PieceId {
        self.pieces.push(Some(piece));
        PieceId(self.pieces.len() - 1)
    }

    pub(crate) fn destroy(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.get_mut(id.0)?.take()?;
        debug!("{} {:?} on {} leaves the game", piece.color, piece.kind, piece.field);
        Some(piece)
    }

    /// Every piece on the board, scanning rank by rank from a1.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (ChessField, PieceId)> + '_ {
        (0..8u8).flat_map(move |row| {
            (0..8u8).filter_map(move |col| self.squares[row as usize][col as usize].map(|id| (ChessField::new(row, col), id)))
        })
    }

    pub fn pieces_of(&self, color: Color) -> Vec<PieceId> {
        self.pieces_with_coordinates()
            .filter(|(_, id)| self.piece(*id).is_some_and(|p| p.color == color))
            .map(|(_, id)| id)
            .collect()
    }

    /// Zobrist hash of the occupants, their moved flags and the side to move.
    pub fn position_hash(&self) -> u64 {
        ZOBRIST.calculate_hash(self)
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for row in (0..8).rev() {
            board_representation.push_str(&format!("{} │", row + 1));
            for col in 0..8 {
                let square = self.piece_at(ChessField::new(row, col)).map_or(' ', |piece| piece.to_char());
                board_representation.push_str(&format!(" {} │", square));
            }
            board_representation.push_str(&format!(" {}\n", row + 1));

            if row > 0 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}
