//! Cell-grid board representation.
//!
//! `Board` owns every piece created during a game in an arena (`pieces`),
//! indexed by `PieceId`. The grid and the per-colour live rosters hold ids
//! into that arena, so the grid is the single source of truth for occupancy
//! and a piece's `position` always mirrors the cell that references it.

use std::fmt;

use crate::engine::piece::{Piece, PieceId};
use crate::engine::types::{BoardError, Color, Move, PieceType, Position, SpecialMove};

/// Back-rank order by file for the standard setup.
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

// ---------------------------------------------------------------------------
// Checkpoint
// ---------------------------------------------------------------------------

/// Saved board state taken before a tentative move.
///
/// Restoring brings back occupancy, piece positions, captured flags and the
/// id counter exactly.
#[derive(Clone, Debug)]
pub struct Checkpoint(Board);

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 8×8 grid plus every piece ever created on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// `cells[y][x]`: id of the live piece on the cell.
    cells: [[Option<PieceId>; 8]; 8],
    /// Arena of all pieces, live or not. `pieces[id]` has that id.
    pieces: Vec<Piece>,
    /// Live piece ids per colour, in creation order.
    live: [Vec<PieceId>; 2],
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
            pieces: Vec::new(),
            live: [Vec::new(), Vec::new()],
        }
    }

    /// The standard 32-piece setup: White on ranks 0-1, Black on ranks 6-7,
    /// queens on file 3 and kings on file 4.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for at in Position::all() {
            let color = match at.y() {
                0 | 1 => Color::White,
                6 | 7 => Color::Black,
                _ => continue,
            };
            let kind = if at.y() == color.pawn_rank() {
                PieceType::Pawn
            } else {
                BACK_RANK[at.x() as usize]
            };
            board.insert(kind, color, at);
        }
        board
    }

    /// Allocate the next id and put a new piece on an empty cell.
    fn insert(&mut self, kind: PieceType, color: Color, at: Position) -> PieceId {
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(Piece::new(id, kind, color, at));
        self.cells[at.y() as usize][at.x() as usize] = Some(id);
        self.live[color.index()].push(id);
        id
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Board {
    /// The live piece on a cell.
    pub fn piece_at(&self, at: Position) -> Option<&Piece> {
        self.id_at(at).and_then(|id| self.piece(id))
    }

    /// Any piece created on this board, live or captured.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    #[inline]
    pub fn is_empty(&self, at: Position) -> bool {
        self.id_at(at).is_none()
    }

    /// Live pieces of one colour, in creation order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.live[color.index()]
            .iter()
            .filter_map(|&id| self.piece(id))
    }

    /// Pieces of `color` taken by the opponent, in creation order.
    pub fn captured(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces
            .iter()
            .filter(move |p| p.color == color && p.captured && !p.promoted)
    }

    /// The live king of a colour, if there is one. Custom setups may omit it.
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces(color).find(|p| p.kind == PieceType::King)
    }

    /// Number of live pieces on the board.
    pub fn live_count(&self) -> usize {
        self.live[0].len() + self.live[1].len()
    }

    #[inline]
    fn id_at(&self, at: Position) -> Option<PieceId> {
        self.cells[at.y() as usize][at.x() as usize]
    }

    fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index())
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

impl Board {
    /// Create a piece on an empty cell.
    pub fn place(
        &mut self,
        kind: PieceType,
        color: Color,
        at: Position,
    ) -> Result<PieceId, BoardError> {
        if !self.is_empty(at) {
            return Err(BoardError::Occupied(at));
        }
        Ok(self.insert(kind, color, at))
    }

    /// Take the piece off a cell and mark it captured.
    pub fn remove(&mut self, at: Position) -> Result<PieceId, BoardError> {
        let id = self.take(at)?;
        if let Some(piece) = self.piece_mut(id) {
            piece.captured = true;
        }
        Ok(id)
    }

    /// Move the piece on `from` to `to`, capturing whatever stands on `to`.
    /// Occupancy and the piece's own position change together.
    ///
    /// Returns the id of the captured piece, if any.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<Option<PieceId>, BoardError> {
        let id = self.id_at(from).ok_or(BoardError::Vacant(from))?;
        let taken = if self.is_empty(to) {
            None
        } else {
            Some(self.remove(to)?)
        };

        self.cells[from.y() as usize][from.x() as usize] = None;
        self.cells[to.y() as usize][to.x() as usize] = Some(id);
        if let Some(piece) = self.piece_mut(id) {
            piece.position = to;
            piece.moved = true;
        }
        Ok(taken)
    }

    /// Replace the piece on `at` with a new piece of `kind`, same colour.
    ///
    /// The old piece is retired (captured, flagged as promoted) and the new
    /// one gets a fresh id.
    pub fn promote(&mut self, at: Position, kind: PieceType) -> Result<PieceId, BoardError> {
        let old = self.take(at)?;
        let color = match self.piece_mut(old) {
            Some(piece) => {
                piece.captured = true;
                piece.promoted = true;
                piece.color
            }
            None => return Err(BoardError::Vacant(at)),
        };
        let id = self.insert(kind, color, at);
        if let Some(piece) = self.piece_mut(id) {
            piece.moved = true;
        }
        Ok(id)
    }

    /// Apply a classified move: the main relocation plus whatever the special
    /// tag implies (rook hop, en-passant removal, promotion).
    ///
    /// No legality checks happen here. On error the board may be partially
    /// updated; callers restore from a checkpoint.
    pub fn apply(&mut self, mv: &Move) -> Result<Option<PieceId>, BoardError> {
        let en_passant = match (mv.special, mv.capture) {
            (SpecialMove::EnPassant, Some(victim)) => Some(self.remove(victim)?),
            _ => None,
        };
        let taken = self.relocate(mv.from, mv.to)?.or(en_passant);

        if let SpecialMove::Castle { rook_from, rook_to } = mv.special {
            self.relocate(rook_from, rook_to)?;
        }
        if let Some(kind) = mv.promotion {
            self.promote(mv.to, kind)?;
        }
        Ok(taken)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.clone())
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        *self = checkpoint.0;
    }

    /// Clear a cell and drop the piece from its live roster.
    fn take(&mut self, at: Position) -> Result<PieceId, BoardError> {
        let id = self.id_at(at).ok_or(BoardError::Vacant(at))?;
        self.cells[at.y() as usize][at.x() as usize] = None;
        let color = self.piece(id).map(|p| p.color).ok_or(BoardError::Vacant(at))?;
        self.live[color.index()].retain(|&other| other != id);
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Debug
// ---------------------------------------------------------------------------

impl Board {
    /// Check that the grid, the rosters and piece positions agree.
    ///
    /// # Panics
    /// On any mismatch.
    pub fn assert_consistent(&self) {
        let mut on_grid = 0;
        for at in Position::all() {
            if let Some(id) = self.id_at(at) {
                on_grid += 1;
                let piece = self.piece(id);
                assert!(piece.is_some(), "cell {at} holds unknown id {id}");
                if let Some(piece) = piece {
                    assert!(piece.is_live(), "cell {at} holds captured {piece}");
                    assert_eq!(piece.position, at, "{piece} is on cell {at}");
                    assert!(
                        self.live[piece.color.index()].contains(&id),
                        "{piece} missing from live roster"
                    );
                }
            }
        }
        assert_eq!(on_grid, self.live_count(), "grid and roster sizes differ");
    }

    /// ASCII board, rank 7 first. Uppercase is White, `.` is empty.
    pub fn board_string(&self) -> String {
        let mut s = String::new();
        for y in (0..8).rev() {
            for x in 0..8 {
                let c = Position::new(x, y)
                    .ok()
                    .and_then(|at| self.piece_at(at))
                    .map_or('.', |p| p.kind.to_char(p.color));
                s.push(c);
                if x < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
