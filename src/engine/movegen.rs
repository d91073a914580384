//! Legal move enumeration.
//!
//! Pipeline:
//!   1. Propose candidate destinations per piece from its movement geometry.
//!   2. Run each through `rules::classify`, which enforces patterns,
//!      obstruction, occupancy, castling and en passant.
//!   3. Filter: apply the move to a copy of the board and verify the mover's
//!      king is not attacked.
//!
//! Used for checkmate and stalemate detection and exposed to callers that
//! want to show where a piece can go.

use crate::engine::attacks::{self, KING_OFFSETS, KNIGHT_OFFSETS};
use crate::engine::board::Board;
use crate::engine::piece::Piece;
use crate::engine::rules;
use crate::engine::types::{BoardError, Color, Direction, Move, PieceType, Position};

// =========================================================================
// Public API
// =========================================================================

/// All legal moves for `color`.
pub fn legal_moves(board: &Board, color: Color, en_passant: Option<Position>) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for piece in board.pieces(color) {
        collect_piece_moves(board, piece, en_passant, &mut moves);
    }
    moves
}

/// Legal moves of the piece on `from`. Empty if the cell is empty.
pub fn legal_moves_from(board: &Board, from: Position, en_passant: Option<Position>) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = board.piece_at(from) {
        collect_piece_moves(board, piece, en_passant, &mut moves);
    }
    moves
}

/// Whether `color` has at least one legal move. Stops at the first one.
pub fn has_legal_move(board: &Board, color: Color, en_passant: Option<Position>) -> bool {
    board.pieces(color).any(|piece| {
        candidates(piece).into_iter().any(|(to, promotion)| {
            legal_move(board, piece, to, en_passant, promotion).is_some()
        })
    })
}

/// The piece that would attack `color`'s king after `mv` is played, if any.
/// The board itself is left untouched.
pub fn exposes_king(board: &Board, mv: &Move, color: Color) -> Result<Option<Position>, BoardError> {
    let mut trial = board.clone();
    trial.apply(mv)?;
    Ok(attacks::checker(&trial, color))
}

// =========================================================================
// Candidate generation (internal)
// =========================================================================

fn collect_piece_moves(
    board: &Board,
    piece: &Piece,
    en_passant: Option<Position>,
    moves: &mut Vec<Move>,
) {
    for (to, promotion) in candidates(piece) {
        if let Some(mv) = legal_move(board, piece, to, en_passant, promotion) {
            moves.push(mv);
        }
    }
}

fn legal_move(
    board: &Board,
    piece: &Piece,
    to: Position,
    en_passant: Option<Position>,
    promotion: Option<PieceType>,
) -> Option<Move> {
    let mv = rules::classify(board, piece.position, to, en_passant, promotion).ok()?;
    match exposes_king(board, &mv, piece.color) {
        Ok(None) => Some(mv),
        _ => None,
    }
}

/// Destinations worth classifying, paired with the promotion to request.
/// Over-generates; classification rejects what the board does not allow.
fn candidates(piece: &Piece) -> Vec<(Position, Option<PieceType>)> {
    let from = piece.position;
    let mut targets = Vec::new();

    match piece.kind {
        PieceType::King => {
            targets.extend(offsets(from, &KING_OFFSETS));
            targets.extend(offsets(from, &[(2, 0), (-2, 0)]));
        }
        PieceType::Knight => targets.extend(offsets(from, &KNIGHT_OFFSETS)),
        PieceType::Pawn => {
            let f = piece.color.forward();
            targets.extend(offsets(from, &[(0, f), (0, 2 * f), (1, f), (-1, f)]));
        }
        PieceType::Rook => targets.extend(rays(from, &Direction::ORTHOGONAL)),
        PieceType::Bishop => targets.extend(rays(from, &Direction::DIAGONAL)),
        PieceType::Queen => {
            targets.extend(rays(from, &Direction::ORTHOGONAL));
            targets.extend(rays(from, &Direction::DIAGONAL));
        }
    }

    let promotes = |to: &Position| {
        piece.kind == PieceType::Pawn && to.y() == piece.color.promotion_rank()
    };
    let mut out = Vec::with_capacity(targets.len());
    for to in targets {
        if promotes(&to) {
            out.extend(PieceType::PROMOTIONS.iter().map(|&k| (to, Some(k))));
        } else {
            out.push((to, None));
        }
    }
    out
}

fn offsets(from: Position, deltas: &[(i32, i32)]) -> Vec<Position> {
    deltas
        .iter()
        .filter_map(|&(dx, dy)| from.offset(dx, dy).ok())
        .collect()
}

/// Every on-board cell along each ray. Blocked cells are left to `classify`.
fn rays(from: Position, dirs: &[Direction]) -> Vec<Position> {
    let mut cells = Vec::new();
    for dir in dirs {
        let (dx, dy) = dir.step();
        let mut cell = from;
        while let Ok(next) = cell.offset(dx, dy) {
            cells.push(next);
            cell = next;
        }
    }
    cells
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::SpecialMove;

    // -------------------------------------------------------------------
    // Starting position
    // -------------------------------------------------------------------

    #[test]
    fn starting_position_has_20_moves() {
        let b = Board::standard();
        assert_eq!(legal_moves(&b, Color::White, None).len(), 20);
        assert_eq!(legal_moves(&b, Color::Black, None).len(), 20);
    }

    #[test]
    fn starting_knight_moves() {
        let b = Board::standard();
        let mut dests: Vec<_> = legal_moves_from(&b, pos(6, 0), None)
            .into_iter()
            .map(|m| m.to)
            .collect();
        dests.sort_by_key(|p| p.x());
        assert_eq!(dests, vec![pos(5, 2), pos(7, 2)]);
    }

    #[test]
    fn empty_cell_has_no_moves() {
        let b = Board::standard();
        assert!(legal_moves_from(&b, pos(4, 4), None).is_empty());
    }

    // -------------------------------------------------------------------
    // Pawns
    // -------------------------------------------------------------------

    #[test]
    fn pawn_promotion_yields_four_moves() {
        let b = board(&[
            (PieceType::King, Color::White, 4, 0),
            (PieceType::King, Color::Black, 7, 7),
            (PieceType::Pawn, Color::White, 4, 6),
        ]);
        let promos = legal_moves_from(&b, pos(4, 6), None);
        assert_eq!(promos.len(), 4);
        assert!(promos.iter().all(|m| m.promotion.is_some()));
    }

    #[test]
    fn en_passant_is_generated_with_target() {
        let b = board(&[
            (PieceType::King, Color::White, 4, 0),
            (PieceType::King, Color::Black, 4, 7),
            (PieceType::Pawn, Color::White, 4, 4),
            (PieceType::Pawn, Color::Black, 3, 4),
        ]);
        let with = legal_moves_from(&b, pos(4, 4), Some(pos(3, 5)));
        assert!(with.iter().any(|m| m.special == SpecialMove::EnPassant));
        let without = legal_moves_from(&b, pos(4, 4), None);
        assert_eq!(without.len(), 1);
    }

    // -------------------------------------------------------------------
    // King safety
    // -------------------------------------------------------------------

    #[test]
    fn pinned_piece_cannot_leave_line() {
        let b = board(&[
            (PieceType::King, Color::White, 4, 0),
            (PieceType::Bishop, Color::White, 4, 1),
            (PieceType::Rook, Color::Black, 4, 7),
            (PieceType::King, Color::Black, 0, 7),
        ]);
        assert!(legal_moves_from(&b, pos(4, 1), None).is_empty());
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let b = board(&[
            (PieceType::King, Color::White, 0, 0),
            (PieceType::Rook, Color::Black, 1, 7),
            (PieceType::King, Color::Black, 7, 7),
        ]);
        let dests: Vec<_> = legal_moves_from(&b, pos(0, 0), None)
            .into_iter()
            .map(|m| m.to)
            .collect();
        assert_eq!(dests, vec![pos(0, 1)]);
    }

    #[test]
    fn exposes_king_reports_attacker() {
        let b = board(&[
            (PieceType::King, Color::White, 4, 0),
            (PieceType::Knight, Color::White, 4, 1),
            (PieceType::Queen, Color::Black, 4, 5),
        ]);
        let mv = rules::classify(&b, pos(4, 1), pos(2, 2), None, None).unwrap();
        assert_eq!(exposes_king(&b, &mv, Color::White), Ok(Some(pos(4, 5))));
        // The real board is untouched.
        assert_eq!(b.piece_at(pos(4, 1)).unwrap().kind, PieceType::Knight);
    }

    #[test]
    fn no_moves_when_stalemated() {
        let b = board(&[
            (PieceType::King, Color::Black, 7, 7),
            (PieceType::Queen, Color::White, 5, 6),
            (PieceType::King, Color::White, 5, 5),
        ]);
        assert!(!has_legal_move(&b, Color::Black, None));
        assert!(legal_moves(&b, Color::Black, None).is_empty());
        assert!(has_legal_move(&b, Color::White, None));
    }

    fn board(pieces: &[(PieceType, Color, i32, i32)]) -> Board {
        let mut b = Board::empty();
        for &(kind, color, x, y) in pieces {
            b.place(kind, color, pos(x, y)).unwrap();
        }
        b
    }

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }
}
