//! Attack detection by ray scanning.
//!
//! From the target cell, walk each of the eight compass rays until the first
//! occupied cell, and probe the eight knight offsets. An attacker is found
//! when the occupant is an enemy whose movement pattern covers that ray and
//! distance. Nothing here depends on whose turn it is.

use tracing::trace;

use crate::engine::board::Board;
use crate::engine::piece::Piece;
use crate::engine::types::{Color, Direction, PieceType, Position};

/// Knight jump offsets `(dx, dy)`.
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King step offsets `(dx, dy)`.
pub const KING_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

// =========================================================================
// Public API
// =========================================================================

/// First enemy piece found attacking `at`, where `defender` is the colour
/// being attacked. Rays are scanned before knight offsets.
pub fn is_attacked(board: &Board, at: Position, defender: Color) -> Option<Position> {
    scan(board, at, defender, true).into_iter().next()
}

/// Every enemy piece attacking `at`.
pub fn attackers(board: &Board, at: Position, defender: Color) -> Vec<Position> {
    scan(board, at, defender, false)
}

/// Cell of the live king of `color`.
pub fn king_position(board: &Board, color: Color) -> Option<Position> {
    board.king(color).map(|k| k.position)
}

/// First piece giving check to `color`'s king. A side without a king is
/// never in check.
pub fn checker(board: &Board, color: Color) -> Option<Position> {
    king_position(board, color).and_then(|king| is_attacked(board, king, color))
}

/// Whether `color`'s king is attacked.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    checker(board, color).is_some()
}

// =========================================================================
// Scanning (internal)
// =========================================================================

fn scan(board: &Board, at: Position, defender: Color, first_only: bool) -> Vec<Position> {
    let mut found = Vec::new();

    for dir in Direction::ORTHOGONAL.into_iter().chain(Direction::DIAGONAL) {
        let Some((piece, distance)) = first_occupant(board, at, dir) else {
            continue;
        };
        if piece.color != defender && attacks_along(piece, dir, distance, at) {
            trace!(cell = %at, attacker = %piece.position, kind = %piece.kind, "attack on ray");
            found.push(piece.position);
            if first_only {
                return found;
            }
        }
    }

    for (dx, dy) in KNIGHT_OFFSETS {
        let Ok(cell) = at.offset(dx, dy) else {
            continue;
        };
        if let Some(piece) = board.piece_at(cell)
            && piece.color != defender
            && piece.kind == PieceType::Knight
        {
            trace!(cell = %at, attacker = %cell, "knight attack");
            found.push(cell);
            if first_only {
                return found;
            }
        }
    }

    found
}

/// Walk from `at` (exclusive) along `dir` and return the first live piece and
/// how many steps away it stands.
fn first_occupant(board: &Board, at: Position, dir: Direction) -> Option<(&Piece, i32)> {
    let (dx, dy) = dir.step();
    let mut cell = at;
    let mut distance = 0;
    while let Ok(next) = cell.offset(dx, dy) {
        distance += 1;
        if let Some(piece) = board.piece_at(next) {
            return Some((piece, distance));
        }
        cell = next;
    }
    None
}

/// Whether `piece`, found `distance` steps from `target` along `dir`, attacks
/// `target`. `dir` points from the target towards the piece.
fn attacks_along(piece: &Piece, dir: Direction, distance: i32, target: Position) -> bool {
    match piece.kind {
        PieceType::Queen => true,
        PieceType::Rook => dir.is_orthogonal(),
        PieceType::Bishop => dir.is_diagonal(),
        PieceType::King => distance == 1,
        // A pawn only captures forward: the target must sit one rank ahead of it.
        PieceType::Pawn => {
            dir.is_diagonal()
                && distance == 1
                && target.y() as i32 - piece.position.y() as i32 == piece.color.forward()
        }
        PieceType::Knight => false,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------
    // Sliding attackers
    // -------------------------------------------------------------------

    #[test]
    fn rook_attacks_along_file_and_rank() {
        let b = board(&[
            (PieceType::Rook, Color::White, 0, 0),
            (PieceType::King, Color::Black, 0, 7),
        ]);
        assert_eq!(is_attacked(&b, pos(0, 7), Color::Black), Some(pos(0, 0)));
        assert_eq!(is_attacked(&b, pos(7, 0), Color::Black), Some(pos(0, 0)));
        assert_eq!(is_attacked(&b, pos(1, 1), Color::Black), None);
    }

    #[test]
    fn bishop_attacks_diagonally_only() {
        let b = board(&[(PieceType::Bishop, Color::White, 2, 0)]);
        assert!(is_attacked(&b, pos(7, 5), Color::Black).is_some());
        assert!(is_attacked(&b, pos(0, 2), Color::Black).is_some());
        assert!(is_attacked(&b, pos(2, 5), Color::Black).is_none());
    }

    #[test]
    fn queen_attacks_both_ways() {
        let b = board(&[(PieceType::Queen, Color::Black, 3, 3)]);
        for target in [pos(3, 7), pos(0, 3), pos(6, 6), pos(0, 0)] {
            assert_eq!(is_attacked(&b, target, Color::White), Some(pos(3, 3)));
        }
        assert!(is_attacked(&b, pos(4, 5), Color::White).is_none());
    }

    #[test]
    fn ray_stops_at_first_occupant() {
        let b = board(&[
            (PieceType::Rook, Color::White, 0, 0),
            (PieceType::Knight, Color::White, 0, 3),
            (PieceType::King, Color::Black, 0, 7),
        ]);
        assert!(is_attacked(&b, pos(0, 7), Color::Black).is_none());
    }

    #[test]
    fn own_pieces_do_not_attack() {
        let b = board(&[
            (PieceType::Rook, Color::Black, 0, 0),
            (PieceType::King, Color::Black, 0, 7),
        ]);
        assert!(is_attacked(&b, pos(0, 7), Color::Black).is_none());
    }

    // -------------------------------------------------------------------
    // Knights, pawns, kings
    // -------------------------------------------------------------------

    #[test]
    fn knight_jumps_over_blockers() {
        let b = board(&[
            (PieceType::Knight, Color::White, 1, 0),
            (PieceType::Pawn, Color::White, 1, 1),
            (PieceType::Pawn, Color::White, 2, 1),
        ]);
        assert_eq!(is_attacked(&b, pos(3, 1), Color::Black), Some(pos(1, 0)));
        // Rays come first: the pawn on [1;1] is reported before the knight.
        assert_eq!(attackers(&b, pos(2, 2), Color::Black), vec![pos(1, 1), pos(1, 0)]);
        assert!(is_attacked(&b, pos(1, 3), Color::Black).is_none());
    }

    #[test]
    fn pawn_attacks_forward_diagonals_only() {
        let b = board(&[(PieceType::Pawn, Color::White, 4, 3)]);
        assert!(is_attacked(&b, pos(3, 4), Color::Black).is_some());
        assert!(is_attacked(&b, pos(5, 4), Color::Black).is_some());
        // Not backwards, not straight ahead, not two away.
        assert!(is_attacked(&b, pos(3, 2), Color::Black).is_none());
        assert!(is_attacked(&b, pos(4, 4), Color::Black).is_none());
        assert!(is_attacked(&b, pos(6, 5), Color::Black).is_none());
    }

    #[test]
    fn black_pawn_attacks_downwards() {
        let b = board(&[(PieceType::Pawn, Color::Black, 4, 6)]);
        assert!(is_attacked(&b, pos(3, 5), Color::White).is_some());
        assert!(is_attacked(&b, pos(5, 5), Color::White).is_some());
        assert!(is_attacked(&b, pos(3, 7), Color::White).is_none());
    }

    #[test]
    fn king_attacks_adjacent_cells() {
        let b = board(&[(PieceType::King, Color::White, 4, 4)]);
        for (dx, dy) in KING_OFFSETS {
            let target = pos(4 + dx, 4 + dy);
            assert!(is_attacked(&b, target, Color::Black).is_some(), "{target}");
        }
        assert!(is_attacked(&b, pos(4, 6), Color::Black).is_none());
    }

    // -------------------------------------------------------------------
    // Check helpers
    // -------------------------------------------------------------------

    #[test]
    fn attackers_lists_every_checker() {
        let b = board(&[
            (PieceType::King, Color::Black, 4, 7),
            (PieceType::Rook, Color::White, 4, 0),
            (PieceType::Knight, Color::White, 5, 5),
            (PieceType::Bishop, Color::White, 0, 3),
        ]);
        let mut found = attackers(&b, pos(4, 7), Color::Black);
        found.sort_by_key(|p| (p.x(), p.y()));
        assert_eq!(found, vec![pos(0, 3), pos(4, 0), pos(5, 5)]);
    }

    #[test]
    fn start_position_is_not_check() {
        let b = Board::standard();
        assert!(!is_in_check(&b, Color::White));
        assert!(!is_in_check(&b, Color::Black));
        assert_eq!(king_position(&b, Color::White), Some(pos(4, 0)));
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let b = board(&[(PieceType::Queen, Color::Black, 0, 0)]);
        assert!(!is_in_check(&b, Color::White));
        assert_eq!(checker(&b, Color::White), None);
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
