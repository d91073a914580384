//! Per-piece move legality.
//!
//! `classify` turns a raw `(from, to)` pair into a `Move` or the reason it is
//! illegal. Stages run in a fixed order so the reported error is
//! deterministic:
//!
//!   1. Special moves are recognised first (castling by the king's two-file
//!      step, en passant by a pawn's diagonal step onto the target cell).
//!   2. Pattern: does the piece move that way at all (`IllegalPattern`)?
//!   3. Obstruction: are intermediate cells empty (`BlockedPath`)?
//!   4. Occupancy: never land on an own piece (`FriendlyFireCapture`).
//!   5. Promotion.
//!
//! King safety after the move is the caller's job (see `Game::submit_move`).

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::piece::Piece;
use crate::engine::types::{Direction, Move, MoveError, PieceType, Position, SpecialMove};

/// Classify a move by the piece on `from`.
///
/// `en_passant` is the cell a pawn may capture onto this turn, if any.
/// `promotion` is the requested promotion piece; a pawn reaching the far rank
/// without one becomes a queen.
pub fn classify(
    board: &Board,
    from: Position,
    to: Position,
    en_passant: Option<Position>,
    promotion: Option<PieceType>,
) -> Result<Move, MoveError> {
    if Direction::between(from, to) == Direction::None {
        return Err(MoveError::SameSquareMove { at: from });
    }
    let piece = board
        .piece_at(from)
        .ok_or(MoveError::NoPieceAtSource { at: from })?;
    let (dx, dy) = from.delta(to);

    let mut mv = match piece.kind {
        PieceType::King if dy == 0 && dx.abs() == 2 => castle(board, piece, to)?,
        PieceType::Pawn => pawn_move(board, piece, to, en_passant)?,
        kind => {
            if !pattern_matches(kind, dx, dy) {
                return Err(MoveError::IllegalPattern {
                    piece: kind,
                    from,
                    to,
                });
            }
            if kind.is_sliding() {
                check_path(board, kind, from, to)?;
            }
            land(board, piece, Move::new(kind, from, to))?
        }
    };

    mv.promotion = resolve_promotion(piece, &mv, promotion)?;
    Ok(mv)
}

/// Movement geometry of non-pawn pieces, ignoring the board.
pub fn pattern_matches(kind: PieceType, dx: i32, dy: i32) -> bool {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax == 0 && ay == 0 {
        return false;
    }
    match kind {
        PieceType::King => ax <= 1 && ay <= 1,
        PieceType::Queen => ax == 0 || ay == 0 || ax == ay,
        PieceType::Rook => ax == 0 || ay == 0,
        PieceType::Bishop => ax == ay,
        PieceType::Knight => (ax == 1 && ay == 2) || (ax == 2 && ay == 1),
        PieceType::Pawn => false,
    }
}

// =========================================================================
// Stages (internal)
// =========================================================================

/// Every cell strictly between `from` and `to` must be empty.
fn check_path(board: &Board, piece: PieceType, from: Position, to: Position) -> Result<(), MoveError> {
    let (dx, dy) = Direction::between(from, to).step();
    let mut cell = from.offset(dx, dy)?;
    while cell != to {
        if !board.is_empty(cell) {
            return Err(MoveError::BlockedPath {
                piece,
                from,
                to,
                blocker: cell,
            });
        }
        cell = cell.offset(dx, dy)?;
    }
    Ok(())
}

/// Destination occupancy: empty is a plain move, an enemy is a capture.
fn land(board: &Board, piece: &Piece, mut mv: Move) -> Result<Move, MoveError> {
    match board.piece_at(mv.to) {
        Some(target) if target.color == piece.color => Err(MoveError::FriendlyFireCapture {
            from: mv.from,
            to: mv.to,
        }),
        Some(_) => {
            mv.capture = Some(mv.to);
            Ok(mv)
        }
        None => Ok(mv),
    }
}

fn pawn_move(
    board: &Board,
    pawn: &Piece,
    to: Position,
    en_passant: Option<Position>,
) -> Result<Move, MoveError> {
    let from = pawn.position;
    let (dx, dy) = from.delta(to);
    let forward = pawn.color.forward();
    let illegal = MoveError::IllegalPattern {
        piece: PieceType::Pawn,
        from,
        to,
    };
    let blocked = |blocker| MoveError::BlockedPath {
        piece: PieceType::Pawn,
        from,
        to,
        blocker,
    };
    let mut mv = Move::new(PieceType::Pawn, from, to);

    match (dx.abs(), dy * forward) {
        (0, 1) => {
            if !board.is_empty(to) {
                return Err(blocked(to));
            }
        }
        (0, 2) if from.y() == pawn.color.pawn_rank() => {
            let passed = from.offset(0, forward)?;
            for cell in [passed, to] {
                if !board.is_empty(cell) {
                    return Err(blocked(cell));
                }
            }
            mv.special = SpecialMove::DoubleStep { passed };
        }
        (1, 1) => match board.piece_at(to) {
            Some(target) if target.color == pawn.color => {
                return Err(MoveError::FriendlyFireCapture { from, to });
            }
            Some(_) => mv.capture = Some(to),
            None if en_passant == Some(to) => {
                // The victim stands beside the pawn, on the cell it passed.
                let victim = Position::new(to.x() as i32, from.y() as i32)?;
                match board.piece_at(victim) {
                    Some(p) if p.kind == PieceType::Pawn && p.color != pawn.color => {
                        mv.capture = Some(victim);
                        mv.special = SpecialMove::EnPassant;
                    }
                    _ => return Err(illegal),
                }
            }
            None => return Err(illegal),
        },
        _ => return Err(illegal),
    }
    Ok(mv)
}

/// King two files sideways from its start cell, towards an unmoved rook of
/// the same colour, with nothing in between and no attacked cell on the king's
/// path (including the start).
fn castle(board: &Board, king: &Piece, to: Position) -> Result<Move, MoveError> {
    let from = king.position;
    let illegal = MoveError::IllegalPattern {
        piece: PieceType::King,
        from,
        to,
    };
    if king.moved || from.y() != king.color.home_rank() || from.x() != 4 {
        return Err(illegal);
    }

    let step: i32 = if to.x() > from.x() { 1 } else { -1 };
    let rook_x = if step > 0 { 7 } else { 0 };
    let rook_from = Position::new(rook_x, from.y() as i32)?;
    match board.piece_at(rook_from) {
        Some(rook) if rook.kind == PieceType::Rook && rook.color == king.color && !rook.moved => {}
        _ => return Err(illegal),
    }

    let mut cell = from.offset(step, 0)?;
    while cell != rook_from {
        if !board.is_empty(cell) {
            return Err(MoveError::BlockedPath {
                piece: PieceType::King,
                from,
                to,
                blocker: cell,
            });
        }
        cell = cell.offset(step, 0)?;
    }

    let crossed = from.offset(step, 0)?;
    for cell in [from, crossed, to] {
        if attacks::is_attacked(board, cell, king.color).is_some() {
            return Err(MoveError::CastlingUnderAttack { at: cell });
        }
    }

    let mut mv = Move::new(PieceType::King, from, to);
    mv.special = SpecialMove::Castle {
        rook_from,
        rook_to: crossed,
    };
    Ok(mv)
}

fn resolve_promotion(
    piece: &Piece,
    mv: &Move,
    requested: Option<PieceType>,
) -> Result<Option<PieceType>, MoveError> {
    let promotes = piece.is_promotable() && mv.to.y() == piece.color.promotion_rank();
    match (promotes, requested) {
        (true, None) => Ok(Some(PieceType::Queen)),
        (true, Some(kind)) if kind.is_promotion_target() => Ok(Some(kind)),
        (_, Some(kind)) => Err(MoveError::InvalidPromotion {
            from: mv.from,
            to: mv.to,
            requested: kind,
        }),
        (false, None) => Ok(None),
    }
}

// =========================================================================
// Tests
// =========================================================================
