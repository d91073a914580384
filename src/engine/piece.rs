//! Piece identity and per-piece state.

use std::fmt;

use serde::Serialize;

use crate::engine::types::{Color, PieceType, Position};

// ---------------------------------------------------------------------------
// PieceId
// ---------------------------------------------------------------------------

/// Unique piece identifier, allocated monotonically by the owning board.
/// Never reused, not even after a capture or promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PieceId(pub(crate) u32);

impl PieceId {
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece owned by a board.
///
/// `position` is authoritative only while the piece is live; a captured piece
/// keeps the cell it was taken on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceType,
    pub color: Color,
    pub position: Position,
    pub captured: bool,
    /// Set on the first relocation; castling needs an unmoved king and rook.
    pub moved: bool,
    /// Pawn retired by promotion rather than taken.
    pub promoted: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceType, color: Color, position: Position) -> Self {
        Piece {
            id,
            kind,
            color,
            position,
            captured: false,
            moved: false,
            promoted: false,
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        !self.captured
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.kind.is_sliding()
    }

    #[inline]
    pub fn is_promotable(&self) -> bool {
        self.kind.is_promotable()
    }

    pub fn symbol(&self) -> char {
        self.kind.symbol(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} at {}", self.color, self.kind, self.id, self.position)
    }
}
