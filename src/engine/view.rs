//! Read-only snapshot of a game for renderers.
//!
//! A `BoardView` owns its data, so callers can keep or serialize it without
//! borrowing the game.

use serde::Serialize;

use crate::engine::piece::{Piece, PieceId};
use crate::engine::types::{Color, GameStatus, PieceType, Position};

/// A piece as seen on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant {
    pub id: PieceId,
    pub kind: PieceType,
    pub color: Color,
}

impl From<&Piece> for Occupant {
    fn from(p: &Piece) -> Self {
        Occupant {
            id: p.id,
            kind: p.kind,
            color: p.color,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub x: u8,
    pub y: u8,
    pub occupant: Option<Occupant>,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    /// 64 cells, rank 0 first, file 0 first within a rank.
    pub cells: Vec<CellView>,
    pub turn: Color,
    pub status: GameStatus,
    pub in_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub paused: bool,
    pub ply_count: u32,
    pub captured_white: Vec<Occupant>,
    pub captured_black: Vec<Occupant>,
}

impl BoardView {
    pub fn cell(&self, at: Position) -> &CellView {
        &self.cells[at.y() as usize * 8 + at.x() as usize]
    }

    pub fn occupant(&self, at: Position) -> Option<Occupant> {
        self.cell(at).occupant
    }

    /// Ranks from 7 down to 0, the order a board is drawn in.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[CellView]> + '_ {
        self.cells.chunks(8).rev()
    }

    /// Pieces of `color` taken so far.
    pub fn captured(&self, color: Color) -> &[Occupant] {
        match color {
            Color::White => &self.captured_white,
            Color::Black => &self.captured_black,
        }
    }
}
