pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod piece;
pub mod rules;
pub mod types;
pub mod view;

pub use board::{Board, Checkpoint};
pub use game::{Game, MoveOutcome};
pub use piece::{Piece, PieceId};
pub use types::*;
pub use view::{BoardView, CellView, Occupant};
