//! Stateful game controller wrapping `Board`.
//!
//! `Game` owns the board, whose turn it is, the en-passant target and the
//! pause/termination state. `submit_move` is the only way to change the
//! position: it validates, applies on the board, rolls back if the mover's
//! own king ends up attacked, and otherwise commits and recomputes status.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::rules;
use crate::engine::types::{
    BoardError, Color, GameStatus, Move, MoveError, PieceType, Position, SpecialMove,
};
use crate::engine::view::{BoardView, CellView, Occupant};

// =========================================================================
// MoveOutcome
// =========================================================================

/// What an accepted move did and where it left the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub mover: Color,
    pub piece: PieceType,
    pub from: Position,
    pub to: Position,
    pub captured: Option<Occupant>,
    pub special: SpecialMove,
    pub promotion: Option<PieceType>,
    /// Side to move next.
    pub turn: Color,
    pub status: GameStatus,
    pub in_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
}

// =========================================================================
// Game
// =========================================================================

#[derive(Clone, Debug)]
pub struct Game {
    // Core state
    board: Board,
    turn: Color,
    en_passant: Option<Position>,
    ply_count: u32,

    // Status
    status: GameStatus,
    paused: bool,
    last_move: Option<MoveOutcome>,

    // Metadata
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_move_at: Option<DateTime<Utc>>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Standard setup, White to move.
    pub fn new() -> Self {
        Self::with_board(Board::standard(), Color::White)
    }

    /// Start from an arbitrary board with `turn` to move.
    pub fn with_board(board: Board, turn: Color) -> Self {
        let mut game = Self {
            board,
            turn,
            en_passant: None,
            ply_count: 0,
            status: GameStatus::Active,
            paused: false,
            last_move: None,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            last_move_at: None,
        };
        game.status = game.compute_status();
        game
    }

    /// Build a custom setup from `(kind, color, position)` triples. Every
    /// piece starts unmoved, so kings and corner rooks keep castling rights.
    pub fn from_pieces<I>(pieces: I, turn: Color) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (PieceType, Color, Position)>,
    {
        let mut board = Board::empty();
        for (kind, color, at) in pieces {
            board.place(kind, color, at)?;
        }
        Ok(Self::with_board(board, turn))
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Cell a pawn may capture onto en passant this turn.
    pub fn en_passant(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    pub fn last_move(&self) -> Option<&MoveOutcome> {
        self.last_move.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the side to move is in check (mated included).
    pub fn in_check(&self) -> bool {
        matches!(
            self.status,
            GameStatus::Check | GameStatus::Checkmate { .. }
        )
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.status, GameStatus::Checkmate { .. })
    }

    pub fn is_stalemate(&self) -> bool {
        self.status == GameStatus::Stalemate
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.board, self.turn, self.en_passant)
    }

    /// Legal moves of the piece on `from`, if it belongs to the side to move.
    pub fn legal_moves_from(&self, from: Position) -> Vec<Move> {
        match self.board.piece_at(from) {
            Some(p) if p.color == self.turn => {
                movegen::legal_moves_from(&self.board, from, self.en_passant)
            }
            _ => Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Pause
    // -----------------------------------------------------------------

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    // -----------------------------------------------------------------
    // Submit move
    // -----------------------------------------------------------------

    /// Play `from -> to` for the side to move. `promotion` picks the piece a
    /// pawn becomes on the far rank (queen if omitted).
    ///
    /// On any error the game is left exactly as it was.
    pub fn submit_move(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PieceType>,
    ) -> Result<MoveOutcome, MoveError> {
        self.ensure_playable()?;
        if from == to {
            return Err(MoveError::SameSquareMove { at: from });
        }
        let piece = self
            .board
            .piece_at(from)
            .ok_or(MoveError::NoPieceAtSource { at: from })?;
        if piece.color != self.turn {
            return Err(MoveError::WrongTurnColor {
                at: from,
                turn: self.turn,
            });
        }

        let mv = rules::classify(&self.board, from, to, self.en_passant, promotion)?;
        let mover = self.turn;

        let checkpoint = self.board.checkpoint();
        let taken = match self.board.apply(&mv) {
            Ok(taken) => taken,
            Err(err) => {
                self.board.restore(checkpoint);
                return Err(err.into());
            }
        };
        if let Some(attacker) = attacks::checker(&self.board, mover) {
            self.board.restore(checkpoint);
            debug!(%from, %to, %attacker, "move rolled back: own king attacked");
            return Err(MoveError::SelfCheckAfterMove { from, to, attacker });
        }

        // Commit.
        self.en_passant = match mv.special {
            SpecialMove::DoubleStep { passed } => Some(passed),
            _ => None,
        };
        self.turn = !mover;
        self.ply_count += 1;
        self.status = self.compute_status();
        self.last_move_at = Some(Utc::now());

        let outcome = MoveOutcome {
            mover,
            piece: mv.piece,
            from,
            to,
            captured: taken.and_then(|id| self.board.piece(id)).map(Occupant::from),
            special: mv.special,
            promotion: mv.promotion,
            turn: self.turn,
            status: self.status,
            in_check: self.in_check(),
            checkmate: self.is_checkmate(),
            stalemate: self.is_stalemate(),
        };
        debug!(%mover, %mv, status = %self.status, ply = self.ply_count, "move accepted");
        match self.status {
            GameStatus::Checkmate { winner } => {
                info!(game = %self.id, %winner, plies = self.ply_count, "checkmate")
            }
            GameStatus::Stalemate => info!(game = %self.id, plies = self.ply_count, "stalemate"),
            _ => {}
        }

        self.last_move = Some(outcome.clone());
        Ok(outcome)
    }

    /// `submit_move` from raw integer coordinates, as a host reads them.
    pub fn submit_coords(
        &mut self,
        from: (i32, i32),
        to: (i32, i32),
        promotion: Option<PieceType>,
    ) -> Result<MoveOutcome, MoveError> {
        self.ensure_playable()?;
        let from = Position::new(from.0, from.1)?;
        let to = Position::new(to.0, to.1)?;
        self.submit_move(from, to, promotion)
    }

    // -----------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------

    /// Read-only copy of all 64 cells plus turn and status flags.
    pub fn snapshot(&self) -> BoardView {
        let cells = Position::all()
            .map(|at| CellView {
                x: at.x(),
                y: at.y(),
                occupant: self.board.piece_at(at).map(Occupant::from),
            })
            .collect();
        BoardView {
            cells,
            turn: self.turn,
            status: self.status,
            in_check: self.in_check(),
            checkmate: self.is_checkmate(),
            stalemate: self.is_stalemate(),
            paused: self.paused,
            ply_count: self.ply_count,
            captured_white: self.board.captured(Color::White).map(Occupant::from).collect(),
            captured_black: self.board.captured(Color::Black).map(Occupant::from).collect(),
        }
    }

    // -----------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------

    fn ensure_playable(&self) -> Result<(), MoveError> {
        if self.paused {
            return Err(MoveError::GamePaused);
        }
        if self.status.is_game_over() {
            return Err(MoveError::GameOver {
                status: self.status,
            });
        }
        Ok(())
    }

    /// Status for the side to move: check from the king scan, mate or
    /// stalemate when no legal move exists.
    fn compute_status(&self) -> GameStatus {
        let in_check = attacks::is_in_check(&self.board, self.turn);
        let can_move = movegen::has_legal_move(&self.board, self.turn, self.en_passant);
        match (in_check, can_move) {
            (true, false) => GameStatus::Checkmate {
                winner: !self.turn,
            },
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Active,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
