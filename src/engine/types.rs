use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank delta of a single pawn step: +1 for White, -1 for Black.
    #[inline]
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank holding this side's king and rooks in the standard setup.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank pawns start on; the only rank a double step is allowed from.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Far rank where this side's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Parse "white"/"black" (case-insensitive, single letters accepted).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "white" | "w" => Some(Color::White),
            "black" | "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::King,
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Pawn,
    ];

    /// Pieces a pawn may turn into on the far rank.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Rook, bishop and queen: legality requires scanning intermediate cells.
    #[inline]
    pub const fn is_sliding(self) -> bool {
        matches!(self, PieceType::Queen | PieceType::Rook | PieceType::Bishop)
    }

    /// Only pawns promote.
    #[inline]
    pub const fn is_promotable(self) -> bool {
        matches!(self, PieceType::Pawn)
    }

    /// Whether a pawn may be promoted into this kind.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight
        )
    }

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Chess symbol for the piece.
    pub fn symbol(self, color: Color) -> char {
        match (color, self) {
            (Color::White, PieceType::King) => '♔',
            (Color::White, PieceType::Queen) => '♕',
            (Color::White, PieceType::Rook) => '♖',
            (Color::White, PieceType::Bishop) => '♗',
            (Color::White, PieceType::Knight) => '♘',
            (Color::White, PieceType::Pawn) => '♙',
            (Color::Black, PieceType::King) => '♚',
            (Color::Black, PieceType::Queen) => '♛',
            (Color::Black, PieceType::Rook) => '♜',
            (Color::Black, PieceType::Bishop) => '♝',
            (Color::Black, PieceType::Knight) => '♞',
            (Color::Black, PieceType::Pawn) => '♟',
        }
    }

    /// Parse a piece name like "queen" or a letter like "q" (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "king" | "k" => Some(PieceType::King),
            "queen" | "q" => Some(PieceType::Queen),
            "rook" | "r" => Some(PieceType::Rook),
            "bishop" | "b" => Some(PieceType::Bishop),
            "knight" | "n" => Some(PieceType::Knight),
            "pawn" | "p" => Some(PieceType::Pawn),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A cell on the 8×8 grid. `x` is the file (0..7), `y` the rank (0..7);
/// White starts on ranks 0 and 1.
///
/// Only constructible through [`Position::new`] / [`Position::offset`], so
/// every value is a valid address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Validate a pair of raw coordinates.
    pub fn new(x: i32, y: i32) -> Result<Self, OutOfBounds> {
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Ok(Position {
                x: x as u8,
                y: y as u8,
            })
        } else {
            Err(OutOfBounds { x, y })
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        self.x
    }

    #[inline]
    pub fn y(self) -> u8 {
        self.y
    }

    /// Shift by a delta, re-validating the result.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Result<Self, OutOfBounds> {
        Position::new(self.x as i32 + dx, self.y as i32 + dy)
    }

    /// Signed `(dx, dy)` from `self` to `to`.
    #[inline]
    pub fn delta(self, to: Position) -> (i32, i32) {
        (
            to.x as i32 - self.x as i32,
            to.y as i32 - self.y as i32,
        )
    }

    /// Whether the cell is a light square (used for rendering).
    #[inline]
    pub fn is_light(self) -> bool {
        (self.x + self.y) % 2 == 1
    }

    /// All 64 cells, rank by rank starting at `[0;0]`.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8u8).flat_map(|y| (0..8u8).map(move |x| Position { x, y }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{};{}]", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Compass direction of a move. North is towards Black's side (+y),
/// east towards higher files (+x).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
    None,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [Direction::N, Direction::S, Direction::E, Direction::W];
    pub const DIAGONAL: [Direction; 4] =
        [Direction::NE, Direction::NW, Direction::SE, Direction::SW];

    /// Direction from `from` towards `to`. Moves that are neither straight nor
    /// diagonal (knight jumps) get the quadrant they head into.
    pub fn between(from: Position, to: Position) -> Direction {
        let (dx, dy) = from.delta(to);
        match (dx.signum(), dy.signum()) {
            (0, 1) => Direction::N,
            (0, -1) => Direction::S,
            (1, 0) => Direction::E,
            (-1, 0) => Direction::W,
            (1, 1) => Direction::NE,
            (-1, 1) => Direction::NW,
            (1, -1) => Direction::SE,
            (-1, -1) => Direction::SW,
            _ => Direction::None,
        }
    }

    /// Unit step `(dx, dy)`.
    pub const fn step(self) -> (i32, i32) {
        match self {
            Direction::N => (0, 1),
            Direction::S => (0, -1),
            Direction::E => (1, 0),
            Direction::W => (-1, 0),
            Direction::NE => (1, 1),
            Direction::NW => (-1, 1),
            Direction::SE => (1, -1),
            Direction::SW => (-1, -1),
            Direction::None => (0, 0),
        }
    }

    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        matches!(self, Direction::N | Direction::S | Direction::E | Direction::W)
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NE | Direction::NW | Direction::SE | Direction::SW
        )
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// What kind of move this is beyond a plain relocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpecialMove {
    #[default]
    Ordinary,
    /// King moved two files; the rook jumps to the cell the king crossed.
    Castle {
        #[serde(rename = "rookFrom")]
        rook_from: Position,
        #[serde(rename = "rookTo")]
        rook_to: Position,
    },
    /// Pawn captured a pawn that had just double-stepped past it.
    EnPassant,
    /// Pawn advanced two ranks; `passed` becomes the en-passant target.
    DoubleStep { passed: Position },
}

/// A classified move: geometry plus everything needed to apply it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub direction: Direction,
    pub piece: PieceType,
    /// Cell of the piece being taken. Differs from `to` only for en passant.
    pub capture: Option<Position>,
    pub promotion: Option<PieceType>,
    pub special: SpecialMove,
}

impl Move {
    pub fn new(piece: PieceType, from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            direction: Direction::between(from, to),
            piece,
            capture: None,
            promotion: None,
            special: SpecialMove::Ordinary,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "={promo}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Current status of a game, from the point of view of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GameStatus {
    Active,
    Check,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate { .. } => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Raw coordinates outside the 8×8 grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("out of bounds position [{x};{y}]")]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
}

/// Rejected board mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell {0} is already occupied")]
    Occupied(Position),

    #[error("cell {0} is empty")]
    Vacant(Position),
}

/// Why a submitted move was rejected. The game is unchanged whenever one of
/// these is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    #[error("same cell move (no move) {at}")]
    SameSquareMove { at: Position },

    #[error("no piece to move {at}")]
    NoPieceAtSource { at: Position },

    #[error("wrong color move {at}: it is {turn}'s turn")]
    WrongTurnColor { at: Position, turn: Color },

    #[error("can't capture same color {from} -> {to}")]
    FriendlyFireCapture { from: Position, to: Position },

    #[error("{piece} can't move {from} -> {to}")]
    IllegalPattern {
        piece: PieceType,
        from: Position,
        to: Position,
    },

    #[error("{piece} can't jump over the piece at {blocker} ({from} -> {to})")]
    BlockedPath {
        piece: PieceType,
        from: Position,
        to: Position,
        blocker: Position,
    },

    #[error("own king would be attacked from {attacker} after {from} -> {to}")]
    SelfCheckAfterMove {
        from: Position,
        to: Position,
        attacker: Position,
    },

    #[error("king can't castle through the attacked cell {at}")]
    CastlingUnderAttack { at: Position },

    #[error("can't promote to {requested} with {from} -> {to}")]
    InvalidPromotion {
        from: Position,
        to: Position,
        requested: PieceType,
    },

    #[error("game over: {status}")]
    GameOver { status: GameStatus },

    #[error("game paused: can't make moves")]
    GamePaused,

    #[error(transparent)]
    Board(#[from] BoardError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::White.to_string(), "white");
        assert_eq!(Color::Black.to_string(), "black");
    }

    #[test]
    fn color_ranks() {
        assert_eq!(Color::White.forward(), 1);
        assert_eq!(Color::Black.forward(), -1);
        assert_eq!(Color::White.pawn_rank(), 1);
        assert_eq!(Color::Black.pawn_rank(), 6);
        assert_eq!(Color::White.promotion_rank(), 7);
        assert_eq!(Color::Black.promotion_rank(), 0);
    }

    #[test]
    fn color_from_str() {
        assert_eq!(Color::from_str_loose("WHITE"), Some(Color::White));
        assert_eq!(Color::from_str_loose("b"), Some(Color::Black));
        assert_eq!(Color::from_str_loose("red"), None);
    }

    #[test]
    fn piece_type_classification() {
        assert!(PieceType::Queen.is_sliding());
        assert!(PieceType::Rook.is_sliding());
        assert!(PieceType::Bishop.is_sliding());
        assert!(!PieceType::Knight.is_sliding());
        assert!(!PieceType::King.is_sliding());
        assert!(!PieceType::Pawn.is_sliding());

        assert!(PieceType::Pawn.is_promotable());
        assert!(!PieceType::Queen.is_promotable());

        for pt in PieceType::PROMOTIONS {
            assert!(pt.is_promotion_target());
        }
        assert!(!PieceType::King.is_promotion_target());
        assert!(!PieceType::Pawn.is_promotion_target());
    }

    #[test]
    fn piece_type_names() {
        for pt in PieceType::ALL {
            assert_eq!(PieceType::from_name(&pt.to_string()), Some(pt));
            assert_eq!(
                PieceType::from_name(&pt.to_char(Color::White).to_string()),
                Some(pt)
            );
        }
        assert_eq!(PieceType::from_name("dragon"), None);
    }

    #[test]
    fn piece_chars_by_color() {
        assert_eq!(PieceType::Knight.to_char(Color::White), 'N');
        assert_eq!(PieceType::Knight.to_char(Color::Black), 'n');
        assert_eq!(PieceType::King.symbol(Color::Black), '♚');
    }

    #[test]
    fn position_bounds() {
        for x in -2..10 {
            for y in -2..10 {
                let inside = (0..8).contains(&x) && (0..8).contains(&y);
                assert_eq!(Position::new(x, y).is_ok(), inside, "[{x};{y}]");
            }
        }
        assert_eq!(Position::new(8, 0), Err(OutOfBounds { x: 8, y: 0 }));
    }

    #[test]
    fn position_offset_revalidates() {
        let corner = Position::new(7, 7).unwrap();
        assert!(corner.offset(1, 0).is_err());
        assert!(corner.offset(0, 1).is_err());
        assert_eq!(corner.offset(-2, -1), Position::new(5, 6));
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::new(3, 5).unwrap().to_string(), "[3;5]");
    }

    #[test]
    fn position_all_covers_board() {
        let all: Vec<Position> = Position::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0], Position::new(0, 0).unwrap());
        assert_eq!(all[9], Position::new(1, 1).unwrap());
        assert_eq!(all[63], Position::new(7, 7).unwrap());
    }

    #[test]
    fn direction_between() {
        let c = Position::new(3, 3).unwrap();
        let at = |x, y| Position::new(x, y).unwrap();
        assert_eq!(Direction::between(c, at(3, 6)), Direction::N);
        assert_eq!(Direction::between(c, at(3, 0)), Direction::S);
        assert_eq!(Direction::between(c, at(7, 3)), Direction::E);
        assert_eq!(Direction::between(c, at(0, 3)), Direction::W);
        assert_eq!(Direction::between(c, at(5, 5)), Direction::NE);
        assert_eq!(Direction::between(c, at(1, 5)), Direction::NW);
        assert_eq!(Direction::between(c, at(5, 1)), Direction::SE);
        assert_eq!(Direction::between(c, at(1, 1)), Direction::SW);
        assert_eq!(Direction::between(c, c), Direction::None);
        // Knight jumps get their quadrant.
        assert_eq!(Direction::between(c, at(4, 5)), Direction::NE);
    }

    #[test]
    fn direction_kinds() {
        for d in Direction::ORTHOGONAL {
            assert!(d.is_orthogonal());
            assert!(!d.is_diagonal());
        }
        for d in Direction::DIAGONAL {
            assert!(d.is_diagonal());
            assert!(!d.is_orthogonal());
        }
        assert!(!Direction::None.is_orthogonal());
        assert_eq!(Direction::None.step(), (0, 0));
    }

    #[test]
    fn move_display() {
        let from = Position::new(4, 6).unwrap();
        let to = Position::new(4, 7).unwrap();
        let mut mv = Move::new(PieceType::Pawn, from, to);
        assert_eq!(mv.to_string(), "[4;6]->[4;7]");
        mv.promotion = Some(PieceType::Knight);
        assert_eq!(mv.to_string(), "[4;6]->[4;7]=knight");
    }

    #[test]
    fn game_status_strings() {
        assert_eq!(GameStatus::Active.as_str(), "active");
        assert_eq!(GameStatus::Check.as_str(), "check");
        assert_eq!(
            GameStatus::Checkmate {
                winner: Color::White
            }
            .as_str(),
            "checkmate"
        );
        assert_eq!(GameStatus::Stalemate.as_str(), "stalemate");
    }

    #[test]
    fn game_status_is_game_over() {
        assert!(!GameStatus::Active.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
        assert!(
            GameStatus::Checkmate {
                winner: Color::Black
            }
            .is_game_over()
        );
        assert!(GameStatus::Stalemate.is_game_over());
    }

    #[test]
    fn errors_carry_typed_fields() {
        let at = Position::new(1, 1).unwrap();
        let err = MoveError::NoPieceAtSource { at };
        assert!(matches!(err, MoveError::NoPieceAtSource { at: p } if p == at));
        assert_eq!(err.to_string(), "no piece to move [1;1]");

        let err: MoveError = OutOfBounds { x: -1, y: 3 }.into();
        assert_eq!(err.to_string(), "out of bounds position [-1;3]");
    }
}
