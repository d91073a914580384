use crate::engine::MoveError;

/// Everything a shell command can fail with. Rejected moves are wrapped
/// as-is so the engine's typed error reaches the user unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("unknown command: {0} (try `help`)")]
    InvalidCommand(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid number {value:?} for {name}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid promotion piece: {0}")]
    InvalidPiece(String),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("can't encode board: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// Stable code shown in front of the message.
    pub fn code(&self) -> &'static str {
        match self {
            ShellError::InvalidCommand(_) => "INVALID_COMMAND",
            ShellError::MissingArgument(_)
            | ShellError::InvalidNumber { .. }
            | ShellError::InvalidPiece(_) => "INVALID_REQUEST",
            ShellError::Move(MoveError::GamePaused) => "GAME_PAUSED",
            ShellError::Move(MoveError::GameOver { .. }) => "GAME_OVER",
            ShellError::Move(MoveError::OutOfBounds(_)) => "OUT_OF_BOUNDS",
            ShellError::Move(_) => "INVALID_MOVE",
            ShellError::Json(_) => "INTERNAL_ERROR",
        }
    }
}
