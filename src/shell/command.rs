use crate::engine::PieceType;
use crate::shell::errors::ShellError;

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `move ix iy fx fy [piece]`
    Move {
        from: (i32, i32),
        to: (i32, i32),
        promotion: Option<PieceType>,
    },
    /// `moves x y`: legal destinations of a piece.
    Moves { at: (i32, i32) },
    Show,
    Json,
    Restart,
    Pause,
    Resume,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  move ix iy fx fy [queen|rook|bishop|knight]   move a piece (x = file, y = rank, 0-7)
  moves x y                                     list legal destinations of a piece
  show                                          draw the board
  json                                          print the board as JSON
  pause | resume                                suspend or resume play
  restart                                       start a new game
  help                                          this text
  quit                                          leave";

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ShellError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut args = line.split_whitespace();
        let Some(name) = args.next() else {
            return Ok(None);
        };

        let cmd = match name.to_lowercase().as_str() {
            "move" | "m" => {
                let from = (number(args.next(), "ix")?, number(args.next(), "iy")?);
                let to = (number(args.next(), "fx")?, number(args.next(), "fy")?);
                let promotion = args.next().map(piece).transpose()?;
                Command::Move {
                    from,
                    to,
                    promotion,
                }
            }
            "moves" => Command::Moves {
                at: (number(args.next(), "x")?, number(args.next(), "y")?),
            },
            "show" | "board" => Command::Show,
            "json" => Command::Json,
            "restart" | "new" => Command::Restart,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ShellError::InvalidCommand(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

fn number(arg: Option<&str>, name: &'static str) -> Result<i32, ShellError> {
    let value = arg.ok_or(ShellError::MissingArgument(name))?;
    value.parse().map_err(|_| ShellError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

fn piece(arg: &str) -> Result<PieceType, ShellError> {
    PieceType::from_name(arg).ok_or_else(|| ShellError::InvalidPiece(arg.to_string()))
}
