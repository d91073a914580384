//! Line-oriented terminal host for a single game.
//!
//! A `Session` owns the current `Game` and replaces it on `restart`. Each
//! input line is parsed into a `Command`, executed, and answered with text;
//! rejected commands print the error and the unchanged board.

pub mod command;
pub mod errors;
pub mod render;

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::engine::{Board, Game, MoveError, MoveOutcome, Position};

pub use command::Command;
pub use errors::ShellError;

/// Text produced for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: String) -> Self {
        Reply { text, quit: false }
    }
}

pub struct Session {
    game: Game,
    config: AppConfig,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let game = Game::with_board(Board::standard(), config.first_turn);
        Session { game, config }
    }

    /// Host an already constructed game (custom setups).
    pub fn with_game(game: Game, config: AppConfig) -> Self {
        Session { game, config }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{}", self.board_text())?;
        for line in input.lines() {
            let reply = self.handle_line(&line?);
            if !reply.text.is_empty() {
                writeln!(output, "{}", reply.text)?;
            }
            output.flush()?;
            if reply.quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one line. Errors are turned into text followed by the board.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let cmd = match Command::parse(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Reply::text(String::new()),
            Err(err) => return self.error_reply(&err),
        };
        match self.execute(cmd) {
            Ok(reply) => reply,
            Err(err) => self.error_reply(&err),
        }
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Reply, ShellError> {
        let text = match cmd {
            Command::Move {
                from,
                to,
                promotion,
            } => {
                let outcome = self.game.submit_coords(from, to, promotion)?;
                format!("{}\n{}", describe(&outcome), self.board_text())
            }
            Command::Moves { at } => {
                let at = Position::new(at.0, at.1).map_err(MoveError::from)?;
                let dests: Vec<String> = self
                    .game
                    .legal_moves_from(at)
                    .iter()
                    .map(|m| m.to.to_string())
                    .collect();
                if dests.is_empty() {
                    format!("no legal moves from {at}")
                } else {
                    format!("{at}: {}", dests.join(" "))
                }
            }
            Command::Show => self.board_text(),
            Command::Json => serde_json::to_string_pretty(&self.game.snapshot())?,
            Command::Restart => {
                let old = std::mem::replace(
                    &mut self.game,
                    Game::with_board(Board::standard(), self.config.first_turn),
                );
                warn!(old = %old.id, new = %self.game.id, plies = old.ply_count(), "game restarted");
                format!("new game\n{}", self.board_text())
            }
            Command::Pause => {
                self.game.pause();
                "game paused".to_string()
            }
            Command::Resume => {
                self.game.resume();
                "game resumed".to_string()
            }
            Command::Help => command::HELP.to_string(),
            Command::Quit => {
                return Ok(Reply {
                    text: String::new(),
                    quit: true,
                });
            }
        };
        Ok(Reply::text(text))
    }

    fn board_text(&self) -> String {
        render::render(
            &self.game.snapshot(),
            self.config.glyphs,
            self.config.show_coordinates,
        )
    }

    fn error_reply(&self, err: &ShellError) -> Reply {
        debug!(code = err.code(), %err, "command rejected");
        Reply::text(format!("error [{}]: {err}\n{}", err.code(), self.board_text()))
    }
}

/// One-line summary of an accepted move.
fn describe(outcome: &MoveOutcome) -> String {
    let mut s = format!(
        "{} {} {} -> {}",
        outcome.mover, outcome.piece, outcome.from, outcome.to
    );
    if let Some(taken) = outcome.captured {
        s.push_str(&format!(", takes {}", taken.kind));
    }
    if let Some(promo) = outcome.promotion {
        s.push_str(&format!(", promotes to {promo}"));
    }
    s
}
