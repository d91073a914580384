use std::io;

use chess_rules::config::AppConfig;
use chess_rules::shell::Session;
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    let config = AppConfig::from_env();

    // Initialize tracing (structured logging) on stderr; stdout carries the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log_filter))
                .unwrap_or_else(|_| "chess_rules=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("chess-rules v{} starting", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(config).run(stdin.lock(), stdout.lock())
}
