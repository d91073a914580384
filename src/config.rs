use crate::engine::Color;

/// How pieces are drawn in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphStyle {
    /// Chess symbols (♔ ♚ ...).
    Unicode,
    /// Letters, uppercase for White.
    Ascii,
}

impl GlyphStyle {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unicode" => Some(GlyphStyle::Unicode),
            "ascii" => Some(GlyphStyle::Ascii),
            _ => None,
        }
    }
}

/// Shell configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tracing filter directive.
    pub log_filter: String,
    pub glyphs: GlyphStyle,
    /// Draw file/rank labels around the board.
    pub show_coordinates: bool,
    /// Side to move in a freshly (re)started game.
    pub first_turn: Color,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup. Unset or unparseable values fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        AppConfig {
            log_filter: lookup("CHESS_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            glyphs: lookup("CHESS_GLYPHS")
                .and_then(|v| GlyphStyle::parse(&v))
                .unwrap_or(defaults.glyphs),
            show_coordinates: lookup("CHESS_COORDS")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.show_coordinates),
            first_turn: lookup("CHESS_FIRST_TURN")
                .and_then(|v| Color::from_str_loose(&v))
                .unwrap_or(defaults.first_turn),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_filter: "chess_rules=info".to_string(),
            glyphs: GlyphStyle::Unicode,
            show_coordinates: true,
            first_turn: Color::White,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
