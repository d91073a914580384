//! Text rendering of a `BoardView`.

use crate::config::GlyphStyle;
use crate::engine::{BoardView, CellView, Color, GameStatus, Occupant, Position};

/// Draw the board with rank 7 at the top, followed by the status line and
/// the captured pieces, if any.
pub fn render(view: &BoardView, style: GlyphStyle, coordinates: bool) -> String {
    let mut out = String::new();
    for row in view.rows_top_down() {
        if let (true, Some(first)) = (coordinates, row.first()) {
            out.push_str(&format!("{} ", first.y));
        }
        let cells: Vec<String> = row.iter().map(|c| cell_glyph(c, style).to_string()).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    if coordinates {
        out.push_str("  0 1 2 3 4 5 6 7\n");
    }
    out.push_str(&status_line(view));
    out.push('\n');

    for color in [Color::White, Color::Black] {
        let taken = view.captured(color);
        if !taken.is_empty() {
            let glyphs: String = taken.iter().map(|o| piece_glyph(o, style)).collect();
            out.push_str(&format!("captured {color}: {glyphs}\n"));
        }
    }
    out
}

/// `turn: white | check | ply 12`, with the terminal state spelled out.
pub fn status_line(view: &BoardView) -> String {
    let mut parts = vec![format!("turn: {}", view.turn)];
    match view.status {
        GameStatus::Active => {}
        GameStatus::Check => parts.push("check".to_string()),
        GameStatus::Checkmate { winner } => parts.push(format!("checkmate, {winner} wins")),
        GameStatus::Stalemate => parts.push("stalemate, draw".to_string()),
    }
    if view.paused {
        parts.push("paused".to_string());
    }
    parts.push(format!("ply {}", view.ply_count));
    parts.join(" | ")
}

fn cell_glyph(cell: &CellView, style: GlyphStyle) -> char {
    if let Some(occupant) = &cell.occupant {
        return piece_glyph(occupant, style);
    }
    let light = Position::new(cell.x as i32, cell.y as i32).is_ok_and(|p| p.is_light());
    match (style, light) {
        (GlyphStyle::Unicode, true) => '·',
        (GlyphStyle::Unicode, false) => '░',
        (GlyphStyle::Ascii, true) => '.',
        (GlyphStyle::Ascii, false) => ':',
    }
}

fn piece_glyph(occupant: &Occupant, style: GlyphStyle) -> char {
    match style {
        GlyphStyle::Unicode => occupant.kind.symbol(occupant.color),
        GlyphStyle::Ascii => occupant.kind.to_char(occupant.color),
    }
}
