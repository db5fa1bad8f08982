//! Terminal output for styled text

use colored::{ColoredString, Colorize};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;

fn terminal_color(color: Color) -> Option<colored::Color> {
    let color = match color {
        Color::Black => colored::Color::Black,
        Color::Red => colored::Color::Red,
        Color::Green => colored::Color::Green,
        Color::Yellow => colored::Color::Yellow,
        Color::Blue => colored::Color::Blue,
        Color::Magenta => colored::Color::Magenta,
        Color::Cyan => colored::Color::Cyan,
        Color::Gray => colored::Color::White,
        Color::DarkGray => colored::Color::BrightBlack,
        Color::LightRed => colored::Color::BrightRed,
        Color::LightGreen => colored::Color::BrightGreen,
        Color::LightYellow => colored::Color::BrightYellow,
        Color::LightBlue => colored::Color::BrightBlue,
        Color::LightMagenta => colored::Color::BrightMagenta,
        Color::LightCyan => colored::Color::BrightCyan,
        Color::White => colored::Color::BrightWhite,
        Color::Rgb(r, g, b) => colored::Color::TrueColor { r, g, b },
        _ => return None,
    };
    Some(color)
}

fn paint(content: &str, style: Style) -> ColoredString {
    let mut out = content.normal();
    if let Some(color) = style.fg.and_then(terminal_color) {
        out = out.color(color);
    }
    let modifiers = style.add_modifier - style.sub_modifier;
    if modifiers.contains(Modifier::BOLD) {
        out = out.bold();
    }
    if modifiers.contains(Modifier::ITALIC) {
        out = out.italic();
    }
    if modifiers.contains(Modifier::UNDERLINED) {
        out = out.underline();
    }
    if modifiers.contains(Modifier::CROSSED_OUT) {
        out = out.strikethrough();
    }
    if modifiers.contains(Modifier::RAPID_BLINK) {
        out = out.blink();
    }
    out
}

/// Render styled text with ANSI escapes (plain when colors are switched off)
pub fn to_ansi(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| paint(&span.content, span.style).to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
