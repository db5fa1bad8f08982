//! Tag vocabulary of the markup dialect

use ratatui::style::{Color, Modifier, Style};

/// A recognised opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Set the foreground color, closed by `</key>`
    Color { key: String, color: Color },
    /// Add or remove a text decoration, closed by `</key>`
    Decoration {
        key: &'static str,
        modifier: Modifier,
        enabled: bool,
    },
    /// Drop all open styling
    Reset,
    /// Line break
    Newline,
}

impl Directive {
    /// The key a closing tag must name to close this directive
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Color { key, .. } => Some(key.as_str()),
            Self::Decoration { key, .. } => Some(*key),
            Self::Reset | Self::Newline => None,
        }
    }

    /// Style in effect after applying this directive on top of `base`
    pub fn apply(&self, base: Style) -> Style {
        match self {
            Self::Color { color, .. } => base.fg(*color),
            Self::Decoration {
                modifier, enabled: true, ..
            } => base.add_modifier(*modifier),
            Self::Decoration {
                modifier, enabled: false, ..
            } => base.remove_modifier(*modifier),
            Self::Reset | Self::Newline => base,
        }
    }
}

/// Legacy color names mapped onto the terminal palette
pub fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "dark_blue" => Color::Blue,
        "dark_green" => Color::Green,
        "dark_aqua" => Color::Cyan,
        "dark_red" => Color::Red,
        "dark_purple" => Color::Magenta,
        "gold" => Color::Yellow,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" => Color::DarkGray,
        "blue" => Color::LightBlue,
        "green" => Color::LightGreen,
        "aqua" => Color::LightCyan,
        "red" => Color::LightRed,
        "light_purple" => Color::LightMagenta,
        "yellow" => Color::LightYellow,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}

/// Parse `#rrggbb`
pub fn hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn any_color(value: &str) -> Option<Color> {
    named_color(value).or_else(|| hex_color(value))
}

fn decoration(name: &str) -> Option<(&'static str, Modifier)> {
    let decoration = match name {
        "bold" | "b" => ("bold", Modifier::BOLD),
        "italic" | "i" | "em" => ("italic", Modifier::ITALIC),
        "underlined" | "u" => ("underlined", Modifier::UNDERLINED),
        "strikethrough" | "st" => ("strikethrough", Modifier::CROSSED_OUT),
        "obfuscated" | "obf" => ("obfuscated", Modifier::RAPID_BLINK),
        _ => return None,
    };
    Some(decoration)
}

/// Interpret the body of an opening tag (`red` for `<red>`)
pub fn parse_directive(body: &str) -> Option<Directive> {
    let body = body.trim().to_ascii_lowercase();

    match body.as_str() {
        "reset" => return Some(Directive::Reset),
        "newline" | "br" => return Some(Directive::Newline),
        _ => {}
    }

    if let Some((name, value)) = body.split_once(':') {
        return match name {
            "color" | "colour" | "c" => any_color(value).map(|color| Directive::Color {
                key: "color".to_string(),
                color,
            }),
            _ => None,
        };
    }

    if let Some(name) = body.strip_prefix('!') {
        return decoration(name).map(|(key, modifier)| Directive::Decoration {
            key,
            modifier,
            enabled: false,
        });
    }

    if let Some((key, modifier)) = decoration(&body) {
        return Some(Directive::Decoration {
            key,
            modifier,
            enabled: true,
        });
    }

    any_color(&body).map(|color| Directive::Color { key: body.clone(), color })
}

/// Key named by the body of a closing tag (`red` for `</red>`)
pub fn closing_key(body: &str) -> Option<String> {
    let body = body.trim().to_ascii_lowercase();
    if body.is_empty() {
        return None;
    }
    if let Some((name, _)) = body.split_once(':') {
        return matches!(name, "color" | "colour" | "c").then(|| "color".to_string());
    }
    if matches!(body.as_str(), "color" | "colour" | "c") {
        return Some("color".to_string());
    }
    let name = body.strip_prefix('!').unwrap_or(&body);
    if let Some((key, _)) = decoration(name) {
        return Some(key.to_string());
    }
    any_color(&body).map(|_| body.clone())
}
