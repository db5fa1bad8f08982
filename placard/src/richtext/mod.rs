//! Rich-text rendering
//!
//! Turns a fully substituted string into styled text. The markup is a small
//! inline tag dialect:
//!
//! ```text
//! <red>, <dark_gray>, <#ff8800>, <color:gold>   foreground color
//! <bold>/<b>, <italic>/<i>, <underlined>/<u>,
//! <strikethrough>/<st>, <obfuscated>/<obf>       decorations (<!bold> negates)
//! </name>                                        close the nearest <name>
//! <reset>                                        drop all styling
//! <newline>, <br>, \n                            line break
//! \<                                             literal '<'
//! ```
//!
//! Anything else between angle brackets is literal text.

mod ansi;
mod parser;
pub mod style;

use ratatui::text::Text;
use tracing::debug;

pub use ansi::to_ansi;
pub use parser::flatten;

/// Parse markup into styled text.
///
/// Empty or absent input yields the canonical empty value `Text::default()`.
pub fn render(text: Option<&str>) -> Text<'static> {
    match text {
        Some(text) if !text.is_empty() => parser::parse(text),
        _ => {
            debug!("render: empty input");
            Text::default()
        }
    }
}

/// Render and discard styling, keeping only the literal characters
pub fn render_plain(text: Option<&str>) -> String {
    flatten(&render(text))
}

/// Remove recognised tags, leaving unknown tags and all other text as written
pub fn strip_tags(text: &str) -> String {
    render_plain(Some(text))
}
