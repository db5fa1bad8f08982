//! Markup parser
//!
//! Best-effort: anything that does not parse as a recognised tag is kept as
//! literal text. Parsing never fails.

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use tracing::debug;

use super::style::{Directive, closing_key, parse_directive};

struct Frame {
    key: String,
    style: Style,
}

/// Builds lines of spans while tracking open tags
struct Builder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    buffer: String,
    buffer_style: Style,
    stack: Vec<Frame>,
}

impl Builder {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            spans: Vec::new(),
            buffer: String::new(),
            buffer_style: Style::default(),
            stack: Vec::new(),
        }
    }

    fn current_style(&self) -> Style {
        self.stack.last().map(|frame| frame.style).unwrap_or_default()
    }

    fn push_str(&mut self, text: &str) {
        let style = self.current_style();
        if style != self.buffer_style {
            self.flush();
            self.buffer_style = style;
        }
        self.buffer.push_str(text);
    }

    fn push_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.push_str(c.encode_utf8(&mut utf8));
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let content = std::mem::take(&mut self.buffer);
            self.spans.push(Span::styled(content, self.buffer_style));
        }
    }

    fn break_line(&mut self) {
        self.flush();
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
    }

    fn open(&mut self, directive: Directive) {
        match directive {
            Directive::Reset => self.stack.clear(),
            Directive::Newline => self.break_line(),
            other => {
                let style = other.apply(self.current_style());
                let key = other.key().unwrap_or_default().to_string();
                self.stack.push(Frame { key, style });
            }
        }
    }

    /// Close the nearest open tag named `key`, false if none is open
    fn close(&mut self, key: &str) -> bool {
        match self.stack.iter().rposition(|frame| frame.key == key) {
            Some(index) => {
                self.stack.truncate(index);
                true
            }
            None => false,
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.break_line();
        if self.lines.len() == 1 && self.lines[0].spans.is_empty() {
            return Text::default();
        }
        Text::from(self.lines)
    }
}

/// Try to handle a tag whose body is `body`; false means "treat as literal"
fn handle_tag(builder: &mut Builder, body: &str) -> bool {
    if let Some(name) = body.strip_prefix('/') {
        return match closing_key(name) {
            Some(key) => builder.close(&key),
            None => false,
        };
    }
    match parse_directive(body) {
        Some(directive) => {
            builder.open(directive);
            true
        }
        None => false,
    }
}

/// Parse markup into styled text. Empty input yields `Text::default()`.
pub fn parse(input: &str) -> Text<'static> {
    debug!(input_len = input.len(), "parse: called");
    let mut builder = Builder::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        match c {
            '\\' if rest[1..].starts_with('<') => {
                builder.push_char('<');
                rest = &rest[2..];
            }
            '\n' => {
                builder.break_line();
                rest = &rest[1..];
            }
            '<' => {
                let tag = rest[1..]
                    .find(['<', '>'])
                    .filter(|&end| rest[1..].as_bytes()[end] == b'>')
                    .map(|end| &rest[1..end + 1]);
                match tag {
                    Some(body) if handle_tag(&mut builder, body) => {
                        rest = &rest[body.len() + 2..];
                    }
                    _ => {
                        builder.push_char('<');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                let end = rest.find(['\\', '\n', '<']).unwrap_or(rest.len()).max(c.len_utf8());
                builder.push_str(&rest[..end]);
                rest = &rest[end..];
            }
        }
    }

    builder.finish()
}

/// Concatenate every span's content, lines joined by `\n`
pub fn flatten(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
