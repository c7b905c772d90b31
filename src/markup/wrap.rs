use smallvec::SmallVec;

use crate::markup::token::{Lexer, OpenTag, Token};

/// One wrapped output line. Balanced on its own: tags open at its start are re-opened at its
/// head and tags still open at its end are closed at its tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLine(String);

impl DisplayLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Number of characters that count toward the budget (recognized tags are zero-width).
    pub fn visible_len(&self) -> usize {
        Lexer::new(&self.0)
            .map(|t| match t {
                Token::Char(_) | Token::Newline => 1,
                Token::Unknown(raw) => raw.chars().count(),
                Token::Open(_) | Token::Close { .. } => 0,
            })
            .sum()
    }
}

impl AsRef<str> for DisplayLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

struct LineBuilder<'a> {
    lines: Vec<DisplayLine>,
    buf: String,
    open: SmallVec<[OpenTag<'a>; 4]>,
    visible: usize,
}

impl LineBuilder<'_> {
    fn break_line(&mut self) {
        for tag in self.open.iter().rev() {
            self.buf.push_str(tag.kind.close_token());
        }
        self.lines.push(DisplayLine(std::mem::take(&mut self.buf)));
        for tag in &self.open {
            self.buf.push_str(tag.raw);
        }
        self.visible = 0;
    }
}

/// Split marked-up text into display lines of at most `chars_per_line` visible characters.
///
/// Newlines always break. Tags never consume budget. A bracketed token that is not a
/// recognized tag is atomic: it moves to the next line rather than being split, and counts its
/// full length. A budget of 0 is treated as 1.
///
/// An unknown token wider than the budget at the start of a line stays on that line; no empty
/// line is emitted ahead of it.
pub fn wrap(raw: &str, chars_per_line: usize) -> Vec<DisplayLine> {
    let budget = chars_per_line.max(1);
    let mut b = LineBuilder {
        lines: Vec::new(),
        buf: String::new(),
        open: SmallVec::new(),
        visible: 0,
    };

    for token in Lexer::new(raw) {
        match token {
            Token::Newline => b.break_line(),
            Token::Open(tag) => {
                b.buf.push_str(tag.raw);
                b.open.push(tag);
            }
            Token::Close { kind, raw } => {
                b.buf.push_str(raw);
                if let Some(pos) = b.open.iter().rposition(|t| t.kind == kind) {
                    b.open.remove(pos);
                }
            }
            Token::Unknown(raw) => {
                let n = raw.chars().count();
                if b.visible > 0 && b.visible + n > budget {
                    b.break_line();
                }
                b.buf.push_str(raw);
                b.visible += n;
            }
            Token::Char(c) => {
                if b.visible >= budget {
                    b.break_line();
                }
                b.buf.push(c);
                b.visible += 1;
            }
        }
    }

    if !b.buf.is_empty() || !b.open.is_empty() {
        b.break_line();
    }
    b.lines
}

#[cfg(test)]
#[path = "../../tests/unit/markup/wrap.rs"]
mod tests;
