//! Tokenizer for the inline markup mini-language.
//!
//! Recognized tags are `<c:VALUE>` / `</c>` (color) and `<s:NUMBER>` / `</s>` (font size).
//! Tag names are case-sensitive. Any other `<...>` run is an [`Token::Unknown`] token, and a
//! `<` with no closing `>` before the next `<` (or end of input) is a literal character.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    Color,
    Size,
}

impl TagKind {
    /// Closing token for this kind, e.g. `</c>`.
    pub fn close_token(self) -> &'static str {
        match self {
            Self::Color => "</c>",
            Self::Size => "</s>",
        }
    }
}

/// An open tag as it appeared in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenTag<'a> {
    pub kind: TagKind,
    /// Text after the `c:` / `s:` prefix, unvalidated.
    pub value: &'a str,
    /// Whole tag including angle brackets.
    pub raw: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Char(char),
    Newline,
    Open(OpenTag<'a>),
    Close { kind: TagKind, raw: &'a str },
    /// Bracketed run that is not a recognized tag; kept verbatim.
    Unknown(&'a str),
}

/// Streaming lexer over a marked-up string.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn bracketed(&self) -> Option<&'a str> {
        let rest = &self.src[self.pos + 1..];
        let end = rest.find(|c| c == '<' || c == '>')?;
        if rest.as_bytes()[end] != b'>' {
            return None;
        }
        Some(&self.src[self.pos..self.pos + end + 2])
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.src[self.pos..].chars().next()?;

        if c == '<'
            && let Some(raw) = self.bracketed()
        {
            self.pos += raw.len();
            return Some(classify(raw));
        }

        self.pos += c.len_utf8();
        Some(match c {
            '\n' => Token::Newline,
            c => Token::Char(c),
        })
    }
}

fn classify(raw: &str) -> Token<'_> {
    let inner = &raw[1..raw.len() - 1];
    match inner {
        "/c" => Token::Close {
            kind: TagKind::Color,
            raw,
        },
        "/s" => Token::Close {
            kind: TagKind::Size,
            raw,
        },
        _ => {
            if let Some(value) = inner.strip_prefix("c:") {
                Token::Open(OpenTag {
                    kind: TagKind::Color,
                    value,
                    raw,
                })
            } else if let Some(value) = inner.strip_prefix("s:") {
                Token::Open(OpenTag {
                    kind: TagKind::Size,
                    value,
                    raw,
                })
            } else {
                Token::Unknown(raw)
            }
        }
    }
}

/// Text with every recognized tag removed. Unknown bracketed runs stay.
pub fn visible_text(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for token in Lexer::new(src) {
        match token {
            Token::Char(c) => out.push(c),
            Token::Newline => out.push('\n'),
            Token::Unknown(raw) => out.push_str(raw),
            Token::Open(_) | Token::Close { .. } => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/markup/token.rs"]
mod tests;
