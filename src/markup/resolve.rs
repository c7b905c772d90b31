use smallvec::SmallVec;

use crate::{
    foundation::core::Rgba8,
    markup::token::{Lexer, TagKind, Token},
};

/// Resolved style state at one point of a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleFrame {
    pub color: Rgba8,
    pub font_size: f32,
}

/// Run of text drawn with a single resolved style.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub style: StyleFrame,
}

/// Resolve one display line into flat styled spans.
///
/// Open tags push a modified copy of the top frame; a malformed color or size value pushes an
/// unchanged copy so the matching close still pairs up. A close tag pops whatever frame is on
/// top, regardless of its kind, and an emptied stack falls back to `base`.
pub fn resolve_inline(line: &str, base: StyleFrame) -> Vec<StyledSpan> {
    let mut stack: SmallVec<[StyleFrame; 8]> = SmallVec::new();
    stack.push(base);

    let mut spans = Vec::new();
    let mut buf = String::new();

    for token in Lexer::new(line) {
        match token {
            Token::Char(c) => buf.push(c),
            Token::Newline => buf.push('\n'),
            Token::Unknown(raw) => buf.push_str(raw),
            Token::Open(tag) => {
                let top = *stack.last().unwrap_or(&base);
                flush(&mut spans, &mut buf, top);
                let mut frame = top;
                match tag.kind {
                    TagKind::Color => {
                        if let Some(color) = Rgba8::parse_hex(tag.value) {
                            frame.color = color;
                        }
                    }
                    TagKind::Size => {
                        if let Some(size) = parse_font_size(tag.value) {
                            frame.font_size = size;
                        }
                    }
                }
                stack.push(frame);
            }
            Token::Close { .. } => {
                let top = *stack.last().unwrap_or(&base);
                flush(&mut spans, &mut buf, top);
                stack.pop();
                if stack.is_empty() {
                    stack.push(base);
                }
            }
        }
    }

    let top = *stack.last().unwrap_or(&base);
    flush(&mut spans, &mut buf, top);
    spans
}

fn flush(spans: &mut Vec<StyledSpan>, buf: &mut String, style: StyleFrame) {
    if buf.is_empty() {
        return;
    }
    spans.push(StyledSpan {
        text: std::mem::take(buf),
        style,
    });
}

fn parse_font_size(value: &str) -> Option<f32> {
    let v = value.trim().parse::<f32>().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

#[cfg(test)]
#[path = "../../tests/unit/markup/resolve.rs"]
mod tests;
