use crate::{
    foundation::core::{Affine, Rgba8},
    markup::resolve::{StyleFrame, StyledSpan, resolve_inline},
    markup::wrap::wrap,
    render::surface::Surface,
    text::fonts::FontRegistry,
};

/// Character budget used when a block does not set `chars_per_line`.
pub const DEFAULT_CHARS_PER_LINE: usize = 20;
/// Line height as a multiple of font size when a block does not set `line_height`.
pub const DEFAULT_LINE_HEIGHT_FACTOR: f32 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    /// Accepted in configuration; drawn as [`TextAlign::Left`].
    Center,
    /// Accepted in configuration; drawn as [`TextAlign::Left`].
    Right,
}

/// Placement and base style of one text block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextBlockStyle {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub color: Rgba8,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chars_per_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<usize>,
    /// Declared box size. Not used by layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

fn default_font_size() -> f32 {
    32.0
}

impl Default for TextBlockStyle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            font_family: String::new(),
            font_size: default_font_size(),
            color: Rgba8::BLACK,
            align: TextAlign::Left,
            line_height: None,
            chars_per_line: None,
            max_lines: None,
            width: None,
            height: None,
        }
    }
}

impl TextBlockStyle {
    pub fn base_frame(&self) -> StyleFrame {
        StyleFrame {
            color: self.color,
            font_size: self.font_size,
        }
    }

    pub fn effective_line_height(&self) -> f32 {
        self.line_height
            .unwrap_or(self.font_size * DEFAULT_LINE_HEIGHT_FACTOR)
    }

    pub fn effective_chars_per_line(&self) -> usize {
        self.chars_per_line.unwrap_or(DEFAULT_CHARS_PER_LINE)
    }
}

/// One resolved line of a block, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct LaidOutLine {
    /// Offset from the block's `y`.
    pub offset_y: f32,
    pub spans: Vec<StyledSpan>,
}

/// Wrap, truncate and resolve `content` without touching fonts or pixels.
pub fn layout_block(content: &str, style: &TextBlockStyle) -> Vec<LaidOutLine> {
    let mut lines = wrap(content, style.effective_chars_per_line());
    if let Some(max) = style.max_lines {
        lines.truncate(max);
    }

    let line_height = style.effective_line_height();
    let base = style.base_frame();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| LaidOutLine {
            offset_y: i as f32 * line_height,
            spans: resolve_inline(line.as_str(), base),
        })
        .collect()
}

/// Draw a text block left-aligned at `(style.x, style.y)`. Returns the number of lines laid out.
#[tracing::instrument(level = "debug", skip(surface, fonts, content))]
pub fn draw_block(
    surface: &mut Surface,
    fonts: &mut FontRegistry,
    content: &str,
    style: &TextBlockStyle,
) -> usize {
    if style.align != TextAlign::Left {
        tracing::debug!(align = ?style.align, "non-left alignment is drawn left-aligned");
    }

    let lines = layout_block(content, style);
    if fonts.is_empty() {
        if !lines.is_empty() {
            tracing::warn!("no fonts registered; skipping text block");
        }
        return lines.len();
    }

    for line in &lines {
        let y = f64::from(style.y + line.offset_y);
        let mut cursor_x = style.x;
        for span in &line.spans {
            let Some(shaped) = fonts.shape(
                &span.text,
                &style.font_family,
                span.style.font_size,
                span.style.color,
            ) else {
                continue;
            };
            surface.fill_glyphs(
                &shaped.font,
                shaped.font_size,
                span.style.color,
                Affine::translate((f64::from(cursor_x), y)),
                shaped.glyphs.into_iter(),
            );
            cursor_x += shaped.width;
        }
    }
    lines.len()
}

#[cfg(test)]
#[path = "../../tests/unit/text/block.rs"]
mod tests;
