use std::{borrow::Cow, collections::HashMap, path::Path};

use anyhow::Context;

use crate::{
    config::model::FontDef,
    foundation::core::Rgba8,
    foundation::error::{PosterError, PosterResult},
};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Clone)]
struct RegisteredFamily {
    /// Family name as reported by the font itself.
    name: String,
    data: vello_cpu::peniko::FontData,
}

/// Glyphs of one shaped span, positioned relative to the span's top-left corner.
pub struct ShapedSpan {
    /// Advance width of the whole span.
    pub width: f32,
    pub font: vello_cpu::peniko::FontData,
    pub font_size: f32,
    pub glyphs: Vec<vello_cpu::Glyph>,
}

/// Fonts registered for one render call, plus the Parley contexts used to shape spans.
pub struct FontRegistry {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    /// Keyed by configured alias and by real family name.
    families: HashMap<String, RegisteredFamily>,
    first: Option<RegisteredFamily>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            first: None,
        }
    }

    /// Register every declared font. Failures are logged and skipped.
    pub fn from_defs(defs: &[FontDef], root: &Path) -> Self {
        let mut out = Self::new();
        for def in defs {
            let path = root.join(&def.path);
            if let Err(err) = out.register_file(&path, &def.family) {
                tracing::warn!(
                    family = %def.family,
                    path = %path.display(),
                    error = %err,
                    "font registration failed; text in this family will fall back"
                );
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn register_file(&mut self, path: &Path, alias: &str) -> PosterResult<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.register_bytes(bytes, alias)
    }

    /// Register raw font bytes under `alias` and under the font's own family name.
    pub fn register_bytes(&mut self, bytes: Vec<u8>, alias: &str) -> PosterResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PosterError::validation("no font families registered from font bytes")
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::validation("registered font family has no name"))?
            .to_string();

        let family = RegisteredFamily {
            name: name.clone(),
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        };
        tracing::debug!(alias, family = %name, "registered font");

        self.families.insert(alias.to_string(), family.clone());
        self.families.entry(name).or_insert_with(|| family.clone());
        if self.first.is_none() {
            self.first = Some(family);
        }
        Ok(())
    }

    fn resolve(&self, requested: &str) -> Option<&RegisteredFamily> {
        if let Some(f) = self.families.get(requested) {
            return Some(f);
        }
        let fallback = self.first.as_ref()?;
        tracing::debug!(
            requested,
            fallback = %fallback.name,
            "unknown font family; using first registered font"
        );
        Some(fallback)
    }

    /// Shape a single-line span. `None` when no font is registered at all.
    pub fn shape(
        &mut self,
        text: &str,
        family: &str,
        font_size: f32,
        color: Rgba8,
    ) -> Option<ShapedSpan> {
        let resolved = self.resolve(family)?.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(resolved.name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                // Line-relative: x carries the advance, y the baseline.
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Some(ShapedSpan {
            width: layout.width(),
            font: resolved.data,
            font_size,
            glyphs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
