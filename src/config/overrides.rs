use std::path::PathBuf;

use crate::{
    config::model::{OutputFormat, PosterConfig},
    foundation::core::{Canvas, Rgba8},
    overlay::layer::OverlayLayer,
    text::block::{TextAlign, TextBlockStyle},
};

/// Field-by-field patch for one [`TextBlockStyle`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStylePatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub color: Option<Rgba8>,
    pub align: Option<TextAlign>,
    pub line_height: Option<f32>,
    pub chars_per_line: Option<usize>,
    pub max_lines: Option<usize>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl TextStylePatch {
    pub fn apply_to(&self, style: &mut TextBlockStyle) {
        if let Some(v) = self.x {
            style.x = v;
        }
        if let Some(v) = self.y {
            style.y = v;
        }
        if let Some(v) = &self.font_family {
            style.font_family.clone_from(v);
        }
        if let Some(v) = self.font_size {
            style.font_size = v;
        }
        if let Some(v) = self.color {
            style.color = v;
        }
        if let Some(v) = self.align {
            style.align = v;
        }
        style.line_height = self.line_height.or(style.line_height);
        style.chars_per_line = self.chars_per_line.or(style.chars_per_line);
        style.max_lines = self.max_lines.or(style.max_lines);
        style.width = self.width.or(style.width);
        style.height = self.height.or(style.height);
    }
}

/// Per-request adjustments layered over a [`PosterConfig`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    /// Template name under `templates.base_dir`.
    pub template: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub canvas: Option<Canvas>,
    pub seed: Option<u64>,
    /// Replaces the configured layer list as a whole.
    pub overlays: Option<Vec<OverlayLayer>>,
    /// Patches matched to `title_styles` by index; `null` leaves a style untouched.
    pub title_styles: Vec<Option<TextStylePatch>>,
    pub page_styles: Vec<Option<TextStylePatch>>,
}

impl StyleOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Return a patched copy of `config`. The input is never modified.
    pub fn apply(&self, config: &PosterConfig) -> PosterConfig {
        let mut out = config.clone();

        if let Some(t) = &self.template {
            out.templates.default_template.clone_from(t);
        }
        if let Some(dir) = &self.output_dir {
            out.output.dir.clone_from(dir);
        }
        if let Some(fmt) = self.output_format {
            out.output.format = fmt;
        }
        if let Some(canvas) = self.canvas {
            out.canvas = canvas;
        }
        if let Some(seed) = self.seed {
            out.seed = Some(seed);
        }
        if let Some(layers) = &self.overlays {
            out.overlays.clone_from(layers);
        }

        patch_styles("title", &mut out.title_styles, &self.title_styles);
        patch_styles("page", &mut out.page_styles, &self.page_styles);
        out
    }
}

fn patch_styles(group: &str, styles: &mut [TextBlockStyle], patches: &[Option<TextStylePatch>]) {
    for (i, patch) in patches.iter().enumerate() {
        let Some(patch) = patch else { continue };
        match styles.get_mut(i) {
            Some(style) => patch.apply_to(style),
            None => tracing::warn!(
                group,
                index = i,
                available = styles.len(),
                "style patch has no matching style; ignored"
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/overrides.rs"]
mod tests;
