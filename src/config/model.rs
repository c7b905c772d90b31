use std::{
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
    overlay::layer::OverlayLayer,
    text::block::TextBlockStyle,
};

/// Cover and ending pages carry at most this many text blocks.
pub const MAX_TITLE_STYLES: usize = 3;
/// Content pages carry at most this many text blocks.
pub const MAX_PAGE_STYLES: usize = 7;

/// A font file and the family name text blocks refer to it by.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontDef {
    /// Relative paths resolve against the config file's directory.
    pub path: PathBuf,
    pub family: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateConfig {
    /// Directory holding one sub-directory per template.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_template")]
    pub default_template: String,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_template() -> String {
    "default".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            default_template: default_template(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::Png,
        }
    }
}

/// Everything a render needs besides the request's texts.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PosterConfig {
    #[serde(default)]
    pub fonts: Vec<FontDef>,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub canvas: Canvas,
    /// Text blocks for the cover and ending pages.
    #[serde(default)]
    pub title_styles: Vec<TextBlockStyle>,
    /// Text blocks for each content page.
    #[serde(default)]
    pub page_styles: Vec<TextBlockStyle>,
    #[serde(default)]
    pub overlays: Vec<OverlayLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl PosterConfig {
    /// Load a JSON config. Relative font and template paths are rebased onto the file's
    /// directory.
    pub fn from_path(path: &Path) -> PosterResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let Some(root) = path.parent() {
            cfg.rebase(root);
        }
        Ok(cfg)
    }

    pub fn from_reader(r: impl Read) -> PosterResult<Self> {
        serde_json::from_reader(r).map_err(|e| PosterError::serde(format!("config: {e}")))
    }

    fn rebase(&mut self, root: &Path) {
        for font in &mut self.fonts {
            if font.path.is_relative() {
                font.path = root.join(&font.path);
            }
        }
        if self.templates.base_dir.is_relative() {
            self.templates.base_dir = root.join(&self.templates.base_dir);
        }
        if self.output.dir.is_relative() {
            self.output.dir = root.join(&self.output.dir);
        }
    }

    pub fn validate(&self) -> PosterResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PosterError::validation("canvas width/height must be > 0"));
        }
        if self.title_styles.len() > MAX_TITLE_STYLES {
            return Err(PosterError::validation(format!(
                "at most {MAX_TITLE_STYLES} title styles are allowed, got {}",
                self.title_styles.len()
            )));
        }
        if self.page_styles.len() > MAX_PAGE_STYLES {
            return Err(PosterError::validation(format!(
                "at most {MAX_PAGE_STYLES} page styles are allowed, got {}",
                self.page_styles.len()
            )));
        }

        validate_styles("title", &self.title_styles)?;
        validate_styles("page", &self.page_styles)?;

        for layer in &self.overlays {
            layer.validate()?;
        }
        Ok(())
    }
}

fn validate_styles(group: &str, styles: &[TextBlockStyle]) -> PosterResult<()> {
    for (i, style) in styles.iter().enumerate() {
        if !style.font_size.is_finite() || style.font_size <= 0.0 {
            return Err(PosterError::validation(format!(
                "{group} style #{i} font_size must be finite and > 0"
            )));
        }
        if let Some(lh) = style.line_height
            && (!lh.is_finite() || lh <= 0.0)
        {
            return Err(PosterError::validation(format!(
                "{group} style #{i} line_height must be finite and > 0"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
