use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::decode::{AssetLoader, FsAssetLoader, PreparedImage},
    assets::pool::AssetPool,
    config::model::PosterConfig,
    config::overrides::StyleOverrides,
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
    foundation::rng::{RandomSource, SeededRandom},
    overlay::compositor::composite,
    overlay::layer::OverlayLayer,
    render::surface::{FrameRGBA, Surface},
    text::block::{TextBlockStyle, draw_block},
    text::fonts::FontRegistry,
};

/// Raster extensions accepted for template backgrounds, in lookup order.
pub const BACKGROUND_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Texts for one poster set.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    /// Names the output sub-directory.
    pub title: String,
    /// Paired with `title_styles` by index.
    pub cover: Vec<String>,
    /// One entry per content page; each paired with `page_styles` by index.
    pub pages: Vec<Vec<String>>,
    /// Paired with `title_styles` by index.
    pub ending: Vec<String>,
    pub overrides: StyleOverrides,
}

impl RenderRequest {
    pub fn from_path(path: &Path) -> PosterResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open request '{}'", path.display()))?;
        serde_json::from_reader(std::io::BufReader::new(f))
            .map_err(|e| PosterError::serde(format!("request: {e}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    pub output_dir: PathBuf,
    /// Cover, `text_1..text_N`, ending.
    pub files: Vec<PathBuf>,
}

/// Template background slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Background {
    Cover,
    Content,
    Ending,
}

impl Background {
    pub fn stem(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Content => "content",
            Self::Ending => "ending",
        }
    }
}

/// Locate `<stem>.<ext>` in `template_dir`, trying [`BACKGROUND_EXTENSIONS`] in order.
pub fn find_background(template_dir: &Path, slot: Background) -> PosterResult<PathBuf> {
    BACKGROUND_EXTENSIONS
        .iter()
        .map(|ext| template_dir.join(format!("{}.{ext}", slot.stem())))
        .find(|p| p.is_file())
        .ok_or_else(|| PosterError::missing_file(template_dir.join(format!("{}.png", slot.stem()))))
}

/// Turn a title into a single safe path component.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Shared state for drawing the pages of one poster set.
pub struct PageContext<'a> {
    pub canvas: Canvas,
    pub overlays: &'a [OverlayLayer],
    pub pool: &'a AssetPool,
    pub fonts: &'a mut FontRegistry,
    pub loader: &'a mut dyn AssetLoader,
    pub rng: &'a mut dyn RandomSource,
}

/// Draw one page: background stretched to the canvas, then overlays, then text blocks.
///
/// `texts[i]` is drawn with `styles[i]`; texts without a style are skipped.
#[tracing::instrument(level = "debug", skip_all, fields(page = name, texts = texts.len()))]
pub fn render_page(
    ctx: &mut PageContext<'_>,
    name: &str,
    background: &PreparedImage,
    texts: &[String],
    styles: &[TextBlockStyle],
) -> PosterResult<FrameRGBA> {
    let mut surface = Surface::new(ctx.canvas)?;
    surface.draw_background(background)?;
    composite(
        &mut surface,
        ctx.overlays,
        ctx.pool,
        &mut *ctx.loader,
        &mut *ctx.rng,
    );

    for (i, text) in texts.iter().enumerate() {
        let Some(style) = styles.get(i) else {
            tracing::warn!(page = name, index = i, "text has no matching style; skipped");
            continue;
        };
        draw_block(&mut surface, ctx.fonts, text, style);
    }
    Ok(surface.finish())
}

fn pick_rng(config: &PosterConfig, rng_override: Option<u64>) -> SeededRandom {
    match rng_override.or(config.seed) {
        Some(seed) => {
            tracing::debug!(seed, "seeded overlay randomness");
            SeededRandom::new(seed)
        }
        None => SeededRandom::from_clock(),
    }
}

/// Render a full poster set: cover, one page per entry in `request.pages`, ending.
///
/// Seed precedence: `rng_override`, then the request's override seed, then the config seed,
/// then the clock. Missing backgrounds fail before anything is written.
#[tracing::instrument(skip_all, fields(title = %request.title, pages = request.pages.len()))]
pub fn render_posters(
    config: &PosterConfig,
    request: &RenderRequest,
    rng_override: Option<u64>,
) -> PosterResult<RenderResult> {
    let config = request.overrides.apply(config);
    config.validate()?;

    let template_dir = config
        .templates
        .base_dir
        .join(&config.templates.default_template);
    let cover_bg = find_background(&template_dir, Background::Cover)?;
    let content_bg = find_background(&template_dir, Background::Content)?;
    let ending_bg = find_background(&template_dir, Background::Ending)?;

    let mut loader = FsAssetLoader;
    let cover_bg = loader.load(&cover_bg)?;
    let content_bg = loader.load(&content_bg)?;
    let ending_bg = loader.load(&ending_bg)?;

    let pool = AssetPool::discover(&template_dir.join("assets"))?;
    let mut fonts = FontRegistry::from_defs(&config.fonts, Path::new(""));
    if fonts.is_empty() {
        tracing::warn!("no usable fonts; text blocks will not be drawn");
    }
    let mut rng = pick_rng(&config, rng_override);

    let output_dir = config.output.dir.join(sanitize_title(&request.title));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output dir '{}'", output_dir.display()))?;

    let ext = config.output.format.extension();
    let format = config.output.format.image_format();
    let mut ctx = PageContext {
        canvas: config.canvas,
        overlays: &config.overlays,
        pool: &pool,
        fonts: &mut fonts,
        loader: &mut loader,
        rng: &mut rng,
    };

    let mut pages: Vec<(String, &PreparedImage, &[String], &[TextBlockStyle])> =
        Vec::with_capacity(request.pages.len() + 2);
    pages.push((
        "cover".to_string(),
        &cover_bg,
        request.cover.as_slice(),
        config.title_styles.as_slice(),
    ));
    for (i, texts) in request.pages.iter().enumerate() {
        pages.push((
            format!("text_{}", i + 1),
            &content_bg,
            texts.as_slice(),
            config.page_styles.as_slice(),
        ));
    }
    pages.push((
        "ending".to_string(),
        &ending_bg,
        request.ending.as_slice(),
        config.title_styles.as_slice(),
    ));

    let mut files = Vec::with_capacity(pages.len());
    for (name, background, texts, styles) in pages {
        let frame = render_page(&mut ctx, &name, background, texts, styles)?;
        let path = output_dir.join(format!("{name}.{ext}"));
        frame.write_to_path(&path, format)?;
        tracing::info!(path = %path.display(), "wrote page");
        files.push(path);
    }

    Ok(RenderResult { output_dir, files })
}

#[cfg(test)]
#[path = "../../tests/unit/render/poster.rs"]
mod tests;
