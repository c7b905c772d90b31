//! Posterkit renders poster sets: a cover, a run of content pages and an ending, each built
//! from a template background, randomized decorative overlays and styled text blocks.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: `PosterConfig` (JSON) patched per call by `StyleOverrides`
//! 2. **Wrap**: inline markup (`<c:#RRGGBB>…</c>`, `<s:NN>…</s>`) is split into balanced
//!    `DisplayLine`s by visible-character budget
//! 3. **Resolve**: each line becomes `StyledSpan`s carrying a concrete color and font size
//! 4. **Composite**: background, then overlay layers, then text on a CPU surface
//! 5. **Encode**: un-premultiplied pixels written as PNG, JPEG or WebP
//!
//! Every render is deterministic for a given seed. Nothing is cached across calls.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod markup;
mod overlay;
mod render;
mod text;

pub use assets::decode::{
    AssetLoader, FsAssetLoader, PreparedImage, decode_image, load_image_file, rasterize_svg,
};
pub use assets::pool::{AssetPool, IMAGE_EXTENSIONS};
pub use config::model::{
    FontDef, MAX_PAGE_STYLES, MAX_TITLE_STYLES, OutputConfig, OutputFormat, PosterConfig,
    TemplateConfig,
};
pub use config::overrides::{StyleOverrides, TextStylePatch};
pub use foundation::core::{Affine, Canvas, Rgba8, ValueRange};
pub use foundation::error::{PosterError, PosterResult};
pub use foundation::rng::{RandomSource, SeededRandom, shuffle};
pub use markup::resolve::{StyleFrame, StyledSpan, resolve_inline};
pub use markup::token::{Lexer, OpenTag, TagKind, Token, visible_text};
pub use markup::wrap::{DisplayLine, wrap};
pub use overlay::compositor::{PlacedOverlay, composite, plan_layer, select_assets};
pub use overlay::layer::{InstanceOverride, MAX_OVERLAY_INSTANCES, OverlayLayer};
pub use render::poster::{
    BACKGROUND_EXTENSIONS, Background, PageContext, RenderRequest, RenderResult,
    find_background, render_page, render_posters, sanitize_title,
};
pub use render::surface::{FrameRGBA, Surface};
pub use text::block::{
    DEFAULT_CHARS_PER_LINE, DEFAULT_LINE_HEIGHT_FACTOR, LaidOutLine, TextAlign, TextBlockStyle,
    draw_block, layout_block,
};
pub use text::fonts::{FontRegistry, ShapedSpan, TextBrushRgba8};
