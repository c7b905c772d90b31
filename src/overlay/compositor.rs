use std::path::PathBuf;

use crate::{
    assets::decode::{AssetLoader, PreparedImage},
    assets::pool::AssetPool,
    foundation::core::{Affine, Canvas, ValueRange},
    foundation::rng::{RandomSource, shuffle},
    overlay::layer::OverlayLayer,
    render::surface::Surface,
};

/// One overlay instance with fully resolved geometry.
#[derive(Clone, Debug)]
pub struct PlacedOverlay {
    pub asset: PathBuf,
    pub image: PreparedImage,
    /// Top-left corner in canvas pixels.
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation_deg: f64,
    pub alpha: f64,
}

impl PlacedOverlay {
    /// `translate(x, y) * rotate * scale`: rotation pivots on the top-left corner, not the
    /// image center.
    pub fn transform(&self) -> Affine {
        Affine::translate((self.x, self.y))
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale(self.scale)
    }
}

/// Pick `count` pool entries: a full shuffle first, then wrap around when the pool runs out.
pub fn select_assets(pool: &AssetPool, count: usize, rng: &mut dyn RandomSource) -> Vec<PathBuf> {
    if pool.is_empty() || count == 0 {
        return Vec::new();
    }
    let mut shuffled = pool.paths().to_vec();
    shuffle(&mut shuffled, rng);
    (0..count)
        .map(|i| shuffled[i % shuffled.len()].clone())
        .collect()
}

fn pick(
    explicit: Option<f64>,
    randomize: bool,
    range: ValueRange,
    default: f64,
    rng: &mut dyn RandomSource,
) -> f64 {
    match explicit {
        Some(v) => v,
        None if randomize => rng.uniform(range.min, range.max),
        None => default,
    }
}

/// Resolve every instance of one layer, loading assets one at a time.
///
/// Disabled layers, a zero count and an empty pool all produce nothing. Assets that fail to
/// load are skipped; the selection still advances past them.
pub fn plan_layer(
    layer: &OverlayLayer,
    pool: &AssetPool,
    canvas: Canvas,
    loader: &mut dyn AssetLoader,
    rng: &mut dyn RandomSource,
) -> Vec<PlacedOverlay> {
    let count = layer.instance_count();
    if !layer.enabled || count == 0 {
        return Vec::new();
    }
    if pool.is_empty() {
        tracing::debug!("overlay layer skipped: asset pool is empty");
        return Vec::new();
    }

    let selection = select_assets(pool, count, rng);
    let mut placed = Vec::with_capacity(selection.len());

    for (i, drawn) in selection.into_iter().enumerate() {
        let ov = layer.override_for(i);
        let asset = ov
            .and_then(|o| o.asset.as_deref())
            .and_then(|name| pool.find_by_name(name))
            .map(|p| p.to_path_buf())
            .unwrap_or(drawn);

        let image = match loader.load(&asset) {
            Ok(img) => img,
            Err(err) => {
                tracing::warn!(asset = %asset.display(), error = %err, "overlay asset skipped");
                continue;
            }
        };

        let scale = pick(ov.and_then(|o| o.scale), layer.randomize, layer.scale, 1.0, rng);
        let rotation_deg = pick(
            ov.and_then(|o| o.rotation),
            layer.randomize,
            layer.rotation,
            0.0,
            rng,
        );
        let alpha = pick(ov.and_then(|o| o.alpha), layer.randomize, layer.alpha, 1.0, rng);

        let max_x = (f64::from(canvas.width) - f64::from(image.width) * scale).max(0.0);
        let max_y = (f64::from(canvas.height) - f64::from(image.height) * scale).max(0.0);
        let x = pick(
            ov.and_then(|o| o.x),
            layer.randomize,
            ValueRange::new(0.0, max_x),
            0.0,
            rng,
        );
        let y = pick(
            ov.and_then(|o| o.y),
            layer.randomize,
            ValueRange::new(0.0, max_y),
            0.0,
            rng,
        );

        placed.push(PlacedOverlay {
            asset,
            image,
            x,
            y,
            scale,
            rotation_deg,
            alpha,
        });
    }
    placed
}

/// Plan and draw every layer in order. Returns the number of instances drawn.
///
/// Overlay problems never fail the render: undrawable instances are logged and skipped.
#[tracing::instrument(level = "debug", skip_all, fields(layers = layers.len(), pool = pool.len()))]
pub fn composite(
    surface: &mut Surface,
    layers: &[OverlayLayer],
    pool: &AssetPool,
    loader: &mut dyn AssetLoader,
    rng: &mut dyn RandomSource,
) -> usize {
    let canvas = surface.canvas();
    let mut drawn = 0;
    for layer in layers {
        for inst in plan_layer(layer, pool, canvas, loader, rng) {
            if let Err(err) = surface.draw_image(&inst.image, inst.transform(), inst.alpha as f32)
            {
                tracing::warn!(asset = %inst.asset.display(), error = %err, "overlay draw skipped");
                continue;
            }
            drawn += 1;
        }
    }
    drawn
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/compositor.rs"]
mod tests;
