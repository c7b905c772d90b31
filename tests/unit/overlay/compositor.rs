use std::collections::HashMap;
use std::path::Path;

use super::*;
use crate::{
    foundation::error::PosterError,
    foundation::rng::SeededRandom,
    overlay::layer::{InstanceOverride, MAX_OVERLAY_INSTANCES},
};

/// Replays fractions in `[0, 1)` as uniform draws.
struct FixedSequence {
    values: Vec<f64>,
    next: usize,
}

impl FixedSequence {
    fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        let t = self.values[self.next % self.values.len()];
        self.next += 1;
        min + t * (max - min)
    }
}

#[derive(Default)]
struct MemLoader {
    images: HashMap<PathBuf, PreparedImage>,
    loads: Vec<PathBuf>,
}

impl MemLoader {
    fn with(mut self, path: &str, w: u32, h: u32) -> Self {
        self.images
            .insert(PathBuf::from(path), PreparedImage::solid(w, h, [255, 0, 0, 255]));
        self
    }
}

impl AssetLoader for MemLoader {
    fn load(&mut self, path: &Path) -> crate::PosterResult<PreparedImage> {
        self.loads.push(path.to_path_buf());
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| PosterError::missing_file(path))
    }
}

fn pool(names: &[&str]) -> AssetPool {
    AssetPool::from_paths(names.iter().map(PathBuf::from))
}

fn canvas() -> Canvas {
    Canvas::new(100, 80).unwrap()
}

fn layer(count: f64) -> OverlayLayer {
    OverlayLayer {
        count,
        ..OverlayLayer::default()
    }
}

#[test]
fn disabled_or_empty_layers_draw_nothing() {
    let mut loader = MemLoader::default().with("a.png", 4, 4);
    let mut rng = SeededRandom::new(1);
    let p = pool(&["a.png"]);

    let disabled = OverlayLayer {
        enabled: false,
        ..layer(3.0)
    };
    assert!(plan_layer(&disabled, &p, canvas(), &mut loader, &mut rng).is_empty());
    assert!(plan_layer(&layer(0.0), &p, canvas(), &mut loader, &mut rng).is_empty());
    assert!(plan_layer(&layer(-1.0), &p, canvas(), &mut loader, &mut rng).is_empty());
    assert!(plan_layer(&layer(2.0), &pool(&[]), canvas(), &mut loader, &mut rng).is_empty());
    assert!(loader.loads.is_empty());

    let mut surface = Surface::new(canvas()).unwrap();
    let drawn = composite(
        &mut surface,
        &[disabled, layer(0.0)],
        &p,
        &mut loader,
        &mut rng,
    );
    assert_eq!(drawn, 0);
    assert!(surface.finish().data.iter().all(|&b| b == 0));
}

#[test]
fn selection_prefers_distinct_then_wraps() {
    let p = pool(&["a.png", "b.png", "c.png"]);
    let mut rng = SeededRandom::new(5);
    let picked = select_assets(&p, 7, &mut rng);
    assert_eq!(picked.len(), 7);

    let mut first: Vec<_> = picked[..3].to_vec();
    first.sort();
    assert_eq!(first, p.paths().to_vec());
    for i in 3..7 {
        assert_eq!(picked[i], picked[i % 3]);
    }
}

#[test]
fn count_beyond_pool_size_never_fails() {
    let mut loader = MemLoader::default().with("a.png", 4, 4);
    let mut rng = SeededRandom::new(2);
    let placed = plan_layer(&layer(5.0), &pool(&["a.png"]), canvas(), &mut loader, &mut rng);
    assert_eq!(placed.len(), 5);
    assert!(placed.iter().all(|p| p.asset == Path::new("a.png")));
}

#[test]
fn defaults_without_randomize() {
    let mut loader = MemLoader::default().with("a.png", 4, 4);
    let mut rng = FixedSequence::new(vec![0.5]);
    let placed = plan_layer(&layer(1.0), &pool(&["a.png"]), canvas(), &mut loader, &mut rng);
    let p = &placed[0];
    assert_eq!((p.x, p.y, p.scale, p.rotation_deg, p.alpha), (0.0, 0.0, 1.0, 0.0, 1.0));
}

#[test]
fn explicit_values_win_regardless_of_randomize() {
    for randomize in [false, true] {
        let l = OverlayLayer {
            randomize,
            scale: ValueRange::new(0.1, 0.2),
            rotation: ValueRange::new(-90.0, 90.0),
            alpha: ValueRange::new(0.0, 0.1),
            positions: vec![Some(InstanceOverride {
                x: Some(12.5),
                y: Some(-3.0),
                scale: Some(2.0),
                rotation: Some(33.0),
                alpha: Some(0.75),
                asset: None,
            })],
            ..layer(1.0)
        };
        let mut loader = MemLoader::default().with("a.png", 4, 4);
        let mut rng = FixedSequence::new(vec![0.9]);
        let placed = plan_layer(&l, &pool(&["a.png"]), canvas(), &mut loader, &mut rng);
        let p = &placed[0];
        assert_eq!(
            (p.x, p.y, p.scale, p.rotation_deg, p.alpha),
            (12.5, -3.0, 2.0, 33.0, 0.75)
        );
    }
}

#[test]
fn randomized_values_come_from_ranges_in_order() {
    let l = OverlayLayer {
        randomize: true,
        scale: ValueRange::new(1.0, 3.0),
        rotation: ValueRange::new(-10.0, 10.0),
        alpha: ValueRange::new(0.5, 1.0),
        ..layer(1.0)
    };
    let mut loader = MemLoader::default().with("a.png", 10, 10);
    // Draw order: shuffle (single item: none), scale, rotation, alpha, x, y.
    let mut rng = FixedSequence::new(vec![0.5, 0.0, 1.0, 0.5, 0.25]);
    let placed = plan_layer(&l, &pool(&["a.png"]), canvas(), &mut loader, &mut rng);
    let p = &placed[0];
    assert_eq!(p.scale, 2.0);
    assert_eq!(p.rotation_deg, -10.0);
    assert_eq!(p.alpha, 1.0);
    assert_eq!(p.x, 0.5 * (100.0 - 20.0));
    assert_eq!(p.y, 0.25 * (80.0 - 20.0));
}

#[test]
fn randomized_positions_stay_on_canvas() {
    let l = OverlayLayer {
        randomize: true,
        scale: ValueRange::new(0.5, 2.0),
        ..layer(20.0)
    };
    for seed in 0..20 {
        let mut loader = MemLoader::default().with("a.png", 30, 10).with("b.png", 8, 50);
        let mut rng = SeededRandom::new(seed);
        for p in plan_layer(&l, &pool(&["a.png", "b.png"]), canvas(), &mut loader, &mut rng) {
            let w = f64::from(p.image.width) * p.scale;
            let h = f64::from(p.image.height) * p.scale;
            assert!(p.x >= 0.0 && p.x <= (100.0 - w).max(0.0), "x={} w={w}", p.x);
            assert!(p.y >= 0.0 && p.y <= (80.0 - h).max(0.0), "y={} h={h}", p.y);
        }
    }
}

#[test]
fn oversized_assets_clamp_to_origin() {
    let l = OverlayLayer {
        randomize: true,
        ..layer(1.0)
    };
    let mut loader = MemLoader::default().with("big.png", 500, 500);
    let mut rng = FixedSequence::new(vec![0.7]);
    let placed = plan_layer(&l, &pool(&["big.png"]), canvas(), &mut loader, &mut rng);
    assert_eq!((placed[0].x, placed[0].y), (0.0, 0.0));
}

#[test]
fn asset_override_matches_by_name_and_falls_back_when_unknown() {
    let l = OverlayLayer {
        positions: vec![
            Some(InstanceOverride {
                asset: Some("b".to_string()),
                ..InstanceOverride::default()
            }),
            Some(InstanceOverride {
                asset: Some("nope.png".to_string()),
                ..InstanceOverride::default()
            }),
        ],
        ..layer(2.0)
    };
    let p = pool(&["t/a.png", "t/b.png"]);
    let mut loader = MemLoader::default().with("t/a.png", 2, 2).with("t/b.png", 2, 2);
    let mut rng = SeededRandom::new(3);
    let drawn = select_assets(&p, 2, &mut SeededRandom::new(3));
    let placed = plan_layer(&l, &p, canvas(), &mut loader, &mut rng);
    assert_eq!(placed[0].asset, Path::new("t/b.png"));
    assert_eq!(placed[1].asset, drawn[1]);
}

#[test]
fn failed_loads_are_skipped_and_selection_advances() {
    let p = pool(&["ok.png", "gone.png"]);
    let mut loader = MemLoader::default().with("ok.png", 2, 2);
    let mut rng = SeededRandom::new(11);
    let placed = plan_layer(&layer(4.0), &p, canvas(), &mut loader, &mut rng);
    assert_eq!(loader.loads.len(), 4);
    assert_eq!(placed.len(), 2);
    assert!(placed.iter().all(|p| p.asset == Path::new("ok.png")));
}

#[test]
fn same_seed_same_plan() {
    let l = OverlayLayer {
        randomize: true,
        rotation: ValueRange::new(-45.0, 45.0),
        ..layer(6.0)
    };
    let p = pool(&["a.png", "b.png", "c.png"]);
    let run = || {
        let mut loader = MemLoader::default()
            .with("a.png", 5, 5)
            .with("b.png", 6, 6)
            .with("c.png", 7, 7);
        let mut rng = SeededRandom::new(1234);
        plan_layer(&l, &p, canvas(), &mut loader, &mut rng)
            .into_iter()
            .map(|p| (p.asset, p.x, p.y, p.rotation_deg))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn transform_pivots_on_top_left_corner() {
    let placed = PlacedOverlay {
        asset: PathBuf::from("a.png"),
        image: PreparedImage::solid(10, 10, [0, 0, 0, 255]),
        x: 20.0,
        y: 30.0,
        scale: 2.0,
        rotation_deg: 90.0,
        alpha: 1.0,
    };
    let t = placed.transform();
    let origin = t * kurbo::Point::new(0.0, 0.0);
    assert!((origin.x - 20.0).abs() < 1e-9 && (origin.y - 30.0).abs() < 1e-9);
    let corner = t * kurbo::Point::new(10.0, 0.0);
    assert!((corner.x - 20.0).abs() < 1e-9 && (corner.y - 50.0).abs() < 1e-9);
}

#[test]
fn composite_draws_at_resolved_position() {
    let l = OverlayLayer {
        positions: vec![Some(InstanceOverride {
            x: Some(10.0),
            y: Some(10.0),
            ..InstanceOverride::default()
        })],
        ..layer(1.0)
    };
    let mut loader = MemLoader::default().with("a.png", 8, 8);
    let mut rng = SeededRandom::new(0);
    let mut surface = Surface::new(canvas()).unwrap();
    let n = composite(&mut surface, &[l], &pool(&["a.png"]), &mut loader, &mut rng);
    assert_eq!(n, 1);

    let frame = surface.finish();
    let at = |x: u32, y: u32| {
        let i = ((y * frame.width + x) * 4) as usize;
        frame.data[i + 3]
    };
    assert!(at(13, 13) > 250);
    assert_eq!(at(2, 2), 0);
}

#[test]
fn oversized_count_plans_a_bounded_layer() {
    let mut loader = MemLoader::default().with("a.png", 1, 1);
    let mut rng = SeededRandom::new(4);
    let l = layer(1e18);
    let picked = select_assets(&pool(&["a.png"]), l.instance_count(), &mut rng);
    assert_eq!(picked.len(), MAX_OVERLAY_INSTANCES);

    let placed = plan_layer(&l, &pool(&["a.png"]), canvas(), &mut loader, &mut rng);
    assert_eq!(placed.len(), MAX_OVERLAY_INSTANCES);
}
