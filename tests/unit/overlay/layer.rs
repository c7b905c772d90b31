use super::*;

#[test]
fn instance_count_floors_and_clamps() {
    let with = |count| OverlayLayer {
        count,
        ..OverlayLayer::default()
    };
    assert_eq!(with(3.9).instance_count(), 3);
    assert_eq!(with(0.5).instance_count(), 0);
    assert_eq!(with(-2.0).instance_count(), 0);
    assert_eq!(with(f64::NAN).instance_count(), 0);
    assert_eq!(with(f64::INFINITY).instance_count(), 0);
}

#[test]
fn override_lookup_tolerates_gaps_and_short_lists() {
    let layer = OverlayLayer {
        positions: vec![
            None,
            Some(InstanceOverride {
                x: Some(5.0),
                ..InstanceOverride::default()
            }),
        ],
        ..OverlayLayer::default()
    };
    assert!(layer.override_for(0).is_none());
    assert_eq!(layer.override_for(1).unwrap().x, Some(5.0));
    assert!(layer.override_for(7).is_none());
}

#[test]
fn deserializes_with_defaults() {
    let layer: OverlayLayer = serde_json::from_str(
        r#"{"count": 2, "randomize": true, "rotation": [-15, 15],
            "positions": [null, {"asset": "star", "alpha": 0.5}]}"#,
    )
    .unwrap();
    assert!(layer.enabled);
    assert_eq!(layer.instance_count(), 2);
    assert_eq!(layer.scale, ValueRange::fixed(1.0));
    assert_eq!(layer.rotation, ValueRange::new(-15.0, 15.0));
    assert_eq!(layer.override_for(1).unwrap().asset.as_deref(), Some("star"));
    layer.validate().unwrap();
}

#[test]
fn inverted_range_fails_validation() {
    let layer = OverlayLayer {
        alpha: ValueRange::new(1.0, 0.2),
        ..OverlayLayer::default()
    };
    assert!(layer.validate().is_err());
}

#[test]
fn huge_counts_are_capped_and_rejected() {
    let layer = OverlayLayer {
        count: 1e18,
        ..OverlayLayer::default()
    };
    assert_eq!(layer.instance_count(), MAX_OVERLAY_INSTANCES);
    assert!(layer.validate().is_err());

    let at_limit = OverlayLayer {
        count: MAX_OVERLAY_INSTANCES as f64 + 0.5,
        ..OverlayLayer::default()
    };
    at_limit.validate().unwrap();
}
