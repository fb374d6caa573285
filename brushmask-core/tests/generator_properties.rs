//! # Generator Property Tests
//!
//! Invariants that hold for every generator kind across random geometry.

use brushmask_core::{
    AlphaDab, CircleMaskGenerator, CubicCurve, CurveCircleMaskGenerator,
    GaussCircleMaskGenerator, MaskApplicator, MaskGenerator, MaskParams, MaskProcessingData,
};
use proptest::prelude::*;

fn all_kinds(params: MaskParams) -> Vec<MaskGenerator> {
    vec![
        CircleMaskGenerator::new(params).into(),
        CurveCircleMaskGenerator::new(params, &CubicCurve::default()).into(),
        GaussCircleMaskGenerator::new(params).into(),
    ]
}

fn sample_grid(mask: &MaskGenerator, extent: f64) -> Vec<u8> {
    let mut values = Vec::new();
    for i in -8..=8 {
        for j in -8..=8 {
            let x = extent * f64::from(i) / 8.0;
            let y = extent * f64::from(j) / 8.0;
            values.push(mask.value_at(x, y));
        }
    }
    values
}

fn arb_params() -> impl Strategy<Value = MaskParams> {
    (
        2.0f64..200.0,
        0.1f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
        2u32..10,
        any::<bool>(),
    )
        .prop_map(|(diameter, ratio, hfade, vfade, spikes, aa)| {
            MaskParams::new(diameter)
                .with_ratio(ratio)
                .with_fades(hfade, vfade)
                .with_spikes(spikes)
                .with_antialias_edges(aa)
        })
}

// ============================================================================
// Range and shape
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_points_past_the_diameter_are_unmasked(
        params in arb_params(),
        angle in 0.0f64..std::f64::consts::TAU,
        factor in 1.01f64..10.0,
    ) {
        let r = params.diameter * factor;
        for mask in all_kinds(params) {
            prop_assert_eq!(
                mask.value_at(r * angle.cos(), r * angle.sin()),
                255,
                "{} at r = {}", mask.id(), r
            );
        }
    }

    #[test]
    fn prop_center_paints_at_least_as_much_as_edge(
        diameter in 2.0f64..200.0,
        fade in 0.0f64..0.99,
        aa in any::<bool>(),
    ) {
        let params = MaskParams::new(diameter).with_fades(fade, fade).with_antialias_edges(aa);
        for mask in all_kinds(params) {
            let center = mask.value_at(0.0, 0.0);
            let edge = mask.value_at(0.45 * diameter, 0.0);
            prop_assert!(center <= edge, "{}: center {} edge {}", mask.id(), center, edge);
        }
    }

    #[test]
    fn prop_clones_match_and_stay_independent(params in arb_params(), scale in 0.2f64..4.0) {
        for original in all_kinds(params) {
            let before = sample_grid(&original, params.diameter);

            let mut clone = original.clone();
            prop_assert_eq!(sample_grid(&clone, params.diameter), before.clone());

            clone.set_scale(scale, scale);
            clone.set_softness(0.5);
            prop_assert_eq!(sample_grid(&original, params.diameter), before);
        }
    }

    #[test]
    fn prop_unit_softness_is_idempotent(params in arb_params(), softness in 0.0f64..2.0) {
        for mut mask in all_kinds(params) {
            mask.set_softness(softness);
            mask.set_softness(1.0);
            let once = sample_grid(&mask, params.diameter);
            mask.set_softness(1.0);
            prop_assert_eq!(sample_grid(&mask, params.diameter), once);
        }
    }

    #[test]
    fn prop_larger_scale_never_raises_value(
        diameter in 10.0f64..120.0,
        fade in 0.0f64..0.9,
        small in 0.3f64..1.5,
        grow in 1.0f64..3.0,
        x in -60.0f64..60.0,
        y in -60.0f64..60.0,
    ) {
        let params = MaskParams::new(diameter).with_fades(fade, fade);
        let kinds: Vec<MaskGenerator> = vec![
            CurveCircleMaskGenerator::new(params, &CubicCurve::default()).into(),
            GaussCircleMaskGenerator::new(params).into(),
        ];
        for mut mask in kinds {
            mask.set_scale(small, small);
            let near = mask.value_at(x, y);
            mask.set_scale(small * grow, small * grow);
            let far = mask.value_at(x, y);
            prop_assert!(far <= near, "{}: {} -> {}", mask.id(), near, far);
        }
    }
}

// ============================================================================
// Collapsed scale
// ============================================================================

#[test]
fn test_zero_scale_masks_nothing_for_every_kind() {
    let params = MaskParams::new(40.0).with_fades(0.5, 0.5);
    let data = MaskProcessingData::centered(5, 5, 0.0);

    for mut mask in all_kinds(params) {
        mask.set_scale(0.0, 0.0);
        assert!(mask.base().is_empty(), "{}", mask.id());

        for (x, y) in [(0.0, 0.0), (0.0, 3.0), (3.0, 0.0), (-2.0, 0.0), (1.5, -1.5)] {
            assert_eq!(mask.value_at(x, y), 255, "{} at ({x}, {y})", mask.id());
        }

        for applicator in [MaskApplicator::Vectorized, MaskApplicator::Scalar] {
            let mut dab = AlphaDab::new(5, 5);
            applicator.process(&mask, &data, dab.bounds(), &mut dab);
            assert!(
                dab.data().iter().all(|&v| v == 0),
                "{} {applicator:?}: {:?}",
                mask.id(),
                dab.data()
            );
        }
    }
}

#[test]
fn test_one_collapsed_axis_masks_nothing() {
    for mut mask in all_kinds(MaskParams::new(40.0)) {
        mask.set_scale(1.0, 0.0);
        assert_eq!(mask.value_at(0.0, 0.0), 255, "{}", mask.id());
        assert_eq!(mask.value_at(5.0, 0.0), 255, "{}", mask.id());

        mask.set_scale(1.0, 1.0);
        assert!(mask.value_at(0.0, 0.0) < 255, "{}", mask.id());
    }
}

#[test]
fn test_unbounded_scale_renders_blank_on_the_vectorized_path() {
    let data = MaskProcessingData::centered(11, 11, 0.4);
    for mut mask in all_kinds(MaskParams::new(40.0)) {
        mask.set_scale(f64::INFINITY, f64::INFINITY);
        assert_eq!(mask.applicator(), MaskApplicator::Vectorized, "{}", mask.id());

        let dab = mask.render_dab(&data, 11, 11);
        assert!(dab.data().iter().all(|&v| v == 0), "{}", mask.id());
    }
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn test_generators_are_shared_read_only_across_threads() {
    let params = MaskParams::new(48.0).with_ratio(0.7).with_fades(0.3, 0.2);
    let data = MaskProcessingData::centered(52, 52, 0.4);

    for mask in all_kinds(params) {
        let expected = mask.render_dab(&data, 52, 52);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| mask.render_dab(&data, 52, 52)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().expect("worker panicked"), expected);
            }
        });
    }
}

#[test]
fn test_workers_rescale_their_own_clones() {
    let mask: MaskGenerator =
        CurveCircleMaskGenerator::new(MaskParams::new(40.0), &CubicCurve::default()).into();
    let reference = sample_grid(&mask, 40.0);

    std::thread::scope(|scope| {
        for scale in [0.5, 1.5, 3.0] {
            let mut clone = mask.clone();
            scope.spawn(move || {
                clone.set_scale(scale, scale);
                let _ = clone.value_at(5.0, 5.0);
            });
        }
    });

    assert_eq!(sample_grid(&mask, 40.0), reference);
}
