//! # Applicator Parity Tests
//!
//! The vectorized and scalar applicators must produce identical dabs.

use brushmask_core::{
    AlphaDab, CircleMaskGenerator, CubicCurve, CurveCircleMaskGenerator, CurvePoint, DabRect,
    GaussCircleMaskGenerator, MaskApplicator, MaskGenerator, MaskParams, MaskProcessingData,
};
use proptest::prelude::*;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn dab_size(mask: &MaskGenerator) -> u32 {
    mask.base().diameter().ceil() as u32 + 3
}

fn render_both(mask: &MaskGenerator, angle: f64) -> (AlphaDab, AlphaDab) {
    assert_eq!(mask.applicator(), MaskApplicator::Vectorized, "{}", mask.id());

    let size = dab_size(mask);
    let data = MaskProcessingData::centered(size, size, angle);
    let vectorized = mask.render_dab(&data, size, size);

    let mut scalar_mask = mask.clone();
    scalar_mask.set_scalar_applicator();
    assert_eq!(scalar_mask.applicator(), MaskApplicator::Scalar);
    let scalar = scalar_mask.render_dab(&data, size, size);

    (vectorized, scalar)
}

fn soft_curve() -> CubicCurve {
    CubicCurve::new(vec![
        CurvePoint::new(0.0, 1.0),
        CurvePoint::new(0.3, 0.85),
        CurvePoint::corner(0.6, 0.4),
        CurvePoint::new(1.0, 0.0),
    ])
    .expect("valid curve")
}

// ============================================================================
// Fixed cases
// ============================================================================

#[test]
fn test_parity_for_every_kind() {
    let params = MaskParams::new(37.0)
        .with_ratio(0.6)
        .with_fades(0.4, 0.2)
        .with_antialias_edges(true);
    let kinds: Vec<MaskGenerator> = vec![
        CircleMaskGenerator::new(params).into(),
        CurveCircleMaskGenerator::new(params, &soft_curve()).into(),
        GaussCircleMaskGenerator::new(params).into(),
    ];

    for mask in kinds {
        for angle in [0.0, 0.3, 1.2, std::f64::consts::FRAC_PI_2, 2.9] {
            let (vectorized, scalar) = render_both(&mask, angle);
            assert_eq!(vectorized, scalar, "{} at angle {angle}", mask.id());
        }
    }
}

#[test]
fn test_parity_after_rescale_and_softness() {
    let mut mask: MaskGenerator =
        CurveCircleMaskGenerator::new(MaskParams::new(80.0), &soft_curve()).into();
    mask.set_scale(0.7, 0.45);
    mask.set_softness(0.6);

    let (vectorized, scalar) = render_both(&mask, 0.8);
    assert_eq!(vectorized, scalar);
}

#[test]
fn test_applicators_fill_only_the_requested_rect() {
    let mask: MaskGenerator = GaussCircleMaskGenerator::new(MaskParams::new(24.0)).into();
    let data = MaskProcessingData::centered(27, 27, 0.0);
    let rect = DabRect::new(5, 7, 11, 9);

    for applicator in [MaskApplicator::Vectorized, MaskApplicator::Scalar] {
        let mut dab = AlphaDab::new(27, 27);
        applicator.process(&mask, &data, rect, &mut dab);
        for y in 0..27 {
            for x in 0..27 {
                let inside = (5..16).contains(&x) && (7..16).contains(&y);
                if !inside {
                    assert_eq!(dab.get(x, y), Some(0), "{applicator:?} touched ({x}, {y})");
                }
            }
        }
        assert!(dab.get(12, 12).is_some_and(|v| v > 200));
    }
}

#[test]
fn test_vectorized_request_falls_back_for_spikes() {
    let mask: MaskGenerator =
        CircleMaskGenerator::new(MaskParams::new(40.0).with_fades(0.5, 0.5).with_spikes(5)).into();
    assert_eq!(mask.applicator(), MaskApplicator::Scalar);

    let data = MaskProcessingData::centered(43, 43, 0.0);
    let mut forced = AlphaDab::new(43, 43);
    MaskApplicator::Vectorized.process(&mask, &data, forced.bounds(), &mut forced);
    assert_eq!(forced, mask.render_dab(&data, 43, 43));
}

// ============================================================================
// Random geometry
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_parity_over_random_ellipses(
        diameter in 30.0f64..90.0,
        ratio in 0.35f64..=1.0,
        hfade in 0.0f64..=1.0,
        vfade in 0.0f64..=1.0,
        aa in any::<bool>(),
        angle in 0.0f64..std::f64::consts::TAU,
    ) {
        let params = MaskParams::new(diameter)
            .with_ratio(ratio)
            .with_fades(hfade, vfade)
            .with_antialias_edges(aa);
        let kinds: Vec<MaskGenerator> = vec![
            CircleMaskGenerator::new(params).into(),
            CurveCircleMaskGenerator::new(params, &CubicCurve::default()).into(),
            GaussCircleMaskGenerator::new(params).into(),
        ];
        for mask in kinds {
            let (vectorized, scalar) = render_both(&mask, angle);
            prop_assert_eq!(vectorized, scalar, "{}", mask.id());
        }
    }
}
