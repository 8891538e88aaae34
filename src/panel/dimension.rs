//! Single-panel dimension calculator.
//!
//! One generic algorithm serves every material family; everything that
//! differs between mesh, vinyl, and raw netting comes in through the
//! family's [`FamilyConfig`] tables. Width and height are each built as a
//! sum of named terms, rounded once, and clamped up to the family's cut
//! floor, so the output is reconstructable from its breakdown.

use tracing::debug;

use super::types::{HeightBreakdown, PanelMeasurement, PanelOptions, PanelSpec, WidthBreakdown};
use crate::catalog::family::FamilyConfig;

/// Round a term sum to whole inches and clamp it up to the family's cut
/// floor. Returns the cut value and whether the clamp fired.
fn round_and_clamp(sum_in: f64, floor_in: f64) -> (u32, bool) {
    let rounded = sum_in.round();
    if rounded < floor_in {
        (floor_in.ceil() as u32, true)
    } else {
        (rounded as u32, false)
    }
}

/// Compute cut dimensions for one physical panel.
///
/// Returns `None` while the measurement is not ready: zero, negative, or
/// non-finite dimensions, or a height below the family minimum. A half
/// filled configurator hits this constantly, so not-ready is ordinary data
/// rather than an error.
///
/// Width: `raw + left_adjust + right_adjust + relaxed_fit`, where relaxed
/// fit applies only to sliding-track tops, earning
/// `track_slack_per_span_in` for each full `track_slack_span_in` of raw
/// width. Height: `raw + base_overlap + top_adjust`. Both sums are rounded
/// to whole inches and clamped to `min_cut_in`.
///
/// For dual-layer families the secondary (canvas) band height is taken from
/// the RAW height against the primary cap, before overlap or adjustments.
pub fn compute_panel(
    family: &FamilyConfig,
    measurement: &PanelMeasurement,
    options: &PanelOptions,
) -> Option<PanelSpec> {
    if !measurement.width_in.is_finite() || !measurement.height_in.is_finite() {
        return None;
    }
    if measurement.width_in <= 0.0 || measurement.height_in <= 0.0 {
        return None;
    }
    if measurement.height_in < family.min_height_in {
        return None;
    }

    let relaxed_fit_in = if options.top.is_track() {
        (measurement.width_in / family.track_slack_span_in).floor()
            * family.track_slack_per_span_in
    } else {
        0.0
    };

    let mut width_breakdown = WidthBreakdown {
        raw_in: measurement.width_in,
        left_adjust_in: family.edge_adjust_in(&options.left),
        right_adjust_in: family.edge_adjust_in(&options.right),
        relaxed_fit_in,
        floor_clamped: false,
    };
    let (cut_width_in, width_clamped) =
        round_and_clamp(width_breakdown.sum_in(), family.min_cut_in);
    width_breakdown.floor_clamped = width_clamped;

    let mut height_breakdown = HeightBreakdown {
        raw_in: measurement.height_in,
        base_overlap_in: family.base_overlap_in,
        top_adjust_in: family.top_adjust_in(&options.top),
        floor_clamped: false,
    };
    let (cut_height_in, height_clamped) =
        round_and_clamp(height_breakdown.sum_in(), family.min_cut_in);
    height_breakdown.floor_clamped = height_clamped;

    let secondary_height_in = family
        .max_primary_height_in
        .map(|cap| (measurement.height_in - cap).max(0.0));

    debug!(
        "panel {}x{} -> cut {}x{} (relaxed fit {}\", secondary {:?})",
        measurement.width_in, measurement.height_in, cut_width_in, cut_height_in, relaxed_fit_in,
        secondary_height_in
    );

    Some(PanelSpec {
        raw_width_in: measurement.width_in,
        raw_height_in: measurement.height_in,
        cut_width_in,
        cut_height_in,
        top: options.top,
        left: options.left,
        right: options.right,
        bottom: options.bottom,
        secondary_height_in,
        width_breakdown,
        height_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::family::default_catalog;
    use crate::catalog::options::{EdgeAttachment, MaterialFamily, MountSurface, TopAttachment};

    fn options(top: TopAttachment, left: EdgeAttachment, right: EdgeAttachment) -> PanelOptions {
        PanelOptions {
            top,
            left,
            right,
            bottom: EdgeAttachment::None,
        }
    }

    fn measure(width_in: f64, height_in: f64) -> PanelMeasurement {
        PanelMeasurement {
            width_in,
            height_in,
        }
    }

    #[test]
    fn test_track_top_earns_relaxed_fit() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        // 120" of width earns one full span of slack; snap adds an inch
        let spec = compute_panel(
            mesh,
            &measure(120.0, 80.0),
            &options(
                TopAttachment::TrackStandard,
                EdgeAttachment::Snap,
                EdgeAttachment::None,
            ),
        )
        .unwrap();
        assert_eq!(spec.width_breakdown.relaxed_fit_in, 1.0);
        assert_eq!(spec.width_breakdown.left_adjust_in, 1.0);
        assert_eq!(spec.width_breakdown.right_adjust_in, 0.0);
        assert_eq!(spec.cut_width_in, 122);
    }

    #[test]
    fn test_non_track_top_gets_no_relaxed_fit() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        let spec = compute_panel(
            mesh,
            &measure(120.0, 80.0),
            &options(
                TopAttachment::BindingOnly,
                EdgeAttachment::Snap,
                EdgeAttachment::None,
            ),
        )
        .unwrap();
        assert_eq!(spec.width_breakdown.relaxed_fit_in, 0.0);
        assert_eq!(spec.cut_width_in, 121);
    }

    #[test]
    fn test_relaxed_fit_per_full_span() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        let top = TopAttachment::TrackHeavy;
        let none = EdgeAttachment::None;
        for (width, slack) in [(119.9, 0.0), (120.0, 1.0), (239.0, 1.0), (240.0, 2.0)] {
            let spec = compute_panel(mesh, &measure(width, 80.0), &options(top, none, none))
                .unwrap();
            assert_eq!(
                spec.width_breakdown.relaxed_fit_in, slack,
                "width {} should earn {}\" of slack",
                width, slack
            );
        }
    }

    #[test]
    fn test_adhesive_top_adds_fold_over() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        // 96 raw + 2 overlap + 2 fold-over = 100
        let spec = compute_panel(
            mesh,
            &measure(60.0, 96.0),
            &options(
                TopAttachment::AdhesiveFastener(MountSurface::Stucco),
                EdgeAttachment::None,
                EdgeAttachment::None,
            ),
        )
        .unwrap();
        assert_eq!(spec.height_breakdown.base_overlap_in, 2.0);
        assert_eq!(spec.height_breakdown.top_adjust_in, 2.0);
        assert_eq!(spec.cut_height_in, 100);
    }

    #[test]
    fn test_zippered_strip_takes_width_back() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        let spec = compute_panel(
            mesh,
            &measure(100.0, 80.0),
            &options(
                TopAttachment::BindingOnly,
                EdgeAttachment::ZipperedStrip,
                EdgeAttachment::ZipperedStrip,
            ),
        )
        .unwrap();
        assert_eq!(spec.cut_width_in, 98);
    }

    #[test]
    fn test_cut_floor_clamp_is_recorded() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        // 8" wide rounds to 8, below the 12" mesh floor
        let spec = compute_panel(
            mesh,
            &measure(8.0, 50.0),
            &options(
                TopAttachment::BindingOnly,
                EdgeAttachment::None,
                EdgeAttachment::None,
            ),
        )
        .unwrap();
        assert_eq!(spec.cut_width_in, 12);
        assert!(spec.width_breakdown.floor_clamped);
        assert!(!spec.height_breakdown.floor_clamped);
    }

    #[test]
    fn test_not_ready_measurements_yield_none() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        let opts = options(
            TopAttachment::BindingOnly,
            EdgeAttachment::None,
            EdgeAttachment::None,
        );
        assert!(compute_panel(mesh, &measure(0.0, 80.0), &opts).is_none());
        assert!(compute_panel(mesh, &measure(100.0, 0.0), &opts).is_none());
        assert!(compute_panel(mesh, &measure(-5.0, 80.0), &opts).is_none());
        // Below the family's 12" minimum height
        assert!(compute_panel(mesh, &measure(100.0, 11.5), &opts).is_none());
        assert!(compute_panel(mesh, &measure(f64::NAN, 80.0), &opts).is_none());
    }

    #[test]
    fn test_secondary_height_from_raw_height() {
        let catalog = default_catalog();
        let vinyl = catalog.family(MaterialFamily::Vinyl);
        let opts = options(
            TopAttachment::BindingOnly,
            EdgeAttachment::None,
            EdgeAttachment::None,
        );
        // 90 raw - 72 cap = 18 of canvas, regardless of overlap
        let tall = compute_panel(vinyl, &measure(100.0, 90.0), &opts).unwrap();
        assert_eq!(tall.secondary_height_in, Some(18.0));
        // Under the cap the band exists but is empty
        let short = compute_panel(vinyl, &measure(100.0, 60.0), &opts).unwrap();
        assert_eq!(short.secondary_height_in, Some(0.0));
    }

    #[test]
    fn test_single_layer_family_has_no_secondary() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        let spec = compute_panel(
            mesh,
            &measure(100.0, 90.0),
            &options(
                TopAttachment::BindingOnly,
                EdgeAttachment::None,
                EdgeAttachment::None,
            ),
        )
        .unwrap();
        assert_eq!(spec.secondary_height_in, None);
    }

    #[test]
    fn test_breakdown_reconstructs_cut_values() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        let tops = [
            TopAttachment::TrackStandard,
            TopAttachment::AdhesiveFastener(MountSurface::Smooth),
            TopAttachment::BindingOnly,
            TopAttachment::CustomRigging,
        ];
        let edges = [
            EdgeAttachment::None,
            EdgeAttachment::Snap,
            EdgeAttachment::Zipper,
            EdgeAttachment::ZipperedStrip,
            EdgeAttachment::BoundEdge,
        ];
        for top in tops {
            for left in edges {
                for right in edges {
                    let spec = compute_panel(
                        mesh,
                        &measure(87.3, 64.8),
                        &options(top, left, right),
                    )
                    .unwrap();
                    assert_eq!(
                        spec.cut_width_in,
                        spec.width_breakdown.sum_in().round() as u32,
                        "width breakdown must reconstruct the cut for {:?}/{:?}/{:?}",
                        top,
                        left,
                        right
                    );
                    assert_eq!(
                        spec.cut_height_in,
                        spec.height_breakdown.sum_in().round() as u32,
                        "height breakdown must reconstruct the cut for {:?}",
                        top
                    );
                }
            }
        }
    }

    #[test]
    fn test_raw_netting_has_no_base_overlap() {
        let catalog = default_catalog();
        let raw = catalog.family(MaterialFamily::RawNetting);
        let spec = compute_panel(
            raw,
            &measure(100.0, 80.0),
            &options(
                TopAttachment::BindingOnly,
                EdgeAttachment::None,
                EdgeAttachment::None,
            ),
        )
        .unwrap();
        assert_eq!(spec.height_breakdown.base_overlap_in, 0.0);
        assert_eq!(spec.cut_height_in, 80);
    }
}
