//! Multi-panel splitter: divides one measured side into N physical panels.

use tracing::debug;

use super::types::{PanelMeasurement, SideMeasurement};
use crate::catalog::options::{EdgeAttachment, PanelLayout};

/// One sub-panel's share of a side: its own measurement plus the edge
/// treatments assigned to its two vertical edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPlan {
    pub measurement: PanelMeasurement,
    pub left: EdgeAttachment,
    pub right: EdgeAttachment,
}

/// Divide a side into the panels its layout calls for, left to right.
///
/// Every panel gets `round(total / N)` of the width. The rounding remainder
/// is not redistributed, so summed panel widths can drift from the measured
/// total by up to N-1 inches; production has always cut panels this way.
///
/// Heights follow the side's left-to-right gradient, sampled at each
/// panel's horizontal center, so a sloped beam yields a staircase of panel
/// heights between the two measured ends.
///
/// Panel 0 keeps the side's outer-left treatment and panel N-1 the
/// outer-right; every interior edge takes the join treatment uniformly.
pub fn split_side(
    side: &SideMeasurement,
    layout: &PanelLayout,
    outer_left: EdgeAttachment,
    outer_right: EdgeAttachment,
) -> Vec<PanelPlan> {
    let (count, join) = match layout {
        PanelLayout::Single => (1, EdgeAttachment::None),
        PanelLayout::Split { count, join } => ((*count).max(1), *join),
    };
    let n = f64::from(count);
    let panel_width_in = (side.total_width_in / n).round();
    let rise = side.right_height_in - side.left_height_in;

    if count > 1 {
        debug!(
            "splitting {}\" side into {} panels of {}\"",
            side.total_width_in, count, panel_width_in
        );
    }

    (0..count)
        .map(|i| {
            let center = (f64::from(i) + 0.5) / n;
            let height_in = (side.left_height_in + rise * center).round();
            PanelPlan {
                measurement: PanelMeasurement {
                    width_in: panel_width_in,
                    height_in,
                },
                left: if i == 0 { outer_left } else { join },
                right: if i == count - 1 { outer_right } else { join },
            }
        })
        .collect()
}
