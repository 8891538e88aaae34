//! Plain data types for panel geometry.

use serde::{Deserialize, Serialize};

use crate::catalog::options::{EdgeAttachment, TopAttachment};

/// Raw opening measurement for one physical panel, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelMeasurement {
    pub width_in: f64,
    pub height_in: f64,
}

/// Raw measurement for one side of an enclosure. Heights are taken at both
/// ends; a sloped beam gives different left and right values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideMeasurement {
    pub total_width_in: f64,
    pub left_height_in: f64,
    pub right_height_in: f64,
}

impl SideMeasurement {
    /// A flat opening measured with a single height.
    pub fn flat(total_width_in: f64, height_in: f64) -> SideMeasurement {
        SideMeasurement {
            total_width_in,
            left_height_in: height_in,
            right_height_in: height_in,
        }
    }

    /// The taller of the two measured ends.
    pub fn max_height_in(&self) -> f64 {
        self.left_height_in.max(self.right_height_in)
    }
}

/// Attachment choices for one physical panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelOptions {
    pub top: TopAttachment,
    pub left: EdgeAttachment,
    pub right: EdgeAttachment,
    pub bottom: EdgeAttachment,
}

/// Additive terms behind a cut width, in inches. The rounded sum of terms,
/// clamped up to the family cut floor, equals the owning spec's
/// `cut_width_in`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthBreakdown {
    pub raw_in: f64,
    pub left_adjust_in: f64,
    pub right_adjust_in: f64,
    /// Manufacturing slack earned by sliding-track tops; zero otherwise.
    pub relaxed_fit_in: f64,
    /// True when the rounded sum fell below the family floor and was raised.
    pub floor_clamped: bool,
}

impl WidthBreakdown {
    /// Unrounded sum of the width terms.
    pub fn sum_in(&self) -> f64 {
        self.raw_in + self.left_adjust_in + self.right_adjust_in + self.relaxed_fit_in
    }
}

/// Additive terms behind a cut height, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightBreakdown {
    pub raw_in: f64,
    pub base_overlap_in: f64,
    pub top_adjust_in: f64,
    pub floor_clamped: bool,
}

impl HeightBreakdown {
    /// Unrounded sum of the height terms.
    pub fn sum_in(&self) -> f64 {
        self.raw_in + self.base_overlap_in + self.top_adjust_in
    }
}

/// Factory-facing output for one physical panel: what to cut and how each
/// edge is finished. Derived by the engine, never user-authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub raw_width_in: f64,
    pub raw_height_in: f64,
    /// Cut dimensions in whole inches, floor-clamped per family.
    pub cut_width_in: u32,
    pub cut_height_in: u32,
    pub top: TopAttachment,
    pub left: EdgeAttachment,
    pub right: EdgeAttachment,
    pub bottom: EdgeAttachment,
    /// Height of the secondary (canvas) band above the primary material's
    /// cap, measured on the raw height. `None` for single-layer families;
    /// `Some(0.0)` for a dual-layer panel short enough not to need one.
    pub secondary_height_in: Option<f64>,
    pub width_breakdown: WidthBreakdown,
    pub height_breakdown: HeightBreakdown,
}

impl PanelSpec {
    /// Cut width in feet, the run material and horizontal edges are billed on.
    pub fn cut_width_ft(&self) -> f64 {
        f64::from(self.cut_width_in) / 12.0
    }

    /// Cut height in feet, the run vertical edges are billed on.
    pub fn cut_height_ft(&self) -> f64 {
        f64::from(self.cut_height_in) / 12.0
    }
}
