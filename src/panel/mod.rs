//! Panel geometry: measurements, the dimension calculator, and the side
//! splitter.

pub mod dimension;
pub mod splitter;
pub mod types;

pub use dimension::compute_panel;
pub use splitter::{split_side, PanelPlan};
pub use types::{
    HeightBreakdown, PanelMeasurement, PanelOptions, PanelSpec, SideMeasurement, WidthBreakdown,
};
