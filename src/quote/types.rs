//! Order-level data types: persisted drafts, the sanitized configuration,
//! quote output, and submission records.

use serde::{Deserialize, Serialize};

use crate::catalog::options::{
    sanitize_edge, sanitize_family, sanitize_layout, sanitize_top, EdgeAttachment, MaterialFamily,
    PanelLayout, SanitizeWarning, TopAttachment,
};
use crate::catalog::tier::SizeTier;
use crate::panel::types::{PanelSpec, SideMeasurement};
use crate::pricing::aggregator::PriceBreakdown;

// =============================================================================
// SANITIZED CONFIGURATION (what the engine computes on)
// =============================================================================

/// One measured side of the enclosure, fully resolved to catalog enums.
#[derive(Debug, Clone, PartialEq)]
pub struct SideConfig {
    /// Customer-facing label ("front", "porch left", ...)
    pub label: String,
    pub measurement: SideMeasurement,
    pub layout: PanelLayout,
    /// Treatment of the side's outermost left and right edges; interior
    /// edges of a split side come from the layout's join
    pub outer_left: EdgeAttachment,
    pub outer_right: EdgeAttachment,
    pub top: TopAttachment,
    pub bottom: EdgeAttachment,
}

/// A sanitized order, ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfig {
    pub family: MaterialFamily,
    pub sides: Vec<SideConfig>,
}

// =============================================================================
// PERSISTED DRAFTS (raw strings from the storefront)
// =============================================================================

/// One side as the storefront configurator persists it. Option values are
/// raw strings; a missing field means "not chosen yet".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DraftSide {
    pub label: String,
    pub width_in: f64,
    pub left_height_in: f64,
    pub right_height_in: f64,
    /// Single-height shorthand for flat openings; fills whichever end
    /// heights the draft left unset
    pub height_in: f64,
    pub top: String,
    pub left_edge: String,
    pub right_edge: String,
    pub bottom_edge: String,
    /// Number of physical panels; 0 or 1 means a single panel
    pub panels: u8,
    /// Interior-join treatment for split sides
    pub join: Option<String>,
}

/// An order draft as persisted by the storefront (local storage / saved
/// quotes). Deliberately loose: every option is a raw string so drafts
/// written by older storefront versions still load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DraftOrder {
    pub family: String,
    pub sides: Vec<DraftSide>,
}

impl DraftOrder {
    /// Resolve the draft's raw strings into catalog enums.
    ///
    /// Unknown non-empty values map to documented fallbacks and are
    /// reported as warnings; empty values mean "not chosen" and take the
    /// default silently (family mesh, top binding-only, edges none).
    pub fn sanitize(&self) -> (OrderConfig, Vec<SanitizeWarning>) {
        let mut warnings = Vec::new();

        let family = if self.family.is_empty() {
            MaterialFamily::Mesh
        } else {
            sanitize_family(&self.family, "family", &mut warnings)
        };

        let sides = self
            .sides
            .iter()
            .enumerate()
            .map(|(i, side)| side.sanitize(i, &mut warnings))
            .collect();

        (OrderConfig { family, sides }, warnings)
    }
}

impl DraftSide {
    fn sanitize(&self, index: usize, warnings: &mut Vec<SanitizeWarning>) -> SideConfig {
        let label = if self.label.is_empty() {
            format!("side {}", index + 1)
        } else {
            self.label.clone()
        };

        let left_height_in = if self.left_height_in > 0.0 {
            self.left_height_in
        } else {
            self.height_in
        };
        let right_height_in = if self.right_height_in > 0.0 {
            self.right_height_in
        } else {
            self.height_in
        };

        let top = if self.top.is_empty() {
            TopAttachment::BindingOnly
        } else {
            sanitize_top(&self.top, &format!("sides[{}].top", index), warnings)
        };

        SideConfig {
            label,
            measurement: SideMeasurement {
                total_width_in: self.width_in,
                left_height_in,
                right_height_in,
            },
            layout: sanitize_layout(
                self.panels,
                self.join.as_deref(),
                &format!("sides[{}].join", index),
                warnings,
            ),
            outer_left: sanitize_edge(
                &self.left_edge,
                &format!("sides[{}].left_edge", index),
                warnings,
            ),
            outer_right: sanitize_edge(
                &self.right_edge,
                &format!("sides[{}].right_edge", index),
                warnings,
            ),
            top,
            bottom: sanitize_edge(
                &self.bottom_edge,
                &format!("sides[{}].bottom_edge", index),
                warnings,
            ),
        }
    }
}

// =============================================================================
// QUOTE OUTPUT (serialized to callers)
// =============================================================================

/// Lifecycle of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// No side has a usable measurement yet.
    Unconfigured,
    /// Some sides compute and some do not; no total is offered.
    PartiallyConfigured,
    /// Every panel computed and every cost is known.
    Priced,
    /// Dimensions are complete but at least one cost has no closed-form
    /// price; a human must finish the quote.
    NeedsQuote,
    /// Terminal: the order has left the engine.
    Submitted,
}

/// One physical panel of the quote: where it came from, what to cut, and
/// what it costs.
#[derive(Debug, Clone, Serialize)]
pub struct PanelQuote {
    /// Label of the side this panel belongs to
    pub side: String,
    /// Position within the side, left to right, 0-based
    pub index: usize,
    pub spec: PanelSpec,
    pub price: PriceBreakdown,
}

/// Everything the engine knows about an order after one pricing pass.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteOutcome {
    pub family: MaterialFamily,
    pub status: QuoteStatus,
    /// Tier of the tallest panel's raw height; `None` until a panel computes
    pub tier: Option<SizeTier>,
    /// Whether the canvas-infill picker applies at this tier
    pub canvas_selectable: bool,
    pub panels: Vec<PanelQuote>,
    pub order_total: Option<f64>,
    pub warnings: Vec<SanitizeWarning>,
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// How a submitted order is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionRoute {
    /// Fully priced: goes straight into the order pipeline.
    DirectOrder,
    /// Carries unknown costs: a human prices it before it becomes an order.
    ManualReview,
}

/// Receipt for a submitted order.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    /// Short reference in the shop's "Q" + 7 hex chars convention
    pub reference: String,
    pub route: SubmissionRoute,
    /// RFC 3339 UTC timestamp
    pub submitted_at: String,
}
