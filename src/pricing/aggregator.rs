//! Price aggregation: itemized edge costs, per-panel totals, and the order
//! total.
//!
//! Unknown is a first-class price here. An edge marked "quote" in the
//! catalog, a combination absent from the rate table, or a material rate
//! that resolves to zero all produce `None`, and a single `None` anywhere
//! poisons the panel total and then the order total. The aggregator never
//! substitutes a number for a price it does not know.

use serde::Serialize;
use tracing::{debug, warn};

use super::book::PriceLookup;
use crate::catalog::family::{EdgeRate, FamilyConfig};
use crate::catalog::tier::TierStep;
use crate::panel::types::PanelSpec;

/// Cost of one finished edge.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeCost {
    /// Which edge of the panel: "top", "left", "right", or "bottom"
    pub edge: String,
    /// Canonical treatment key the rate was looked up under
    pub treatment: String,
    /// Edge run the treatment is billed on, in feet of cut dimension
    pub run_ft: f64,
    /// Per-foot rate; `None` when the treatment has no closed-form price
    pub rate_per_ft: Option<f64>,
    pub cost: Option<f64>,
}

/// Cost of the secondary (canvas) band above a dual-layer panel's primary
/// material.
#[derive(Debug, Clone, Serialize)]
pub struct SecondaryCost {
    pub rate_key: String,
    pub height_in: f64,
    pub run_ft: f64,
    pub cost: Option<f64>,
}

/// Itemized price for one panel.
///
/// `panel_total` is `None` whenever any contributing cost is unknown. The
/// itemized parts are always present so a caller can show which line made
/// the order quote-only.
#[derive(Debug, Clone, Serialize)]
pub struct PriceBreakdown {
    /// Price-book key the material rate was resolved under
    pub rate_key: String,
    pub material_rate_per_ft: f64,
    /// `None` when the rate is unresolved (zero or missing)
    pub material_cost: Option<f64>,
    /// Present only when the panel carries a canvas band
    pub secondary: Option<SecondaryCost>,
    pub edge_costs: Vec<EdgeCost>,
    pub panel_total: Option<f64>,
}

fn add_known(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    }
}

/// Price one panel under its tier step.
///
/// Material and the canvas band are billed per foot of cut width (roll
/// goods are cut to width; the roll height is encoded in the rate key).
/// Horizontal edges bill on cut width, vertical edges on cut height. Edge
/// rates come from the family's catalog table; a price-book entry under the
/// same canonical key overrides the shipped rate. "quote" markers are
/// final and cannot be overridden by the book.
pub fn price_panel(
    family: &FamilyConfig,
    tier_step: &TierStep,
    spec: &PanelSpec,
    book: &impl PriceLookup,
) -> PriceBreakdown {
    let material_rate_per_ft = book.unit_price(&tier_step.rate_key, 0.0);
    let material_cost = if material_rate_per_ft > 0.0 {
        Some(material_rate_per_ft * spec.cut_width_ft())
    } else {
        warn!("material rate {:?} is unresolved", tier_step.rate_key);
        None
    };

    let secondary = match spec.secondary_height_in {
        Some(height_in) if height_in > 0.0 => {
            let rate_key = family.secondary_rate_key.clone().unwrap_or_default();
            let run_ft = spec.cut_width_ft();
            let cost = if !tier_step.canvas_allowed {
                warn!(
                    "panel needs {}\" of infill but the {:?} tier does not offer it",
                    height_in, tier_step.tier
                );
                None
            } else {
                let rate = book.unit_price(&rate_key, 0.0);
                if rate > 0.0 {
                    Some(rate * run_ft)
                } else {
                    warn!("secondary rate {:?} is unresolved", rate_key);
                    None
                }
            };
            Some(SecondaryCost {
                rate_key,
                height_in,
                run_ft,
                cost,
            })
        }
        _ => None,
    };

    let edge_runs = [
        ("top", spec.top.price_key().to_string(), spec.cut_width_ft()),
        ("left", spec.left.price_key(), spec.cut_height_ft()),
        ("right", spec.right.price_key(), spec.cut_height_ft()),
        ("bottom", spec.bottom.price_key(), spec.cut_width_ft()),
    ];
    let edge_costs: Vec<EdgeCost> = edge_runs
        .into_iter()
        .map(|(edge, treatment, run_ft)| {
            let (rate_per_ft, cost) = match family.edge_rate(&treatment) {
                Some(EdgeRate::PerFoot(list_rate)) => {
                    let rate = book.unit_price(&treatment, list_rate);
                    (Some(rate), Some(rate * run_ft))
                }
                Some(EdgeRate::Quote) => {
                    debug!("{} edge {:?} is quote-only", edge, treatment);
                    (None, None)
                }
                None => {
                    warn!("no rate on file for {} edge {:?}", edge, treatment);
                    (None, None)
                }
            };
            EdgeCost {
                edge: edge.to_string(),
                treatment,
                run_ft,
                rate_per_ft,
                cost,
            }
        })
        .collect();

    let mut panel_total = material_cost;
    if let Some(band) = &secondary {
        panel_total = add_known(panel_total, band.cost);
    }
    for edge in &edge_costs {
        panel_total = add_known(panel_total, edge.cost);
    }

    debug!(
        "panel priced under {:?}: material {:?}, total {:?}",
        tier_step.rate_key, material_cost, panel_total
    );

    PriceBreakdown {
        rate_key: tier_step.rate_key.clone(),
        material_rate_per_ft,
        material_cost,
        secondary,
        edge_costs,
        panel_total,
    }
}

/// Sum panel totals into an order total: `None` for an empty order or when
/// any panel total is unknown.
pub fn order_total(panels: &[PriceBreakdown]) -> Option<f64> {
    if panels.is_empty() {
        return None;
    }
    panels.iter().map(|p| p.panel_total).sum()
}
