//! Order-level orchestration: sides in, priced panels and a status out.

use chrono::Utc;
use tracing::{debug, info};

use super::types::{
    DraftOrder, OrderConfig, PanelQuote, QuoteOutcome, QuoteStatus, SideConfig, Submission,
    SubmissionRoute,
};
use crate::catalog::family::{default_catalog, CatalogConfig, FamilyConfig};
use crate::error::PanelfitError;
use crate::panel::dimension::compute_panel;
use crate::panel::splitter::split_side;
use crate::panel::types::{PanelOptions, PanelSpec};
use crate::pricing::aggregator::{order_total, price_panel};
use crate::pricing::book::PriceLookup;

/// The full pipeline behind one catalog: split sides into panels, compute
/// cut dimensions, classify the order's tier, and aggregate prices.
///
/// Stateless apart from the catalog; call it on every configurator
/// keystroke.
pub struct QuoteEngine {
    catalog: CatalogConfig,
}

/// A side can enter the pipeline once its three measurements are usable.
fn side_ready(family: &FamilyConfig, side: &SideConfig) -> bool {
    let m = &side.measurement;
    m.total_width_in > 0.0
        && m.left_height_in >= family.min_height_in
        && m.right_height_in >= family.min_height_in
}

impl QuoteEngine {
    /// Engine over the given catalog.
    pub fn new(catalog: CatalogConfig) -> QuoteEngine {
        QuoteEngine { catalog }
    }

    /// Engine over the embedded default catalog.
    pub fn with_defaults() -> QuoteEngine {
        QuoteEngine::new(default_catalog())
    }

    /// Sanitize a persisted draft and price it. Sanitation warnings ride
    /// along on the outcome.
    pub fn price_draft(&self, draft: &DraftOrder, book: &impl PriceLookup) -> QuoteOutcome {
        let (order, warnings) = draft.sanitize();
        let mut outcome = self.price_order(&order, book);
        outcome.warnings = warnings;
        outcome
    }

    /// Price a sanitized order.
    ///
    /// Sides that are not ready are skipped (the rest of the order still
    /// computes); the order is `Unconfigured` until one side is ready and
    /// `PartiallyConfigured` until all of them are. The tier comes from the
    /// tallest raw PANEL height in the order, after splitting, and every
    /// panel is priced under that one tier's rate key.
    pub fn price_order(&self, order: &OrderConfig, book: &impl PriceLookup) -> QuoteOutcome {
        let family = self.catalog.family(order.family);

        let mut rows: Vec<(String, usize, PanelSpec)> = Vec::new();
        let mut all_ready = !order.sides.is_empty();

        for side in &order.sides {
            if !side_ready(family, side) {
                debug!("side {:?} is not ready, skipping", side.label);
                all_ready = false;
                continue;
            }
            let plans = split_side(
                &side.measurement,
                &side.layout,
                side.outer_left,
                side.outer_right,
            );
            for (index, plan) in plans.into_iter().enumerate() {
                let options = PanelOptions {
                    top: side.top,
                    left: plan.left,
                    right: plan.right,
                    bottom: side.bottom,
                };
                match compute_panel(family, &plan.measurement, &options) {
                    Some(spec) => rows.push((side.label.clone(), index, spec)),
                    None => all_ready = false,
                }
            }
        }

        let tier_step = if rows.is_empty() {
            None
        } else {
            let max_height_in = rows
                .iter()
                .map(|(_, _, spec)| spec.raw_height_in)
                .fold(0.0, f64::max);
            Some(family.tiers.step_for(max_height_in))
        };

        let mut breakdowns = Vec::with_capacity(rows.len());
        if let Some(step) = tier_step {
            for (_, _, spec) in &rows {
                breakdowns.push(price_panel(family, step, spec, book));
            }
        }

        // A partial order never shows a total, even when its computed
        // panels all priced cleanly
        let total = if all_ready {
            order_total(&breakdowns)
        } else {
            None
        };

        let panels: Vec<PanelQuote> = rows
            .into_iter()
            .zip(breakdowns)
            .map(|((side, index, spec), price)| PanelQuote {
                side,
                index,
                spec,
                price,
            })
            .collect();

        let status = if panels.is_empty() {
            QuoteStatus::Unconfigured
        } else if !all_ready {
            QuoteStatus::PartiallyConfigured
        } else if total.is_some() {
            QuoteStatus::Priced
        } else {
            QuoteStatus::NeedsQuote
        };

        info!(
            "quote complete: {} panels, status {:?}, total {:?}",
            panels.len(),
            status,
            total
        );

        QuoteOutcome {
            family: order.family,
            status,
            tier: tier_step.map(|step| step.tier),
            canvas_selectable: tier_step.map(|step| step.canvas_allowed).unwrap_or(false),
            panels,
            order_total: total,
            warnings: Vec::new(),
        }
    }
}

/// Generate a submission reference in the shop's "Q" + 7 hex convention.
/// The 7 hex chars give ~268M references, so collisions are negligible.
fn generate_reference() -> String {
    let bytes: [u8; 4] = rand::random();
    format!("Q{:07x}", u32::from_be_bytes(bytes) & 0x0FFF_FFFF)
}

/// Submit a quoted order.
///
/// `Priced` orders go straight to the order pipeline; `NeedsQuote` orders
/// are routed to manual review. Anything less configured cannot be
/// submitted, and a submitted order cannot be submitted twice.
pub fn submit(outcome: &mut QuoteOutcome) -> Result<Submission, PanelfitError> {
    let route = match outcome.status {
        QuoteStatus::Priced => SubmissionRoute::DirectOrder,
        QuoteStatus::NeedsQuote => SubmissionRoute::ManualReview,
        QuoteStatus::Submitted => {
            return Err(PanelfitError::Quote(
                "order was already submitted".to_string(),
            ))
        }
        QuoteStatus::Unconfigured | QuoteStatus::PartiallyConfigured => {
            return Err(PanelfitError::Quote(format!(
                "cannot submit: order is {:?}",
                outcome.status
            )))
        }
    };

    let submission = Submission {
        reference: generate_reference(),
        route,
        submitted_at: Utc::now().to_rfc3339(),
    };
    outcome.status = QuoteStatus::Submitted;
    info!("order {} submitted ({:?})", submission.reference, route);
    Ok(submission)
}
