//! Size-tier classification.
//!
//! A tier is the customer-facing size class of an order (short/medium/tall),
//! derived from the tallest raw panel height. The tier picks the material
//! roll the factory cuts from, so it drives the per-foot rate key and whether
//! canvas infill is available at all. Boundaries are data: each material
//! family ships a `TierSchedule` in the catalog, validated at load time to be
//! contiguous and exhaustive over the height domain.

use serde::{Deserialize, Serialize};

use crate::error::PanelfitError;

/// Ordered size classes. The derived `Ord` follows declaration order, so
/// `Short < Medium < Tall` holds and schedules can be checked for ascending
/// tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Short,
    Medium,
    Tall,
}

impl SizeTier {
    /// Canonical key, as used in catalogs and exported quotes.
    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::Short => "short",
            SizeTier::Medium => "medium",
            SizeTier::Tall => "tall",
        }
    }
}

/// One row of a family's tier schedule.
///
/// A step bounds its tier from above either exclusively (`below_in`: heights
/// strictly under the limit) or inclusively (`through_in`: heights up to and
/// including the limit). The terminal step carries no bound and catches
/// everything taller. Exactly one of the two bounds may be set per step.
#[derive(Debug, Clone, Deserialize)]
pub struct TierStep {
    pub tier: SizeTier,
    /// Exclusive upper bound in inches (height < below_in).
    #[serde(default)]
    pub below_in: Option<f64>,
    /// Inclusive upper bound in inches (height <= through_in).
    #[serde(default)]
    pub through_in: Option<f64>,
    /// Price-book key for the material per-foot rate at this tier.
    pub rate_key: String,
    /// Whether canvas infill may be configured at this tier. Tiers cut from
    /// short rolls are single-material only.
    #[serde(default)]
    pub canvas_allowed: bool,
}

impl TierStep {
    /// The step's upper limit, whichever form it uses. `None` marks the
    /// terminal (open-ended) step.
    pub fn limit_in(&self) -> Option<f64> {
        self.below_in.or(self.through_in)
    }
}

/// A family's ordered tier schedule, shortest tier first.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct TierSchedule {
    steps: Vec<TierStep>,
}

impl TierSchedule {
    pub fn new(steps: Vec<TierStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[TierStep] {
        &self.steps
    }

    /// Find the schedule step covering `height_in`.
    ///
    /// Steps are checked in order; the first whose bound admits the height
    /// wins, and the terminal step admits everything. Classification is pure:
    /// the same height always lands in the same step.
    pub fn step_for(&self, height_in: f64) -> &TierStep {
        for step in &self.steps {
            match (step.below_in, step.through_in) {
                (Some(limit), _) if height_in < limit => return step,
                (_, Some(limit)) if height_in <= limit => return step,
                (None, None) => return step,
                _ => {}
            }
        }
        // Validation guarantees a terminal step exists; this is unreachable
        // for any schedule that passed `validate`.
        self.steps.last().expect("tier schedule is never empty")
    }

    /// Classify a raw height into its tier.
    pub fn classify(&self, height_in: f64) -> SizeTier {
        self.step_for(height_in).tier
    }

    /// Check that the schedule is well-formed: non-empty, exactly one bound
    /// per non-terminal step, exactly one open-ended terminal step (the
    /// last), strictly increasing limits, strictly ascending tiers, and a
    /// rate key on every step. Run once at catalog load; classification
    /// assumes it passed.
    pub fn validate(&self, family: &str) -> Result<(), PanelfitError> {
        let fail = |msg: String| Err(PanelfitError::Catalog(msg));

        if self.steps.is_empty() {
            return fail(format!("family {:?}: tier schedule is empty", family));
        }

        let last = self.steps.len() - 1;
        let mut prev_limit: Option<f64> = None;
        for (i, step) in self.steps.iter().enumerate() {
            if step.rate_key.trim().is_empty() {
                return fail(format!(
                    "family {:?}: tier {:?} has an empty rate_key",
                    family, step.tier
                ));
            }
            if step.below_in.is_some() && step.through_in.is_some() {
                return fail(format!(
                    "family {:?}: tier {:?} sets both below_in and through_in",
                    family, step.tier
                ));
            }
            match step.limit_in() {
                Some(limit) => {
                    if i == last {
                        return fail(format!(
                            "family {:?}: last tier {:?} must be open-ended (no bound)",
                            family, step.tier
                        ));
                    }
                    if !limit.is_finite() || limit <= 0.0 {
                        return fail(format!(
                            "family {:?}: tier {:?} has a non-positive limit {}",
                            family, step.tier, limit
                        ));
                    }
                    if let Some(prev) = prev_limit {
                        if limit <= prev {
                            return fail(format!(
                                "family {:?}: tier limits must be strictly increasing ({} after {})",
                                family, limit, prev
                            ));
                        }
                    }
                    prev_limit = Some(limit);
                }
                None => {
                    if i != last {
                        return fail(format!(
                            "family {:?}: tier {:?} has no bound but is not the last step",
                            family, step.tier
                        ));
                    }
                }
            }
            if i > 0 && self.steps[i - 1].tier >= step.tier {
                return fail(format!(
                    "family {:?}: tiers must ascend ({:?} after {:?})",
                    family,
                    step.tier,
                    self.steps[i - 1].tier
                ));
            }
        }

        Ok(())
    }
}
