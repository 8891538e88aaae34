//! Per-family catalog configuration and TOML loading.
//!
//! Each material family (mesh, vinyl, raw netting) runs through the same
//! dimensioning and pricing algorithm; what differs between them is data:
//! attachment adjustment tables, the base overlap, cut floors, the tier
//! schedule, and the edge-rate table. That data lives in `config/catalog.toml`
//! and is loaded here, either from the embedded default or from a file
//! override.

use anyhow::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;

use super::options::{EdgeAttachment, MaterialFamily, TopAttachment};
use super::tier::TierSchedule;
use crate::error::PanelfitError;

/// Default catalog embedded in the binary at compile time.
/// Loaded from `config/catalog.toml`.
const DEFAULT_CATALOG: &str = include_str!("../../config/catalog.toml");

/// Pricing rule for one edge treatment: a per-foot rate, or no closed-form
/// price at all. In TOML an entry is either a number or the string `"quote"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeRate {
    /// Priced per foot of edge run.
    PerFoot(f64),
    /// The business has not pre-priced this combination; it requires a
    /// manual quote.
    Quote,
}

impl<'de> Deserialize<'de> for EdgeRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Rate(f64),
            Marker(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Rate(rate) => Ok(EdgeRate::PerFoot(rate)),
            Raw::Marker(s) if s == "quote" => Ok(EdgeRate::Quote),
            Raw::Marker(s) => Err(D::Error::custom(format!(
                "edge rate must be a number or \"quote\", got {:?}",
                s
            ))),
        }
    }
}

/// All constants and tables for one material family.
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyConfig {
    /// Human-readable name for display
    pub display_name: String,
    /// Smallest raw height the family accepts; shorter measurements are
    /// treated as not ready
    pub min_height_in: f64,
    /// Floor for cut dimensions; rounding never produces a cut below this
    pub min_cut_in: f64,
    /// Base-of-panel overlap added to every height, in inches
    pub base_overlap_in: f64,
    /// Width span that earns one unit of relaxed fit on track tops
    pub track_slack_span_in: f64,
    /// Inches of relaxed fit earned per full span
    pub track_slack_per_span_in: f64,
    /// Height cap of the primary material; taller panels carry a secondary
    /// (canvas) layer above the cap. Absent for single-layer families.
    #[serde(default)]
    pub max_primary_height_in: Option<f64>,
    /// Price-book key for the secondary material rate
    #[serde(default)]
    pub secondary_rate_key: Option<String>,
    /// Height adjustment per top-attachment kind, in inches (signed)
    pub top_adjustments_in: HashMap<String, f64>,
    /// Width adjustment per edge-attachment kind, in inches (signed)
    pub edge_adjustments_in: HashMap<String, f64>,
    /// Tier schedule, shortest first
    pub tiers: TierSchedule,
    /// Per-foot rates (or "quote" markers) keyed by canonical treatment key
    pub edge_rates: HashMap<String, EdgeRate>,
}

impl FamilyConfig {
    /// Height adjustment for a top attachment. Kinds missing from the table
    /// contribute nothing.
    pub fn top_adjust_in(&self, top: &TopAttachment) -> f64 {
        self.top_adjustments_in
            .get(top.kind_key())
            .copied()
            .unwrap_or(0.0)
    }

    /// Width adjustment for an edge attachment. Kinds missing from the table
    /// contribute nothing.
    pub fn edge_adjust_in(&self, edge: &EdgeAttachment) -> f64 {
        self.edge_adjustments_in
            .get(edge.kind_key())
            .copied()
            .unwrap_or(0.0)
    }

    /// Pricing rule for a canonical treatment key, if the table carries one.
    pub fn edge_rate(&self, price_key: &str) -> Option<EdgeRate> {
        self.edge_rates.get(price_key).copied()
    }

    fn validate(&self, family: &str) -> Result<(), PanelfitError> {
        let fail = |msg: String| Err(PanelfitError::Catalog(msg));

        if self.min_height_in <= 0.0 || !self.min_height_in.is_finite() {
            return fail(format!(
                "family {:?}: min_height_in must be positive, got {}",
                family, self.min_height_in
            ));
        }
        if self.min_cut_in < 0.0 || !self.min_cut_in.is_finite() {
            return fail(format!(
                "family {:?}: min_cut_in must be non-negative, got {}",
                family, self.min_cut_in
            ));
        }
        if self.base_overlap_in < 0.0 || !self.base_overlap_in.is_finite() {
            return fail(format!(
                "family {:?}: base_overlap_in must be non-negative, got {}",
                family, self.base_overlap_in
            ));
        }
        if self.track_slack_span_in <= 0.0 || !self.track_slack_span_in.is_finite() {
            return fail(format!(
                "family {:?}: track_slack_span_in must be positive, got {}",
                family, self.track_slack_span_in
            ));
        }
        if self.track_slack_per_span_in < 0.0 || !self.track_slack_per_span_in.is_finite() {
            return fail(format!(
                "family {:?}: track_slack_per_span_in must be non-negative, got {}",
                family, self.track_slack_per_span_in
            ));
        }
        if let Some(cap) = self.max_primary_height_in {
            if cap <= 0.0 || !cap.is_finite() {
                return fail(format!(
                    "family {:?}: max_primary_height_in must be positive, got {}",
                    family, cap
                ));
            }
            // A family with a primary cap needs a rate for what fills the rest
            if self.secondary_rate_key.as_deref().unwrap_or("").trim().is_empty() {
                return fail(format!(
                    "family {:?}: max_primary_height_in is set but secondary_rate_key is not",
                    family
                ));
            }
        }
        for (kind, adjust) in self.top_adjustments_in.iter().chain(&self.edge_adjustments_in) {
            if !adjust.is_finite() {
                return fail(format!(
                    "family {:?}: adjustment for {:?} is not finite",
                    family, kind
                ));
            }
        }
        for (key, rate) in &self.edge_rates {
            if let EdgeRate::PerFoot(rate) = rate {
                if *rate < 0.0 || !rate.is_finite() {
                    return fail(format!(
                        "family {:?}: edge rate for {:?} must be non-negative, got {}",
                        family, key, rate
                    ));
                }
            }
        }
        self.tiers.validate(family)
    }
}

/// Root catalog loaded from TOML: one `FamilyConfig` per material family.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    families: HashMap<String, FamilyConfig>,
}

impl CatalogConfig {
    /// The configuration for one family.
    ///
    /// Total for any catalog that passed `validate` (loaders always
    /// validate), so callers on the computation path never handle an error.
    pub fn family(&self, family: MaterialFamily) -> &FamilyConfig {
        self.families
            .get(family.key())
            .expect("validated catalog contains every family")
    }

    /// Check the catalog is complete and well-formed: every known family
    /// present, no unknown family keys, and every family config valid.
    pub fn validate(&self) -> Result<(), PanelfitError> {
        for key in self.families.keys() {
            if MaterialFamily::all().iter().all(|f| f.key() != key) {
                return Err(PanelfitError::Catalog(format!(
                    "unknown family {:?} in catalog",
                    key
                )));
            }
        }
        for family in MaterialFamily::all() {
            let config = self.families.get(family.key()).ok_or_else(|| {
                PanelfitError::Catalog(format!("catalog is missing family {:?}", family.key()))
            })?;
            config.validate(family.key())?;
        }
        Ok(())
    }
}

/// Load a catalog from a TOML file at the given path, validating it.
pub fn load_catalog(path: &Path) -> Result<CatalogConfig> {
    let content = std::fs::read_to_string(path)?;
    let catalog: CatalogConfig = toml::from_str(&content)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Get the default catalog embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a compile-time bug).
pub fn default_catalog() -> CatalogConfig {
    let catalog: CatalogConfig =
        toml::from_str(DEFAULT_CATALOG).expect("embedded catalog.toml must be valid TOML");
    catalog
        .validate()
        .expect("embedded catalog.toml must pass validation");
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::options::{GrommetSpacing, WebbingSpec};
    use crate::catalog::tier::SizeTier;

    #[test]
    fn test_default_catalog_loads_and_validates() {
        let catalog = default_catalog();
        for family in MaterialFamily::all() {
            let config = catalog.family(family);
            assert!(!config.display_name.is_empty());
            assert!(config.min_height_in > 0.0);
        }
    }

    #[test]
    fn test_default_mesh_constants() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        assert_eq!(mesh.base_overlap_in, 2.0);
        assert_eq!(mesh.track_slack_span_in, 120.0);
        assert_eq!(mesh.track_slack_per_span_in, 1.0);
        assert!(mesh.max_primary_height_in.is_none());
    }

    #[test]
    fn test_default_vinyl_is_dual_layer() {
        let catalog = default_catalog();
        let vinyl = catalog.family(MaterialFamily::Vinyl);
        assert_eq!(vinyl.max_primary_height_in, Some(72.0));
        assert_eq!(vinyl.secondary_rate_key.as_deref(), Some("canvas_standard"));
        // Canvas is gated off for the short tier
        assert!(!vinyl.tiers.step_for(40.0).canvas_allowed);
        assert!(vinyl.tiers.step_for(80.0).canvas_allowed);
    }

    #[test]
    fn test_default_raw_netting_boundaries_differ() {
        let catalog = default_catalog();
        let raw = catalog.family(MaterialFamily::RawNetting);
        // Raw netting rolls come in different heights than mesh
        assert_eq!(raw.tiers.classify(50.0), SizeTier::Short);
        assert_eq!(raw.tiers.classify(101.0), SizeTier::Medium);
        assert_eq!(raw.tiers.classify(102.0), SizeTier::Tall);
        assert_eq!(raw.base_overlap_in, 0.0);
    }

    #[test]
    fn test_adjustment_lookups() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);

        assert_eq!(mesh.edge_adjust_in(&EdgeAttachment::Snap), 1.0);
        assert_eq!(mesh.edge_adjust_in(&EdgeAttachment::ZipperedStrip), -1.0);
        assert_eq!(mesh.edge_adjust_in(&EdgeAttachment::None), 0.0);
        assert_eq!(
            mesh.top_adjust_in(&TopAttachment::AdhesiveFastener(
                crate::catalog::options::MountSurface::Smooth
            )),
            2.0
        );
        assert_eq!(mesh.top_adjust_in(&TopAttachment::TrackStandard), 0.0);
    }

    #[test]
    fn test_webbing_variants_share_one_adjustment() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        let narrow = EdgeAttachment::Webbing(WebbingSpec {
            width_in: 1,
            grommets: GrommetSpacing::EveryIn(12),
            velcro: false,
        });
        let wide = EdgeAttachment::Webbing(WebbingSpec {
            width_in: 3,
            grommets: GrommetSpacing::FiveEqual,
            velcro: true,
        });
        assert_eq!(mesh.edge_adjust_in(&narrow), mesh.edge_adjust_in(&wide));
    }

    #[test]
    fn test_quote_markers_present() {
        let catalog = default_catalog();
        let mesh = catalog.family(MaterialFamily::Mesh);
        assert_eq!(mesh.edge_rate("custom_rigging"), Some(EdgeRate::Quote));
        assert_eq!(mesh.edge_rate("snap"), Some(EdgeRate::PerFoot(2.5)));
        // Unknown combinations are simply absent
        assert_eq!(mesh.edge_rate("webbing_3in_grommets_4"), None);
    }

    #[test]
    fn test_edge_rate_deserialize_forms() {
        #[derive(Deserialize)]
        struct Table {
            rates: HashMap<String, EdgeRate>,
        }
        let table: Table = toml::from_str(
            r#"
            [rates]
            snap = 2.5
            custom = "quote"
            "#,
        )
        .unwrap();
        assert_eq!(table.rates["snap"], EdgeRate::PerFoot(2.5));
        assert_eq!(table.rates["custom"], EdgeRate::Quote);

        let err = toml::from_str::<Table>(
            r#"
            [rates]
            snap = "call us"
            "#,
        );
        assert!(err.is_err());
    }

    fn minimal_family_toml(extra: &str) -> String {
        format!(
            r#"
            display_name = "Test"
            min_height_in = 12.0
            min_cut_in = 6.0
            base_overlap_in = 2.0
            track_slack_span_in = 120.0
            track_slack_per_span_in = 1.0
            {}

            [top_adjustments_in]
            binding_only = 0.0

            [edge_adjustments_in]
            none = 0.0

            [[tiers]]
            tier = "short"
            below_in = 48.0
            rate_key = "roll_48"

            [[tiers]]
            tier = "tall"
            rate_key = "roll_120"

            [edge_rates]
            none = 0.0
            "#,
            extra
        )
    }

    #[test]
    fn test_family_validation_accepts_minimal() {
        let config: FamilyConfig = toml::from_str(&minimal_family_toml("")).unwrap();
        assert!(config.validate("test").is_ok());
    }

    #[test]
    fn test_primary_cap_requires_secondary_rate_key() {
        let config: FamilyConfig =
            toml::from_str(&minimal_family_toml("max_primary_height_in = 72.0")).unwrap();
        let err = config.validate("test").unwrap_err();
        assert!(err.to_string().contains("secondary_rate_key"));
    }

    #[test]
    fn test_negative_edge_rate_rejected() {
        let mut config: FamilyConfig = toml::from_str(&minimal_family_toml("")).unwrap();
        config
            .edge_rates
            .insert("snap".to_string(), EdgeRate::PerFoot(-1.0));
        let err = config.validate("test").unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_catalog_missing_family_rejected() {
        let mut catalog = default_catalog();
        catalog.families.remove("vinyl");
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("missing family"));
    }

    #[test]
    fn test_catalog_unknown_family_rejected() {
        let mut catalog = default_catalog();
        let mesh = catalog.families.get("mesh").unwrap().clone();
        catalog.families.insert("burlap".to_string(), mesh);
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("unknown family"));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, DEFAULT_CATALOG).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(
            catalog.family(MaterialFamily::Mesh).display_name,
            "Screen Mesh"
        );
    }

    #[test]
    fn test_load_catalog_missing_file_errors() {
        let err = load_catalog(Path::new("/nonexistent/catalog.toml"));
        assert!(err.is_err());
    }
}
