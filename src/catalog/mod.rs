//! Product catalog: material families, attachment options, size tiers, and
//! the per-family configuration tables that drive dimensioning and pricing.

pub mod family;
pub mod options;
pub mod tier;

pub use family::{default_catalog, load_catalog, CatalogConfig, EdgeRate, FamilyConfig};
pub use options::{
    sanitize_edge, sanitize_family, sanitize_layout, sanitize_top, EdgeAttachment, GrommetSpacing,
    MaterialFamily, MountSurface, PanelLayout, SanitizeWarning, TopAttachment, WebbingSpec,
    MAX_SPLIT_PANELS,
};
pub use tier::{SizeTier, TierSchedule, TierStep};
