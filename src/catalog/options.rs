//! Attachment option enums and boundary parsing/sanitation.
//!
//! Persisted drafts and the upstream storefront identify options by
//! snake_case key strings (e.g. `"webbing_2in_velcro_grommets_12"`). Those
//! strings encode several orthogonal attributes at once, so they are parsed
//! into structured variants here, at the system boundary, and the structured
//! form is used everywhere inside the engine. Canonical keys are re-derived
//! from the structured form, which normalizes legacy spellings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest panel count a split layout will accept; drafts asking for more
/// are clamped during sanitation.
pub const MAX_SPLIT_PANELS: u8 = 8;

/// Default grommet spacing (inches) for webbing keys that omit it.
const DEFAULT_GROMMET_SPACING_IN: u8 = 12;

/// Product families the engine prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialFamily {
    /// Finished screen-mesh panels.
    Mesh,
    /// Clear vinyl panels, optionally capped with canvas infill.
    Vinyl,
    /// Raw netting cut from the roll with minimal finishing.
    RawNetting,
}

impl MaterialFamily {
    /// Canonical key used in catalogs, price books, and drafts.
    pub fn key(&self) -> &'static str {
        match self {
            MaterialFamily::Mesh => "mesh",
            MaterialFamily::Vinyl => "vinyl",
            MaterialFamily::RawNetting => "raw_netting",
        }
    }

    /// Parse a family key using case-insensitive substring matching.
    /// Raw/netting is checked before mesh so "raw_mesh_panel" resolves to
    /// the raw-netting family, not the finished-mesh one.
    pub fn from_key(input: &str) -> Option<MaterialFamily> {
        let lower = input.to_lowercase();
        if lower.contains("raw") || lower.contains("netting") {
            Some(MaterialFamily::RawNetting)
        } else if lower.contains("vinyl") {
            Some(MaterialFamily::Vinyl)
        } else if lower.contains("mesh") {
            Some(MaterialFamily::Mesh)
        } else {
            None
        }
    }

    pub fn all() -> [MaterialFamily; 3] {
        [
            MaterialFamily::Mesh,
            MaterialFamily::Vinyl,
            MaterialFamily::RawNetting,
        ]
    }
}

/// Wall surface an adhesive fastener strip mounts to. Stucco installs use a
/// stiffer strip with its own rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountSurface {
    Smooth,
    Stucco,
}

/// How the top of a panel attaches to the structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopAttachment {
    /// Standard sliding track. Track systems earn relaxed-fit width slack.
    TrackStandard,
    /// Heavy-duty sliding track for wide or exposed openings.
    TrackHeavy,
    /// Adhesive-backed fastener strip (hook side glued, loop side sewn).
    AdhesiveFastener(MountSurface),
    /// Plain bound top edge, hung by the customer.
    BindingOnly,
    /// Customer-specified rigging; dimensioned normally, priced by hand.
    CustomRigging,
}

impl TopAttachment {
    /// True for sliding-track systems, which get relaxed-fit width slack.
    pub fn is_track(&self) -> bool {
        matches!(self, TopAttachment::TrackStandard | TopAttachment::TrackHeavy)
    }

    /// Key used for rate lookups in the family's edge-rate table.
    pub fn price_key(&self) -> &'static str {
        match self {
            TopAttachment::TrackStandard => "track_standard",
            TopAttachment::TrackHeavy => "track_heavy",
            TopAttachment::AdhesiveFastener(MountSurface::Smooth) => "adhesive_smooth",
            TopAttachment::AdhesiveFastener(MountSurface::Stucco) => "stucco_standard",
            TopAttachment::BindingOnly => "binding_only",
            TopAttachment::CustomRigging => "custom_rigging",
        }
    }

    /// Key used for dimensional-adjustment lookups. Both mount surfaces of
    /// the adhesive fastener fold over the same way, so they share one entry.
    pub fn kind_key(&self) -> &'static str {
        match self {
            TopAttachment::AdhesiveFastener(_) => "adhesive_fastener",
            other => other.price_key(),
        }
    }

    /// Parse a top-attachment key using case-insensitive substring matching.
    ///
    /// Order matters: "track_heavy" is checked before the generic "track",
    /// and "stucco" before the generic adhesive match, so composite keys
    /// resolve to the most specific variant.
    pub fn from_key(input: &str) -> Option<TopAttachment> {
        let lower = input.to_lowercase();
        if lower.contains("track") {
            if lower.contains("heavy") {
                Some(TopAttachment::TrackHeavy)
            } else {
                Some(TopAttachment::TrackStandard)
            }
        } else if lower.contains("stucco") {
            Some(TopAttachment::AdhesiveFastener(MountSurface::Stucco))
        } else if lower.contains("adhesive") || lower.contains("fastener") {
            Some(TopAttachment::AdhesiveFastener(MountSurface::Smooth))
        } else if lower.contains("binding") {
            Some(TopAttachment::BindingOnly)
        } else if lower.contains("custom") || lower.contains("rigging") {
            Some(TopAttachment::CustomRigging)
        } else {
            None
        }
    }
}

/// Grommet layout along a webbing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrommetSpacing {
    /// One grommet every N inches.
    EveryIn(u8),
    /// Exactly five grommets spread evenly over the edge, any length.
    FiveEqual,
}

/// Structured form of a webbing edge key.
///
/// The storefront encodes these as one string
/// (`webbing_<W>in[_velcro]_<grommets_<S>|five_equal>`); the engine works
/// with this struct and renders the canonical key back out for rate lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebbingSpec {
    /// Webbing strap width in whole inches (1, 2, or 3 in the catalog).
    pub width_in: u8,
    pub grommets: GrommetSpacing,
    /// Velcro sewn to the webbing face in addition to grommets.
    pub velcro: bool,
}

/// How one vertical (or bottom) edge of a panel is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAttachment {
    /// Plain cut edge, no hardware, no cost.
    None,
    /// Snap fasteners on a reinforced hem.
    Snap,
    /// Half of a separating zipper, mate sewn to the adjacent panel or wall strip.
    Zipper,
    /// Double-slider door zipper used at walk-through interior joins.
    ZipperDoor,
    /// Zippered structural strip; the strip supplies the hem, so it takes
    /// an inch back from the panel.
    ZipperedStrip,
    /// Bound (taped) edge with no hardware.
    BoundEdge,
    /// Webbing-reinforced edge with grommets (and optionally velcro).
    Webbing(WebbingSpec),
}

impl EdgeAttachment {
    /// Canonical key used for rate lookups in the family's edge-rate table.
    /// Webbing keys re-compose the full variant string, which also
    /// normalizes any legacy spelling the draft arrived with.
    pub fn price_key(&self) -> String {
        match self {
            EdgeAttachment::None => "none".to_string(),
            EdgeAttachment::Snap => "snap".to_string(),
            EdgeAttachment::Zipper => "zipper".to_string(),
            EdgeAttachment::ZipperDoor => "zipper_door".to_string(),
            EdgeAttachment::ZipperedStrip => "zippered_strip".to_string(),
            EdgeAttachment::BoundEdge => "bound_edge".to_string(),
            EdgeAttachment::Webbing(spec) => {
                let velcro = if spec.velcro { "_velcro" } else { "" };
                let spacing = match spec.grommets {
                    GrommetSpacing::EveryIn(n) => format!("grommets_{}", n),
                    GrommetSpacing::FiveEqual => "five_equal".to_string(),
                };
                format!("webbing_{}in{}_{}", spec.width_in, velcro, spacing)
            }
        }
    }

    /// Key used for dimensional-adjustment lookups. All webbing variants
    /// wrap the edge the same way, so they share one adjustment entry.
    pub fn kind_key(&self) -> &'static str {
        match self {
            EdgeAttachment::None => "none",
            EdgeAttachment::Snap => "snap",
            EdgeAttachment::Zipper => "zipper",
            EdgeAttachment::ZipperDoor => "zipper_door",
            EdgeAttachment::ZipperedStrip => "zippered_strip",
            EdgeAttachment::BoundEdge => "bound_edge",
            EdgeAttachment::Webbing(_) => "webbing",
        }
    }

    /// Parse an edge key using case-insensitive substring matching.
    ///
    /// Order matters: "zipper_door" and "zippered_strip" both contain
    /// "zipper", so the more specific forms are checked first.
    pub fn from_key(input: &str) -> Option<EdgeAttachment> {
        let lower = input.to_lowercase();
        if lower.is_empty() || lower == "none" {
            Some(EdgeAttachment::None)
        } else if lower.contains("webbing") {
            parse_webbing(&lower).map(EdgeAttachment::Webbing)
        } else if lower.contains("door") {
            Some(EdgeAttachment::ZipperDoor)
        } else if lower.contains("strip") {
            Some(EdgeAttachment::ZipperedStrip)
        } else if lower.contains("zip") {
            Some(EdgeAttachment::Zipper)
        } else if lower.contains("snap") {
            Some(EdgeAttachment::Snap)
        } else if lower.contains("bound") || lower.contains("binding") {
            Some(EdgeAttachment::BoundEdge)
        } else {
            None
        }
    }
}

/// Decompose a webbing key body: width ("2in"), optional "velcro", and
/// either "grommets_<N>" or "five_equal". Width is required; spacing
/// defaults to the standard 12" pitch when omitted (older drafts).
fn parse_webbing(lower: &str) -> Option<WebbingSpec> {
    let width_in = parse_number_before(lower, "in")?;

    let grommets = if lower.contains("five_equal") {
        GrommetSpacing::FiveEqual
    } else if lower.contains("grommets_") {
        GrommetSpacing::EveryIn(parse_number_after(lower, "grommets_")?)
    } else {
        GrommetSpacing::EveryIn(DEFAULT_GROMMET_SPACING_IN)
    };

    Some(WebbingSpec {
        width_in,
        grommets,
        velcro: lower.contains("velcro"),
    })
}

/// Parse the digits immediately preceding `marker` (e.g. "2" from
/// "webbing_2in_..."). Marker occurrences with no digits in front are
/// skipped: "webbing" itself contains "in".
fn parse_number_before(s: &str, marker: &str) -> Option<u8> {
    for (idx, _) in s.match_indices(marker) {
        let digits: String = s[..idx]
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if !digits.is_empty() {
            return digits.parse().ok();
        }
    }
    None
}

/// Parse the digits immediately following `marker` (e.g. "12" from
/// "...grommets_12").
fn parse_number_after(s: &str, marker: &str) -> Option<u8> {
    let start = s.find(marker)? + marker.len();
    let digits: String = s[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Physical panel layout for one measured side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelLayout {
    /// One panel spans the whole opening.
    Single,
    /// The opening is divided into `count` equal panels with `join` on
    /// every interior edge.
    Split { count: u8, join: EdgeAttachment },
}

impl PanelLayout {
    /// Number of physical panels this layout produces.
    pub fn panel_count(&self) -> u8 {
        match self {
            PanelLayout::Single => 1,
            PanelLayout::Split { count, .. } => *count,
        }
    }
}

// =============================================================================
// SANITATION (legacy/unknown draft values -> documented fallbacks)
// =============================================================================

/// A substitution made while sanitizing a persisted draft.
/// Drafts can reference option values that have since been removed from the
/// catalog; each such value is replaced by a documented fallback and
/// reported, never silently accepted.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeWarning {
    /// The draft field that triggered the warning
    pub field: String,
    /// Human-readable description of the substitution
    pub message: String,
    /// The raw value that could not be parsed (as received)
    pub value: String,
}

fn push_warning(warnings: &mut Vec<SanitizeWarning>, field: &str, value: &str, fallback: &str) {
    warnings.push(SanitizeWarning {
        field: field.to_string(),
        message: format!("Unknown {} value {:?}, using {:?}", field, value, fallback),
        value: value.to_string(),
    });
}

/// Resolve a raw family key; unknown values fall back to mesh.
pub fn sanitize_family(
    raw: &str,
    field: &str,
    warnings: &mut Vec<SanitizeWarning>,
) -> MaterialFamily {
    MaterialFamily::from_key(raw).unwrap_or_else(|| {
        push_warning(warnings, field, raw, MaterialFamily::Mesh.key());
        MaterialFamily::Mesh
    })
}

/// Resolve a raw top-attachment key; unknown values fall back to a plain
/// bound top (the only top every family can manufacture).
pub fn sanitize_top(
    raw: &str,
    field: &str,
    warnings: &mut Vec<SanitizeWarning>,
) -> TopAttachment {
    TopAttachment::from_key(raw).unwrap_or_else(|| {
        push_warning(warnings, field, raw, TopAttachment::BindingOnly.price_key());
        TopAttachment::BindingOnly
    })
}

/// Resolve a raw edge key; unknown values fall back to a plain edge.
pub fn sanitize_edge(
    raw: &str,
    field: &str,
    warnings: &mut Vec<SanitizeWarning>,
) -> EdgeAttachment {
    EdgeAttachment::from_key(raw).unwrap_or_else(|| {
        push_warning(warnings, field, raw, "none");
        EdgeAttachment::None
    })
}

/// Resolve a draft's panel count + interior-join key into a layout.
/// Counts of 0 or 1 mean a single panel; counts above [`MAX_SPLIT_PANELS`]
/// are clamped. A split with a missing join key falls back to a zipper
/// join (the shop's standard interior treatment) with a warning.
pub fn sanitize_layout(
    panels: u8,
    join: Option<&str>,
    field: &str,
    warnings: &mut Vec<SanitizeWarning>,
) -> PanelLayout {
    let count = if panels > MAX_SPLIT_PANELS {
        push_warning(
            warnings,
            field,
            &panels.to_string(),
            &MAX_SPLIT_PANELS.to_string(),
        );
        MAX_SPLIT_PANELS
    } else {
        panels
    };

    if count <= 1 {
        return PanelLayout::Single;
    }

    let join = match join {
        Some(raw) => match EdgeAttachment::from_key(raw) {
            Some(edge) => edge,
            None => {
                push_warning(warnings, field, raw, "zipper");
                EdgeAttachment::Zipper
            }
        },
        None => {
            push_warning(warnings, field, "<missing join>", "zipper");
            EdgeAttachment::Zipper
        }
    };

    PanelLayout::Split { count, join }
}

// =============================================================================
// SERDE (options serialize as their canonical keys)
// =============================================================================

impl Serialize for MaterialFamily {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for MaterialFamily {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MaterialFamily::from_key(&raw)
            .ok_or_else(|| D::Error::custom(format!("unknown material family: {:?}", raw)))
    }
}

impl Serialize for TopAttachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.price_key())
    }
}

impl<'de> Deserialize<'de> for TopAttachment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TopAttachment::from_key(&raw)
            .ok_or_else(|| D::Error::custom(format!("unknown top attachment: {:?}", raw)))
    }
}

impl Serialize for EdgeAttachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.price_key())
    }
}

impl<'de> Deserialize<'de> for EdgeAttachment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        EdgeAttachment::from_key(&raw)
            .ok_or_else(|| D::Error::custom(format!("unknown edge attachment: {:?}", raw)))
    }
}
