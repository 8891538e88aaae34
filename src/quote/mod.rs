//! Quote engine for made-to-order enclosure panels.
//!
//! This module turns a measured opening plus discrete option choices into
//! factory cut dimensions and an itemized, null-propagating price.
//!
//! # Architecture
//!
//! - **Sanitation**: Persisted drafts carry raw option strings; unknown
//!   values map to documented fallbacks with warnings
//! - **Splitting**: Each side becomes N physical panels with interpolated
//!   heights and outer/interior edge roles
//! - **Dimensioning**: Cut sizes are sums of named terms (adjustments,
//!   overlap, relaxed fit), rounded once and floor-clamped
//! - **Pricing**: Tier-keyed material rate plus per-edge costs; any cost
//!   without a closed-form price makes the whole order quote-only
//!
//! # Example
//!
//! ```ignore
//! use panelfit::pricing::default_prices;
//! use panelfit::quote::{submit, DraftOrder, QuoteEngine, QuoteStatus};
//!
//! let draft: DraftOrder = serde_json::from_str(&saved_draft_json)?;
//!
//! let engine = QuoteEngine::with_defaults();
//! let mut outcome = engine.price_draft(&draft, &default_prices());
//!
//! for panel in &outcome.panels {
//!     println!("{} #{}: cut {}x{} -> {:?}",
//!         panel.side, panel.index,
//!         panel.spec.cut_width_in, panel.spec.cut_height_in,
//!         panel.price.panel_total);
//! }
//!
//! if outcome.status == QuoteStatus::Priced {
//!     let receipt = submit(&mut outcome)?;
//!     println!("submitted as {}", receipt.reference);
//! }
//! ```

mod engine;
mod export;
mod types;

pub use engine::{submit, QuoteEngine};
pub use export::{quote_to_json, write_quote_atomic};
pub use types::*;
