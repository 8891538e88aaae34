//! Price book: key to unit-price lookups.
//!
//! The engine never owns prices; it asks a [`PriceLookup`] for them. The
//! real storefront backs this with its product database. This module ships
//! a TOML-backed [`PriceBook`] for the CLI, tests, and anyone without a
//! database: an embedded default list, single-file overrides, and a
//! directory-merge loader for shops that split their price sheets.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Default price list embedded in the binary at compile time.
/// Loaded from `config/pricing.toml`.
const DEFAULT_PRICING: &str = include_str!("../../config/pricing.toml");

/// Key to unit-price resolution.
///
/// Must never fail: a key the source does not carry yields `fallback`
/// (conventionally `0.0`, which the aggregator reads as "unknown", not
/// "free").
pub trait PriceLookup {
    fn unit_price(&self, key: &str, fallback: f64) -> f64;
}

/// Any closure with the right shape can stand in for a price source, which
/// keeps tests and embedding callers free of ceremony.
impl<F> PriceLookup for F
where
    F: Fn(&str, f64) -> f64,
{
    fn unit_price(&self, key: &str, fallback: f64) -> f64 {
        self(key, fallback)
    }
}

/// A flat key to dollars-per-unit table loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceBook {
    #[serde(default)]
    prices: HashMap<String, f64>,
}

impl PriceBook {
    /// Number of keys the book carries.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Overlay another book on this one; the other book's entries win.
    pub fn merge(&mut self, other: PriceBook) {
        self.prices.extend(other.prices);
    }

    /// Merge every `*.toml` under `dir` in filename order, later files
    /// overriding earlier ones.
    pub fn load_dir(dir: &Path) -> Result<PriceBook> {
        let mut paths: Vec<_> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|ext| ext.to_str()) == Some("toml"))
            .map(|e| e.path().to_path_buf())
            .collect();
        paths.sort();

        if paths.is_empty() {
            bail!("no .toml price files under {}", dir.display());
        }

        let mut book = PriceBook::default();
        for path in paths {
            book.merge(load_prices(&path)?);
        }
        info!("price book loaded: {} keys from {}", book.len(), dir.display());
        Ok(book)
    }

    fn validate(&self) -> Result<()> {
        for (key, price) in &self.prices {
            if *price < 0.0 || !price.is_finite() {
                bail!("price for {:?} must be a non-negative number, got {}", key, price);
            }
        }
        Ok(())
    }
}

impl PriceLookup for PriceBook {
    fn unit_price(&self, key: &str, fallback: f64) -> f64 {
        self.prices.get(key).copied().unwrap_or(fallback)
    }
}

/// Load one price file, validating every entry.
pub fn load_prices(path: &Path) -> Result<PriceBook> {
    let content = std::fs::read_to_string(path)?;
    let book: PriceBook = toml::from_str(&content)?;
    book.validate()?;
    Ok(book)
}

/// Get the default price book embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a compile-time bug).
pub fn default_prices() -> PriceBook {
    let book: PriceBook =
        toml::from_str(DEFAULT_PRICING).expect("embedded pricing.toml must be valid TOML");
    book.validate()
        .expect("embedded pricing.toml must pass validation");
    book
}
