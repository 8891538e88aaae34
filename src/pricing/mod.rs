//! Pricing: the price-book lookup and the cost aggregator.

pub mod aggregator;
pub mod book;

pub use aggregator::{order_total, price_panel, EdgeCost, PriceBreakdown, SecondaryCost};
pub use book::{default_prices, load_prices, PriceBook, PriceLookup};
