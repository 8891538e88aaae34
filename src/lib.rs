pub mod catalog;
pub mod error;
pub mod panel;
pub mod pricing;
pub mod quote;

pub use error::PanelfitError;
pub use quote::{QuoteEngine, QuoteOutcome, QuoteStatus};
