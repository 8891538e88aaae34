use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelfitError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Price book error: {0}")]
    PriceBook(String),

    #[error("Quote error: {0}")]
    Quote(String),
}

impl From<PanelfitError> for String {
    fn from(err: PanelfitError) -> Self {
        err.to_string()
    }
}
