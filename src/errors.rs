use thiserror::Error;

/// Error type for the configuration, markup and formatter surfaces.
///
/// The rewrite pass itself never fails: malformed prices are handled by
/// [`crate::rewrite::InvalidPricePolicy`].
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unsupported locale `{locale}` with currency `{currency}`")]
    UnsupportedLocale { locale: String, currency: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}
