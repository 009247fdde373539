//! Domain error types.
//!
//! Undefined metrics are not errors (see [`super::metric`]); these cover lookups,
//! registration and loading configuration or trade data.

#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("preferred stock {symbol} requires a fixed dividend")]
    MissingFixedDividend { symbol: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("trade data error in {source_name} line {line}: {reason}")]
    TradeParse {
        source_name: String,
        line: u64,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MarketError> for std::process::ExitCode {
    fn from(err: &MarketError) -> Self {
        let code: u8 = match err {
            MarketError::Io(_) => 1,
            MarketError::ConfigParse { .. }
            | MarketError::ConfigMissing { .. }
            | MarketError::ConfigInvalid { .. }
            | MarketError::MissingFixedDividend { .. } => 2,
            MarketError::TradeParse { .. } => 3,
            MarketError::UnknownSymbol { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
