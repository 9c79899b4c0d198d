//! Domain error types.

/// Top-level error type for stockgrid.
#[derive(Debug, thiserror::Error)]
pub enum StockgridError {
    #[error("fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("provider error for {symbol}: {code} - {description}")]
    Provider {
        symbol: String,
        code: String,
        description: String,
    },

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockgridError> for std::process::ExitCode {
    fn from(err: &StockgridError) -> Self {
        let code: u8 = match err {
            StockgridError::Io(_) | StockgridError::Image(_) => 1,
            StockgridError::ConfigParse { .. } | StockgridError::ConfigInvalid { .. } => 2,
            StockgridError::Fetch { .. }
            | StockgridError::Provider { .. }
            | StockgridError::Http(_) => 3,
            StockgridError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
