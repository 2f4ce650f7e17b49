use thiserror::Error;

/// Error returned by the trading API: a server code plus a readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub const RATE_LIMIT: &'static str = "RateLimit";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        self.code == Self::RATE_LIMIT
    }
}

/// Failure of one orchestrator step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error("no tradable symbol available")]
    NoSymbol,
    #[error("no contract category available")]
    NoCategory,
    #[error("no trading period available")]
    NoPeriod,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WidgetError {
    /// Notification key for steps keyed by the error itself.
    pub fn code(&self) -> &str {
        match self {
            WidgetError::NoSymbol => "NoSymbol",
            WidgetError::NoCategory => "NoCategory",
            WidgetError::NoPeriod => "NoPeriod",
            WidgetError::Api(e) => &e.code,
        }
    }

    pub fn message(&self) -> String {
        match self {
            WidgetError::Api(e) => e.message.clone(),
            other => other.to_string(),
        }
    }
}
