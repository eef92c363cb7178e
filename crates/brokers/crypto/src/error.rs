use thiserror::Error;

/// Everything that can go wrong talking to the exchange.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or unusable credentials / configuration. No request was sent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The exchange rejected the request.
    #[error("[Binance Error {code}] {message}")]
    Api { code: i64, message: String },

    /// Connection refused, DNS failure, timeout or a broken body stream.
    #[error("Network error: {cause}")]
    Network {
        #[source]
        cause: reqwest::Error,
    },

    /// The body could not be parsed as JSON.
    #[error("Malformed response (HTTP {status}): {body}")]
    MalformedResponse { status: u16, body: String },
}

impl ClientError {
    pub fn config(message: impl Into<String>) -> Self {
        ClientError::Config(message.into())
    }

    pub fn is_api(&self) -> bool {
        matches!(self, ClientError::Api { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }

    /// True when the per-request deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Network { cause } if cause.is_timeout())
    }

    /// Exchange error code, for API errors only.
    pub fn code(&self) -> Option<i64> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(cause: reqwest::Error) -> Self {
        ClientError::Network { cause }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
