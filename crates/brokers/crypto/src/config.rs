use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Binance USDT-M Futures testnet.
pub const DEFAULT_BASE_URL: &str = "https://testnet.binancefuture.com";
/// Versioned path prefix shared by every endpoint.
pub const API_PREFIX: &str = "/fapi/v1";
/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

/// Configuration for the futures REST client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Exchange host, without the API prefix.
    pub base_url: String,
    /// Server-side tolerance for clock skew, in milliseconds.
    pub recv_window_ms: u64,
    /// Per-call deadline in seconds.
    pub request_timeout_s: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            recv_window_ms: 5_000,
            request_timeout_s: 10,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ClientError::config(format!("Invalid config: {e}")))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("Cannot read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s)
    }
}

/// API key and secret. The secret never leaves the process; it only keys
/// request signatures.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Both values must be non-blank.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        let api_secret = api_secret.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ClientError::config("API key must be a non-empty string."));
        }
        if api_secret.is_empty() {
            return Err(ClientError::config("API secret must be a non-empty string."));
        }
        Ok(Self {
            api_key,
            api_secret,
        })
    }

    /// Read `BINANCE_API_KEY` / `BINANCE_API_SECRET` from the process environment.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    ClientError::config(format!(
                        "{name} is not set. Export it in your shell or pass it on the command line."
                    ))
                })
        };
        Self::new(read(API_KEY_ENV)?, read(API_SECRET_ENV)?)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
