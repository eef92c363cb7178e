use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::{ClientConfig, Credentials, API_KEY_HEADER, API_PREFIX};
use crate::error::{ClientError, Result};
use crate::params::RequestParams;
use crate::signing::{sign_params, SIGNATURE_PARAM};

/// Longest slice of an unparsable body kept for diagnostics.
const MALFORMED_BODY_PREFIX: usize = 300;

/// The futures REST operations the rest of the bot depends on.
#[async_trait]
pub trait FuturesApi: Send + Sync {
    /// Futures account snapshot (balances, positions).
    async fn account_info(&self) -> Result<Value>;

    /// Exchange trading rules and symbol details. Public, unsigned.
    async fn exchange_info(&self) -> Result<Value>;

    /// Latest price for a symbol.
    async fn symbol_price(&self, symbol: &str) -> Result<Value>;

    /// Recent orders (open or completed), newest `limit` entries.
    async fn all_orders(&self, symbol: Option<&str>, limit: u32) -> Result<Value>;

    /// Submit a new order with an arbitrary parameter set.
    async fn place_order(&self, params: RequestParams) -> Result<Value>;
}

/// Signed REST client for Binance USDT-M Futures.
///
/// Holds immutable credentials plus a pooled HTTP connection. The pool is
/// released when the client is closed or dropped.
pub struct FuturesClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    config: ClientConfig,
}

impl FuturesClient {
    /// Client against the default testnet host.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self> {
        Self::with_config(Credentials::new(api_key, api_secret)?, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            ClientError::config(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(credentials.api_key())
            .map_err(|_| ClientError::config("API key contains characters not allowed in a header."))?;
        let name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
            .map_err(|e| ClientError::config(format!("Invalid header name: {e}")))?;
        headers.insert(name, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::config(format!("HTTP client init failed: {e}")))?;

        let base_url = base.as_str().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Futures client initialised");

        Ok(Self {
            http,
            base_url,
            credentials,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Release the connection pool.
    pub fn close(self) {}

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, endpoint)
    }

    /// Add `timestamp`, `recvWindow` and `signature`, reading the clock now.
    fn sign(&self, mut params: RequestParams) -> RequestParams {
        sign_params(
            &mut params,
            self.credentials.api_secret(),
            Utc::now().timestamp_millis(),
            self.config.recv_window_ms,
        );
        params
    }

    async fn signed_get(&self, endpoint: &str, params: RequestParams) -> Result<Value> {
        let params = self.sign(params);
        let url = format!("{}?{}", self.endpoint_url(endpoint), params.encode());
        debug!(
            endpoint = %endpoint,
            params = %params.encode_without(SIGNATURE_PARAM),
            "GET"
        );

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| network_error("GET", endpoint, e))?;
        read_response(response).await
    }

    async fn signed_post(&self, endpoint: &str, params: RequestParams) -> Result<Value> {
        let params = self.sign(params);
        debug!(
            endpoint = %endpoint,
            body = %params.encode_without(SIGNATURE_PARAM),
            "POST"
        );

        let response = self
            .http
            .post(self.endpoint_url(endpoint))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(params.encode())
            .send()
            .await
            .map_err(|e| network_error("POST", endpoint, e))?;
        read_response(response).await
    }
}

#[async_trait]
impl FuturesApi for FuturesClient {
    async fn account_info(&self) -> Result<Value> {
        info!("Fetching account info");
        self.signed_get("/account", RequestParams::new()).await
    }

    async fn exchange_info(&self) -> Result<Value> {
        info!("Fetching exchange info");
        let endpoint = "/exchangeInfo";
        let response = self
            .http
            .get(self.endpoint_url(endpoint))
            .send()
            .await
            .map_err(|e| network_error("GET", endpoint, e))?;
        read_response(response).await
    }

    async fn symbol_price(&self, symbol: &str) -> Result<Value> {
        info!(symbol = %symbol, "Fetching price");
        self.signed_get("/ticker/price", RequestParams::new().with("symbol", symbol))
            .await
    }

    async fn all_orders(&self, symbol: Option<&str>, limit: u32) -> Result<Value> {
        info!(symbol = ?symbol, limit, "Fetching orders");
        let mut params = RequestParams::new().with("limit", limit);
        if let Some(symbol) = symbol {
            params.insert("symbol", symbol);
        }
        self.signed_get("/allOrders", params).await
    }

    async fn place_order(&self, params: RequestParams) -> Result<Value> {
        info!(params = %params.encode(), "Placing order");
        self.signed_post("/order", params).await
    }
}

impl Drop for FuturesClient {
    fn drop(&mut self) {
        debug!("HTTP session closed");
    }
}

fn network_error(method: &str, endpoint: &str, cause: reqwest::Error) -> ClientError {
    error!(method, endpoint, timeout = cause.is_timeout(), error = %cause, "Network error");
    ClientError::Network { cause }
}

async fn read_response(response: Response) -> Result<Value> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    handle_response(status, &body)
}

/// Normalize an HTTP status and body into a success payload or an error.
///
/// An error status, or an object body whose `code` is anything but 200, is an
/// API error. The body is otherwise returned unchanged.
pub fn handle_response(status: u16, body: &str) -> Result<Value> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(_) => {
            let prefix: String = body.chars().take(MALFORMED_BODY_PREFIX).collect();
            error!(status, body = %prefix, "Non-JSON response");
            return Err(ClientError::MalformedResponse {
                status,
                body: prefix,
            });
        }
    };

    let embedded_code = data.as_object().and_then(|obj| obj.get("code"));
    let embedded_error = embedded_code.is_some_and(|code| code.as_i64() != Some(200));

    if status >= 400 || embedded_error {
        let code = embedded_code
            .and_then(|code| {
                code.as_i64()
                    .or_else(|| code.as_str().and_then(|s| s.trim().parse().ok()))
            })
            .unwrap_or(i64::from(status));
        let message = data
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        error!(code, message = %message, "API error");
        return Err(ClientError::Api { code, message });
    }

    debug!(response = %data, "Response");
    Ok(data)
}
