use chrono::Utc;
use futbot_brokers_crypto::{ClientConfig, ClientError, Credentials, FuturesClient};
use futbot_core::{field_text, number_field, OrderType};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

const MISSING: &str = "-";

/// Shared application state accessible by all route handlers.
pub struct AppState {
    config: ClientConfig,
    credentials: Option<Credentials>,
    /// Orders placed through this server, newest first. Lost on restart.
    history: RwLock<Vec<OrderRecord>>,
}

/// One row of the in-memory order history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub timestamp: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub qty: String,
    pub price: String,
    pub status: String,
}

impl OrderRecord {
    pub fn from_response(response: &Value, order_type: OrderType) -> Self {
        let text = |key: &str| field_text(response, key).unwrap_or_else(|| MISSING.to_string());
        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            order_id: text("orderId"),
            symbol: text("symbol"),
            side: text("side"),
            order_type: order_type.to_string(),
            qty: text("origQty"),
            price: history_price(response),
            status: text("status"),
        }
    }
}

/// Limit price when set, else the average fill price.
fn history_price(response: &Value) -> String {
    ["price", "avgPrice"]
        .into_iter()
        .find(|key| number_field(response, key) != 0.0)
        .or(Some("price"))
        .and_then(|key| field_text(response, key))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING.to_string())
}

impl AppState {
    pub fn new(config: ClientConfig, credentials: Option<Credentials>) -> Self {
        Self {
            config,
            credentials,
            history: RwLock::new(Vec::new()),
        }
    }

    /// A fresh client for one request. Fails when no credentials were
    /// configured at startup.
    pub fn client(&self) -> Result<FuturesClient, ClientError> {
        let credentials = self.credentials.clone().ok_or_else(|| {
            ClientError::config(
                "API credentials not configured. Set BINANCE_API_KEY and BINANCE_API_SECRET.",
            )
        })?;
        FuturesClient::with_config(credentials, self.config.clone())
    }

    pub async fn record_order(&self, response: &Value, order_type: OrderType) -> OrderRecord {
        let record = OrderRecord::from_response(response, order_type);
        self.history.write().await.insert(0, record.clone());
        record
    }

    /// Up to `limit` most recent orders.
    pub async fn recent_orders(&self, limit: usize) -> Vec<OrderRecord> {
        self.history.read().await.iter().take(limit).cloned().collect()
    }
}
