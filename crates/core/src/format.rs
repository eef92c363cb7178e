//! Human-readable rendering of exchange responses.

use serde::Serialize;
use serde_json::Value;

const NOT_AVAILABLE: &str = "N/A";

/// Read a response field as display text. Numbers and strings are rendered
/// verbatim, anything else is treated as missing.
pub fn field_text(response: &Value, key: &str) -> Option<String> {
    match response.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn field_or_na(response: &Value, key: &str) -> String {
    field_text(response, key).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Average fill price, falling back to the order price when the exchange
/// reports no fill yet (`avgPrice` missing, empty or zero).
pub fn display_price(response: &Value) -> String {
    match field_text(response, "avgPrice") {
        Some(avg) if !avg.is_empty() && avg != "0" && avg != "0.00000" => avg,
        _ => field_or_na(response, "price"),
    }
}

/// Box-drawn confirmation of a placed order.
pub fn format_order_response(response: &Value) -> String {
    let rows = [
        ("Order ID", field_or_na(response, "orderId")),
        ("Client ID", field_or_na(response, "clientOrderId")),
        ("Symbol", field_or_na(response, "symbol")),
        ("Side", field_or_na(response, "side")),
        ("Type", field_or_na(response, "type")),
        ("Time In Force", field_or_na(response, "timeInForce")),
        ("Qty Ordered", field_or_na(response, "origQty")),
        ("Qty Executed", field_or_na(response, "executedQty")),
        ("Avg Price", display_price(response)),
        ("Status", field_or_na(response, "status")),
    ];

    let mut lines = vec![
        String::new(),
        "  ┌──────────────────────────────────────────┐".to_string(),
        "  │            ORDER CONFIRMATION            │".to_string(),
        "  ├──────────────────────────────────────────┤".to_string(),
    ];
    for (label, value) in rows {
        lines.push(format!("  │  {label:<15}: {value:<23}│"));
    }
    lines.push("  └──────────────────────────────────────────┘".to_string());
    lines.push(String::new());
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Account summary
// ---------------------------------------------------------------------------

/// Balances and open positions extracted from an account snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountSummary {
    pub assets: Vec<Value>,
    pub positions: Vec<Value>,
}

impl AccountSummary {
    /// Keep assets with a positive wallet balance and positions with a
    /// non-zero amount.
    pub fn from_account(account: &Value) -> Self {
        Self::filtered(account, |asset| number_field(asset, "walletBalance") > 0.0)
    }

    /// Like [`AccountSummary::from_account`], but also keeps assets whose only
    /// activity is unrealized PnL.
    pub fn with_unrealized(account: &Value) -> Self {
        Self::filtered(account, |asset| {
            number_field(asset, "walletBalance") > 0.0
                || number_field(asset, "unrealizedProfit") != 0.0
        })
    }

    fn filtered(account: &Value, keep_asset: impl Fn(&Value) -> bool) -> Self {
        let list = |key: &str| {
            account
                .get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        Self {
            assets: list("assets").into_iter().filter(|a| keep_asset(a)).collect(),
            positions: list("positions")
                .into_iter()
                .filter(|p| number_field(p, "positionAmt") != 0.0)
                .collect(),
        }
    }
}

/// Numeric value of a field that the exchange may send as a string or a
/// number. Missing or unparsable values read as zero.
pub fn number_field(value: &Value, key: &str) -> f64 {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}
