//! Terminal rendering for command results.

use futbot_core::{display_price, field_text, number_field, AccountSummary, OrderRequest};
use serde_json::Value;

const RULE: &str = "  ─────────────────────────────────────────────";

pub const BANNER: &str = r"
  ╔══════════════════════════════════════════════════════╗
  ║        Binance Futures Testnet | Trading Bot         ║
  ║               USDT-M Perpetual Futures               ║
  ╚══════════════════════════════════════════════════════╝
";

fn text(value: &Value, key: &str) -> String {
    field_text(value, key).unwrap_or_else(|| "-".to_string())
}

/// What is about to be sent, printed before submission.
pub fn request_summary(order: &OrderRequest) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "  ORDER REQUEST SUMMARY".to_string(),
        RULE.to_string(),
        format!("  Symbol     : {}", order.symbol()),
        format!("  Side       : {}", order.side()),
        format!("  Order Type : {}", order.order_type()),
        format!("  Quantity   : {}", order.quantity()),
    ];
    if let Some(price) = order.price() {
        lines.push(format!("  Price      : {price}"));
    }
    if let Some(tif) = order.time_in_force() {
        lines.push(format!("  TIF        : {tif}"));
    }
    if let Some(stop_price) = order.stop_price() {
        lines.push(format!("  Stop Price : {stop_price}"));
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

pub fn account_report(account: &Value) -> String {
    let summary = AccountSummary::with_unrealized(account);
    let mut lines = vec!["  ── Account Balances ───────────────────────────────".to_string()];
    for asset in &summary.assets {
        lines.push(format!(
            "  {:<8} Wallet: {:>12.4}   Unrealised PnL: {:>12.4}",
            text(asset, "asset"),
            number_field(asset, "walletBalance"),
            number_field(asset, "unrealizedProfit"),
        ));
    }

    if summary.positions.is_empty() {
        lines.push(String::new());
        lines.push("  No open positions.".to_string());
    } else {
        lines.push(String::new());
        lines.push("  ── Open Positions ─────────────────────────────────".to_string());
        for position in &summary.positions {
            lines.push(format!(
                "  {:<12} Amt: {:>10}   Entry: {:>12}   PnL: {:>12}",
                text(position, "symbol"),
                text(position, "positionAmt"),
                text(position, "entryPrice"),
                text(position, "unrealizedProfit"),
            ));
        }
    }
    lines.join("\n")
}

pub fn orders_report(orders: &Value) -> String {
    let orders = orders.as_array().map(Vec::as_slice).unwrap_or_default();
    if orders.is_empty() {
        return "  No orders found.".to_string();
    }
    let mut lines = vec![format!(
        "  {:<14} {:<10} {:<5} {:<12} {:>10} {:>12}  {}",
        "ORDER ID", "SYMBOL", "SIDE", "TYPE", "QTY", "PRICE", "STATUS"
    )];
    for order in orders {
        lines.push(format!(
            "  {:<14} {:<10} {:<5} {:<12} {:>10} {:>12}  {}",
            text(order, "orderId"),
            text(order, "symbol"),
            text(order, "side"),
            text(order, "type"),
            text(order, "origQty"),
            display_price(order),
            text(order, "status"),
        ));
    }
    lines.join("\n")
}

pub fn exchange_report(info: &Value) -> String {
    let symbols = info
        .get("symbols")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let mut lines = vec![format!(
        "  Timezone: {}   Symbols: {}",
        text(info, "timezone"),
        symbols.len()
    )];
    for symbol in symbols {
        lines.push(format!(
            "  {:<16} {:<10} {}",
            text(symbol, "symbol"),
            text(symbol, "status"),
            text(symbol, "contractType"),
        ));
    }
    lines.join("\n")
}
