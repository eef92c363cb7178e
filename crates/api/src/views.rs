//! Server-rendered HTML pages.

use futbot_core::{
    display_price, field_text, format_order_response, AccountSummary, OrderType, Side, TimeInForce,
};
use serde_json::Value;

use crate::state::OrderRecord;

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Futures Bot</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; background: #10141b; color: #dfe4ea; }}
a {{ color: #f0b90b; }}
table {{ border-collapse: collapse; margin-bottom: 1.5rem; }}
th, td {{ border: 1px solid #2b3139; padding: 0.4rem 0.8rem; text-align: left; }}
.error {{ background: #5c1f24; padding: 0.8rem; margin-bottom: 1rem; }}
.muted {{ color: #848e9c; }}
label {{ display: block; margin-top: 0.6rem; }}
</style>
</head>
<body>
<nav><a href="/">Dashboard</a> | <a href="/order">Place Order</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|message| format!(r#"<div class="error">{}</div>"#, escape(message)))
        .unwrap_or_default()
}

fn cell(value: &Value, key: &str) -> String {
    escape(&field_text(value, key).unwrap_or_else(|| "-".to_string()))
}

fn table(headers: &[&str], rows: Vec<String>, empty: &str) -> String {
    if rows.is_empty() {
        return format!(r#"<p class="muted">{}</p>"#, escape(empty));
    }
    let head: String = headers.iter().map(|h| format!("<th>{h}</th>")).collect();
    format!("<table><tr>{head}</tr>{}</table>", rows.concat())
}

pub fn dashboard(
    account: Option<&AccountSummary>,
    error: Option<&str>,
    orders: &[OrderRecord],
    now: &str,
) -> String {
    let mut body = error_banner(error);
    body.push_str(&format!(r#"<p class="muted">Updated {}</p>"#, escape(now)));

    if let Some(account) = account {
        let assets = account
            .assets
            .iter()
            .map(|a| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    cell(a, "asset"),
                    cell(a, "walletBalance"),
                    cell(a, "availableBalance"),
                    cell(a, "unrealizedProfit"),
                )
            })
            .collect();
        body.push_str("<h2>Balances</h2>");
        body.push_str(&table(
            &["Asset", "Wallet Balance", "Available", "Unrealized PnL"],
            assets,
            "No funded assets.",
        ));

        let positions = account
            .positions
            .iter()
            .map(|p| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    cell(p, "symbol"),
                    cell(p, "positionAmt"),
                    cell(p, "entryPrice"),
                    cell(p, "unrealizedProfit"),
                )
            })
            .collect();
        body.push_str("<h2>Open Positions</h2>");
        body.push_str(&table(
            &["Symbol", "Amount", "Entry Price", "Unrealized PnL"],
            positions,
            "No open positions.",
        ));
    }

    let rows = orders
        .iter()
        .map(|o| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&o.timestamp),
                escape(&o.order_id),
                escape(&o.symbol),
                escape(&o.side),
                escape(&o.order_type),
                escape(&o.qty),
                escape(&o.price),
                escape(&o.status),
            )
        })
        .collect();
    body.push_str("<h2>Recent Orders</h2>");
    body.push_str(&table(
        &["Time", "Order ID", "Symbol", "Side", "Type", "Qty", "Price", "Status"],
        rows,
        "No orders placed yet.",
    ));

    layout("Dashboard", &body)
}

fn options(values: &[&str], selected: &str) -> String {
    values
        .iter()
        .map(|v| {
            let mark = if v.eq_ignore_ascii_case(selected) { " selected" } else { "" };
            format!(r#"<option value="{v}"{mark}>{v}</option>"#)
        })
        .collect()
}

/// Values to pre-fill the order form with when it is re-rendered.
#[derive(Debug, Default)]
pub struct FormValues<'a> {
    pub symbol: &'a str,
    pub side: &'a str,
    pub order_type: &'a str,
    pub quantity: &'a str,
    pub price: &'a str,
    pub stop_price: &'a str,
    pub time_in_force: &'a str,
}

pub fn order_form(values: &FormValues<'_>, error: Option<&str>) -> String {
    let sides: Vec<&str> = Side::ALL.iter().map(Side::as_str).collect();
    let types: Vec<&str> = OrderType::ALL.iter().map(OrderType::as_str).collect();
    let tifs: Vec<&str> = TimeInForce::ALL.iter().map(TimeInForce::as_str).collect();
    let tif = if values.time_in_force.is_empty() {
        TimeInForce::default().as_str()
    } else {
        values.time_in_force
    };

    let body = format!(
        r#"{banner}<form method="post" action="/order">
<label>Symbol <input name="symbol" value="{symbol}" placeholder="BTCUSDT"></label>
<label>Side <select name="side">{sides}</select></label>
<label>Type <select name="type">{types}</select></label>
<label>Quantity <input name="qty" value="{qty}"></label>
<label>Price (LIMIT) <input name="price" value="{price}"></label>
<label>Stop Price (STOP_MARKET) <input name="stop_price" value="{stop}"></label>
<label>Time In Force (LIMIT) <select name="tif">{tifs}</select></label>
<p><button type="submit">Place Order</button></p>
</form>"#,
        banner = error_banner(error),
        symbol = escape(values.symbol),
        sides = options(&sides, values.side),
        types = options(&types, values.order_type),
        qty = escape(values.quantity),
        price = escape(values.price),
        stop = escape(values.stop_price),
        tifs = options(&tifs, tif),
    );
    layout("Place Order", &body)
}

pub fn order_result(response: &Value, order_type: OrderType) -> String {
    let body = format!(
        r#"<p>{order_type} order accepted.</p>
<table>
<tr><th>Order ID</th><td>{id}</td></tr>
<tr><th>Symbol</th><td>{symbol}</td></tr>
<tr><th>Side</th><td>{side}</td></tr>
<tr><th>Status</th><td>{status}</td></tr>
<tr><th>Price</th><td>{price}</td></tr>
</table>
<pre>{summary}</pre>
<p><a href="/order">Place another order</a></p>"#,
        id = cell(response, "orderId"),
        symbol = cell(response, "symbol"),
        side = cell(response, "side"),
        status = cell(response, "status"),
        price = escape(&display_price(response)),
        summary = escape(&format_order_response(response)),
    );
    layout("Order Result", &body)
}
