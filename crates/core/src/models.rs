use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Buy, Side::Sell];

    /// Wire representation used by the exchange.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// The type of order. Only the types this bot can submit are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [OrderType::Market, OrderType::Limit, OrderType::StopMarket];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopMarket => "STOP_MARKET",
        }
    }
}

/// Order lifetime policy for LIMIT orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good-til-cancelled.
    #[default]
    Gtc,
    /// Immediate-or-cancel.
    Ioc,
    /// Fill-or-kill.
    Fok,
}

impl TimeInForce {
    pub const ALL: [TimeInForce; 3] = [TimeInForce::Gtc, TimeInForce::Ioc, TimeInForce::Fok];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Side, OrderType, TimeInForce);

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// A fully validated order, ready to be turned into exchange parameters.
///
/// Each variant carries exactly the fields its order type needs, so a LIMIT
/// price can never travel with a STOP_MARKET order and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderRequest {
    Market {
        symbol: String,
        side: Side,
        quantity: Decimal,
    },
    Limit {
        symbol: String,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        #[serde(default)]
        time_in_force: TimeInForce,
    },
    StopMarket {
        symbol: String,
        side: Side,
        quantity: Decimal,
        stop_price: Decimal,
    },
}

impl OrderRequest {
    /// Create a new market order.
    pub fn market(symbol: &str, side: Side, quantity: Decimal) -> Self {
        OrderRequest::Market {
            symbol: symbol.to_string(),
            side,
            quantity,
        }
    }

    /// Create a new limit order. `time_in_force` falls back to GTC.
    pub fn limit(
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
    ) -> Self {
        OrderRequest::Limit {
            symbol: symbol.to_string(),
            side,
            quantity,
            price,
            time_in_force: time_in_force.unwrap_or_default(),
        }
    }

    /// Create a new stop-market order.
    pub fn stop_market(symbol: &str, side: Side, quantity: Decimal, stop_price: Decimal) -> Self {
        OrderRequest::StopMarket {
            symbol: symbol.to_string(),
            side,
            quantity,
            stop_price,
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self {
            OrderRequest::Market { .. } => OrderType::Market,
            OrderRequest::Limit { .. } => OrderType::Limit,
            OrderRequest::StopMarket { .. } => OrderType::StopMarket,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            OrderRequest::Market { symbol, .. }
            | OrderRequest::Limit { symbol, .. }
            | OrderRequest::StopMarket { symbol, .. } => symbol,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            OrderRequest::Market { side, .. }
            | OrderRequest::Limit { side, .. }
            | OrderRequest::StopMarket { side, .. } => *side,
        }
    }

    pub fn quantity(&self) -> Decimal {
        match self {
            OrderRequest::Market { quantity, .. }
            | OrderRequest::Limit { quantity, .. }
            | OrderRequest::StopMarket { quantity, .. } => *quantity,
        }
    }

    /// Limit price, only present on LIMIT orders.
    pub fn price(&self) -> Option<Decimal> {
        match self {
            OrderRequest::Limit { price, .. } => Some(*price),
            _ => None,
        }
    }

    /// Trigger price, only present on STOP_MARKET orders.
    pub fn stop_price(&self) -> Option<Decimal> {
        match self {
            OrderRequest::StopMarket { stop_price, .. } => Some(*stop_price),
            _ => None,
        }
    }

    pub fn time_in_force(&self) -> Option<TimeInForce> {
        match self {
            OrderRequest::Limit { time_in_force, .. } => Some(*time_in_force),
            _ => None,
        }
    }
}

/// Unvalidated order input as typed by a user on the command line or in the
/// web form. Missing fields deserialize as blank and are left to the
/// validators to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOrderInput {
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(alias = "qty")]
    pub quantity: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub stop_price: Option<String>,
    #[serde(default, alias = "tif")]
    pub time_in_force: Option<String>,
}

/// Render a decimal as a plain fixed-point string (never scientific notation).
pub fn format_decimal(value: Decimal) -> String {
    value.to_string()
}
