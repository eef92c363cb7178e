//! Input validation for order parameters.
//!
//! Every validator is pure: it canonicalizes a raw value into a typed one or
//! returns a [`ValidationError`] with a human-readable reason.

use crate::models::{OrderRequest, OrderType, RawOrderInput, Side, TimeInForce};
use rust_decimal::Decimal;
use std::str::FromStr;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the offending input field (e.g. `"quantity"`).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every failure found during a full pre-flight check of an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the error reported for a given field, if any.
    pub fn field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        ValidationErrors(vec![err])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Raw decimal input
// ---------------------------------------------------------------------------

/// A raw numeric input: either text typed by a user or an already-numeric value.
pub trait DecimalInput {
    /// Parse into a decimal, `None` when the value is not a number.
    fn parse_decimal(&self) -> Option<Decimal>;

    /// The value as the user supplied it, for error messages.
    fn raw_text(&self) -> String;

    fn is_blank(&self) -> bool {
        false
    }
}

impl DecimalInput for &str {
    fn parse_decimal(&self) -> Option<Decimal> {
        let text = self.trim();
        if text.is_empty() {
            return None;
        }
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
    }

    fn raw_text(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl DecimalInput for String {
    fn parse_decimal(&self) -> Option<Decimal> {
        self.as_str().parse_decimal()
    }

    fn raw_text(&self) -> String {
        self.clone()
    }

    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl DecimalInput for &String {
    fn parse_decimal(&self) -> Option<Decimal> {
        self.as_str().parse_decimal()
    }

    fn raw_text(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl DecimalInput for Decimal {
    fn parse_decimal(&self) -> Option<Decimal> {
        Some(*self)
    }

    fn raw_text(&self) -> String {
        self.to_string()
    }
}

impl DecimalInput for f64 {
    fn parse_decimal(&self) -> Option<Decimal> {
        Decimal::try_from(*self).ok()
    }

    fn raw_text(&self) -> String {
        self.to_string()
    }
}

impl DecimalInput for i64 {
    fn parse_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }

    fn raw_text(&self) -> String {
        self.to_string()
    }
}

impl DecimalInput for u64 {
    fn parse_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }

    fn raw_text(&self) -> String {
        self.to_string()
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Return the uppercased trading pair. Exchange symbols are letters only.
pub fn validate_symbol(symbol: &str) -> Result<String, ValidationError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ValidationError::new("symbol", "Symbol cannot be empty."));
    }
    if !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new(
            "symbol",
            format!("Symbol '{symbol}' must contain only alphabetic characters (e.g. BTCUSDT)."),
        ));
    }
    Ok(symbol)
}

pub fn validate_side(side: &str) -> Result<Side, ValidationError> {
    let side = side.trim().to_uppercase();
    Side::ALL
        .into_iter()
        .find(|s| s.as_str() == side)
        .ok_or_else(|| {
            ValidationError::new(
                "side",
                format!("Side '{side}' is not valid. Choose from: {}.", choices(&Side::ALL.map(|s| s.as_str()))),
            )
        })
}

pub fn validate_order_type(order_type: &str) -> Result<OrderType, ValidationError> {
    let order_type = order_type.trim().to_uppercase();
    OrderType::ALL
        .into_iter()
        .find(|t| t.as_str() == order_type)
        .ok_or_else(|| {
            ValidationError::new(
                "type",
                format!(
                    "Order type '{order_type}' is not valid. Choose from: {}.",
                    choices(&OrderType::ALL.map(|t| t.as_str()))
                ),
            )
        })
}

/// Absent or blank input means GTC.
pub fn validate_time_in_force(time_in_force: Option<&str>) -> Result<TimeInForce, ValidationError> {
    let tif = match time_in_force.map(str::trim) {
        None | Some("") => return Ok(TimeInForce::default()),
        Some(t) => t.to_uppercase(),
    };
    TimeInForce::ALL
        .into_iter()
        .find(|t| t.as_str() == tif)
        .ok_or_else(|| {
            ValidationError::new(
                "time_in_force",
                format!(
                    "Time in force '{tif}' is not valid. Choose from: {}.",
                    choices(&TimeInForce::ALL.map(|t| t.as_str()))
                ),
            )
        })
}

/// Parse the order quantity into a positive decimal.
pub fn validate_quantity<T: DecimalInput>(quantity: T) -> Result<Decimal, ValidationError> {
    positive_decimal("quantity", "Quantity", &quantity)
}

/// Only LIMIT orders carry a limit price; every other type yields `None`
/// whatever was supplied.
pub fn validate_price<T: DecimalInput>(
    price: Option<T>,
    order_type: OrderType,
) -> Result<Option<Decimal>, ValidationError> {
    if order_type != OrderType::Limit {
        return Ok(None);
    }
    match price {
        Some(p) if !p.is_blank() => positive_decimal("price", "Price", &p).map(Some),
        _ => Err(ValidationError::new(
            "price",
            "A price is required for LIMIT orders.",
        )),
    }
}

/// Trigger price for STOP_MARKET orders; `None` for every other type.
pub fn validate_stop_price<T: DecimalInput>(
    stop_price: Option<T>,
    order_type: OrderType,
) -> Result<Option<Decimal>, ValidationError> {
    if order_type != OrderType::StopMarket {
        return Ok(None);
    }
    match stop_price {
        Some(p) if !p.is_blank() => positive_decimal("stop_price", "Stop price", &p).map(Some),
        _ => Err(ValidationError::new(
            "stop_price",
            "A stop price is required for STOP_MARKET orders.",
        )),
    }
}

/// Run every validator over a raw order and collect all failures before
/// building the typed request.
pub fn validate_order(raw: &RawOrderInput) -> Result<OrderRequest, ValidationErrors> {
    let mut errors = Vec::new();

    let symbol = validate_symbol(&raw.symbol).map_err(|e| errors.push(e)).ok();
    let side = validate_side(&raw.side).map_err(|e| errors.push(e)).ok();
    let order_type = validate_order_type(&raw.order_type)
        .map_err(|e| errors.push(e))
        .ok();
    let quantity = validate_quantity(raw.quantity.as_str())
        .map_err(|e| errors.push(e))
        .ok();

    // Price checks depend on a known order type.
    let (price, stop_price) = match order_type {
        Some(t) => (
            validate_price(raw.price.as_deref(), t)
                .map_err(|e| errors.push(e))
                .ok()
                .flatten(),
            validate_stop_price(raw.stop_price.as_deref(), t)
                .map_err(|e| errors.push(e))
                .ok()
                .flatten(),
        ),
        None => (None, None),
    };
    let time_in_force = match order_type {
        Some(OrderType::Limit) => validate_time_in_force(raw.time_in_force.as_deref())
            .map_err(|e| errors.push(e))
            .ok(),
        _ => None,
    };

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    match (symbol, side, order_type, quantity) {
        (Some(symbol), Some(side), Some(order_type), Some(quantity)) => match order_type {
            OrderType::Market => Ok(OrderRequest::market(&symbol, side, quantity)),
            OrderType::Limit => match price {
                Some(price) => Ok(OrderRequest::limit(&symbol, side, quantity, price, time_in_force)),
                None => Err(ValidationError::new("price", "A price is required for LIMIT orders.").into()),
            },
            OrderType::StopMarket => match stop_price {
                Some(stop_price) => Ok(OrderRequest::stop_market(&symbol, side, quantity, stop_price)),
                None => Err(ValidationError::new(
                    "stop_price",
                    "A stop price is required for STOP_MARKET orders.",
                )
                .into()),
            },
        },
        _ => Err(ValidationErrors(Vec::new())),
    }
}

fn positive_decimal<T: DecimalInput>(
    field: &'static str,
    label: &str,
    value: &T,
) -> Result<Decimal, ValidationError> {
    let parsed = value.parse_decimal().ok_or_else(|| {
        ValidationError::new(
            field,
            format!("{label} '{}' is not a valid number.", value.raw_text()),
        )
    })?;
    if parsed <= Decimal::ZERO {
        return Err(ValidationError::new(
            field,
            format!("{label} must be greater than zero (got {parsed})."),
        ));
    }
    Ok(parsed)
}

fn choices(values: &[&str]) -> String {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbol_uppercased_and_trimmed() {
        assert_eq!(validate_symbol("btcusdt").unwrap(), "BTCUSDT");
        assert_eq!(validate_symbol("  ETHUSDT  ").unwrap(), "ETHUSDT");
    }

    #[test]
    fn test_symbol_rejects_empty_and_non_alpha() {
        let err = validate_symbol("   ").unwrap_err();
        assert!(err.message.contains("cannot be empty"));
        let err = validate_symbol("BTC/USDT").unwrap_err();
        assert!(err.message.contains("alphabetic"));
        assert!(validate_symbol("BTC123").is_err());
    }

    #[test]
    fn test_side_and_type() {
        assert_eq!(validate_side(" buy ").unwrap(), Side::Buy);
        assert_eq!(validate_side("SELL").unwrap(), Side::Sell);
        let err = validate_side("LONG").unwrap_err();
        assert_eq!(err.message, "Side 'LONG' is not valid. Choose from: BUY, SELL.");

        assert_eq!(validate_order_type("stop_market").unwrap(), OrderType::StopMarket);
        let err = validate_order_type("STOP").unwrap_err();
        assert!(err.message.contains("LIMIT, MARKET, STOP_MARKET"));
    }

    #[test]
    fn test_quantity_accepts_strings_and_numbers() {
        let qty = validate_quantity("0.001").unwrap();
        assert_eq!(qty, dec!(0.001));
        assert_eq!(qty.to_string(), "0.001");
        assert_eq!(validate_quantity("1e-3").unwrap(), dec!(0.001));
        assert_eq!(validate_quantity(0.5_f64).unwrap(), dec!(0.5));
        assert_eq!(validate_quantity(3_i64).unwrap(), dec!(3));
        assert_eq!(validate_quantity(dec!(2.25)).unwrap(), dec!(2.25));
    }

    #[test]
    fn test_quantity_rejects_zero_negative_and_garbage() {
        let err = validate_quantity("0").unwrap_err();
        assert!(err.message.contains("must be greater than zero"));
        let err = validate_quantity(-1_i64).unwrap_err();
        assert!(err.message.contains("must be greater than zero"));
        let err = validate_quantity("abc").unwrap_err();
        assert!(err.message.contains("not a valid number"));
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity("").is_err());
    }

    #[test]
    fn test_price_only_for_limit() {
        assert_eq!(validate_price(Some("98000"), OrderType::Market).unwrap(), None);
        assert_eq!(validate_price(Some("-5"), OrderType::StopMarket).unwrap(), None);
        assert_eq!(validate_price(None::<&str>, OrderType::Market).unwrap(), None);
        assert_eq!(
            validate_price(Some("98000"), OrderType::Limit).unwrap(),
            Some(dec!(98000))
        );
    }

    #[test]
    fn test_limit_price_required_and_positive() {
        let err = validate_price(None::<&str>, OrderType::Limit).unwrap_err();
        assert!(err.message.contains("required"));
        let err = validate_price(Some("  "), OrderType::Limit).unwrap_err();
        assert!(err.message.contains("required"));
        let err = validate_price(Some("0"), OrderType::Limit).unwrap_err();
        assert!(err.message.contains("greater than zero"));
        let err = validate_price(Some("ninety"), OrderType::Limit).unwrap_err();
        assert!(err.message.contains("not a valid number"));
    }

    #[test]
    fn test_stop_price_gated_on_stop_market() {
        assert_eq!(validate_stop_price(Some("83000"), OrderType::Limit).unwrap(), None);
        assert_eq!(
            validate_stop_price(Some(83000.0_f64), OrderType::StopMarket).unwrap(),
            Some(dec!(83000))
        );
        let err = validate_stop_price(None::<&str>, OrderType::StopMarket).unwrap_err();
        assert_eq!(err.field, "stop_price");
        assert!(validate_stop_price(Some("-1"), OrderType::StopMarket).is_err());
    }

    #[test]
    fn test_time_in_force() {
        assert_eq!(validate_time_in_force(None).unwrap(), TimeInForce::Gtc);
        assert_eq!(validate_time_in_force(Some("")).unwrap(), TimeInForce::Gtc);
        assert_eq!(validate_time_in_force(Some("ioc")).unwrap(), TimeInForce::Ioc);
        assert!(validate_time_in_force(Some("DAY")).is_err());
    }

    #[test]
    fn test_validate_order_builds_variant() {
        let raw = RawOrderInput {
            symbol: "btcusdt".into(),
            side: "sell".into(),
            order_type: "limit".into(),
            quantity: "0.01".into(),
            price: Some("98000".into()),
            stop_price: Some("1".into()),
            time_in_force: None,
        };
        let order = validate_order(&raw).unwrap();
        assert_eq!(
            order,
            OrderRequest::limit("BTCUSDT", Side::Sell, dec!(0.01), dec!(98000), None)
        );
    }

    #[test]
    fn test_validate_order_reports_every_error_at_once() {
        let raw = RawOrderInput {
            symbol: "BTC-USDT".into(),
            side: "LONG".into(),
            order_type: "STOP_MARKET".into(),
            quantity: "0".into(),
            price: None,
            stop_price: None,
            time_in_force: None,
        };
        let errors = validate_order(&raw).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.field("symbol").is_some());
        assert!(errors.field("side").is_some());
        assert!(errors.field("quantity").is_some());
        assert!(errors.field("stop_price").is_some());
        assert!(errors.field("price").is_none());
    }

    #[test]
    fn test_validate_order_skips_price_checks_for_unknown_type() {
        let raw = RawOrderInput {
            symbol: "BTCUSDT".into(),
            side: "BUY".into(),
            order_type: "TRAILING".into(),
            quantity: "1".into(),
            ..Default::default()
        };
        let errors = validate_order(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.0[0].field, "type");
    }
}
