//! Order placement: turns a validated [`OrderRequest`] into the exact
//! parameter set the exchange expects for its type, then submits it.

use futbot_core::{format_decimal, OrderRequest, Side, TimeInForce};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use crate::client::FuturesApi;
use crate::error::Result;
use crate::params::RequestParams;

/// Exchange parameters for an order.
///
/// - MARKET: symbol, side, type, quantity
/// - LIMIT: symbol, side, type, quantity, price, timeInForce
/// - STOP_MARKET: symbol, side, type, quantity, stopPrice
pub fn order_params(order: &OrderRequest) -> RequestParams {
    let params = RequestParams::new()
        .with("symbol", order.symbol())
        .with("side", order.side())
        .with("type", order.order_type())
        .with("quantity", format_decimal(order.quantity()));

    match order {
        OrderRequest::Market { .. } => params,
        OrderRequest::Limit {
            price,
            time_in_force,
            ..
        } => params
            .with("price", format_decimal(*price))
            .with("timeInForce", time_in_force),
        OrderRequest::StopMarket { stop_price, .. } => {
            params.with("stopPrice", format_decimal(*stop_price))
        }
    }
}

/// Submit any order type. The exchange response is returned unmodified.
pub async fn place_order<A>(api: &A, order: &OrderRequest) -> Result<Value>
where
    A: FuturesApi + ?Sized,
{
    info!(
        symbol = %order.symbol(),
        side = %order.side(),
        order_type = %order.order_type(),
        quantity = %order.quantity(),
        price = ?order.price(),
        stop_price = ?order.stop_price(),
        time_in_force = ?order.time_in_force(),
        "Order request"
    );

    let response = api.place_order(order_params(order)).await?;

    let order_id = response.get("orderId").cloned().unwrap_or_default();
    let status = response.get("status").cloned().unwrap_or_default();
    info!(
        order_type = %order.order_type(),
        order_id = %order_id,
        status = %status,
        "Order placed"
    );
    Ok(response)
}

pub async fn place_market_order<A>(api: &A, symbol: &str, side: Side, quantity: Decimal) -> Result<Value>
where
    A: FuturesApi + ?Sized,
{
    place_order(api, &OrderRequest::market(symbol, side, quantity)).await
}

/// `time_in_force` defaults to GTC.
pub async fn place_limit_order<A>(
    api: &A,
    symbol: &str,
    side: Side,
    quantity: Decimal,
    price: Decimal,
    time_in_force: Option<TimeInForce>,
) -> Result<Value>
where
    A: FuturesApi + ?Sized,
{
    place_order(
        api,
        &OrderRequest::limit(symbol, side, quantity, price, time_in_force),
    )
    .await
}

pub async fn place_stop_market_order<A>(
    api: &A,
    symbol: &str,
    side: Side,
    quantity: Decimal,
    stop_price: Decimal,
) -> Result<Value>
where
    A: FuturesApi + ?Sized,
{
    place_order(
        api,
        &OrderRequest::stop_market(symbol, side, quantity, stop_price),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records submitted parameter sets and answers with a canned response.
    struct RecordingApi {
        response: std::result::Result<Value, (i64, &'static str)>,
        calls: Mutex<Vec<RequestParams>>,
    }

    impl RecordingApi {
        fn ok(response: Value) -> Self {
            Self {
                response: Ok(response),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(code: i64, message: &'static str) -> Self {
            Self {
                response: Err((code, message)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn last_call(&self) -> RequestParams {
            self.calls.lock().unwrap().last().cloned().expect("no call recorded")
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl FuturesApi for RecordingApi {
        async fn account_info(&self) -> Result<Value> {
            unimplemented!()
        }

        async fn exchange_info(&self) -> Result<Value> {
            unimplemented!()
        }

        async fn symbol_price(&self, _symbol: &str) -> Result<Value> {
            unimplemented!()
        }

        async fn all_orders(&self, _symbol: Option<&str>, _limit: u32) -> Result<Value> {
            unimplemented!()
        }

        async fn place_order(&self, params: RequestParams) -> Result<Value> {
            self.calls.lock().unwrap().push(params);
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err((code, message)) => Err(ClientError::Api {
                    code: *code,
                    message: message.to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_market_params() {
        let params = order_params(&OrderRequest::market("BTCUSDT", Side::Buy, dec!(0.01)));
        assert_eq!(params.encode(), "symbol=BTCUSDT&side=BUY&type=MARKET&quantity=0.01");
        assert!(!params.contains("price"));
        assert!(!params.contains("stopPrice"));
        assert!(!params.contains("timeInForce"));
    }

    #[test]
    fn test_limit_params_default_gtc() {
        let params = order_params(&OrderRequest::limit(
            "BTCUSDT",
            Side::Sell,
            dec!(0.01),
            dec!(98000),
            None,
        ));
        assert_eq!(
            params.encode(),
            "symbol=BTCUSDT&side=SELL&type=LIMIT&quantity=0.01&price=98000&timeInForce=GTC"
        );
        assert!(!params.contains("stopPrice"));
    }

    #[test]
    fn test_stop_market_params_have_no_price() {
        let params = order_params(&OrderRequest::stop_market(
            "BTCUSDT",
            Side::Sell,
            dec!(0.01),
            dec!(83000),
        ));
        assert_eq!(params.get("type"), Some("STOP_MARKET"));
        assert_eq!(params.get("stopPrice"), Some("83000"));
        assert!(!params.contains("price"));
        assert!(!params.contains("timeInForce"));
    }

    #[test]
    fn test_small_quantity_is_plain_decimal() {
        let params = order_params(&OrderRequest::market("ETHUSDT", Side::Sell, dec!(0.001)));
        let qty = params.get("quantity").unwrap();
        assert_eq!(qty, "0.001");
        assert!(!qty.contains('E') && !qty.contains('e'));
    }

    #[tokio::test]
    async fn test_place_market_order_returns_response() {
        let api = RecordingApi::ok(json!({ "orderId": 3851920147_u64, "status": "FILLED" }));
        let result = place_market_order(&api, "BTCUSDT", Side::Buy, dec!(0.01))
            .await
            .unwrap();
        assert_eq!(result["orderId"], 3851920147_u64);
        assert_eq!(result["status"], "FILLED");
        assert_eq!(api.call_count(), 1);
        assert_eq!(api.last_call().get("quantity"), Some("0.01"));
    }

    #[tokio::test]
    async fn test_place_limit_order_custom_tif() {
        let api = RecordingApi::ok(json!({ "status": "NEW" }));
        place_limit_order(
            &api,
            "BTCUSDT",
            Side::Buy,
            dec!(0.01),
            dec!(90000),
            Some(TimeInForce::Ioc),
        )
        .await
        .unwrap();
        let params = api.last_call();
        assert_eq!(params.get("timeInForce"), Some("IOC"));
        assert_eq!(params.get("price"), Some("90000"));
    }

    #[tokio::test]
    async fn test_place_stop_market_order() {
        let api = RecordingApi::ok(json!({ "type": "STOP_MARKET" }));
        let result = place_stop_market_order(&api, "BTCUSDT", Side::Sell, dec!(0.01), dec!(83000))
            .await
            .unwrap();
        assert_eq!(result["type"], "STOP_MARKET");
        assert!(!api.last_call().contains("price"));
    }

    #[tokio::test]
    async fn test_api_error_propagates_without_retry() {
        let api = RecordingApi::rejecting(-2019, "Margin is insufficient.");
        let err = place_market_order(&api, "BTCUSDT", Side::Buy, dec!(100))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(-2019));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_place_order_through_trait_object() {
        let api: Box<dyn FuturesApi> = Box::new(RecordingApi::ok(json!({ "orderId": 1 })));
        let order = OrderRequest::market("BTCUSDT", Side::Buy, dec!(1));
        let result = place_order(api.as_ref(), &order).await.unwrap();
        assert_eq!(result["orderId"], 1);
    }
}
