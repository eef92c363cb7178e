mod common;

use std::time::Duration;

use common::{client_for, client_with_timeout, setup_mock_server, split_signature, API_KEY, API_SECRET};
use futbot_brokers_crypto::signing::sign_payload;
use futbot_brokers_crypto::{place_stop_market_order, ClientError, FuturesApi};
use futbot_core::Side;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_signed_get_sends_key_and_valid_signature() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v1/ticker/price"))
        .and(header("X-MBX-APIKEY", API_KEY))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("recvWindow", "5000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "symbol": "BTCUSDT", "price": "97000.50" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let price = client.symbol_price("BTCUSDT").await.unwrap();
    assert_eq!(price["price"], "97000.50");

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap().to_string();
    assert!(query.starts_with("symbol=BTCUSDT&timestamp="));

    let (payload, signature) = split_signature(&query);
    assert!(payload.contains("&recvWindow=5000"));
    assert_eq!(signature, sign_payload(&payload, API_SECRET));
}

#[tokio::test]
async fn test_stop_market_order_posts_signed_form_body() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .and(header("X-MBX-APIKEY", API_KEY))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("symbol=BTCUSDT"))
        .and(body_string_contains("stopPrice=83000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": 4001,
            "symbol": "BTCUSDT",
            "status": "NEW",
            "type": "STOP_MARKET"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = place_stop_market_order(&client, "BTCUSDT", Side::Sell, dec!(0.01), dec!(83000))
        .await
        .unwrap();
    assert_eq!(result["orderId"], 4001);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());

    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.starts_with("symbol=BTCUSDT&side=SELL&type=STOP_MARKET&quantity=0.01&stopPrice=83000"));
    assert!(!body.contains("&price="));

    let (payload, signature) = split_signature(&body);
    assert_eq!(signature, sign_payload(&payload, API_SECRET));
}

#[tokio::test]
async fn test_error_status_maps_to_api_error() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v1/account"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "code": -1102, "msg": "Mandatory parameter missing." })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.account_info().await.unwrap_err();
    match &err {
        ClientError::Api { code, message } => {
            assert_eq!(*code, -1102);
            assert_eq!(message, "Mandatory parameter missing.");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "[Binance Error -1102] Mandatory parameter missing."
    );
}

#[tokio::test]
async fn test_embedded_error_code_on_success_status() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": -2019, "msg": "Margin is insufficient." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = futbot_brokers_crypto::place_market_order(&client, "BTCUSDT", Side::Buy, dec!(100))
        .await
        .unwrap_err();
    assert!(err.is_api());
    assert_eq!(err.code(), Some(-2019));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v1/account"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.account_info().await.unwrap_err() {
        ClientError::MalformedResponse { status, body } => {
            assert_eq!(status, 502);
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("Expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = client_with_timeout("http://127.0.0.1:1", 2);
    let err = client.account_info().await.unwrap_err();
    assert!(err.is_network());
    assert!(!err.is_api());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v1/account"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "assets": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client_with_timeout(&server.uri(), 1);
    let err = client.account_info().await.unwrap_err();
    assert!(err.is_network());
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_exchange_info_is_unsigned() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v1/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "UTC",
            "symbols": [{ "symbol": "BTCUSDT" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let info = client.exchange_info().await.unwrap();
    assert_eq!(info["symbols"][0]["symbol"], "BTCUSDT");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_all_orders_sends_limit_and_symbol() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v1/allOrders"))
        .and(query_param("limit", "20"))
        .and(query_param("symbol", "ETHUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "orderId": 1, "symbol": "ETHUSDT", "status": "FILLED" },
            { "orderId": 2, "symbol": "ETHUSDT", "status": "NEW" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let orders = client.all_orders(Some("ETHUSDT"), 20).await.unwrap();
    assert_eq!(orders.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_all_orders_without_symbol() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v1/allOrders"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.all_orders(None, 5).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap();
    assert!(!query.contains("symbol="));
}
