//! Shared fixtures for the futures client tests.

use futbot_brokers_crypto::{ClientConfig, Credentials, FuturesClient};
use wiremock::MockServer;

pub const API_KEY: &str = "test_api_key_abc123";
pub const API_SECRET: &str = "test_api_secret_xyz789";

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server with a short timeout.
pub fn client_for(server: &MockServer) -> FuturesClient {
    client_with_timeout(&server.uri(), 2)
}

pub fn client_with_timeout(base_url: &str, request_timeout_s: u64) -> FuturesClient {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        request_timeout_s,
        ..Default::default()
    };
    let credentials = Credentials::new(API_KEY, API_SECRET).expect("credentials");
    FuturesClient::with_config(credentials, config).expect("client init")
}

/// Split an encoded parameter string into `(payload, signature)`.
pub fn split_signature(encoded: &str) -> (String, String) {
    let (payload, signature) = encoded
        .rsplit_once("&signature=")
        .expect("signature must be the last parameter");
    (payload.to_string(), signature.to_string())
}
