use crate::params::RequestParams;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PARAM: &str = "signature";
pub const TIMESTAMP_PARAM: &str = "timestamp";
pub const RECV_WINDOW_PARAM: &str = "recvWindow";

/// HMAC-SHA256 over the encoded parameters (the `signature` field itself is
/// never part of its own input), as 64 lowercase hex characters.
pub fn sign(params: &RequestParams, secret: &str) -> String {
    sign_payload(&params.encode_without(SIGNATURE_PARAM), secret)
}

pub fn sign_payload(payload: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Append `timestamp`, `recvWindow` and finally `signature`.
pub fn sign_params(
    params: &mut RequestParams,
    secret: &str,
    timestamp_ms: i64,
    recv_window_ms: u64,
) {
    params.remove(SIGNATURE_PARAM);
    params.insert(TIMESTAMP_PARAM, timestamp_ms);
    params.insert(RECV_WINDOW_PARAM, recv_window_ms);
    let signature = sign(params, secret);
    params.insert(SIGNATURE_PARAM, signature);
}
