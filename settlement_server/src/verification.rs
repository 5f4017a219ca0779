//! The payment verification gate.
//!
//! This is the sole authentication boundary protecting order creation from forged "payment succeeded" claims.
//! The gateway signs `orderId|paymentId` with the shared secret; we recompute the HMAC-SHA256 over the same string
//! and require a constant-time match. The check runs on every call; nothing about a previous verification is cached.

use hmac::{Hmac, Mac};
use log::warn;
use sha2::Sha256;

use crate::errors::ServerError;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(gateway_payment_id.as_bytes());
    mac
}

/// The hex-encoded signature the gateway is expected to supply for this order/payment pair.
pub fn gateway_signature(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> String {
    let digest = mac_for(secret, gateway_order_id, gateway_payment_id).finalize().into_bytes();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Verifies a gateway-supplied signature. Any defect (bad hex, wrong length, mismatch) is a hard
/// [`ServerError::InvalidSignature`]; the request must not proceed to settlement under any circumstance.
pub fn verify_gateway_signature(
    secret: &str,
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature: &str,
) -> Result<(), ServerError> {
    let supplied = decode_hex(signature).ok_or_else(|| {
        warn!("🔐️ Gateway signature for payment [{gateway_payment_id}] is not valid hex");
        ServerError::InvalidSignature
    })?;
    // verify_slice is a constant-time comparison
    mac_for(secret, gateway_order_id, gateway_payment_id).verify_slice(&supplied).map_err(|_| {
        warn!("🔐️ Invalid gateway signature for payment [{gateway_payment_id}]. Denying settlement.");
        ServerError::InvalidSignature
    })
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok()).collect()
}
