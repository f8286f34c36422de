pub mod events;
pub mod health;
pub mod identity;
pub mod signed;

use crate::error::ApiError;
use erc1056_crypto::EcdsaSignature;
use erc1056_registry::{Address, Bytes32};

/// Parse a path or body address (`0x` prefix optional)
pub fn parse_address(value: &str) -> Result<Address, ApiError> {
    value
        .parse()
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid address {}: {}", value, e)))
}

/// Parse a delegate type or attribute name
///
/// Accepts a `0x`-prefixed 32-byte hex word or short text such as `sigAuth`.
pub fn parse_tag(value: &str) -> Result<Bytes32, ApiError> {
    if value.starts_with("0x") {
        return value
            .parse()
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid bytes32 {}: {}", value, e)));
    }
    Bytes32::from_short_str(value)
        .ok_or_else(|| ApiError::InvalidRequest(format!("Tag longer than 32 bytes: {}", value)))
}

/// Parse hex attribute bytes (`0x` prefix optional)
pub fn parse_value(value: &str) -> Result<Vec<u8>, ApiError> {
    let hex_part = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(hex_part)
        .map_err(|_| ApiError::InvalidRequest("Invalid hex encoding".to_string()))
}

/// Parse a flat 65-byte `r ‖ s ‖ v` hex signature
pub fn parse_signature(value: &str) -> Result<EcdsaSignature, ApiError> {
    EcdsaSignature::from_hex(value).map_err(|e| ApiError::InvalidSignature(e.to_string()))
}
