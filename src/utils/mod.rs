/*
 * Utility functions and helpers
 */

pub mod pool;
pub mod swap;

use crate::models::{QuoteError, Result};
use ethers::types::Address;
use std::str::FromStr;

pub use pool::{BigUintPool, Scratch};
pub use swap::{compute_output, Fee};

/// Parse a `0x`-prefixed 20-byte hex address. `field` names the parameter in
/// the validation message.
pub fn parse_address(field: &str, address: &str) -> Result<Address> {
    let hex = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| QuoteError::Validation(format!("invalid {field} address format: {address}")))?;

    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuoteError::Validation(format!(
            "invalid {field} address format: {address}"
        )));
    }

    Address::from_str(hex)
        .map_err(|e| QuoteError::Validation(format!("invalid {field} address {address}: {e}")))
}
