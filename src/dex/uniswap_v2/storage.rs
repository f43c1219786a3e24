/*
 * Decoding of raw Uniswap V2 pair storage words
 */

use crate::dex::ReservePair;
use ethers::types::Address;
use num_bigint::BigUint;

pub const RESERVE_MASK_BITS: usize = 112;

const RESERVE_BYTES: usize = RESERVE_MASK_BITS / 8;

/// Unpack `reserve0` (bits 0..112) and `reserve1` (bits 112..224) from the
/// big-endian reserves word. The `blockTimestampLast` in the top 32 bits is
/// dropped. Total: any word decodes, an all-zero word gives `(0, 0)`.
#[must_use]
pub fn decode_reserves(word: &[u8; 32]) -> ReservePair {
    let reserve0_start = 32 - RESERVE_BYTES;
    let reserve1_start = reserve0_start - RESERVE_BYTES;

    ReservePair::new(
        BigUint::from_bytes_be(&word[reserve0_start..]),
        BigUint::from_bytes_be(&word[reserve1_start..reserve0_start]),
    )
}

/// Address stored right-aligned in a 32-byte slot.
#[must_use]
pub fn decode_token(word: &[u8; 32]) -> Address {
    Address::from_slice(&word[12..])
}
