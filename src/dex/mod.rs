/*
 * DEX integration module for constant-product pools
 */

pub mod uniswap_v2;

use num_bigint::BigUint;
use num_traits::Zero;

/// Reserves of a pair as held in storage, each at most 112 bits wide.
/// Only produced by decoding a storage word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservePair {
    reserve0: BigUint,
    reserve1: BigUint,
}

impl ReservePair {
    pub(crate) fn new(reserve0: BigUint, reserve1: BigUint) -> Self {
        Self { reserve0, reserve1 }
    }

    #[must_use]
    pub fn reserve0(&self) -> &BigUint {
        &self.reserve0
    }

    #[must_use]
    pub fn reserve1(&self) -> &BigUint {
        &self.reserve1
    }

    #[must_use]
    pub fn has_empty_side(&self) -> bool {
        self.reserve0.is_zero() || self.reserve1.is_zero()
    }
}
