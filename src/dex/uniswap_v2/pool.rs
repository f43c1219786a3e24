/*
 * Uniswap V2 pair reader over raw storage slots
 */

use super::storage::{decode_reserves, decode_token};
use super::{RESERVES_SLOT, TOKEN0_SLOT, TOKEN1_SLOT};
use crate::dex::ReservePair;
use crate::models::{QuoteError, Result};
use crate::rpc::ChainReader;
use ethers::types::Address;
use tracing::debug;

/// Pick `(reserve_in, reserve_out)` for a `src -> dst` swap given the pair's
/// canonical token order.
pub fn order_reserves<'a, T: ?Sized>(
    src: Address,
    dst: Address,
    token0: Address,
    token1: Address,
    reserve0: &'a T,
    reserve1: &'a T,
) -> Result<(&'a T, &'a T)> {
    if src == token0 && dst == token1 {
        Ok((reserve0, reserve1))
    } else if src == token1 && dst == token0 {
        Ok((reserve1, reserve0))
    } else {
        Err(QuoteError::TokenPairMismatch {
            src,
            dst,
            token0,
            token1,
        })
    }
}

pub struct UniswapV2Reader<R> {
    chain: R,
}

impl<R: ChainReader> UniswapV2Reader<R> {
    pub fn new(chain: R) -> Self {
        Self { chain }
    }

    pub async fn latest_block(&self) -> Result<u64> {
        self.chain.latest_block_number().await
    }

    /// `token0` and `token1` of the pair at `block`. A zero address means
    /// nothing is deployed there.
    pub async fn load_tokens(&self, pool: Address, block: u64) -> Result<(Address, Address)> {
        let token0 = decode_token(&self.chain.read_storage_slot(pool, TOKEN0_SLOT, block).await?);
        let token1 = decode_token(&self.chain.read_storage_slot(pool, TOKEN1_SLOT, block).await?);

        if token0.is_zero() || token1.is_zero() {
            return Err(QuoteError::NotFound(format!("pool {pool:?} at block {block}")));
        }

        debug!(?pool, ?token0, ?token1, block, "Loaded pair tokens");
        Ok((token0, token1))
    }

    pub async fn load_reserves(&self, pool: Address, block: u64) -> Result<ReservePair> {
        let word = self.chain.read_storage_slot(pool, RESERVES_SLOT, block).await?;
        let reserves = decode_reserves(&word);

        if reserves.has_empty_side() {
            return Err(QuoteError::InsufficientLiquidity(format!(
                "pool {pool:?} has empty reserves at block {block}"
            )));
        }

        debug!(
            ?pool,
            reserve0 = %reserves.reserve0(),
            reserve1 = %reserves.reserve1(),
            block,
            "Loaded pair reserves"
        );
        Ok(reserves)
    }
}
