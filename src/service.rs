/*
 * Swap estimation service that coordinates storage reads and pricing
 */

use crate::{
    dex::uniswap_v2::{order_reserves, UniswapV2Reader},
    models::{QuoteError, Result, SwapQuoteRequest},
    rpc::ChainReader,
    utils::{compute_output, parse_address, pool, BigUintPool, Fee},
};
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;
use tracing::{debug, info};

pub struct EstimateService {
    reader: UniswapV2Reader<Arc<dyn ChainReader>>,
    scratch: &'static BigUintPool,
}

impl EstimateService {
    pub fn new(chain: Arc<dyn ChainReader>) -> Self {
        Self::with_pool(chain, pool::global())
    }

    pub fn with_pool(chain: Arc<dyn ChainReader>, scratch: &'static BigUintPool) -> Self {
        Self {
            reader: UniswapV2Reader::new(chain),
            scratch,
        }
    }

    /// Check everything that can be checked without touching the chain.
    pub fn validate(pool: &str, src: &str, dst: &str, amount_in: &BigUint) -> Result<SwapQuoteRequest> {
        if amount_in.is_zero() {
            return Err(QuoteError::Validation(
                "source amount must be positive".to_string(),
            ));
        }

        let pool = parse_address("pool", pool)?;
        let src = parse_address("source token", src)?;
        let dst = parse_address("destination token", dst)?;

        if src == dst {
            return Err(QuoteError::Validation(
                "source and destination tokens cannot be the same".to_string(),
            ));
        }

        Ok(SwapQuoteRequest {
            pool,
            src,
            dst,
            amount_in: amount_in.clone(),
        })
    }

    /// Amount of `dst` received for `amount_in` of `src` in `pool` at the
    /// latest block.
    pub async fn estimate(&self, pool: &str, src: &str, dst: &str, amount_in: &BigUint) -> Result<BigUint> {
        let request = Self::validate(pool, src, dst, amount_in)?;
        self.quote(&request).await
    }

    pub async fn quote(&self, request: &SwapQuoteRequest) -> Result<BigUint> {
        info!(
            pool = ?request.pool,
            src = ?request.src,
            dst = ?request.dst,
            amount_in = %request.amount_in,
            "Processing swap estimation request"
        );

        // Tokens and reserves are read at one height so a block boundary
        // between the two reads cannot mix states.
        let block = self.reader.latest_block().await?;
        let (token0, token1) = self.reader.load_tokens(request.pool, block).await?;
        let reserves = self.reader.load_reserves(request.pool, block).await?;

        let (reserve_in, reserve_out) = order_reserves(
            request.src,
            request.dst,
            token0,
            token1,
            reserves.reserve0(),
            reserves.reserve1(),
        )?;

        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity(format!(
                "pool {:?} has empty reserves",
                request.pool
            )));
        }

        let amount_out = compute_output(
            &request.amount_in,
            reserve_in,
            reserve_out,
            Fee::PCT_0_30,
            self.scratch,
        );

        debug!(block, %reserve_in, %reserve_out, %amount_out, "Computed swap output");
        Ok(amount_out)
    }
}
