/*
 * RPC client module for reading Ethereum contract storage
 */

use crate::models::{QuoteError, Result};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, BlockId, BlockNumber, H256};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read-only chain access needed to price a pool.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn latest_block_number(&self) -> Result<u64>;

    async fn read_storage_slot(&self, contract: Address, slot: u64, block: u64) -> Result<[u8; 32]>;
}

#[async_trait]
impl<T: ChainReader + ?Sized> ChainReader for Arc<T> {
    async fn latest_block_number(&self) -> Result<u64> {
        (**self).latest_block_number().await
    }

    async fn read_storage_slot(&self, contract: Address, slot: u64, block: u64) -> Result<[u8; 32]> {
        (**self).read_storage_slot(contract, slot, block).await
    }
}

/// JSON-RPC client spreading calls over several independent HTTP providers.
pub struct RpcClient {
    providers: Vec<Arc<Provider<Http>>>,
    next: AtomicUsize,
    chain_id: u64,
    request_timeout: Duration,
}

impl RpcClient {
    pub async fn new(
        rpc_url: &str,
        chain_id: u64,
        pool_size: usize,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = Self::connect(rpc_url, chain_id, pool_size, request_timeout)?;

        let chain = client
            .with_timeout("eth_chainId", client.provider().get_chainid())
            .await?;

        if chain.as_u64() != chain_id {
            return Err(QuoteError::Config(format!(
                "Chain ID mismatch: expected {}, got {}",
                chain_id,
                chain.as_u64()
            )));
        }

        info!(
            url = rpc_url,
            chain_id,
            connections = client.providers.len(),
            "Connected to Ethereum RPC"
        );

        Ok(client)
    }

    /// Build the provider set without touching the network.
    pub fn connect(
        rpc_url: &str,
        chain_id: u64,
        pool_size: usize,
        request_timeout: Duration,
    ) -> Result<Self> {
        let providers = (0..pool_size.max(1))
            .map(|_| {
                Provider::<Http>::try_from(rpc_url)
                    .map(Arc::new)
                    .map_err(|e| QuoteError::Config(format!("Failed to create provider: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            providers,
            next: AtomicUsize::new(0),
            chain_id,
            request_timeout,
        })
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    #[must_use]
    pub fn connections(&self) -> usize {
        self.providers.len()
    }

    /// Next provider in round-robin order.
    #[must_use]
    pub fn provider(&self) -> Arc<Provider<Http>> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.providers.len();
        self.providers[index].clone()
    }

    pub async fn check_health(&self) -> bool {
        match self
            .with_timeout("eth_blockNumber", self.provider().get_block_number())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "RPC health check failed");
                false
            }
        }
    }

    async fn with_timeout<T, E, F>(&self, method: &str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(QuoteError::ExternalService(format!(
                "Unable to connect to blockchain network ({method}): {e}"
            ))),
            Err(_) => Err(QuoteError::ExternalService(format!(
                "Blockchain network timeout after {:?} ({method})",
                self.request_timeout
            ))),
        }
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn latest_block_number(&self) -> Result<u64> {
        let block = self
            .with_timeout("eth_blockNumber", self.provider().get_block_number())
            .await?;
        Ok(block.as_u64())
    }

    async fn read_storage_slot(&self, contract: Address, slot: u64, block: u64) -> Result<[u8; 32]> {
        let key = H256::from_low_u64_be(slot);
        let at = BlockId::Number(BlockNumber::Number(block.into()));

        let word = self
            .with_timeout(
                "eth_getStorageAt",
                self.provider().get_storage_at(contract, key, Some(at)),
            )
            .await?;

        debug!(?contract, slot, block, "Read storage slot");
        Ok(word.to_fixed_bytes())
    }
}
