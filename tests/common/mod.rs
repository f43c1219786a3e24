use async_trait::async_trait;
use ethers::types::Address;
use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use v2quote::dex::uniswap_v2::{RESERVES_SLOT, TOKEN0_SLOT, TOKEN1_SLOT};
use v2quote::rpc::ChainReader;
use v2quote::{QuoteError, Result};

pub const POOL: &str = "0x1111111111111111111111111111111111111111";
pub const TOKEN_A: &str = "0x000000000000000000000000000000000000000a";
pub const TOKEN_B: &str = "0x000000000000000000000000000000000000000b";
pub const TOKEN_C: &str = "0x000000000000000000000000000000000000000c";

pub fn address(hex: &str) -> Address {
    hex.parse().unwrap()
}

pub fn token_word(token: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(token.as_bytes());
    word
}

pub fn reserves_word(reserve0: u128, reserve1: u128) -> [u8; 32] {
    let packed = (BigUint::from(0x6543_2100u32) << 224u32)
        | (BigUint::from(reserve1) << 112u32)
        | BigUint::from(reserve0);
    let bytes = packed.to_bytes_be();
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    word
}

/// In-memory chain serving a single pair at a fixed block height.
pub struct FakeChain {
    pub block: u64,
    pub slots: HashMap<u64, [u8; 32]>,
    pub unreachable: bool,
    pub reads: AtomicUsize,
    pub blocks_read: Mutex<Vec<u64>>,
}

impl FakeChain {
    pub fn pair(token0: &str, token1: &str, reserve0: u128, reserve1: u128) -> Self {
        let mut slots = HashMap::new();
        slots.insert(TOKEN0_SLOT, token_word(address(token0)));
        slots.insert(TOKEN1_SLOT, token_word(address(token1)));
        slots.insert(RESERVES_SLOT, reserves_word(reserve0, reserve1));
        Self {
            block: 19_000_000,
            slots,
            unreachable: false,
            reads: AtomicUsize::new(0),
            blocks_read: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::pair(TOKEN_A, TOKEN_B, 1, 1)
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn latest_block_number(&self) -> Result<u64> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(QuoteError::ExternalService(
                "Unable to connect to blockchain network".to_string(),
            ));
        }
        Ok(self.block)
    }

    async fn read_storage_slot(&self, _contract: Address, slot: u64, block: u64) -> Result<[u8; 32]> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.blocks_read.lock().unwrap().push(block);
        Ok(self.slots.get(&slot).copied().unwrap_or([0u8; 32]))
    }
}
