/*
 * Uniswap V2 pair integration module
 */

mod pool;
mod storage;

pub use pool::{order_reserves, UniswapV2Reader};
pub use storage::{decode_reserves, decode_token, RESERVE_MASK_BITS};

pub const TOKEN0_SLOT: u64 = 6;
pub const TOKEN1_SLOT: u64 = 7;
pub const RESERVES_SLOT: u64 = 8;
