/*
 * v2quote - Uniswap V2 swap quotes from raw pair storage
 * Core library exports and module declarations
 */

pub mod api;
pub mod config;
pub mod dex;
pub mod models;
pub mod rpc;
pub mod service;
pub mod utils;

pub use config::Config;
pub use models::*;
pub use service::EstimateService;
