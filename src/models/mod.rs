/*
 * Data models and error types for the swap quote service
 */

use ethers::types::Address;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validated quote request. Addresses are already parsed and `src != dst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuoteRequest {
    pub pool: Address,
    pub src: Address,
    pub dst: Address,
    pub amount_in: BigUint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient liquidity: {0}")]
    InsufficientLiquidity(String),

    #[error("Token pair does not match pool: src={src:?} dst={dst:?} token0={token0:?} token1={token1:?}")]
    TokenPairMismatch {
        src: Address,
        dst: Address,
        token0: Address,
        token1: Address,
    },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QuoteError {
    /// Only chain access failures are worth retrying; everything else is
    /// a deterministic answer about the request or the pool.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuoteError::ExternalService(_))
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            QuoteError::Validation(_) => "VALIDATION_ERROR",
            QuoteError::NotFound(_) => "NOT_FOUND",
            QuoteError::InsufficientLiquidity(_) => "INSUFFICIENT_LIQUIDITY",
            QuoteError::TokenPairMismatch { .. } => "TOKEN_PAIR_MISMATCH",
            QuoteError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            QuoteError::Config(_) => "CONFIG_ERROR",
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            QuoteError::Validation(_) => "Request validation failed",
            QuoteError::NotFound(_) => "Requested resource not found",
            QuoteError::InsufficientLiquidity(_) => "Pool has insufficient liquidity",
            QuoteError::TokenPairMismatch { .. } => "Token pair does not match pool",
            QuoteError::ExternalService(_) => "External service unavailable",
            QuoteError::Config(_) => "Internal server error",
        }
    }
}

impl From<config::ConfigError> for QuoteError {
    fn from(e: config::ConfigError) -> Self {
        QuoteError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
