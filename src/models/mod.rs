/*
 * Data models and error types for the marketplace service
 */

use chrono::{DateTime, Utc};
use ethers::types::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub pair_address: Address,
    pub nft_ids: Vec<U256>,
    /// `None` when the pair's quote could not be decoded or the pricing curve
    /// reported an error. Distinct from a genuine zero-cost quote of `Some(0)`.
    pub quoted_price: Option<U256>,
}

impl Listing {
    #[must_use]
    pub fn placeholder(pair_address: Address) -> Self {
        Self {
            pair_address,
            nft_ids: Vec::new(),
            quoted_price: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairInventory {
    pub pair_address: Address,
    pub nft_address: Address,
    pub nft_ids: Vec<U256>,
}

/// Error codes returned by the bonding curve as the first word of a quote.
/// A non-zero code is a domain-level failure carried inside a valid decode,
/// not a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurveError {
    Ok,
    InvalidNumItems,
    SpotPriceOverflow,
    DeltaOverflow,
    SpotPriceUnderflow,
    AuctionEnded,
    Unknown(u8),
}

impl CurveError {
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => CurveError::Ok,
            1 => CurveError::InvalidNumItems,
            2 => CurveError::SpotPriceOverflow,
            3 => CurveError::DeltaOverflow,
            4 => CurveError::SpotPriceUnderflow,
            5 => CurveError::AuctionEnded,
            other => CurveError::Unknown(other),
        }
    }

    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, CurveError::Ok)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyQuote {
    pub error: CurveError,
    pub new_spot_price: U256,
    pub new_delta: U256,
    pub input_amount: U256,
    pub protocol_fee: U256,
    pub royalty_amount: U256,
}

impl BuyQuote {
    /// The amount the buyer must send, only when the curve accepted the quote.
    #[must_use]
    pub fn price_if_ok(&self) -> Option<U256> {
        if self.error.is_ok() {
            Some(self.input_amount)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub status: TransactionStatus,
    pub tx_hash: Option<TxHash>,
    pub pair_address: Option<Address>,
    pub timestamp_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftMetadata {
    pub token_id: U256,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub token_uri: Option<String>,
}

impl NftMetadata {
    #[must_use]
    pub fn placeholder(token_id: U256) -> Self {
        Self {
            token_id,
            name: None,
            description: None,
            image: None,
            token_uri: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePairParams {
    pub nft_contract: Address,
    pub initial_nft_ids: Vec<U256>,
    pub spot_price: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolResolution {
    pub collection: Address,
    pub token_id: U256,
    pub pool_address: Address,
}

#[derive(Debug, Error)]
pub enum KamiswapError {
    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Batch call error: {0}")]
    BatchCallError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Contract interaction error: {0}")]
    ContractError(String),

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KamiswapError>;
