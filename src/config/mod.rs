/*
 * Configuration management for the marketplace service
 */

use crate::models::{KamiswapError, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub const YOMINET_CHAIN_ID: u64 = 428_962_654_539_583; // 0x18623A6A54F3F
pub const ZAAR_CHAIN_ID: u64 = 1_335_097_526_422_335; // 0x4be439dcd8b3f

const YOMINET_DEFAULT_RPC: &str = "https://jsonrpc-yominet-1.anvil.asia-southeast.initia.xyz/";
const ZAAR_DEFAULT_RPC: &str = "https://jsonrpc-zaar-mainnet-1.anvil.asia-southeast.initia.xyz/";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub yominet: ChainConfig,
    pub zaar: Option<ChainConfig>,
    pub metadata: MetadataConfig,
    pub wallet_private_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub native_symbol: String,
    pub contracts: ContractAddresses,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractAddresses {
    pub listing_book: String,
    pub multicall: String,
    pub pair_factory: String,
    pub linear_curve: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    pub fetch_delay_ms: u64,
    pub ipfs_gateway: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainLabel {
    Yominet,
    Zaar,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|e| KamiswapError::ConfigError(format!("Invalid port: {e}")))?,
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            yominet: ChainConfig {
                rpc_url: env::var("YOMINET_RPC_URL")
                    .unwrap_or_else(|_| YOMINET_DEFAULT_RPC.to_string()),
                chain_id: YOMINET_CHAIN_ID,
                native_symbol: "ETH".to_string(),
                contracts: contracts_from_env("YOMINET")?
                    .ok_or_else(|| {
                        KamiswapError::ConfigError(
                            "YOMINET contract addresses not set".to_string(),
                        )
                    })?,
            },
            // Zaar is optional: configured only when its contracts are set.
            zaar: contracts_from_env("ZAAR")?.map(|contracts| ChainConfig {
                rpc_url: env::var("ZAAR_RPC_URL").unwrap_or_else(|_| ZAAR_DEFAULT_RPC.to_string()),
                chain_id: ZAAR_CHAIN_ID,
                native_symbol: "INIT".to_string(),
                contracts,
            }),
            metadata: MetadataConfig {
                fetch_delay_ms: env::var("METADATA_FETCH_DELAY_MS")
                    .unwrap_or_else(|_| "250".to_string())
                    .parse()
                    .map_err(|e| {
                        KamiswapError::ConfigError(format!("Invalid metadata delay: {e}"))
                    })?,
                ipfs_gateway: env::var("IPFS_GATEWAY")
                    .unwrap_or_else(|_| "https://ipfs.io/ipfs/".to_string()),
            },
            wallet_private_key: env::var("WALLET_PRIVATE_KEY").ok(),
        })
    }
}

fn contracts_from_env(prefix: &str) -> Result<Option<ContractAddresses>> {
    let listing_book = env::var(format!("{prefix}_LISTING_BOOK"));
    let Ok(listing_book) = listing_book else {
        return Ok(None);
    };

    let require = |name: &str| {
        env::var(format!("{prefix}_{name}")).map_err(|_| {
            KamiswapError::ConfigError(format!("{prefix}_{name} not set"))
        })
    };

    Ok(Some(ContractAddresses {
        listing_book,
        multicall: require("MULTICALL")?,
        pair_factory: require("PAIR_FACTORY")?,
        linear_curve: require("LINEAR_CURVE")?,
    }))
}

impl std::str::FromStr for ChainLabel {
    type Err = KamiswapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "yominet" => Ok(ChainLabel::Yominet),
            "zaar" => Ok(ChainLabel::Zaar),
            _ => Err(KamiswapError::ConfigError(format!(
                "Unknown chain label: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for ChainLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainLabel::Yominet => write!(f, "yominet"),
            ChainLabel::Zaar => write!(f, "zaar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn chain_labels_parse_case_insensitively() {
        assert_eq!(ChainLabel::from_str("yominet").unwrap(), ChainLabel::Yominet);
        assert_eq!(ChainLabel::from_str("YOMINET").unwrap(), ChainLabel::Yominet);
        assert_eq!(ChainLabel::from_str("Zaar").unwrap(), ChainLabel::Zaar);
        assert!(ChainLabel::from_str("base").is_err());
    }

    #[test]
    fn chain_labels_display_lowercase() {
        assert_eq!(ChainLabel::Yominet.to_string(), "yominet");
        assert_eq!(ChainLabel::Zaar.to_string(), "zaar");
    }
}
