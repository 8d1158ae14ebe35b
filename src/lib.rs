/*
 * Kamiswap - NFT AMM marketplace service
 * Core library exports and module declarations
 */

pub mod abi;
pub mod api;
pub mod config;
pub mod factory;
pub mod listings;
pub mod metadata;
pub mod models;
pub mod multicall;
pub mod pair;
pub mod rpc;
pub mod service;
pub mod utils;
pub mod wallet;

pub use config::Config;
pub use models::*;
pub use service::MarketplaceService;
