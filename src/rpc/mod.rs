/*
 * RPC client module for read calls against the configured rollup chains
 */

use crate::models::{KamiswapError, Result};
use crate::multicall::ReadTransport;
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Bytes, TransactionRequest, U256};
use std::sync::Arc;

pub struct RpcClient {
    provider: Arc<Provider<Http>>,
    chain_id: u64,
}

impl RpcClient {
    pub async fn new(rpc_url: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| KamiswapError::RpcError(format!("Failed to create provider: {e}")))?;

        let chain = provider
            .get_chainid()
            .await
            .map_err(|e| KamiswapError::RpcError(format!("Failed to get chain ID: {e}")))?;

        if chain != U256::from(chain_id) {
            return Err(KamiswapError::RpcError(format!(
                "Chain ID mismatch: expected {chain_id}, got {chain}"
            )));
        }

        Ok(Self {
            provider: Arc::new(provider),
            chain_id,
        })
    }

    #[must_use]
    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Executes a read-only `eth_call` against `target` and returns the raw
    /// return bytes.
    pub async fn read(&self, target: Address, call_data: Vec<u8>) -> Result<Vec<u8>> {
        let tx = TransactionRequest::new()
            .to(target)
            .data(Bytes::from(call_data));

        let result = self
            .provider
            .call(&tx.into(), None)
            .await
            .map_err(|e| KamiswapError::RpcError(format!("eth_call to {target:?} failed: {e}")))?;

        Ok(result.to_vec())
    }

    pub async fn get_balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| KamiswapError::RpcError(format!("Failed to get balance: {e}")))
    }
}

#[async_trait]
impl ReadTransport for RpcClient {
    async fn call(&self, target: Address, call_data: Vec<u8>) -> Result<Vec<u8>> {
        self.read(target, call_data).await
    }
}
