/*
 * Wallet session for transaction submission
 *
 * A Session is an explicitly passed context object: created for one chain
 * from a signing key, invalidated by dropping it. Switching chains means
 * connecting a new Session.
 */

use crate::config::ChainConfig;
use crate::models::{KamiswapError, Result};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, TxHash, U256};
use std::sync::Arc;
use tracing::info;

pub struct Session {
    client: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
    address: Address,
    chain_id: u64,
}

impl Session {
    pub fn connect(chain: &ChainConfig, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
            .map_err(|e| KamiswapError::RpcError(format!("Failed to create provider: {e}")))?;

        let wallet = private_key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| KamiswapError::WalletError(format!("Invalid signing key: {e}")))?
            .with_chain_id(chain.chain_id);

        let address = wallet.address();
        info!("Session connected for {:?} on chain {}", address, chain.chain_id);

        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            address,
            chain_id: chain.chain_id,
        })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Signs and submits a transaction, returning its hash without waiting
    /// for inclusion.
    pub async fn submit(&self, target: Address, call_data: Vec<u8>, value: U256) -> Result<TxHash> {
        let tx = TransactionRequest::new()
            .to(target)
            .data(Bytes::from(call_data))
            .value(value);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| KamiswapError::WalletError(format!("Failed to submit transaction: {e}")))?;

        Ok(pending.tx_hash())
    }

    /// Waits for the transaction to be mined and returns its receipt.
    pub async fn await_confirmation(&self, hash: TxHash) -> Result<TransactionReceipt> {
        PendingTransaction::new(hash, self.client.provider())
            .await
            .map_err(|e| KamiswapError::RpcError(format!("Failed to confirm {hash:?}: {e}")))?
            .ok_or_else(|| {
                KamiswapError::RpcError(format!("Transaction {hash:?} dropped from the mempool"))
            })
    }

    pub async fn fetch_balance(&self) -> Result<U256> {
        self.client
            .get_balance(self.address, None)
            .await
            .map_err(|e| KamiswapError::RpcError(format!("Failed to get balance: {e}")))
    }
}
