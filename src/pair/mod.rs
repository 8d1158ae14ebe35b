/*
 * Buy and withdraw transaction flows against a Pair721 contract
 */

use crate::abi;
use crate::models::{
    KamiswapError, Listing, PairInventory, Result, TransactionOutcome, TransactionStatus,
};
use crate::wallet::Session;
use chrono::Utc;
use ethers::types::{TxHash, U256};
use std::sync::Arc;
use tracing::{info, warn};

pub struct PairClient {
    session: Arc<Session>,
}

impl PairClient {
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Buys the first NFT of a listing at its quoted price. The quote is sent
    /// both as maxExpectedTokenInput and as the transaction value.
    pub async fn buy(&self, listing: &Listing) -> Result<TransactionOutcome> {
        let nft_id = *listing.nft_ids.first().ok_or_else(|| {
            KamiswapError::ContractError("No NFTs available in this listing".to_string())
        })?;
        let price = listing.quoted_price.ok_or_else(|| {
            KamiswapError::ContractError("Listing has no available quote".to_string())
        })?;

        let call_data = abi::pair::swap_token_for_specific_nfts_call(
            &[nft_id],
            price,
            self.session.address(),
        );

        match crate::utils::wei_to_native(price) {
            Ok(native) => info!(
                "Buying NFT {} from pair {:?} for {} native",
                nft_id, listing.pair_address, native
            ),
            Err(_) => info!(
                "Buying NFT {} from pair {:?} for {} wei",
                nft_id, listing.pair_address, price
            ),
        }

        let hash = self
            .session
            .submit(listing.pair_address, call_data, price)
            .await?;
        self.confirm(hash, listing.pair_address.into()).await
    }

    /// Withdraws every NFT a pair holds back to the pair owner.
    pub async fn withdraw_all(&self, inventory: &PairInventory) -> Result<TransactionOutcome> {
        if inventory.nft_ids.is_empty() {
            return Err(KamiswapError::ContractError(
                "No NFTs to withdraw".to_string(),
            ));
        }

        let call_data =
            abi::pair::withdraw_erc721_call(inventory.nft_address, &inventory.nft_ids);

        info!(
            "Withdrawing {} NFT(s) from pair {:?}",
            inventory.nft_ids.len(),
            inventory.pair_address
        );

        let hash = self
            .session
            .submit(inventory.pair_address, call_data, U256::zero())
            .await?;
        self.confirm(hash, inventory.pair_address.into()).await
    }

    async fn confirm(
        &self,
        hash: TxHash,
        pair_address: Option<ethers::types::Address>,
    ) -> Result<TransactionOutcome> {
        let receipt = self.session.await_confirmation(hash).await?;

        if receipt.status != Some(1u64.into()) {
            return Err(KamiswapError::ContractError(format!(
                "Transaction {hash:?} reverted"
            )));
        }

        // Refresh the balance after a value transfer; a failed read is not a
        // failed transaction.
        match self.session.fetch_balance().await {
            Ok(balance) => info!("Wallet balance after transaction: {balance} wei"),
            Err(e) => warn!("Could not refresh balance: {e}"),
        }

        Ok(TransactionOutcome {
            status: TransactionStatus::Success,
            tx_hash: Some(hash),
            pair_address,
            timestamp_utc: Utc::now(),
        })
    }
}
