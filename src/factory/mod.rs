/*
 * Pair creation flow against the factory contract
 */

use crate::abi;
use crate::models::{
    CreatePairParams, KamiswapError, Result, TransactionOutcome, TransactionStatus,
};
use crate::multicall::ReadTransport;
use crate::wallet::Session;
use chrono::Utc;
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::info;

pub struct FactoryClient {
    session: Arc<Session>,
    transport: Arc<dyn ReadTransport>,
    factory: Address,
    bonding_curve: Address,
    listing_book: Address,
}

impl FactoryClient {
    #[must_use]
    pub fn new(
        session: Arc<Session>,
        transport: Arc<dyn ReadTransport>,
        factory: Address,
        bonding_curve: Address,
        listing_book: Address,
    ) -> Self {
        Self {
            session,
            transport,
            factory,
            bonding_curve,
            listing_book,
        }
    }

    /// Grants the factory operator approval on the NFT contract when it does
    /// not already have it.
    pub async fn ensure_approval(&self, nft_contract: Address) -> Result<()> {
        let raw = self
            .transport
            .call(
                nft_contract,
                abi::erc721::is_approved_for_all_call(self.session.address(), self.factory),
            )
            .await?;

        if abi::erc721::decode_is_approved_for_all(&raw)? {
            return Ok(());
        }

        info!("Approving factory {:?} on collection {:?}", self.factory, nft_contract);

        let hash = self
            .session
            .submit(
                nft_contract,
                abi::erc721::set_approval_for_all_call(self.factory, true),
                U256::zero(),
            )
            .await?;
        let receipt = self.session.await_confirmation(hash).await?;

        if receipt.status != Some(1u64.into()) {
            return Err(KamiswapError::ContractError(format!(
                "Approval transaction {hash:?} reverted"
            )));
        }

        Ok(())
    }

    /// Creates a native-token sell pool seeded with the given NFTs, priced by
    /// the linear curve, with the ListingBook hook attached so the pair shows
    /// up in listing queries.
    pub async fn create_pair(&self, params: &CreatePairParams) -> Result<TransactionOutcome> {
        if params.initial_nft_ids.is_empty() {
            return Err(KamiswapError::ContractError(
                "A new pair needs at least one NFT".to_string(),
            ));
        }

        self.ensure_approval(params.nft_contract).await?;

        let call_data = abi::factory::create_pair_erc721_eth_call(
            params,
            self.bonding_curve,
            self.session.address(),
            self.listing_book,
        );

        info!(
            "Creating pair for collection {:?} with {} NFT(s) at spot price {}",
            params.nft_contract,
            params.initial_nft_ids.len(),
            params.spot_price
        );

        let hash = self
            .session
            .submit(self.factory, call_data, U256::zero())
            .await?;
        let receipt = self.session.await_confirmation(hash).await?;

        if receipt.status != Some(1u64.into()) {
            return Err(KamiswapError::ContractError(format!(
                "Pair creation transaction {hash:?} reverted"
            )));
        }

        Ok(TransactionOutcome {
            status: TransactionStatus::Success,
            tx_hash: Some(hash),
            pair_address: None,
            timestamp_utc: Utc::now(),
        })
    }
}
