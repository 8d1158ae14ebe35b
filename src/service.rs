/*
 * Main marketplace service that coordinates the per-chain clients
 */

use crate::abi;
use crate::config::{ChainConfig, ChainLabel, Config};
use crate::factory::FactoryClient;
use crate::listings::ListingClient;
use crate::metadata::{MetadataClient, MetadataPolicy};
use crate::models::{
    CreatePairParams, KamiswapError, Listing, NftMetadata, PairInventory, PoolResolution, Result,
    TransactionOutcome,
};
use crate::multicall::ReadTransport;
use crate::pair::PairClient;
use crate::rpc::RpcClient;
use crate::utils::parse_address;
use crate::wallet::Session;
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::info;

struct ChainContext {
    config: ChainConfig,
    rpc: Arc<RpcClient>,
    listings: ListingClient,
    listing_book: Address,
    pair_factory: Address,
    linear_curve: Address,
}

impl ChainContext {
    async fn connect(label: ChainLabel, config: ChainConfig) -> Result<Self> {
        let rpc = Arc::new(RpcClient::new(&config.rpc_url, config.chain_id).await?);
        info!("Connected to {label} RPC (chain id {})", rpc.chain_id());

        let listing_book = parse_address(&config.contracts.listing_book)?;
        let multicall = parse_address(&config.contracts.multicall)?;
        let pair_factory = parse_address(&config.contracts.pair_factory)?;
        let linear_curve = parse_address(&config.contracts.linear_curve)?;

        let transport: Arc<dyn ReadTransport> = rpc.clone();
        let listings = ListingClient::new(transport, multicall, listing_book);

        Ok(Self {
            config,
            rpc,
            listings,
            listing_book,
            pair_factory,
            linear_curve,
        })
    }
}

pub struct MarketplaceService {
    yominet: ChainContext,
    zaar: Option<ChainContext>,
    metadata: MetadataClient,
    wallet_private_key: Option<String>,
}

impl MarketplaceService {
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing marketplace service");

        let yominet = ChainContext::connect(ChainLabel::Yominet, config.yominet).await?;
        let zaar = match config.zaar {
            Some(chain) => Some(ChainContext::connect(ChainLabel::Zaar, chain).await?),
            None => None,
        };

        let metadata = MetadataClient::new(MetadataPolicy {
            fetch_delay_ms: config.metadata.fetch_delay_ms,
            ipfs_gateway: config.metadata.ipfs_gateway,
        });

        Ok(Self {
            yominet,
            zaar,
            metadata,
            wallet_private_key: config.wallet_private_key,
        })
    }

    fn context(&self, label: ChainLabel) -> Result<&ChainContext> {
        match label {
            ChainLabel::Yominet => Ok(&self.yominet),
            ChainLabel::Zaar => self.zaar.as_ref().ok_or_else(|| {
                KamiswapError::ConfigError("Zaar chain not configured".to_string())
            }),
        }
    }

    #[must_use]
    pub fn native_symbol(&self, label: ChainLabel) -> &str {
        match self.context(label) {
            Ok(ctx) => &ctx.config.native_symbol,
            Err(_) => "ETH",
        }
    }

    /// Active listings for a collection against the native token, the whole
    /// range (token 0, start 0, end 0 mirrors the on-chain "everything"
    /// query).
    pub async fn fetch_listings(
        &self,
        label: ChainLabel,
        collection: Address,
    ) -> Result<Vec<Listing>> {
        let ctx = self.context(label)?;
        info!("Fetching listings for {collection:?} on {label}");
        ctx.listings
            .fetch_listings(collection, Address::zero(), U256::zero(), U256::zero())
            .await
    }

    pub async fn pair_inventory(
        &self,
        label: ChainLabel,
        pair: Address,
    ) -> Result<PairInventory> {
        let ctx = self.context(label)?;
        ctx.listings.fetch_pair_inventory(pair).await
    }

    /// A pooled NFT's owner is its pair; resolving ownership jumps straight
    /// from a token id to the pool that holds it.
    pub async fn resolve_pool(
        &self,
        label: ChainLabel,
        collection: Address,
        token_id: U256,
    ) -> Result<PoolResolution> {
        let ctx = self.context(label)?;
        let raw = ctx
            .rpc
            .read(collection, abi::erc721::owner_of_call(token_id))
            .await?;
        let pool_address = abi::erc721::decode_owner_of(&raw)?;

        Ok(PoolResolution {
            collection,
            token_id,
            pool_address,
        })
    }

    pub async fn fetch_metadata(
        &self,
        label: ChainLabel,
        collection: Address,
        token_ids: &[U256],
    ) -> Result<Vec<NftMetadata>> {
        let ctx = self.context(label)?;
        Ok(self
            .metadata
            .fetch_all(ctx.rpc.as_ref(), collection, token_ids)
            .await)
    }

    /// Opens a signing session on a chain from the configured key.
    pub fn session(&self, label: ChainLabel) -> Result<Session> {
        let ctx = self.context(label)?;
        let key = self.wallet_private_key.as_deref().ok_or_else(|| {
            KamiswapError::WalletError("WALLET_PRIVATE_KEY not configured".to_string())
        })?;
        Session::connect(&ctx.config, key)
    }

    pub async fn buy(&self, label: ChainLabel, listing: &Listing) -> Result<TransactionOutcome> {
        let session = Arc::new(self.session(label)?);
        PairClient::new(session).buy(listing).await
    }

    pub async fn withdraw_all(
        &self,
        label: ChainLabel,
        pair: Address,
    ) -> Result<TransactionOutcome> {
        let inventory = self.pair_inventory(label, pair).await?;
        let session = Arc::new(self.session(label)?);
        PairClient::new(session).withdraw_all(&inventory).await
    }

    pub async fn create_pair(
        &self,
        label: ChainLabel,
        params: &CreatePairParams,
    ) -> Result<TransactionOutcome> {
        let ctx = self.context(label)?;
        let session = Arc::new(self.session(label)?);
        let transport: Arc<dyn ReadTransport> = ctx.rpc.clone();
        FactoryClient::new(
            session,
            transport,
            ctx.pair_factory,
            ctx.linear_curve,
            ctx.listing_book,
        )
        .create_pair(params)
        .await
    }
}
