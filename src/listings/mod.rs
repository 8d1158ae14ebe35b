/*
 * Listing discovery and quote pipeline
 *
 * Answers "which pairs list this collection, holding which NFTs, at what buy
 * price" in exactly two round trips regardless of pair count: one ListingBook
 * range query, then one aggregate batch carrying two calls per pair.
 */

use crate::abi;
use crate::models::{Listing, PairInventory, Result};
use crate::multicall::{CallRequest, MulticallClient, ReadTransport};
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ListingClient {
    transport: Arc<dyn ReadTransport>,
    multicall: MulticallClient,
    listing_book: Address,
}

impl ListingClient {
    #[must_use]
    pub fn new(
        transport: Arc<dyn ReadTransport>,
        multicall_address: Address,
        listing_book: Address,
    ) -> Self {
        let multicall = MulticallClient::new(transport.clone(), multicall_address);
        Self {
            transport,
            multicall,
            listing_book,
        }
    }

    /// Fetches every active pair for `collection`, with held NFT ids and a
    /// size-1 buy quote. A pair whose ids or quote fail to decode, or whose
    /// curve reports an error, degrades to a placeholder listing; it never
    /// discards the other pairs. Listing-book or batch-level failures abort
    /// the whole fetch.
    pub async fn fetch_listings(
        &self,
        collection: Address,
        payment_token: Address,
        start: U256,
        end: U256,
    ) -> Result<Vec<Listing>> {
        let raw = self
            .transport
            .call(
                self.listing_book,
                abi::listing_book::get_721_listings_call(collection, payment_token, start, end),
            )
            .await?;
        let pairs = abi::listing_book::decode_721_listings(&raw)?;

        debug!(
            "Resolved {} pair(s) for collection {:?}",
            pairs.len(),
            collection
        );

        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        // Two calls per pair: ids at batch index 2i, quote at 2i+1.
        let mut calls = Vec::with_capacity(pairs.len() * 2);
        for pair in &pairs {
            calls.push(CallRequest {
                target: *pair,
                call_data: abi::pair::all_ids_call(),
            });
            calls.push(CallRequest {
                target: *pair,
                call_data: abi::pair::buy_quote_call(U256::zero(), U256::one()),
            });
        }

        let results = self.multicall.aggregate(&calls).await?;

        let listings = pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| {
                let ids = abi::pair::decode_all_ids(&results[2 * i].raw);
                let quote = abi::pair::decode_buy_quote(&results[2 * i + 1].raw);
                match (ids, quote) {
                    (Ok(nft_ids), Ok(quote)) => Listing {
                        pair_address: *pair,
                        nft_ids,
                        quoted_price: quote.price_if_ok(),
                    },
                    (ids, quote) => {
                        if let Err(e) = ids {
                            warn!("Failed to decode ids for pair {pair:?}: {e}");
                        }
                        if let Err(e) = quote {
                            warn!("Failed to decode quote for pair {pair:?}: {e}");
                        }
                        Listing::placeholder(*pair)
                    }
                }
            })
            .collect();

        Ok(listings)
    }

    /// Held NFT ids and the underlying collection address for a single pair,
    /// fetched as one batch. Used by the withdraw flow, so decode failures
    /// are hard errors here.
    pub async fn fetch_pair_inventory(&self, pair: Address) -> Result<PairInventory> {
        let calls = vec![
            CallRequest {
                target: pair,
                call_data: abi::pair::all_ids_call(),
            },
            CallRequest {
                target: pair,
                call_data: abi::pair::nft_call(),
            },
        ];

        let results = self.multicall.aggregate(&calls).await?;
        let nft_ids = abi::pair::decode_all_ids(&results[0].raw)?;
        let nft_address = abi::pair::decode_nft(&results[1].raw)?;

        Ok(PairInventory {
            pair_address: pair,
            nft_address,
            nft_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KamiswapError;
    use async_trait::async_trait;
    use ethers::abi::{encode, Token};
    use std::sync::Mutex;

    struct ScriptedTransport {
        responses: Mutex<Vec<Result<Vec<u8>>>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<Vec<u8>>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl ReadTransport for ScriptedTransport {
        async fn call(&self, _target: Address, _call_data: Vec<u8>) -> Result<Vec<u8>> {
            self.responses.lock().unwrap().remove(0)
        }
    }

    const MULTICALL: u64 = 0xfa;
    const BOOK: u64 = 0xfb;

    fn client(transport: Arc<ScriptedTransport>) -> ListingClient {
        ListingClient::new(
            transport,
            Address::from_low_u64_be(MULTICALL),
            Address::from_low_u64_be(BOOK),
        )
    }

    fn encode_pairs(pairs: &[Address]) -> Vec<u8> {
        encode(&[Token::Array(
            pairs.iter().map(|p| Token::Address(*p)).collect(),
        )])
    }

    fn encode_ids(ids: &[u64]) -> Vec<u8> {
        encode(&[Token::Array(
            ids.iter().map(|id| Token::Uint(U256::from(*id))).collect(),
        )])
    }

    fn encode_quote(error: u64, input_amount: u64) -> Vec<u8> {
        encode(&[
            Token::Uint(U256::from(error)),
            Token::Uint(U256::from(1000)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::from(input_amount)),
            Token::Uint(U256::from(50)),
            Token::Uint(U256::zero()),
        ])
    }

    fn encode_envelope(arms: Vec<Vec<u8>>) -> Vec<u8> {
        encode(&[
            Token::Uint(U256::from(7)),
            Token::Array(arms.into_iter().map(Token::Bytes).collect()),
        ])
    }

    #[tokio::test]
    async fn one_malformed_quote_degrades_only_that_pair() {
        let pairs = [
            Address::from_low_u64_be(0x01),
            Address::from_low_u64_be(0x02),
            Address::from_low_u64_be(0x03),
        ];
        let envelope = encode_envelope(vec![
            encode_ids(&[10, 11]),
            encode_quote(0, 1050),
            encode_ids(&[20]),
            vec![0xde, 0xad], // malformed quote for the middle pair
            encode_ids(&[30]),
            encode_quote(0, 2100),
        ]);
        let transport =
            ScriptedTransport::new(vec![Ok(encode_pairs(&pairs)), Ok(envelope)]);

        let listings = client(transport)
            .fetch_listings(
                Address::from_low_u64_be(0xc0),
                Address::zero(),
                U256::zero(),
                U256::zero(),
            )
            .await
            .unwrap();

        assert_eq!(listings.len(), 3);

        assert_eq!(listings[0].pair_address, pairs[0]);
        assert_eq!(listings[0].nft_ids, vec![U256::from(10), U256::from(11)]);
        assert_eq!(listings[0].quoted_price, Some(U256::from(1050)));

        // Degraded pair: placeholder, siblings untouched.
        assert_eq!(listings[1].pair_address, pairs[1]);
        assert!(listings[1].nft_ids.is_empty());
        assert_eq!(listings[1].quoted_price, None);

        assert_eq!(listings[2].quoted_price, Some(U256::from(2100)));
    }

    #[tokio::test]
    async fn curve_error_means_no_price_but_keeps_ids() {
        let pairs = [Address::from_low_u64_be(0x01)];
        let envelope = encode_envelope(vec![encode_ids(&[5]), encode_quote(1, 0)]);
        let transport =
            ScriptedTransport::new(vec![Ok(encode_pairs(&pairs)), Ok(envelope)]);

        let listings = client(transport)
            .fetch_listings(
                Address::from_low_u64_be(0xc0),
                Address::zero(),
                U256::zero(),
                U256::zero(),
            )
            .await
            .unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].nft_ids, vec![U256::from(5)]);
        assert_eq!(listings[0].quoted_price, None);
    }

    #[tokio::test]
    async fn no_pairs_short_circuits_before_the_batch() {
        // Only the listing-book response is scripted; a batch call would panic
        // on the empty script, so reaching Ok proves it was never issued.
        let transport = ScriptedTransport::new(vec![Ok(encode_pairs(&[]))]);

        let listings = client(transport)
            .fetch_listings(
                Address::from_low_u64_be(0xc0),
                Address::zero(),
                U256::zero(),
                U256::zero(),
            )
            .await
            .unwrap();

        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn listing_book_failure_aborts_the_pipeline() {
        let transport = ScriptedTransport::new(vec![Err(KamiswapError::RpcError(
            "timeout".to_string(),
        ))]);

        let err = client(transport)
            .fetch_listings(
                Address::from_low_u64_be(0xc0),
                Address::zero(),
                U256::zero(),
                U256::zero(),
            )
            .await;

        assert!(matches!(err, Err(KamiswapError::RpcError(_))));
    }

    #[tokio::test]
    async fn pair_inventory_zips_ids_and_collection_address() {
        let nft = Address::from_low_u64_be(0x77);
        let envelope = encode_envelope(vec![
            encode_ids(&[1, 2, 3]),
            encode(&[Token::Address(nft)]),
        ]);
        let transport = ScriptedTransport::new(vec![Ok(envelope)]);

        let inventory = client(transport)
            .fetch_pair_inventory(Address::from_low_u64_be(0x05))
            .await
            .unwrap();

        assert_eq!(inventory.nft_address, nft);
        assert_eq!(
            inventory.nft_ids,
            vec![U256::from(1), U256::from(2), U256::from(3)]
        );
    }

    #[tokio::test]
    async fn pair_inventory_decode_failure_is_a_hard_error() {
        let envelope = encode_envelope(vec![vec![0xff], encode_ids(&[1])]);
        let transport = ScriptedTransport::new(vec![Ok(envelope)]);

        let err = client(transport)
            .fetch_pair_inventory(Address::from_low_u64_be(0x05))
            .await;

        assert!(matches!(err, Err(KamiswapError::DecodeError(_))));
    }
}
