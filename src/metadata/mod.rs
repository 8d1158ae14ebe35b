/*
 * Sequential NFT metadata fetcher
 *
 * One tokenURI read plus one HTTP fetch per id, strictly one at a time with
 * a fixed inter-item delay. The delay is a rate-limiting policy toward the
 * RPC endpoint and metadata gateways, not an implementation accident; both
 * knobs live in MetadataPolicy.
 */

use crate::abi;
use crate::models::{NftMetadata, Result};
use crate::multicall::ReadTransport;
use ethers::types::{Address, U256};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct MetadataPolicy {
    pub fetch_delay_ms: u64,
    pub ipfs_gateway: String,
}

#[derive(Debug, Deserialize)]
struct MetadataDocument {
    name: Option<String>,
    description: Option<String>,
    image: Option<String>,
}

pub struct MetadataClient {
    http: Client,
    policy: MetadataPolicy,
}

impl MetadataClient {
    #[must_use]
    pub fn new(policy: MetadataPolicy) -> Self {
        Self {
            http: Client::new(),
            policy,
        }
    }

    /// Fetches metadata for every id in order. A failed item degrades to a
    /// placeholder; it never aborts the rest of the loop.
    pub async fn fetch_all(
        &self,
        transport: &dyn ReadTransport,
        collection: Address,
        token_ids: &[U256],
    ) -> Vec<NftMetadata> {
        let mut items = Vec::with_capacity(token_ids.len());

        for (index, token_id) in token_ids.iter().enumerate() {
            if index > 0 && self.policy.fetch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.policy.fetch_delay_ms)).await;
            }

            match self.fetch_one(transport, collection, *token_id).await {
                Ok(metadata) => items.push(metadata),
                Err(e) => {
                    warn!("Metadata fetch for token {token_id} failed: {e}");
                    items.push(NftMetadata::placeholder(*token_id));
                }
            }
        }

        items
    }

    async fn fetch_one(
        &self,
        transport: &dyn ReadTransport,
        collection: Address,
        token_id: U256,
    ) -> Result<NftMetadata> {
        let raw = transport
            .call(collection, abi::erc721::token_uri_call(token_id))
            .await?;
        let token_uri = abi::erc721::decode_token_uri(&raw)?;

        let url = resolve_uri(&token_uri, &self.policy.ipfs_gateway);
        let document: MetadataDocument = self.http.get(&url).send().await?.json().await?;

        Ok(NftMetadata {
            token_id,
            name: document.name,
            description: document.description,
            image: document
                .image
                .map(|image| resolve_uri(&image, &self.policy.ipfs_gateway)),
            token_uri: Some(token_uri),
        })
    }
}

/// Rewrites `ipfs://` URIs to the configured HTTP gateway; anything else
/// passes through untouched.
#[must_use]
pub fn resolve_uri(uri: &str, gateway: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(path) => format!(
            "{}/{}",
            gateway.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        None => uri.to_string(),
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

    #[async_trait]
    impl ReadTransport for ScriptedTransport {
        async fn call(&self, _target: Address, _call_data: Vec<u8>) -> Result<Vec<u8>> {
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn encode_uri(uri: &str) -> Vec<u8> {
        encode(&[Token::String(uri.to_string())])
    }

    #[test]
    fn ipfs_uris_are_rewritten_to_the_gateway() {
        assert_eq!(
            resolve_uri("ipfs://QmHash/7.json", "https://ipfs.io/ipfs/"),
            "https://ipfs.io/ipfs/QmHash/7.json"
        );
        assert_eq!(
            resolve_uri("https://example.com/7.json", "https://ipfs.io/ipfs/"),
            "https://example.com/7.json"
        );
    }

    #[tokio::test]
    async fn fetches_items_sequentially_and_tolerates_failures() {
        let mut server = mockito::Server::new_async().await;
        let ok_mock = server
            .mock("GET", "/meta/1.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"Kami #1","description":"spirit","image":"ipfs://QmImg/1.png"}"#)
            .create_async()
            .await;

        let transport = ScriptedTransport {
            responses: Mutex::new(vec![
                Ok(encode_uri(&format!("{}/meta/1.json", server.url()))),
                Err(KamiswapError::RpcError("tokenURI reverted".to_string())),
            ]),
        };

        let client = MetadataClient::new(MetadataPolicy {
            fetch_delay_ms: 0,
            ipfs_gateway: "https://ipfs.io/ipfs/".to_string(),
        });

        let items = client
            .fetch_all(
                &transport,
                Address::from_low_u64_be(0x10),
                &[U256::from(1), U256::from(2)],
            )
            .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name.as_deref(), Some("Kami #1"));
        assert_eq!(
            items[0].image.as_deref(),
            Some("https://ipfs.io/ipfs/QmImg/1.png")
        );

        // The failed item degrades to a placeholder, in order.
        assert_eq!(items[1].token_id, U256::from(2));
        assert!(items[1].name.is_none());
        assert!(items[1].token_uri.is_none());

        ok_mock.assert_async().await;
    }
}
