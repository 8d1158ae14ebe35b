/*
 * Batch read aggregator over the on-chain Multicall contract
 *
 * Turns N independent read calls into one transport round trip and fans the
 * multiplexed response back out in submission order. The deployed aggregate
 * primitive is atomic: either every call succeeded or the whole batch fails
 * as a BatchCallError, with no partial decode attempted.
 */

use crate::abi;
use crate::models::{KamiswapError, Result};
use async_trait::async_trait;
use ethers::types::Address;
use std::sync::Arc;

/// Read-only call execution seam. The production implementation is
/// `RpcClient`; tests substitute a scripted transport.
#[async_trait]
pub trait ReadTransport: Send + Sync {
    async fn call(&self, target: Address, call_data: Vec<u8>) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct CallRequest {
    pub target: Address,
    pub call_data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CallResult {
    pub raw: Vec<u8>,
    /// The aggregate call reverts as a whole, so any result that arrives was
    /// successful. Kept to mirror the aggregator contract's result schema.
    pub success: bool,
}

pub struct MulticallClient {
    transport: Arc<dyn ReadTransport>,
    address: Address,
}

impl MulticallClient {
    #[must_use]
    pub fn new(transport: Arc<dyn ReadTransport>, address: Address) -> Self {
        Self { transport, address }
    }

    /// Executes the batch in one round trip. Result index i corresponds to
    /// request index i. An empty batch never touches the transport.
    pub async fn aggregate(&self, calls: &[CallRequest]) -> Result<Vec<CallResult>> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let call_data = abi::multicall::aggregate_call(calls);
        let raw = self
            .transport
            .call(self.address, call_data)
            .await
            .map_err(|e| KamiswapError::BatchCallError(format!("aggregate call failed: {e}")))?;

        let (_block_number, return_data) = abi::multicall::decode_aggregate(&raw)
            .map_err(|e| KamiswapError::BatchCallError(format!("malformed aggregate response: {e}")))?;

        if return_data.len() != calls.len() {
            return Err(KamiswapError::BatchCallError(format!(
                "aggregate returned {} results for {} calls",
                return_data.len(),
                calls.len()
            )));
        }

        Ok(return_data
            .into_iter()
            .map(|raw| CallResult { raw, success: true })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use ethers::types::U256;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedTransport {
        responses: Mutex<Vec<Result<Vec<u8>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<Vec<u8>>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReadTransport for ScriptedTransport {
        async fn call(&self, _target: Address, _call_data: Vec<u8>) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn encode_envelope(arms: &[Vec<u8>]) -> Vec<u8> {
        encode(&[
            Token::Uint(U256::from(42)),
            Token::Array(arms.iter().cloned().map(Token::Bytes).collect()),
        ])
    }

    fn request(n: u64) -> CallRequest {
        CallRequest {
            target: Address::from_low_u64_be(n),
            call_data: vec![n as u8; 4],
        }
    }

    #[tokio::test]
    async fn empty_batch_skips_the_transport() {
        let transport = Arc::new(ScriptedTransport::new(Vec::new()));
        let client = MulticallClient::new(transport.clone(), Address::from_low_u64_be(0x99));

        let results = client.aggregate(&[]).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn results_come_back_in_submission_order() {
        let arms = vec![vec![0xaa], vec![0xbb, 0xbb], vec![0xcc, 0xcc, 0xcc]];
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(encode_envelope(&arms))]));
        let client = MulticallClient::new(transport.clone(), Address::from_low_u64_be(0x99));

        let calls = vec![request(1), request(2), request(3)];
        let results = client.aggregate(&calls).await.unwrap();

        assert_eq!(results.len(), calls.len());
        for (result, arm) in results.iter().zip(&arms) {
            assert!(result.success);
            assert_eq!(&result.raw, arm);
        }
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_fails_the_whole_batch() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(
            KamiswapError::RpcError("connection refused".to_string()),
        )]));
        let client = MulticallClient::new(transport, Address::from_low_u64_be(0x99));

        let err = client.aggregate(&[request(1), request(2)]).await;
        assert!(matches!(err, Err(KamiswapError::BatchCallError(_))));
    }

    #[tokio::test]
    async fn arm_count_mismatch_fails_the_whole_batch() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(encode_envelope(&[vec![
            0xaa,
        ]]))]));
        let client = MulticallClient::new(transport, Address::from_low_u64_be(0x99));

        let err = client.aggregate(&[request(1), request(2)]).await;
        assert!(matches!(err, Err(KamiswapError::BatchCallError(_))));
    }

    #[tokio::test]
    async fn malformed_envelope_fails_the_whole_batch() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(vec![0xde, 0xad, 0xbe])]));
        let client = MulticallClient::new(transport, Address::from_low_u64_be(0x99));

        let err = client.aggregate(&[request(1)]).await;
        assert!(matches!(err, Err(KamiswapError::BatchCallError(_))));
    }
}
