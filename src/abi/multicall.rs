/*
 * Calldata builder and return decoder for the Multicall aggregator contract
 */

use super::{as_u256, decode_return, encode_call};
use crate::models::{KamiswapError, Result};
use crate::multicall::CallRequest;
use ethers::abi::{ParamType, Token};
use ethers::types::U256;

const AGGREGATE: &str = "aggregate((address,bytes)[])";

#[must_use]
pub fn aggregate_call(calls: &[CallRequest]) -> Vec<u8> {
    let call_tokens = calls
        .iter()
        .map(|call| {
            Token::Tuple(vec![
                Token::Address(call.target),
                Token::Bytes(call.call_data.clone()),
            ])
        })
        .collect();
    encode_call(AGGREGATE, &[Token::Array(call_tokens)])
}

/// Decodes the aggregate envelope: (blockNumber, returnData[]).
pub fn decode_aggregate(data: &[u8]) -> Result<(U256, Vec<Vec<u8>>)> {
    let mut tokens = decode_return(
        AGGREGATE,
        &[
            ParamType::Uint(256),
            ParamType::Array(Box::new(ParamType::Bytes)),
        ],
        data,
    )?;

    let block_number = as_u256(AGGREGATE, tokens.remove(0))?;
    let return_data = tokens
        .remove(0)
        .into_array()
        .ok_or_else(|| KamiswapError::DecodeError(format!("{AGGREGATE}: expected bytes[]")))?
        .into_iter()
        .map(|arm| {
            arm.into_bytes()
                .ok_or_else(|| KamiswapError::DecodeError(format!("{AGGREGATE}: expected bytes")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((block_number, return_data))
}
