/*
 * ABI call encoding and typed result decoding for the marketplace contracts
 *
 * Encoding is pure and deterministic: selector ++ ABI-encoded arguments.
 * Decoding is a closed set of typed functions, one per contract function,
 * so results never leave this module as untyped token bags.
 */

pub mod erc721;
pub mod factory;
pub mod listing_book;
pub mod multicall;
pub mod pair;

use crate::models::{KamiswapError, Result};
use ethers::abi::{decode, encode, ParamType, Token};
use ethers::types::{Address, U256};
use ethers::utils::keccak256;

#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[must_use]
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut call_data = Vec::from(selector(signature));
    if !args.is_empty() {
        call_data.extend_from_slice(&encode(args));
    }
    call_data
}

pub(crate) fn decode_return(
    signature: &str,
    kinds: &[ParamType],
    data: &[u8],
) -> Result<Vec<Token>> {
    // Every return value occupies at least one 32-byte head word.
    if data.len() < kinds.len() * 32 {
        return Err(KamiswapError::DecodeError(format!(
            "{signature}: response too short ({} bytes)",
            data.len()
        )));
    }
    decode(kinds, data).map_err(|e| KamiswapError::DecodeError(format!("{signature}: {e}")))
}

pub(crate) fn as_u256(signature: &str, token: Token) -> Result<U256> {
    token
        .into_uint()
        .ok_or_else(|| KamiswapError::DecodeError(format!("{signature}: expected uint256")))
}

pub(crate) fn as_address(signature: &str, token: Token) -> Result<Address> {
    token
        .into_address()
        .ok_or_else(|| KamiswapError::DecodeError(format!("{signature}: expected address")))
}

pub(crate) fn as_bool(signature: &str, token: Token) -> Result<bool> {
    token
        .into_bool()
        .ok_or_else(|| KamiswapError::DecodeError(format!("{signature}: expected bool")))
}

pub(crate) fn as_string(signature: &str, token: Token) -> Result<String> {
    token
        .into_string()
        .ok_or_else(|| KamiswapError::DecodeError(format!("{signature}: expected string")))
}

pub(crate) fn as_u256_array(signature: &str, token: Token) -> Result<Vec<U256>> {
    token
        .into_array()
        .ok_or_else(|| KamiswapError::DecodeError(format!("{signature}: expected uint256[]")))?
        .into_iter()
        .map(|item| as_u256(signature, item))
        .collect()
}

pub(crate) fn as_address_array(signature: &str, token: Token) -> Result<Vec<Address>> {
    token
        .into_array()
        .ok_or_else(|| KamiswapError::DecodeError(format!("{signature}: expected address[]")))?
        .into_iter()
        .map(|item| as_address(signature, item))
        .collect()
}
