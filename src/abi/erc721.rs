/*
 * Calldata builders and return decoders for the ERC721 collection contracts
 */

use super::{as_address, as_bool, as_string, decode_return, encode_call};
use crate::models::Result;
use ethers::abi::{ParamType, Token};
use ethers::types::{Address, U256};

const OWNER_OF: &str = "ownerOf(uint256)";
const TOKEN_URI: &str = "tokenURI(uint256)";
const IS_APPROVED_FOR_ALL: &str = "isApprovedForAll(address,address)";
const SET_APPROVAL_FOR_ALL: &str = "setApprovalForAll(address,bool)";

#[must_use]
pub fn owner_of_call(token_id: U256) -> Vec<u8> {
    encode_call(OWNER_OF, &[Token::Uint(token_id)])
}

#[must_use]
pub fn token_uri_call(token_id: U256) -> Vec<u8> {
    encode_call(TOKEN_URI, &[Token::Uint(token_id)])
}

#[must_use]
pub fn is_approved_for_all_call(owner: Address, operator: Address) -> Vec<u8> {
    encode_call(
        IS_APPROVED_FOR_ALL,
        &[Token::Address(owner), Token::Address(operator)],
    )
}

#[must_use]
pub fn set_approval_for_all_call(operator: Address, approved: bool) -> Vec<u8> {
    encode_call(
        SET_APPROVAL_FOR_ALL,
        &[Token::Address(operator), Token::Bool(approved)],
    )
}

pub fn decode_owner_of(data: &[u8]) -> Result<Address> {
    let mut tokens = decode_return(OWNER_OF, &[ParamType::Address], data)?;
    as_address(OWNER_OF, tokens.remove(0))
}

pub fn decode_token_uri(data: &[u8]) -> Result<String> {
    let mut tokens = decode_return(TOKEN_URI, &[ParamType::String], data)?;
    as_string(TOKEN_URI, tokens.remove(0))
}

pub fn decode_is_approved_for_all(data: &[u8]) -> Result<bool> {
    let mut tokens = decode_return(IS_APPROVED_FOR_ALL, &[ParamType::Bool], data)?;
    as_bool(IS_APPROVED_FOR_ALL, tokens.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::selector;
    use ethers::abi::encode;

    #[test]
    fn selectors_match_the_erc721_standard() {
        assert_eq!(selector(OWNER_OF), [0x63, 0x52, 0x21, 0x1e]);
        assert_eq!(selector(TOKEN_URI), [0xc8, 0x7b, 0x56, 0xdd]);
        assert_eq!(selector(IS_APPROVED_FOR_ALL), [0xe9, 0x85, 0xe9, 0xc5]);
        assert_eq!(selector(SET_APPROVAL_FOR_ALL), [0xa2, 0x2c, 0xb4, 0x65]);
    }

    #[test]
    fn owner_of_round_trip() {
        let owner = Address::from_low_u64_be(0xcafe);
        let data = encode(&[Token::Address(owner)]);
        assert_eq!(decode_owner_of(&data).unwrap(), owner);
    }

    #[test]
    fn token_uri_round_trip() {
        let uri = "ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/1.json";
        let data = encode(&[Token::String(uri.to_string())]);
        assert_eq!(decode_token_uri(&data).unwrap(), uri);
    }

    #[test]
    fn approval_flag_round_trip() {
        let data = encode(&[Token::Bool(true)]);
        assert!(decode_is_approved_for_all(&data).unwrap());
    }
}
