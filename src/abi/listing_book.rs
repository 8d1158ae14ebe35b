/*
 * Calldata builder and return decoder for the ListingBook contract
 */

use super::{as_address_array, decode_return, encode_call};
use crate::models::Result;
use ethers::abi::{ParamType, Token};
use ethers::types::{Address, U256};

const GET_721_LISTINGS: &str = "get721Listings(address,address,uint256,uint256)";

/// Range query for the pair addresses listing a collection against a payment
/// token. The zero token address means the chain's native token.
#[must_use]
pub fn get_721_listings_call(
    collection: Address,
    payment_token: Address,
    start: U256,
    end: U256,
) -> Vec<u8> {
    encode_call(
        GET_721_LISTINGS,
        &[
            Token::Address(collection),
            Token::Address(payment_token),
            Token::Uint(start),
            Token::Uint(end),
        ],
    )
}

pub fn decode_721_listings(data: &[u8]) -> Result<Vec<Address>> {
    let mut tokens = decode_return(
        GET_721_LISTINGS,
        &[ParamType::Array(Box::new(ParamType::Address))],
        data,
    )?;
    as_address_array(GET_721_LISTINGS, tokens.remove(0))
}
