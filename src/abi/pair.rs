/*
 * Calldata builders and return decoders for the Pair721 contract
 */

use super::{as_address, as_u256_array, decode_return, encode_call};
use crate::models::{BuyQuote, CurveError, KamiswapError, Result};
use ethers::abi::{ParamType, Token};
use ethers::types::{Address, U256};

const ALL_IDS: &str = "getAllIds()";
const NFT: &str = "nft()";
const BUY_QUOTE: &str = "getBuyNFTQuote(uint256,uint256)";
const SWAP_FOR_NFTS: &str = "swapTokenForSpecificNFTs(uint256[],uint256,address,bool,address)";
const WITHDRAW_ERC721: &str = "withdrawERC721(address,uint256[])";

#[must_use]
pub fn all_ids_call() -> Vec<u8> {
    encode_call(ALL_IDS, &[])
}

#[must_use]
pub fn nft_call() -> Vec<u8> {
    encode_call(NFT, &[])
}

#[must_use]
pub fn buy_quote_call(asset_id: U256, num_nfts: U256) -> Vec<u8> {
    encode_call(BUY_QUOTE, &[Token::Uint(asset_id), Token::Uint(num_nfts)])
}

/// Direct swap, never routed: isRouter is false and routerCaller is zero.
#[must_use]
pub fn swap_token_for_specific_nfts_call(
    nft_ids: &[U256],
    max_expected_input: U256,
    nft_recipient: Address,
) -> Vec<u8> {
    encode_call(
        SWAP_FOR_NFTS,
        &[
            Token::Array(nft_ids.iter().map(|id| Token::Uint(*id)).collect()),
            Token::Uint(max_expected_input),
            Token::Address(nft_recipient),
            Token::Bool(false),
            Token::Address(Address::zero()),
        ],
    )
}

#[must_use]
pub fn withdraw_erc721_call(nft: Address, nft_ids: &[U256]) -> Vec<u8> {
    encode_call(
        WITHDRAW_ERC721,
        &[
            Token::Address(nft),
            Token::Array(nft_ids.iter().map(|id| Token::Uint(*id)).collect()),
        ],
    )
}

pub fn decode_all_ids(data: &[u8]) -> Result<Vec<U256>> {
    let mut tokens = decode_return(
        ALL_IDS,
        &[ParamType::Array(Box::new(ParamType::Uint(256)))],
        data,
    )?;
    as_u256_array(ALL_IDS, tokens.remove(0))
}

pub fn decode_nft(data: &[u8]) -> Result<Address> {
    let mut tokens = decode_return(NFT, &[ParamType::Address], data)?;
    as_address(NFT, tokens.remove(0))
}

/// Decodes the six-word quote tuple:
/// (errorCode, newSpotPrice, newDelta, inputAmount, protocolFee, royaltyAmount).
pub fn decode_buy_quote(data: &[u8]) -> Result<BuyQuote> {
    if data.len() < 192 {
        return Err(KamiswapError::DecodeError(format!(
            "{BUY_QUOTE}: response too short ({} bytes)",
            data.len()
        )));
    }

    let word = |index: usize| U256::from_big_endian(&data[index * 32..(index + 1) * 32]);

    let error_word = word(0);
    if error_word > U256::from(u8::MAX) {
        return Err(KamiswapError::DecodeError(format!(
            "{BUY_QUOTE}: curve error code out of range"
        )));
    }

    Ok(BuyQuote {
        error: CurveError::from_code(error_word.low_u32() as u8),
        new_spot_price: word(1),
        new_delta: word(2),
        input_amount: word(3),
        protocol_fee: word(4),
        royalty_amount: word(5),
    })
}
