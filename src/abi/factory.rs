/*
 * Calldata builder for the pair factory contract
 */

use super::encode_call;
use crate::models::CreatePairParams;
use ethers::abi::Token;
use ethers::types::{Address, U256};

const CREATE_PAIR_ERC721_ETH: &str = "createPairERC721ETH(address,address,address,uint8,uint128,uint96,uint128,address,uint256[],address,address)";

/// Pool type NFT on the curve enum (TOKEN = 0, NFT = 1, TRADE = 2).
const POOL_TYPE_NFT: u8 = 1;

/// Builds the pair-creation call the way the marketplace submits it: a flat
/// sell-side pool (delta 0, fee 0) priced by the linear curve, with the
/// ListingBook registered as the pair's hook so the new pair is discoverable.
#[must_use]
pub fn create_pair_erc721_eth_call(
    params: &CreatePairParams,
    bonding_curve: Address,
    asset_recipient: Address,
    listing_book: Address,
) -> Vec<u8> {
    encode_call(
        CREATE_PAIR_ERC721_ETH,
        &[
            Token::Address(params.nft_contract),
            Token::Address(bonding_curve),
            Token::Address(asset_recipient),
            Token::Uint(U256::from(POOL_TYPE_NFT)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Uint(params.spot_price),
            Token::Address(Address::zero()),
            Token::Array(
                params
                    .initial_nft_ids
                    .iter()
                    .map(|id| Token::Uint(*id))
                    .collect(),
            ),
            Token::Address(listing_book),
            Token::Address(Address::zero()),
        ],
    )
}
