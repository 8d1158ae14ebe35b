/*
 * Utility functions and helpers
 */

use crate::models::{KamiswapError, Result};
use ethers::types::{Address, U256};
use num_bigint::BigUint;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn parse_address(address: &str) -> Result<Address> {
    if !address.starts_with("0x") || address.len() != 42 {
        return Err(KamiswapError::ContractError(format!(
            "Invalid address format: {address}"
        )));
    }
    Address::from_str(address)
        .map_err(|e| KamiswapError::ContractError(format!("Invalid address {address}: {e}")))
}

/// Converts a wei amount to a display value in whole native-token units.
pub fn wei_to_native(wei: U256) -> Result<Decimal> {
    let wei = BigUint::from_str(&wei.to_string())
        .map_err(|e| KamiswapError::ContractError(format!("U256 conversion error: {e}")))?;
    let unit = BigUint::from(10u64).pow(18);

    let whole = &wei / &unit;
    let frac = &wei % &unit;

    Decimal::from_str(&format!("{whole}.{frac:018}"))
        .map_err(|e| KamiswapError::ContractError(format!("Amount out of display range: {e}")))
}
