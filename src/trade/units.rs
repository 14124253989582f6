/// Decimal-string quantity conversion
///
/// Token amounts cross the API boundary as decimal strings and live on-chain
/// as integers in the token's smallest unit. Conversion is exact integer
/// arithmetic on the digit strings; floats never touch an amount.
use std::str::FromStr;

use alloy_primitives::U256;

use crate::error::Error;

/// Convert a human-readable decimal amount into the token's smallest unit.
/// Fractional digits beyond the token's precision are truncated.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, Error> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(Error::Config("empty amount".to_string()));
    }

    let (integer_part, decimal_part) = match amount.find('.') {
        Some(dot) => (&amount[..dot], &amount[dot + 1..]),
        None => (amount, ""),
    };
    let decimal_part = if decimal_part.len() > decimals as usize {
        &decimal_part[..decimals as usize]
    } else {
        decimal_part
    };

    let int_value = if integer_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str(integer_part)
            .map_err(|_| Error::Config(format!("invalid integer part in amount: {integer_part}")))?
    };
    let dec_value = if decimal_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str(decimal_part)
            .map_err(|_| Error::Config(format!("invalid decimal part in amount: {decimal_part}")))?
    };

    let scale = U256::from(10u64).pow(U256::from(decimals));
    let dec_scale = U256::from(10u64).pow(U256::from(decimals as usize - decimal_part.len()));
    Ok(int_value * scale + dec_value * dec_scale)
}

/// Render an integer amount in the token's smallest unit as a decimal string,
/// with trailing fractional zeros trimmed.
pub fn from_base_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let integer = amount / scale;
    let remainder = amount % scale;
    if remainder.is_zero() {
        return integer.to_string();
    }
    let digits = remainder.to_string();
    let fraction = format!("{}{}", "0".repeat(decimals as usize - digits.len()), digits);
    format!("{}.{}", integer, fraction.trim_end_matches('0'))
}
