//! NEAR amount and gas units.

use crate::error::BridgeError;

/// yoctoNEAR per NEAR.
pub const ONE_NEAR: u128 = 1_000_000_000_000_000_000_000_000;

/// Gas units per teragas.
pub const TGAS: u64 = 1_000_000_000_000;

const NEAR_DECIMALS: usize = 24;

/// Parse a decimal NEAR amount such as `"1.5"` into yoctoNEAR.
///
/// Thousands separators are ignored. Signs, exponents and more than 24
/// fractional digits are rejected.
pub fn parse_near_amount(amount: &str) -> Result<u128, BridgeError> {
    let cleaned: String = amount.trim().chars().filter(|c| *c != ',').collect();
    let invalid = || BridgeError::Validation(format!("Invalid amount: {}", amount));

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
        || frac.len() > NEAR_DECIMALS
    {
        return Err(invalid());
    }

    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac_value: u128 = if frac.is_empty() {
        0
    } else {
        format!("{:0<width$}", frac, width = NEAR_DECIMALS)
            .parse()
            .map_err(|_| invalid())?
    };

    whole_value
        .checked_mul(ONE_NEAR)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(invalid)
}

/// Render yoctoNEAR as a decimal NEAR string without trailing zeros.
pub fn format_near_amount(yocto: u128) -> String {
    let whole = yocto / ONE_NEAR;
    let frac = yocto % ONE_NEAR;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac, width = NEAR_DECIMALS);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
