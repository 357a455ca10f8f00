//! Decimal/base-unit conversion
//!
//! Eligibility amounts arrive as human-readable decimal strings ("12.5") and
//! are committed as integer base units (`12.5 * 10^decimals`). Conversion is
//! exact: excess fractional digits and overflow are errors, never rounding.

use crate::{CoreError, Result};

/// Scale a decimal string to integer base units.
pub fn parse_units(value: &str, decimals: u32) -> Result<u128> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(CoreError::InvalidAmount(value.to_string()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(CoreError::InvalidAmount(value.to_string()));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CoreError::InvalidAmount(value.to_string()));
    }

    if frac_part.len() > decimals as usize {
        // Trailing zeros beyond the configured precision are harmless
        if frac_part[decimals as usize..].bytes().any(|b| b != b'0') {
            return Err(CoreError::PrecisionLoss {
                value: value.to_string(),
                decimals,
            });
        }
    }

    let scale = 10u128
        .checked_pow(decimals)
        .ok_or_else(|| CoreError::AmountOverflow(value.to_string()))?;

    let int_units: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| CoreError::AmountOverflow(value.to_string()))?
    };

    let kept_frac = &frac_part[..frac_part.len().min(decimals as usize)];
    let frac_units: u128 = if kept_frac.is_empty() {
        0
    } else {
        let parsed: u128 = kept_frac
            .parse()
            .map_err(|_| CoreError::AmountOverflow(value.to_string()))?;
        // Shift up for the fractional digits not present in the string
        let shift = 10u128
            .checked_pow(decimals - kept_frac.len() as u32)
            .ok_or_else(|| CoreError::AmountOverflow(value.to_string()))?;
        parsed
            .checked_mul(shift)
            .ok_or_else(|| CoreError::AmountOverflow(value.to_string()))?
    };

    int_units
        .checked_mul(scale)
        .and_then(|n| n.checked_add(frac_units))
        .ok_or_else(|| CoreError::AmountOverflow(value.to_string()))
}

/// Render base units as a decimal string (inverse of [`parse_units`]).
pub fn format_units(amount: u128, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let scale = 10u128.pow(decimals);
    let int_part = amount / scale;
    let frac_part = amount % scale;
    if frac_part == 0 {
        return int_part.to_string();
    }
    let frac_str = format!("{:0>width$}", frac_part, width = decimals as usize);
    format!("{}.{}", int_part, frac_str.trim_end_matches('0'))
}
