//! Fixed-point price representation.
//!
//! Prices are `i64` values scaled by 10^9, so `10.50` is stored as
//! `10_500_000_000`. The maximum `i64` is reserved as [`UNDEF_PRICE`] and is
//! never produced by [`parse_price`].

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::DecodeError;

/// Number of fractional decimal digits carried by a fixed-point price.
pub const PRICE_DECIMALS: u32 = 9;

/// Fixed-point scale: one whole unit of price.
pub const PRICE_SCALE: i64 = 1_000_000_000;

/// Sentinel for a missing price (empty input column, padded snapshot level).
pub const UNDEF_PRICE: i64 = i64::MAX;

/// Fractional digits written when a price is rendered as text.
pub const OUTPUT_DECIMALS: usize = 6;

/// Returns true unless `price` is the undefined sentinel.
#[inline(always)]
pub fn is_defined(price: i64) -> bool {
    price != UNDEF_PRICE
}

/// Convert a fixed-point price to floating point units.
#[inline]
pub fn price_to_f64(price: i64) -> Option<f64> {
    is_defined(price).then(|| price as f64 / PRICE_SCALE as f64)
}

/// Parse a price column. An empty column is the undefined price.
pub fn parse_price_field(field: &str) -> Result<i64, DecodeError> {
    if field.is_empty() {
        Ok(UNDEF_PRICE)
    } else {
        parse_price(field)
    }
}

/// Parse a decimal literal into fixed point: `round(x * 10^9)`.
///
/// Accepts an optional sign, integer digits and an optional fractional part
/// (`"10"`, `"10.5"`, `".5"`, `"-3.25"`). Digits past the ninth fractional
/// place round half away from zero.
pub fn parse_price(literal: &str) -> Result<i64, DecodeError> {
    let invalid = || DecodeError::InvalidPrice(literal.to_string());

    if !is_plain_decimal(literal) {
        return Err(invalid());
    }

    let digits = literal.strip_suffix('.').unwrap_or(literal);
    let value = Decimal::from_str(digits).map_err(|_| invalid())?;
    let price = value
        .round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::from(PRICE_SCALE))
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(invalid)?;

    if is_defined(price) {
        Ok(price)
    } else {
        Err(invalid())
    }
}

// Sign, digits and at most one point; no exponent, separators or blanks.
fn is_plain_decimal(literal: &str) -> bool {
    let body = literal.strip_prefix(&['-', '+'][..]).unwrap_or(literal);
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    !(int_part.is_empty() && frac_part.is_empty())
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

/// Render a fixed-point price for output; the undefined price is empty.
pub fn format_price(price: i64) -> String {
    match price_to_f64(price) {
        Some(value) => format!("{value:.prec$}", prec = OUTPUT_DECIMALS),
        None => String::new(),
    }
}
