//! Text record decoder.
//!
//! Turns one comma-delimited line into an [`MboMessage`]. The column layout
//! is positional and fixed:
//!
//! ```text
//! ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,depth,
//! price,size,order_id,flags,ts_in_delta,sequence,symbol,order_id
//! ```
//!
//! The order id appears twice. Both columns must be numeric and the
//! trailing one is the value kept.
//!
//! Decoding is pure: it either yields a complete message or a
//! [`DecodeError`], never a partial result.

use std::str::FromStr;

use crate::error::DecodeError;
use crate::price::parse_price_field;
use crate::types::{Action, MboMessage, Side};

/// Number of comma-separated columns in a record.
pub const FIELD_COUNT: usize = 16;

/// Decode one record.
///
/// # Example
///
/// ```
/// use mbo_book_replay::decoder::decode;
/// use mbo_book_replay::{Action, Side};
///
/// let msg = decode("t1,e1,160,1,100,A,B,0,10.50,5,1,0,0,1,SYM,1").unwrap();
/// assert_eq!(msg.action, Action::Add);
/// assert_eq!(msg.side, Side::Bid);
/// assert_eq!(msg.price, 10_500_000_000);
/// ```
pub fn decode(line: &str) -> Result<MboMessage, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);

    let mut cols = [""; FIELD_COUNT];
    let mut found = 0usize;
    for col in line.split(',') {
        if found < FIELD_COUNT {
            cols[found] = col;
        }
        found += 1;
    }
    if found != FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            expected: FIELD_COUNT,
            found,
        });
    }

    let action = single_char("action", cols[5])?;
    let action = ascii(action)
        .and_then(Action::from_byte)
        .ok_or(DecodeError::UnknownAction(action))?;

    let side = single_char("side", cols[6])?;
    let side = ascii(side)
        .and_then(Side::from_byte)
        .ok_or(DecodeError::UnknownSide(side))?;

    let rtype = number("rtype", cols[2])?;
    let publisher_id = number("publisher_id", cols[3])?;
    let instrument_id = number("instrument_id", cols[4])?;
    let depth = number("depth", cols[7])?;
    let price = parse_price_field(cols[8])?;
    let size = number("size", cols[9])?;
    // Superseded by the trailing column but still validated.
    let _leading_order_id: u64 = number("order_id", cols[10])?;
    let flags = number("flags", cols[11])?;
    let ts_in_delta = number("ts_in_delta", cols[12])?;
    let sequence = number("sequence", cols[13])?;
    let order_id = number("order_id", cols[15])?;

    Ok(MboMessage {
        ts_recv: cols[0].to_string(),
        ts_event: cols[1].to_string(),
        rtype,
        publisher_id,
        instrument_id,
        action,
        side,
        depth,
        price,
        size,
        flags,
        ts_in_delta,
        sequence,
        symbol: cols[14].to_string(),
        order_id,
    })
}

impl FromStr for MboMessage {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

#[inline]
fn number<T: FromStr>(field: &'static str, value: &str) -> Result<T, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[inline]
fn single_char(field: &'static str, value: &str) -> Result<char, DecodeError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(DecodeError::InvalidChar {
            field,
            value: value.to_string(),
        }),
    }
}

#[inline]
fn ascii(c: char) -> Option<u8> {
    u8::try_from(c).ok().filter(u8::is_ascii)
}
