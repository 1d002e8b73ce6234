//! Output record formatting.
//!
//! One comma-delimited line per decoded event:
//!
//! ```text
//! ts_recv,ts_event,<depth>,publisher_id,instrument_id,action,side,depth,
//! price,size,flags,ts_in_delta,sequence,
//! <bid levels: price,size,count ...>,<ask levels: price,size,count ...>,
//! symbol,order_id
//! ```
//!
//! Prices print with six fractional digits; the undefined price prints as an
//! empty field.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::price::{price_to_f64, OUTPUT_DECIMALS};
use crate::types::{BookSnapshot, MboMessage};

/// Format one output line, without the trailing newline.
pub fn format_record(msg: &MboMessage, snapshot: &BookSnapshot) -> String {
    let mut line = String::with_capacity(128 + snapshot.depth * 48);
    push_record(&mut line, msg, snapshot);
    line
}

/// Write one output line, including the trailing newline.
pub fn write_record<W: Write>(
    writer: &mut W,
    msg: &MboMessage,
    snapshot: &BookSnapshot,
) -> io::Result<()> {
    let mut line = String::with_capacity(128 + snapshot.depth * 48);
    push_record(&mut line, msg, snapshot);
    line.push('\n');
    writer.write_all(line.as_bytes())
}

/// Reusable line writer that keeps one formatting buffer alive.
#[derive(Debug, Default)]
pub struct RecordWriter {
    line: String,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format and write one line.
    pub fn write<W: Write>(
        &mut self,
        writer: &mut W,
        msg: &MboMessage,
        snapshot: &BookSnapshot,
    ) -> io::Result<()> {
        self.line.clear();
        push_record(&mut self.line, msg, snapshot);
        self.line.push('\n');
        writer.write_all(self.line.as_bytes())
    }
}

fn push_record(out: &mut String, msg: &MboMessage, snapshot: &BookSnapshot) {
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "{},{},{},{},{},{},{},{},",
        msg.ts_recv,
        msg.ts_event,
        snapshot.depth,
        msg.publisher_id,
        msg.instrument_id,
        msg.action.to_char(),
        msg.side.to_char(),
        msg.depth,
    );
    push_price(out, msg.price);
    let _ = write!(
        out,
        ",{},{},{},{}",
        msg.size, msg.flags, msg.ts_in_delta, msg.sequence
    );

    for level in snapshot.levels() {
        out.push(',');
        push_price(out, level.price);
        let _ = write!(out, ",{},{}", level.size, level.count);
    }

    let _ = write!(out, ",{},{}", msg.symbol, msg.order_id);
}

#[inline]
fn push_price(out: &mut String, price: i64) {
    if let Some(value) = price_to_f64(price) {
        let _ = write!(out, "{value:.prec$}", prec = OUTPUT_DECIMALS);
    }
}
