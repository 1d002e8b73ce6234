//! Replay one MBO record file and report what the book looked like at the end.
//!
//! Snapshot lines are discarded here; use the `reconstruct` binary to keep them.
//!
//! Usage:
//! ```bash
//! cargo run --release --example replay_file <path_to_records.csv> [depth]
//! ```

use mbo_book_replay::price::format_price;
use mbo_book_replay::{LineSource, Replayer, DEFAULT_DEPTH};
use std::env;
use std::io;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <path_to_records.csv> [depth]", args[0]);
        std::process::exit(1);
    }

    let depth = match args.get(2) {
        Some(value) => value.parse()?,
        None => DEFAULT_DEPTH,
    };

    let source = LineSource::open(&args[1])?;
    let mut replayer = Replayer::new(depth);
    let summary = replayer.run(source, &mut io::sink())?;

    println!("Lines read:      {}", summary.lines_read);
    println!("Records decoded: {}", summary.records_decoded);
    println!("Records dropped: {}", summary.records_dropped);
    println!(
        "Adds / modifies / cancels / clears: {} / {} / {} / {}",
        summary.book.adds, summary.book.modifies, summary.book.cancels, summary.book.clears
    );
    println!();

    let book = replayer.book();
    let snapshot = book.snapshot(depth);
    println!("Resting orders: {}", book.order_count());
    let side = |price: Option<i64>| price.map_or_else(|| "-".to_string(), format_price);
    println!(
        "Top of book: {} x {}",
        side(snapshot.best_bid()),
        side(snapshot.best_ask())
    );
    if let Some(spread) = snapshot.spread() {
        println!("Spread: {spread:.6}");
    }

    Ok(())
}
