//! CLI tool for replaying an MBO record file into depth snapshots.
//!
//! Reads one record per line, rebuilds the book after each event and writes
//! one snapshot line per decoded record. Malformed lines are skipped.
//!
//! # Usage
//!
//! ```bash
//! # Snapshots to stdout
//! cargo run --release --bin reconstruct -- data/ESZ4.mbo.csv > book.csv
//!
//! # Five levels per side, written to a file
//! cargo run --release --bin reconstruct -- data/ESZ4.mbo.csv --depth 5 --output book.csv
//!
//! # Show skipped lines
//! RUST_LOG=debug cargo run --release --bin reconstruct -- data/ESZ4.mbo.csv
//! ```

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use mbo_book_replay::source::IO_BUFFER_SIZE;
use mbo_book_replay::{BookConfig, LineSource, Replayer, Result, DEFAULT_DEPTH};

/// Command-line arguments
struct Args {
    /// Input record file
    input: PathBuf,
    /// Output file (stdout when absent)
    output: Option<PathBuf>,
    /// Levels per side
    depth: usize,
}

fn parse_args() -> std::result::Result<Args, String> {
    let args: Vec<String> = env::args().collect();

    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut depth = DEFAULT_DEPTH;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--depth" | "-d" => {
                i += 1;
                let value = args.get(i).ok_or("--depth requires a number")?;
                depth = value
                    .parse()
                    .map_err(|_| format!("Invalid depth: {value}"))?;
            }
            "--output" | "-o" => {
                i += 1;
                let value = args.get(i).ok_or("--output requires a path")?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("Unknown option: {arg}"));
            }
            arg => {
                if input.is_some() {
                    return Err(format!("Unexpected argument: {arg}"));
                }
                input = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    let input = input.ok_or("Input path is required")?;
    BookConfig::new(depth)
        .validate()
        .map_err(|e| e.to_string())?;

    Ok(Args {
        input,
        output,
        depth,
    })
}

fn print_help() {
    println!(
        r#"reconstruct - rebuild order book snapshots from MBO records

USAGE:
    reconstruct <INPUT> [OPTIONS]

ARGS:
    <INPUT>    Comma-delimited MBO record file

OPTIONS:
    -d, --depth <N>        Levels per side [default: {DEFAULT_DEPTH}]
    -o, --output <PATH>    Write snapshots to PATH instead of stdout
    -h, --help             Print this help

ENVIRONMENT:
    RUST_LOG               Log filter for stderr diagnostics [default: info]"#
    );
}

fn run(args: &Args) -> Result<()> {
    let config = BookConfig::new(args.depth);
    let source = LineSource::open(&args.input)?;
    let mut replayer = Replayer::with_config(config);

    let summary = match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, file);
            replayer.run(source, &mut writer)?
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, stdout.lock());
            let summary = replayer.run(source, &mut writer)?;
            writer.flush()?;
            summary
        }
    };

    log::debug!(
        "Read {} lines, decoded {}, dropped {}",
        summary.lines_read,
        summary.records_decoded,
        summary.records_dropped
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {}: {e}", args.input.display());
        process::exit(1);
    }
}
