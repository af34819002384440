//! Inspect the libbladeRF macro table exported by bladerf-shim
//!
//! # Usage Examples
//!
//! ## Dump the pinned table
//! ```bash
//! bladerf-table list
//! bladerf-table list --json
//! ```
//!
//! ## Check an installed header before upgrading libbladeRF
//! ```bash
//! bladerf-table -v verify /usr/include/libbladeRF.h
//! ```
//!
//! ## Encode a channel
//! ```bash
//! bladerf-table channel tx 1
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bladerf_shim::{Channel, Direction, LIBBLADERF_API_VERSION, MACROS, MacroDef};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inspect and verify the libbladeRF macro table",
    long_about = None
)]
struct Args {
    /// Verbosity level (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every re-exported macro with its pinned value
    List {
        /// Output one JSON array instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compare a libbladeRF.h against the pinned values
    Verify {
        /// Path to libbladeRF.h
        header: PathBuf,
    },
    /// Encode a zero-based channel index
    Channel {
        #[arg(value_enum)]
        direction: DirectionArg,
        /// Zero-based channel index (not range checked)
        #[arg(allow_hyphen_values = true)]
        index: i32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Rx,
    Tx,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Rx => Direction::Rx,
            DirectionArg::Tx => Direction::Tx,
        }
    }
}

/// JSON row for one macro
#[derive(Debug, Clone, Serialize)]
struct MacroRow {
    /// Name in libbladeRF.h
    r#macro: &'static str,
    /// Exported C symbol
    symbol: &'static str,
    /// C type, e.g. "uint32_t"
    r#type: &'static str,
    /// Value as a hex string of the type's width
    value: String,
}

impl From<&MacroDef> for MacroRow {
    fn from(def: &MacroDef) -> Self {
        MacroRow {
            r#macro: def.macro_name,
            symbol: def.symbol,
            r#type: def.ty.c_name(),
            value: def.hex(),
        }
    }
}

fn list(json: bool) -> bladerf_shim::Result<()> {
    let rows: Vec<MacroRow> = MACROS.iter().map(MacroRow::from).collect();
    if json {
        let out = serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string());
        println!("{}", out);
        return Ok(());
    }

    println!("# libbladeRF API version {:#010x}", LIBBLADERF_API_VERSION);
    for row in rows {
        println!(
            "{:<40} {:<28} {:<10} {}",
            row.r#macro, row.symbol, row.r#type, row.value
        );
    }
    Ok(())
}

fn verify(header: &Path) -> bladerf_shim::Result<()> {
    info!("checking {}", header.display());
    let report = bladerf_shim::verify_file(header)?;

    match report.header_version {
        Some(v) if report.version_matches() => println!("API version {:#010x} (pinned)", v),
        Some(v) => println!(
            "API version {:#010x} differs from pinned {:#010x}",
            v, LIBBLADERF_API_VERSION
        ),
        None => println!("LIBBLADERF_API_VERSION not defined"),
    }
    for (def, found) in &report.drifted {
        println!(
            "DRIFT   {:<40} pinned {} header {:#x}",
            def.macro_name,
            def.hex(),
            found
        );
    }
    for def in &report.missing {
        println!("MISSING {}", def.macro_name);
    }
    println!(
        "{} matched, {} drifted, {} missing",
        report.matched.len(),
        report.drifted.len(),
        report.missing.len()
    );

    report.ensure_clean()
}

/// One-line description of an encoded channel, e.g. `TX2 raw=3 (0x3) is_tx=1`
fn format_channel(direction: Direction, index: i32) -> String {
    let ch = Channel::new(index, direction);
    format!(
        "{} raw={} ({:#x}) is_tx={}",
        ch,
        ch.raw(),
        ch.raw(),
        bladerf_shim::channel_is_tx(ch.raw())
    )
}

/// Execute one subcommand; any drift or missing macro is an error.
fn run(command: Command) -> bladerf_shim::Result<()> {
    match command {
        Command::List { json } => list(json),
        Command::Verify { header } => verify(&header),
        Command::Channel { direction, index } => {
            println!("{}", format_channel(direction.into(), index));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing with verbosity level
    // 0 = WARN (quiet), 1 = INFO, 2 = DEBUG, 3+ = TRACE
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
