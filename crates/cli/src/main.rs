//! Tagged entry trace replayer.
//!
//! This binary drives a single entry through a sequence of operations and
//! prints the outcome of each one. It is meant for checking a tag
//! configuration by hand:
//! 1. **Configuration:** Load a JSON tag configuration, or use a line size.
//! 2. **Replay:** Apply `insert`, `match`, `invalidate` and `show` in order.
//! 3. **Report:** Print one line per operation, or a JSON report.

use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use thiserror::Error;

use tagsim_core::cache::{CacheEntry, LineTagExtractor, SectorEntry, TaggedEntry};
use tagsim_core::common::addr::floor_log2;
use tagsim_core::config::TagConfig;

#[derive(Parser, Debug)]
#[command(
    name = "tagsim",
    author,
    version,
    about = "Replay operations against a tagged cache entry",
    long_about = "Replay insert/match/invalidate operations against one entry.\n\nExamples:\n  tagsim insert:0x1000 match:0x1002 match:0x1040 invalidate insert:0x2000\n  tagsim --config l1d.json insert:0x8000_0000 show\n  tagsim --line-bytes 4096 --json insert:0x1234 match:0x1fff"
)]
struct Cli {
    /// JSON tag configuration file.
    #[arg(short, long, conflicts_with = "line_bytes")]
    config: Option<String>,

    /// Line size in bytes when no configuration file is given.
    #[arg(long, default_value_t = 64)]
    line_bytes: u64,

    /// Emit a JSON report instead of text.
    #[arg(long)]
    json: bool,

    /// Operations: insert:<addr>, match:<addr>, fill:<addr>, invalidate, show.
    #[arg(required = true)]
    ops: Vec<String>,
}

/// One parsed trace operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Insert(u64),
    Match(u64),
    Fill(u64),
    Invalidate,
    Show,
}

/// Entry under replay; sector entries are used when the config has sectors.
enum Replay {
    Plain(CacheEntry),
    Sector(SectorEntry),
}

impl Replay {
    fn entry(&self) -> &dyn TaggedEntry {
        match self {
            Self::Plain(e) => e,
            Self::Sector(e) => e,
        }
    }

    fn entry_mut(&mut self) -> &mut dyn TaggedEntry {
        match self {
            Self::Plain(e) => e,
            Self::Sector(e) => e,
        }
    }
}

/// Why a replay stopped.
#[derive(Debug, Error)]
enum ReplayError {
    /// Bad operation syntax or configuration; nothing was replayed.
    #[error("{0}")]
    Usage(String),

    /// An operation was rejected by the entry.
    #[error("{0}")]
    Fault(String),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

impl ReplayError {
    /// Process exit code: 2 for usage errors, 1 for a rejected operation.
    const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Fault(_) | Self::Io(_) => 1,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let stdout = io::stdout();
    if let Err(err) = run(&cli, &mut stdout.lock()) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Replays every operation of `cli`, writing the report to `out`.
///
/// Text output is written as each operation completes, so a rejected operation
/// leaves the lines of the operations before it in `out`.
fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), ReplayError> {
    let ops = cli
        .ops
        .iter()
        .map(|s| parse_op(s))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ReplayError::Usage)?;

    let mut replay = build_entry(cli).map_err(ReplayError::Usage)?;

    let mut report = Vec::with_capacity(ops.len());
    for op in ops {
        let outcome = apply(&mut replay, op).map_err(|msg| {
            tracing::error!(?op, "replay aborted");
            ReplayError::Fault(msg)
        })?;
        if cli.json {
            report.push(json!({
                "op": format!("{op:?}"),
                "result": outcome,
                "valid": replay.entry().is_valid(),
                "tag": format!("{:#x}", replay.entry().tag()),
            }));
        } else {
            writeln!(out, "{:<24} {outcome}", format!("{op:?}"))?;
        }
    }

    if cli.json {
        writeln!(out, "{}", json!({ "ops": report, "entry": replay.entry().to_string() }))?;
    }
    Ok(())
}

/// Builds the entry from `--config` or `--line-bytes`.
fn build_entry(cli: &Cli) -> Result<Replay, String> {
    let Some(path) = &cli.config else {
        let shift = match floor_log2(cli.line_bytes) {
            Some(shift) if cli.line_bytes.is_power_of_two() => shift,
            _ => return Err(format!("--line-bytes {} is not a power of two", cli.line_bytes)),
        };
        return Ok(Replay::Plain(CacheEntry::new(Arc::new(LineTagExtractor::new(shift)))));
    };

    let config = TagConfig::from_file(path).map_err(|e| format!("{path}: {e}"))?;
    let extractor = config.build_extractor().map_err(|e| e.to_string())?;
    match config.sector {
        Some(sector) => {
            let geometry = sector.geometry().map_err(|e| e.to_string())?;
            Ok(Replay::Sector(SectorEntry::new(extractor, geometry)))
        }
        None => Ok(Replay::Plain(CacheEntry::new(extractor))),
    }
}

/// Applies one operation, returning its printable outcome.
///
/// A rejected insert or fill is returned as `Err` so the replay stops the way
/// a simulator would.
fn apply(replay: &mut Replay, op: Op) -> Result<String, String> {
    match op {
        Op::Insert(addr) => {
            let entry = replay.entry_mut();
            entry.try_insert(addr).map_err(|e| e.to_string())?;
            Ok(format!("tag {:#x}", entry.tag()))
        }
        Op::Match(addr) => Ok(if replay.entry().matches(addr) {
            "hit".to_string()
        } else {
            "miss".to_string()
        }),
        Op::Fill(addr) => match replay {
            Replay::Sector(entry) => {
                entry.try_fill_sector(addr).map_err(|e| e.to_string())?;
                Ok(format!("sectors {:#b}", entry.valid_mask()))
            }
            Replay::Plain(_) => Err("fill requires a sector configuration".to_string()),
        },
        Op::Invalidate => {
            replay.entry_mut().invalidate();
            Ok("invalid".to_string())
        }
        Op::Show => Ok(replay.entry().to_string()),
    }
}

/// Parses `insert:<addr>`, `match:<addr>`, `fill:<addr>`, `invalidate`, `show`.
fn parse_op(s: &str) -> Result<Op, String> {
    let (name, arg) = match s.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (s, None),
    };
    match (name, arg) {
        ("insert", Some(a)) => parse_addr(a).map(Op::Insert),
        ("match", Some(a)) => parse_addr(a).map(Op::Match),
        ("fill", Some(a)) => parse_addr(a).map(Op::Fill),
        ("invalidate", None) => Ok(Op::Invalidate),
        ("show", None) => Ok(Op::Show),
        _ => Err(format!("unrecognised operation '{s}'")),
    }
}

/// Parses a decimal or `0x` hexadecimal address; `_` separators are allowed.
fn parse_addr(s: &str) -> Result<u64, String> {
    let cleaned = s.replace('_', "");
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.parse(),
    };
    parsed.map_err(|e| format!("bad address '{s}': {e}"))
}
