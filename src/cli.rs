use std::path::PathBuf;

use clap::Parser;
use pi::{memory::parse_memory_limit, precision::DEFAULT_GUARD_BITS, Algorithm};

/// Compute the digits of π.
#[derive(Parser, Debug)]
#[command(name = "pi", version, about)]
pub struct Args {
    /// Decimal digits after the point. Accepts `_` separators and K/M/G suffixes.
    #[arg(default_value = "60", env = "PI_DIGITS", value_parser = parse_digits)]
    pub digits: u64,

    /// Series used to compute π.
    #[arg(short, long, value_enum, default_value_t = Algorithm::BinarySplitting)]
    pub algo: Algorithm,

    /// Worker threads, 0 for one per core.
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Bits of precision carried beyond what the digits strictly need.
    #[arg(long, default_value_t = DEFAULT_GUARD_BITS)]
    pub guard_bits: u32,

    /// Refuse to start if the estimated memory exceeds this (e.g. 512M, 8G).
    #[arg(long, value_parser = parse_memory_limit)]
    pub memory_limit: Option<usize>,

    /// Show a progress bar on stderr.
    #[arg(long)]
    pub progress: bool,

    /// Write a Chrome trace of the run to this file.
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// More logging, repeat for more detail. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a digit count such as `1000`, `1_000_000` or `10K`.
pub fn parse_digits(s: &str) -> Result<u64, String> {
    let cleaned = s.trim().replace('_', "").to_ascii_uppercase();

    let (num, multiplier) = if let Some(n) = cleaned.strip_suffix('K') {
        (n, 1_000)
    } else if let Some(n) = cleaned.strip_suffix('M') {
        (n, 1_000_000)
    } else if let Some(n) = cleaned.strip_suffix('G') {
        (n, 1_000_000_000)
    } else {
        (cleaned.as_str(), 1)
    };

    let value: u64 = num
        .parse()
        .map_err(|_| format!("\"{s}\" is not a digit count"))?;

    let digits = value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("\"{s}\" is too many digits"))?;

    if digits == 0 {
        return Err("digit count must be at least 1".to_string());
    }
    Ok(digits)
}
