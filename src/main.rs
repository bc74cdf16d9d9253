use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pi::Computation;
use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::{prelude::*, EnvFilter};

mod cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let _trace_guard = init_tracing(&args);

    let progress = if args.progress {
        ProgressBar::new(0).with_style(ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} terms ({eta})",
        )?)
    } else {
        ProgressBar::hidden()
    };

    let pi = Computation::new(args.digits, args.algo)
        .threads(args.threads)
        .guard_bits(args.guard_bits)
        .memory_limit(args.memory_limit)
        .progress(progress.clone())
        .run_to_string()
        .with_context(|| format!("computing {} digits of pi with {}", args.digits, args.algo))?;

    progress.finish_and_clear();
    println!("{pi}");

    Ok(())
}

fn init_tracing(args: &cli::Args) -> Option<FlushGuard> {
    let default = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let (chrome, guard) = match &args.trace {
        Some(path) => {
            let (layer, guard) = ChromeLayerBuilder::new().file(path).build();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(chrome)
        .init();

    guard
}
