use std::{
    fs::{self, File},
    io::{stdout, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use cache_sim::{
    cache::DirectMappedCache,
    config::{check_sizes, CacheConfig},
    sim,
    stat::Report,
    trace,
};
use clap::Parser;

/// Simulates a direct-mapped cache over a trace of memory addresses.
///
/// Prints `<address> Hit|Miss` for every access and writes the hit/miss rate
/// summary to the output file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Size of main memory
    mem_size: u64,
    /// Size of the cache
    cache_size: u64,
    /// File path to whitespace-separated access addresses
    access_file: PathBuf,
    /// Size of a block (cache line)
    #[arg(long, default_value_t = 1)]
    block_size: u64,
    /// File path to the summary output
    #[arg(short, long, default_value = "hitmiss-out.txt")]
    output: PathBuf,
    /// Print the statistics as JSON after the access lines
    #[arg(long)]
    json: bool,
    /// Fail on anything in the access file that is not an address
    #[arg(long)]
    strict: bool,
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            std::process::exit(usage_exit_code(&e));
        }
    };
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::init();
    }
    let stdout = stdout();
    run(&args, BufWriter::new(stdout.lock()))?;
    Ok(())
}

/// `--help` and `--version` succeed, every other parse failure is a usage error.
fn usage_exit_code(e: &clap::Error) -> i32 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

fn run(args: &Cli, mut out: impl Write) -> Result<Report> {
    check_sizes(args.mem_size, args.cache_size)?;
    let config = CacheConfig::new(args.cache_size, args.mem_size, args.block_size)?;
    log::info!("{config}");

    let content = fs::read(&args.access_file).with_context(|| {
        format!("Error opening access file: {}", args.access_file.display())
    })?;
    let trace = trace::parse(&content);
    if args.strict {
        trace.check_complete()?;
    } else if let Some(token) = trace.trailing_token() {
        log::warn!(
            "ignoring access file from `{token}` on: not an address. ({} addresses read)",
            trace.len()
        );
    }
    log::info!("read {} addresses.", trace.len());

    let mut cache = DirectMappedCache::new(config);
    let report = sim::simulate(&mut cache, trace.into_addresses(), &mut out)?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
        out.flush()?;
    }
    log::info!("statistics:\n{}", report.view());

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let mut file = BufWriter::new(file);
    report.write_summary(&mut file)?;
    file.flush()?;
    Ok(report)
}
