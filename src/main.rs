use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use xbm_extract::{run, ExtractConfig, ScanPolicy};

/// Extract XBM bitmap definitions from a serial console dump.
///
/// Reads `dump_powrmenu.txt` from the current directory and writes each
/// bitmap to `out/pwr_NN.xbm`.
#[derive(Parser)]
#[command(name = "xbm-extract", version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Fail on nested headers, stray closing markers and unterminated bitmaps
    #[arg(long)]
    strict: bool,

    /// Skip writing out/manifest.json
    #[arg(long)]
    no_manifest: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let policy = if cli.strict {
        ScanPolicy::Strict
    } else {
        ScanPolicy::Lenient
    };
    let config = ExtractConfig::new()
        .policy(policy)
        .write_manifest(!cli.no_manifest);

    let summary = run(&config).with_context(|| {
        format!(
            "Failed to extract bitmaps from {} into {}",
            config.input.display(),
            config.output_dir.display()
        )
    })?;

    println!(
        "Extracted {} chunk(s) into {}/",
        summary.artifacts.len(),
        config.output_dir.display()
    );

    Ok(())
}
