use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bench_panda::sample::{write_log, SampleProfile, SimpleRng};
use clap::Parser;

/// Write synthetic benchmark logs for trying out the plots.
#[derive(Debug, Parser)]
struct Args {
    /// Directory the logs are written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Rows per log.
    #[arg(long, default_value_t = 600)]
    rows: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let profiles = [
        (
            "throughput.csv",
            SampleProfile {
                label: "Throughput",
                rows: args.rows,
                interval_ms: 1000.0,
                base: 512.0 * 1024.0 * 1024.0,
                drift_per_minute: -4.0 * 1024.0 * 1024.0,
                noise: 16.0 * 1024.0 * 1024.0,
                zero_every: None,
            },
        ),
        (
            "throughput_tuned.csv",
            SampleProfile {
                label: "Throughput",
                rows: args.rows,
                interval_ms: 1000.0,
                base: 640.0 * 1024.0 * 1024.0,
                drift_per_minute: -1.0 * 1024.0 * 1024.0,
                noise: 12.0 * 1024.0 * 1024.0,
                zero_every: None,
            },
        ),
        (
            "latency.csv",
            SampleProfile {
                label: "Get Latency",
                rows: args.rows,
                interval_ms: 500.0,
                base: 1_800_000.0,
                drift_per_minute: 25_000.0,
                noise: 150_000.0,
                zero_every: Some(40),
            },
        ),
    ];

    for (name, profile) in &profiles {
        let path = args.out_dir.join(name);
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        write_log(file, profile, &mut rng).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {} rows of '{}' to {}", profile.rows, profile.label, path.display());
    }
    Ok(())
}
