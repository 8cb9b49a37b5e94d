use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bench_panda::harness::{
    measure_latency, populate, FileSource, LatencyReport, RangedSource, DEFAULT_REPEAT,
    DEFAULT_TRANSFER_SIZES,
};
use clap::Parser;

/// Object size written by --populate: 2 GiB.
const POPULATE_SIZE: u64 = 2 * 1024 * 1024 * 1024;
const POPULATE_CHUNK: usize = 10 * 1024 * 1024;

/// Time repeated ranged reads of a fixed-size object.
#[derive(Debug, Parser)]
struct Args {
    /// Object to read from.
    object: PathBuf,
    /// Transfer sizes in bytes. Defaults to 65 KiB, 512 MiB and 1077 MiB.
    #[arg(long, value_delimiter = ',')]
    sizes: Vec<u64>,
    /// Transfers per size.
    #[arg(long, default_value_t = DEFAULT_REPEAT)]
    repeat: usize,
    /// Create the object with random contents before measuring.
    #[arg(long)]
    populate: bool,
    #[arg(long, default_value_t = POPULATE_SIZE)]
    populate_size: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.repeat == 0 {
        bail!("--repeat must be at least 1");
    }

    if args.populate {
        println!("Generating '{}' of size {} bytes...", args.object.display(), args.populate_size);
        populate(&args.object, args.populate_size, POPULATE_CHUNK, 0x5eed)
            .with_context(|| format!("populating {}", args.object.display()))?;
    }

    let mut source = FileSource::open(&args.object)
        .with_context(|| format!("opening {}", args.object.display()))?;
    log::info!("object {} is {} bytes", args.object.display(), source.size());

    let sizes = if args.sizes.is_empty() {
        DEFAULT_TRANSFER_SIZES.to_vec()
    } else {
        args.sizes.clone()
    };

    for chunk in sizes {
        println!("\nBenchmarking transfer size: {chunk} bytes");
        let times = measure_latency(&mut source, chunk, args.repeat)
            .with_context(|| format!("measuring {chunk}-byte transfers"))?;

        println!("| Iteration | Time (s) |");
        println!("|-----------|----------|");
        for (i, t) in times.iter().enumerate() {
            println!("| {} |  {t:.4} |", i + 1);
        }

        let report = LatencyReport::from_samples(chunk, &times)?;
        println!("\n{report}");
    }
    Ok(())
}
