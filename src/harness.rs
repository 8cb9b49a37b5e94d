use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::Result;
use crate::sample::SimpleRng;
use crate::stats::{summarize, Summary};

pub const US_PER_SEC: f64 = 1_000_000.0;

/// Transfer sizes used when none are given: 65 KiB, 512 MiB, 1077 MiB.
pub const DEFAULT_TRANSFER_SIZES: [u64; 3] = [65 * 1024, 512 * 1024 * 1024, 1077 * 1024 * 1024];

pub const DEFAULT_REPEAT: usize = 100;

// ---------------------------------------------------------------------------
// Ranged sources
// ---------------------------------------------------------------------------

/// A fixed-size object that can be read by byte range.
pub trait RangedSource {
    fn size(&self) -> u64;

    /// Read `len` bytes starting at `offset`, returning how many arrived.
    fn read_range(&mut self, offset: u64, len: u64) -> io::Result<u64>;
}

/// A local file standing in for the remote object.
pub struct FileSource {
    path: PathBuf,
    size: u64,
    buf: Vec<u8>,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let size = std::fs::metadata(&path)?.len();
        Ok(Self {
            path,
            size,
            buf: vec![0; 1 << 20],
        })
    }
}

impl RangedSource for FileSource {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_range(&mut self, offset: u64, len: u64) -> io::Result<u64> {
        // Reopen per request so every transfer pays the same setup cost.
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut remaining = len;
        while remaining > 0 {
            let want = remaining.min(self.buf.len() as u64) as usize;
            let n = file.read(&mut self.buf[..want])?;
            if n == 0 {
                break;
            }
            remaining -= n as u64;
        }
        Ok(len - remaining)
    }
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// Read bytes `[0, chunk)` of `source` `repeat` times and return each
/// transfer's elapsed time in seconds.
pub fn measure_latency<S: RangedSource + ?Sized>(source: &mut S, chunk: u64, repeat: usize) -> io::Result<Vec<f64>> {
    if chunk > source.size() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("transfer size {chunk} exceeds object size {}", source.size()),
        ));
    }

    let mut times = Vec::with_capacity(repeat);
    for i in 0..repeat {
        let start = Instant::now();
        let got = source.read_range(0, chunk)?;
        let elapsed = start.elapsed().as_secs_f64();
        if got != chunk {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short read: {got} of {chunk} bytes"),
            ));
        }
        log::debug!("chunk {chunk}: iteration {} took {elapsed:.4}s", i + 1);
        times.push(elapsed);
    }
    Ok(times)
}

/// Statistics over one transfer size, printed as a markdown table.
#[derive(Debug, Clone)]
pub struct LatencyReport {
    pub chunk: u64,
    pub summary: Summary,
}

impl LatencyReport {
    pub fn from_samples(chunk: u64, samples: &[f64]) -> Result<Self> {
        Ok(Self {
            chunk,
            summary: summarize(samples)?,
        })
    }
}

impl fmt::Display for LatencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Results for chunk size {} bytes:", self.chunk)?;
        writeln!(f, "| Metric                 | Seconds    | Microseconds |")?;
        writeln!(f, "|------------------------|------------|--------------|")?;
        let rows = [
            ("Mean latency", s.mean),
            ("Geometric mean latency", s.geometric_mean),
            ("Minimum latency", s.min),
            ("Maximum latency", s.max),
            ("Standard deviation", s.stdev),
        ];
        for (name, secs) in rows {
            let (secs, micros) = if secs.is_nan() {
                ("undefined".to_string(), "undefined".to_string())
            } else {
                (format!("{secs:.4}"), format!("{}", (secs * US_PER_SEC) as u64))
            };
            writeln!(f, "| {name:<22} | {secs:<10} | {micros:<12} |")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Object population
// ---------------------------------------------------------------------------

/// Write `total` random bytes to `path` in `chunk`-sized pieces.
pub fn populate(path: &Path, total: u64, chunk: usize, seed: u64) -> io::Result<()> {
    let mut rng = SimpleRng::new(seed);
    let mut out = io::BufWriter::new(File::create(path)?);
    let mut buf = vec![0u8; chunk.max(1)];
    let mut written = 0u64;
    let iterations = total.div_ceil(buf.len() as u64);

    for i in 0..iterations {
        let n = (total - written).min(buf.len() as u64) as usize;
        rng.fill_bytes(&mut buf[..n]);
        out.write_all(&buf[..n])?;
        written += n as u64;
        log::info!("iteration {}/{iterations}: wrote {n} bytes (total {written}/{total})", i + 1);
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    struct FakeSource {
        size: u64,
        reads: usize,
    }

    impl RangedSource for FakeSource {
        fn size(&self) -> u64 {
            self.size
        }

        fn read_range(&mut self, offset: u64, len: u64) -> io::Result<u64> {
            self.reads += 1;
            Ok(len.min(self.size - offset))
        }
    }

    #[test]
    fn measures_every_repeat() {
        let mut source = FakeSource { size: 1024, reads: 0 };
        let times = measure_latency(&mut source, 512, 7).unwrap();
        assert_eq!(times.len(), 7);
        assert_eq!(source.reads, 7);
        assert!(times.iter().all(|&t| t >= 0.0));
    }

    #[test]
    fn rejects_oversized_transfer() {
        let mut source = FakeSource { size: 10, reads: 0 };
        let err = measure_latency(&mut source, 11, 1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(source.reads, 0);
    }

    #[test]
    fn populated_file_is_readable_by_range() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object.bin");
        populate(&path, 10_000, 4096, 3).unwrap();

        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.size(), 10_000);
        assert_eq!(source.read_range(0, 6000).unwrap(), 6000);
        assert_eq!(source.read_range(9000, 5000).unwrap(), 1000);
    }

    #[test]
    fn report_table_shows_microseconds() {
        let report = LatencyReport::from_samples(65 * 1024, &[0.5, 0.5]).unwrap();
        let text = report.to_string();
        assert!(text.contains("Results for chunk size 66560 bytes"));
        assert!(text.contains("| Mean latency           | 0.5000     | 500000       |"));
    }

    #[test]
    fn undefined_geometric_mean_is_spelled_out() {
        let report = LatencyReport::from_samples(1024, &[0.0, 0.0]).unwrap();
        let text = report.to_string();
        assert!(text.contains("| Geometric mean latency | undefined  | undefined    |"));
        assert!(!text.contains("NaN"));
    }
}
