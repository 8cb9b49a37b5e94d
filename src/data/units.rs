use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Milliseconds per minute; the x axis of every series is in minutes.
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Latency logs record microseconds; plots show them divided by this.
pub const LATENCY_DIVISOR: f64 = 1_000_000.0;

// ---------------------------------------------------------------------------
// SizeUnit
// ---------------------------------------------------------------------------

/// Byte-scale units accepted for input and output values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SizeUnit {
    #[default]
    #[serde(alias = "B")]
    #[value(name = "B", alias = "Bytes")]
    Bytes,
    #[value(name = "MiB")]
    MiB,
    #[value(name = "GiB")]
    GiB,
}

impl SizeUnit {
    /// Number of bytes in one unit.
    pub fn scale(self) -> f64 {
        match self {
            SizeUnit::Bytes => 1.0,
            SizeUnit::MiB => (1u64 << 20) as f64,
            SizeUnit::GiB => (1u64 << 30) as f64,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SizeUnit::Bytes => "B",
            SizeUnit::MiB => "MiB",
            SizeUnit::GiB => "GiB",
        };
        f.write_str(name)
    }
}

impl FromStr for SizeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "B" | "Bytes" => Ok(SizeUnit::Bytes),
            "MiB" => Ok(SizeUnit::MiB),
            "GiB" => Ok(SizeUnit::GiB),
            other => Err(format!("unknown unit '{other}', expected B, MiB or GiB")),
        }
    }
}

/// Convert `value` from one byte-scale unit to another.
pub fn normalize(value: f64, from: SizeUnit, to: SizeUnit) -> f64 {
    let bytes = value * from.scale();
    bytes / to.scale()
}

// ---------------------------------------------------------------------------
// Conversion – how a source's value column becomes a y value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Byte-scale values, e.g. throughput or cache occupancy.
    Size { from: SizeUnit, to: SizeUnit },
    /// Microsecond latencies, shown divided by [`LATENCY_DIVISOR`].
    Latency,
}

impl Default for Conversion {
    fn default() -> Self {
        Conversion::Size {
            from: SizeUnit::Bytes,
            to: SizeUnit::Bytes,
        }
    }
}

impl Conversion {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Conversion::Size { from, to } => normalize(value, from, to),
            Conversion::Latency => value / LATENCY_DIVISOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SizeUnit; 3] = [SizeUnit::Bytes, SizeUnit::MiB, SizeUnit::GiB];

    #[test]
    fn round_trip_every_unit_pair() {
        for &a in &ALL {
            for &b in &ALL {
                for v in [0.0, 1.0, 3.5, 123_456_789.0, 1e-3] {
                    let back = normalize(normalize(v, a, b), b, a);
                    assert!((back - v).abs() <= v.abs() * 1e-12, "{a} -> {b}: {v} became {back}");
                }
            }
        }
    }

    #[test]
    fn mib_to_bytes_and_gib() {
        assert_eq!(normalize(1.0, SizeUnit::MiB, SizeUnit::Bytes), 1_048_576.0);
        assert_eq!(normalize(1024.0, SizeUnit::MiB, SizeUnit::GiB), 1.0);
    }

    #[test]
    fn latency_uses_fixed_divisor() {
        assert_eq!(Conversion::Latency.apply(2_500_000.0), 2.5);
        assert_eq!(Conversion::default().apply(42.0), 42.0);
    }

    #[test]
    fn parses_script_style_names() {
        assert_eq!("B".parse::<SizeUnit>(), Ok(SizeUnit::Bytes));
        assert_eq!("GiB".parse::<SizeUnit>(), Ok(SizeUnit::GiB));
        assert!("KiB".parse::<SizeUnit>().is_err());
    }
}
