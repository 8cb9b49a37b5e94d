//! Deterministic synthetic benchmark logs and random payloads.

use std::io::Write;

use csv::Writer;

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Shape of one synthetic log.
#[derive(Debug, Clone)]
pub struct SampleProfile {
    pub label: &'static str,
    pub rows: usize,
    pub interval_ms: f64,
    pub base: f64,
    /// Added per minute of run time.
    pub drift_per_minute: f64,
    pub noise: f64,
    /// Every n-th sample is written as `0` (an incomplete reading).
    pub zero_every: Option<usize>,
}

/// Write `profile` as `timestamp_ms,label,value` rows.
///
/// One row with an unparseable value is included so the loader's skip path
/// shows up in manual runs.
pub fn write_log<W: Write>(out: W, profile: &SampleProfile, rng: &mut SimpleRng) -> csv::Result<()> {
    let mut writer = Writer::from_writer(out);
    for i in 0..profile.rows {
        let t = i as f64 * profile.interval_ms;
        let minutes = t / 60_000.0;
        let value = match profile.zero_every {
            Some(n) if n > 0 && i % n == n - 1 => 0.0,
            _ => (profile.base + profile.drift_per_minute * minutes + rng.gauss(0.0, profile.noise)).max(1.0),
        };
        writer.write_record([format!("{t}"), profile.label.to_string(), format!("{:.0}", value)])?;
        if i == profile.rows / 2 {
            writer.write_record([format!("{t}"), profile.label.to_string(), "n/a".to_string()])?;
        }
    }
    writer.flush()?;
    Ok(())
}
