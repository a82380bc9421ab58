//! Generate a synthetic per-mille income bracket CSV.
//!
//! Draws a log-normal income sample, splits it into 1000 equal-population
//! brackets from the bottom up, and writes one row per bracket with the
//! National Tax Service column names (구분 = bracket index, 인원 = headcount,
//! 총급여 = aggregate salary in 100-million-won units). Deterministic seed,
//! so the output is reproducible.

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    const BRACKETS: usize = 1000;
    const PER_BRACKET: usize = 200;

    // Log-normal annual incomes in won: median ~ 32M, long right tail.
    let mut incomes: Vec<f64> = (0..BRACKETS * PER_BRACKET)
        .map(|_| rng.gauss(17.3, 0.7).exp())
        .collect();
    incomes.sort_by(|a, b| a.total_cmp(b));

    let output_path = "sample_income_brackets.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["구분", "인원", "총급여"])?;

    for (i, chunk) in incomes.chunks(PER_BRACKET).enumerate() {
        let aggregate_won: f64 = chunk.iter().sum();
        // File unit is 100 million won, matching the NTS source.
        let aggregate = aggregate_won / 1e8;
        writer.write_record([
            (i + 1).to_string(),
            chunk.len().to_string(),
            format!("{aggregate:.4}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {BRACKETS} brackets ({PER_BRACKET} people each) to {output_path}");
    Ok(())
}
