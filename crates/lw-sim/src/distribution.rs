//! Batch distribution simulation
//!
//! Draws are split into fixed-size chunks. Chunk `k` reads ChaCha stream `k`
//! of the run's seed, so a report depends only on the seed and draw count,
//! never on how many threads ran it, and no two (seed, chunk) pairs share
//! draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use lw_wheel::{SegmentCatalog, WeightedSelector};

use crate::error::{SimError, SimResult};

/// Draws per chunk
pub const CHUNK_SIZE: u64 = 65_536;

/// Simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub draws: u64,
    pub seed: u64,
    /// Worker threads (None = one per logical CPU)
    pub threads: Option<usize>,
}

impl DistributionConfig {
    pub fn new(draws: u64, seed: u64) -> Self {
        Self {
            draws,
            seed,
            threads: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self::new(1_000_000, 42)
    }
}

/// Observed vs expected for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub index: usize,
    pub id: u32,
    pub label: String,
    pub expected_probability: f64,
    pub observed_count: u64,
    pub observed_probability: f64,
}

impl SegmentStats {
    /// Observed minus expected probability
    pub fn deviation(&self) -> f64 {
        self.observed_probability - self.expected_probability
    }
}

/// Result of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub draws: u64,
    pub seed: u64,
    pub segments: Vec<SegmentStats>,
    /// Pearson statistic over segments with non-zero expectation
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
}

impl DistributionReport {
    /// Largest absolute probability deviation across segments
    pub fn max_abs_deviation(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.deviation().abs())
            .fold(0.0, f64::max)
    }

    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Distribution: {} draws, seed {}\n",
            self.draws, self.seed
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:>3}  {:>3}  {:<18} {:>10} {:>10} {:>12} {:>9}\n",
            "#", "id", "label", "expected", "observed", "count", "dev"
        ));
        for s in &self.segments {
            output.push_str(&format!(
                "{:>3}  {:>3}  {:<18} {:>10.6} {:>10.6} {:>12} {:>+9.6}\n",
                s.index,
                s.id,
                s.label,
                s.expected_probability,
                s.observed_probability,
                s.observed_count,
                s.deviation()
            ));
        }
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "chi-square {:.4} (df {}), max |dev| {:.6}\n",
            self.chi_square,
            self.degrees_of_freedom,
            self.max_abs_deviation()
        ));
        output
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }
}

/// Segment hit counts for the `len` draws of chunk `chunk`
fn run_chunk(selector: &WeightedSelector, seed: u64, chunk: u64, len: u64) -> SimResult<Vec<u64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(chunk);
    let mut counts = vec![0u64; selector.len()];
    for _ in 0..len {
        let index = selector.select(rng.random::<f64>())?;
        counts[index] += 1;
    }
    Ok(counts)
}

fn count_hits(selector: &WeightedSelector, config: &DistributionConfig) -> SimResult<Vec<u64>> {
    let chunks = config.draws.div_ceil(CHUNK_SIZE);
    let per_chunk: Vec<Vec<u64>> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let len = CHUNK_SIZE.min(config.draws - chunk * CHUNK_SIZE);
            run_chunk(selector, config.seed, chunk, len)
        })
        .collect::<SimResult<_>>()?;

    let mut totals = vec![0u64; selector.len()];
    for counts in per_chunk {
        for (total, count) in totals.iter_mut().zip(counts) {
            *total += count;
        }
    }
    Ok(totals)
}

/// Run `config.draws` weighted selections over `catalog`
pub fn simulate_distribution(
    catalog: &SegmentCatalog,
    config: &DistributionConfig,
) -> SimResult<DistributionReport> {
    if config.draws == 0 {
        return Err(SimError::InvalidArgument("draw count must be positive".into()));
    }

    let selector = WeightedSelector::for_catalog(catalog)?;
    let threads = config.threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    log::info!(
        "Simulating {} draws over {} segments on {} threads (seed {})",
        config.draws,
        catalog.len(),
        threads,
        config.seed
    );

    let counts = pool.install(|| count_hits(&selector, config))?;

    let n = config.draws as f64;
    let probabilities = selector.probabilities();
    let mut chi_square = 0.0;
    let mut positive = 0usize;
    let segments: Vec<SegmentStats> = catalog
        .iter()
        .map(|(index, segment)| {
            let expected_probability = probabilities[index];
            let observed_count = counts[index];
            if expected_probability > 0.0 {
                let expected = expected_probability * n;
                chi_square += (observed_count as f64 - expected).powi(2) / expected;
                positive += 1;
            }
            SegmentStats {
                index,
                id: segment.id,
                label: segment.label.clone(),
                expected_probability,
                observed_count,
                observed_probability: observed_count as f64 / n,
            }
        })
        .collect();

    log::debug!("Chi-square {:.4} over {} live segments", chi_square, positive);

    Ok(DistributionReport {
        draws: config.draws,
        seed: config.seed,
        segments,
        chi_square,
        degrees_of_freedom: positive.saturating_sub(1),
    })
}
