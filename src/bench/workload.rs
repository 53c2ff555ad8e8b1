//! Seeded key and query generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{BenchConfig, BenchmarkKind, KeyDistribution};

/// Input for one benchmark iteration. All structures see the same workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub seed: u64,
    /// Keys to insert, possibly with duplicates.
    pub keys: Vec<u32>,
    /// Point lookups for [`BenchmarkKind::Search`].
    pub queries: Vec<u32>,
    /// Inclusive `(from, to)` ranges, `from <= to`, for
    /// [`BenchmarkKind::RangeSearch`].
    pub ranges: Vec<(u32, u32)>,
}

impl Workload {
    pub fn generate(config: &BenchConfig, seed: u64) -> Self {
        let n = config.key_count();
        let mut rng = StdRng::seed_from_u64(seed);
        let max = match config.distribution {
            KeyDistribution::Dense => u32::try_from(n.saturating_sub(1)).unwrap_or(u32::MAX),
            KeyDistribution::Sparse => u32::MAX,
        };

        let keys: Vec<u32> = (0..n).map(|_| rng.gen_range(0..=max)).collect();

        let mut queries = Vec::new();
        let mut ranges = Vec::new();
        match config.kind {
            BenchmarkKind::Insert => {}
            BenchmarkKind::Search => {
                // Every lookup targets an inserted key.
                queries.reserve(n);
                queries.extend((0..n).map(|_| keys[rng.gen_range(0..n)]));
            }
            BenchmarkKind::RangeSearch => {
                ranges.reserve(n);
                ranges.extend((0..n).map(|_| {
                    let a = rng.gen_range(0..=max);
                    let b = rng.gen_range(0..=max);
                    (a.min(b), a.max(b))
                }));
            }
        }

        Self {
            seed,
            keys,
            queries,
            ranges,
        }
    }

    /// Operations counted by the measured phase.
    pub fn operation_count(&self, kind: BenchmarkKind) -> usize {
        match kind {
            BenchmarkKind::Insert => self.keys.len(),
            BenchmarkKind::Search => self.queries.len(),
            BenchmarkKind::RangeSearch => self.ranges.len(),
        }
    }
}
