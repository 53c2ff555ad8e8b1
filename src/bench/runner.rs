//! Iteration driver.

use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::config::{BenchConfig, BenchmarkKind, Metric};
use super::workload::Workload;
use crate::error::{BenchError, ConfigError};
use crate::index::{IntIndex, SortedList, Structure};

/// Returns the number of heap bytes currently allocated by the process.
pub type MemoryProbe = fn() -> usize;

/// All samples of one structure, one per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub structure: Structure,
    /// Seconds or bytes, depending on the metric.
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct BenchResults {
    pub kind: BenchmarkKind,
    pub metric: Metric,
    pub key_count: usize,
    /// Seed used by each iteration.
    pub seeds: Vec<u64>,
    pub measurements: Vec<Measurement>,
    pub elapsed: Duration,
}

pub struct Runner<'a> {
    config: &'a BenchConfig,
    probe: Option<MemoryProbe>,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a BenchConfig) -> Self {
        Self { config, probe: None }
    }

    /// Required for [`Metric::Memory`].
    pub fn with_memory_probe(mut self, probe: MemoryProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn run(&self) -> Result<BenchResults, BenchError> {
        let config = self.config;
        config.validate()?;
        if config.metric == Metric::Memory && self.probe.is_none() {
            return Err(ConfigError::NoMemoryProbe.into());
        }

        let structures = config.active_structures();
        let started = Instant::now();
        info!(
            kind = %config.kind,
            keys = config.key_count(),
            iterations = config.iterations,
            distribution = config.distribution.name(),
            structures = structures.len(),
            "starting benchmark"
        );

        let mut measurements: Vec<Measurement> = structures
            .iter()
            .map(|&structure| Measurement {
                structure,
                samples: Vec::with_capacity(config.iterations as usize),
            })
            .collect();
        let mut seeds = Vec::with_capacity(config.iterations as usize);

        for i in 0..config.iterations {
            let seed = config.iteration_seed(i).unwrap_or_else(rand::random);
            info!(iteration = i + 1, of = config.iterations, seed, "running iteration");
            let workload = Workload::generate(config, seed);
            let reference = config.verify.then(|| {
                let mut list = SortedList::new();
                list.insert_all(&workload.keys);
                list
            });

            for m in &mut measurements {
                let sample = self.run_structure(m.structure, &workload, reference.as_ref())?;
                m.samples.push(sample);
            }
            seeds.push(seed);
        }

        let elapsed = started.elapsed();
        info!(elapsed_secs = elapsed.as_secs_f64(), "finished benchmark");
        Ok(BenchResults {
            kind: config.kind,
            metric: config.metric,
            key_count: config.key_count(),
            seeds,
            measurements,
            elapsed,
        })
    }

    fn run_structure(
        &self,
        structure: Structure,
        workload: &Workload,
        reference: Option<&SortedList>,
    ) -> Result<f64, BenchError> {
        let baseline = self.probe.map(|probe| probe());
        let mut index = structure.build();

        let start = Instant::now();
        index.insert_all(&workload.keys);
        let mut seconds = start.elapsed().as_secs_f64();

        match self.config.kind {
            BenchmarkKind::Insert => {}
            BenchmarkKind::Search => {
                let start = Instant::now();
                let hits = workload.queries.iter().filter(|&&q| index.find(q)).count();
                seconds = start.elapsed().as_secs_f64();
                black_box(hits);
            }
            BenchmarkKind::RangeSearch => {
                let start = Instant::now();
                let found: usize = workload
                    .ranges
                    .iter()
                    .map(|&(from, to)| index.find_range(from, to).len())
                    .sum();
                seconds = start.elapsed().as_secs_f64();
                black_box(found);
            }
        }

        let sample = match (self.config.metric, self.probe, baseline) {
            (Metric::Memory, Some(probe), Some(before)) => probe().saturating_sub(before) as f64,
            _ => seconds,
        };

        if let Some(reference) = reference {
            verify(self.config.kind, index.as_ref(), reference, workload)?;
        }

        debug!(
            structure = %structure,
            sample,
            ops = workload.operation_count(self.config.kind),
            len = index.len(),
            heap_bytes = ?index.heap_bytes(),
            "finished structure"
        );
        Ok(sample)
    }
}

/// Check `index` against `reference` on the workload of `kind`.
pub fn verify(
    kind: BenchmarkKind,
    index: &dyn IntIndex,
    reference: &SortedList,
    workload: &Workload,
) -> Result<(), BenchError> {
    let mismatch = |detail: String| BenchError::Mismatch {
        structure: index.name(),
        detail,
    };

    if index.len() != reference.len() {
        return Err(mismatch(format!(
            "holds {} keys, expected {}",
            index.len(),
            reference.len()
        )));
    }

    match kind {
        BenchmarkKind::Insert => {
            if let Some(&key) = workload.keys.iter().find(|&&k| !index.find(k)) {
                return Err(mismatch(format!("inserted key {key} not found")));
            }
        }
        BenchmarkKind::Search => {
            for &q in &workload.queries {
                let expected = reference.find(q);
                if index.find(q) != expected {
                    return Err(mismatch(format!("find({q}) returned {}, expected {expected}", !expected)));
                }
            }
        }
        BenchmarkKind::RangeSearch => {
            for &(from, to) in &workload.ranges {
                let got = index.find_range(from, to);
                let expected = reference.find_range(from, to);
                if got != expected {
                    return Err(mismatch(format!(
                        "find_range({from}, {to}) returned {} keys, expected {}",
                        got.len(),
                        expected.len()
                    )));
                }
            }
        }
    }
    Ok(())
}
