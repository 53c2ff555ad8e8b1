//! Run configuration.

use std::fmt;

use crate::error::ConfigError;
use crate::index::Structure;

pub const MIN_ITERATIONS: u32 = 1;
pub const MAX_ITERATIONS: u32 = 10_000;
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Which phase is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkKind {
    Insert,
    Search,
    RangeSearch,
}

impl BenchmarkKind {
    pub fn name(self) -> &'static str {
        match self {
            BenchmarkKind::Insert => "insert",
            BenchmarkKind::Search => "search",
            BenchmarkKind::RangeSearch => "range_search",
        }
    }
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Predefined workload sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Size classes are numbered 1 to 3 on the command line.
    pub fn from_level(level: u8) -> Result<Self, ConfigError> {
        match level {
            1 => Ok(SizeClass::Small),
            2 => Ok(SizeClass::Medium),
            3 => Ok(SizeClass::Large),
            other => Err(ConfigError::InvalidSize(other)),
        }
    }

    pub fn level(self) -> u8 {
        match self {
            SizeClass::Small => 1,
            SizeClass::Medium => 2,
            SizeClass::Large => 3,
        }
    }

    pub fn key_count(self) -> usize {
        match self {
            SizeClass::Small => 65_000,
            SizeClass::Medium => 16_000_000,
            SizeClass::Large => 256_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDistribution {
    /// Uniform over `0..n`, so keys collide and cluster.
    Dense,
    /// Uniform over the whole `u32` domain.
    Sparse,
}

impl KeyDistribution {
    pub fn name(self) -> &'static str {
        match self {
            KeyDistribution::Dense => "dense",
            KeyDistribution::Sparse => "sparse",
        }
    }
}

/// What a sample measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Seconds spent in the measured phase.
    Time,
    /// Live heap bytes held after the measured phase.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub kind: BenchmarkKind,
    pub size: SizeClass,
    /// Overrides the size class's key count.
    pub key_count: Option<usize>,
    pub iterations: u32,
    pub distribution: KeyDistribution,
    /// First iteration seed; iteration `i` uses `seed + i`. Random when unset.
    pub seed: Option<u64>,
    pub structures: Vec<Structure>,
    /// Check every structure's answers against the sorted list.
    pub verify: bool,
    pub metric: Metric,
}

impl BenchConfig {
    pub fn new(kind: BenchmarkKind, size: SizeClass) -> Self {
        Self {
            kind,
            size,
            key_count: None,
            iterations: DEFAULT_ITERATIONS,
            distribution: KeyDistribution::Sparse,
            seed: None,
            structures: Structure::ALL.to_vec(),
            verify: false,
            metric: Metric::Time,
        }
    }

    pub fn key_count(&self) -> usize {
        self.key_count.unwrap_or_else(|| self.size.key_count())
    }

    /// Seed for iteration `i`, if the run is deterministic.
    pub fn iteration_seed(&self, i: u32) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(u64::from(i)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(ConfigError::InvalidIterations(self.iterations));
        }
        let n = self.key_count();
        // Dense keys are drawn from 0..n, which has to fit the key domain.
        if n == 0 || (self.distribution == KeyDistribution::Dense && n as u64 > 1 << 32) {
            return Err(ConfigError::InvalidKeyCount);
        }
        if self.structures.is_empty() {
            return Err(ConfigError::NoStructures);
        }
        if self.kind == BenchmarkKind::RangeSearch && self.active_structures().is_empty() {
            return Err(ConfigError::NoRangeStructures);
        }
        Ok(())
    }

    /// Structures that take part in this run, deduplicated, in registry order.
    pub fn active_structures(&self) -> Vec<Structure> {
        Structure::ALL
            .into_iter()
            .filter(|s| self.structures.contains(s))
            .filter(|s| self.kind != BenchmarkKind::RangeSearch || s.supports_range())
            .collect()
    }

    /// Resolve `--only` / `--skip` name lists. An empty `only` selects all.
    pub fn select_structures<S: AsRef<str>>(only: &[S], skip: &[S]) -> Result<Vec<Structure>, ConfigError> {
        let parse = |names: &[S]| -> Result<Vec<Structure>, ConfigError> {
            names.iter().map(|n| n.as_ref().parse()).collect()
        };
        let only = parse(only)?;
        let skip = parse(skip)?;
        let selected: Vec<Structure> = Structure::ALL
            .into_iter()
            .filter(|s| only.is_empty() || only.contains(s))
            .filter(|s| !skip.contains(s))
            .collect();
        if selected.is_empty() {
            return Err(ConfigError::NoStructures);
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchConfig::new(BenchmarkKind::Insert, SizeClass::Small);
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.key_count(), 65_000);
        assert_eq!(config.active_structures().len(), Structure::ALL.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_size_levels() {
        assert_eq!(SizeClass::from_level(2).unwrap().key_count(), 16_000_000);
        assert_eq!(SizeClass::from_level(3).unwrap().key_count(), 256_000_000);
        assert_eq!(SizeClass::from_level(0), Err(ConfigError::InvalidSize(0)));
        assert_eq!(SizeClass::from_level(4), Err(ConfigError::InvalidSize(4)));
    }

    #[test]
    fn test_iteration_bounds() {
        let mut config = BenchConfig::new(BenchmarkKind::Search, SizeClass::Small);
        config.iterations = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidIterations(0)));
        config.iterations = MAX_ITERATIONS + 1;
        assert_eq!(config.validate(), Err(ConfigError::InvalidIterations(MAX_ITERATIONS + 1)));
        config.iterations = MAX_ITERATIONS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_key_count_override() {
        let mut config = BenchConfig::new(BenchmarkKind::Insert, SizeClass::Large);
        config.key_count = Some(10);
        assert_eq!(config.key_count(), 10);
        config.key_count = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidKeyCount));
    }

    #[test]
    fn test_iteration_seeds() {
        let mut config = BenchConfig::new(BenchmarkKind::Insert, SizeClass::Small);
        assert_eq!(config.iteration_seed(0), None);
        config.seed = Some(41);
        assert_eq!(config.iteration_seed(0), Some(41));
        assert_eq!(config.iteration_seed(2), Some(43));
    }

    #[test]
    fn test_range_search_skips_unordered() {
        let mut config = BenchConfig::new(BenchmarkKind::RangeSearch, SizeClass::Small);
        let active = config.active_structures();
        assert!(!active.contains(&Structure::HTrie));
        assert!(!active.contains(&Structure::HashTable));
        assert!(active.contains(&Structure::Art));

        config.structures = vec![Structure::HashTable, Structure::HTrie];
        assert_eq!(config.validate(), Err(ConfigError::NoRangeStructures));
    }

    #[test]
    fn test_select_structures() {
        let all = BenchConfig::select_structures::<&str>(&[], &[]).unwrap();
        assert_eq!(all, Structure::ALL.to_vec());

        let only = BenchConfig::select_structures(&["art", "B-Tree"], &[]).unwrap();
        assert_eq!(only, vec![Structure::Art, Structure::BTree]);

        let skipped = BenchConfig::select_structures(&[], &["trie", "m-trie", "h-trie"]).unwrap();
        assert!(!skipped.contains(&Structure::Trie));
        assert_eq!(skipped.len(), Structure::ALL.len() - 3);

        assert_eq!(
            BenchConfig::select_structures(&["art"], &["ART"]),
            Err(ConfigError::NoStructures)
        );
        assert!(matches!(
            BenchConfig::select_structures(&["nope"], &[]),
            Err(ConfigError::UnknownStructure(_))
        ));
    }
}
