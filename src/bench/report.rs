//! Aggregation and the result table.

use std::fmt::Write;

use super::config::Metric;
use super::runner::BenchResults;

/// Order statistics of one structure's samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
}

impl Summary {
    /// `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            avg: sorted.iter().sum::<f64>() / n as f64,
            median,
        })
    }
}

/// Million operations per second.
pub fn mops(operations: usize, seconds: f64) -> f64 {
    if seconds > 0.0 {
        operations as f64 / seconds / 1e6
    } else {
        0.0
    }
}

/// Four decimals, optionally followed by the seconds unit.
pub fn format_time(value: f64, unit: bool) -> String {
    format!("{value:.4}{}", if unit { "s" } else { "" })
}

/// `1234567` becomes `1.234.567 byte`.
pub fn format_memory(bytes: u64) -> String {
    let digits = bytes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out.push_str(" byte");
    out
}

const RULE_WIDTH: usize = 113;

/// Render `results` as a fixed-width table.
pub fn render(results: &BenchResults) -> String {
    let mut out = String::new();
    let title = match results.metric {
        Metric::Time => "PERFORMANCE BENCHMARK RESULTS",
        Metric::Memory => "MEMORY BENCHMARK RESULTS",
    };
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{title:^RULE_WIDTH$}");
    let _ = writeln!(out, "{rule}");

    match results.metric {
        Metric::Time => {
            let _ = writeln!(
                out,
                "{:<16}|{:>12} |{:>12} |{:>12} |{:>12} |{:>14} |{:>14} |",
                "Index Structure", "Min", "Max", "Avg", "Med", "M Ops/s (Avg)", "M Ops/s (Med)"
            );
        }
        Metric::Memory => {
            let _ = writeln!(
                out,
                "{:<16}|{:>20} |{:>20} |{:>20} |{:>20} |",
                "Index Structure", "Min", "Max", "Avg", "Med"
            );
        }
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    // Every measured phase performs one operation per key.
    let ops = results.key_count;
    for m in &results.measurements {
        let Some(s) = Summary::from_samples(&m.samples) else {
            continue;
        };
        match results.metric {
            Metric::Time => {
                let _ = writeln!(
                    out,
                    "{:<16}|{:>12} |{:>12} |{:>12} |{:>12} |{:>14} |{:>14} |",
                    m.structure.name(),
                    format_time(s.min, true),
                    format_time(s.max, true),
                    format_time(s.avg, true),
                    format_time(s.median, true),
                    format_time(mops(ops, s.avg), false),
                    format_time(mops(ops, s.median), false),
                );
            }
            Metric::Memory => {
                let _ = writeln!(
                    out,
                    "{:<16}|{:>20} |{:>20} |{:>20} |{:>20} |",
                    m.structure.name(),
                    format_memory(s.min as u64),
                    format_memory(s.max as u64),
                    format_memory(s.avg as u64),
                    format_memory(s.median as u64),
                );
            }
        }
    }
    out
}
