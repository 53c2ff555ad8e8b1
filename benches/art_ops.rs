//! Benchmarks for ART operations against the other index structures.

use art32::{Art, IntIndex, Structure};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_sparse_keys(n: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(0xA27);
    (0..n).map(|_| rng.gen()).collect()
}

fn generate_dense_keys(n: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(0xA27);
    (0..n).map(|_| rng.gen_range(0..n as u32)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000] {
        for (label, keys) in [("sparse", generate_sparse_keys(size)), ("dense", generate_dense_keys(size))] {
            for structure in Structure::ALL {
                // The full-fanout trie allocates ~2 KiB per distinct path prefix.
                if structure == Structure::Trie && label == "sparse" && size > 10_000 {
                    continue;
                }
                let id = BenchmarkId::new(format!("{}/{label}", structure.name()), size);
                group.bench_with_input(id, &keys, |b, keys| {
                    b.iter(|| {
                        let mut index = structure.build();
                        index.insert_all(keys);
                        black_box(index.len())
                    });
                });
            }
        }
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_sparse_keys(size);

        let art: Art = keys.iter().copied().collect();
        group.bench_with_input(BenchmarkId::new("ART", size), &keys, |b, keys| {
            b.iter(|| black_box(keys.iter().filter(|&&k| art.find(k)).count()));
        });

        for structure in [Structure::SortedList, Structure::HashTable, Structure::BTree] {
            let mut index = structure.build();
            index.insert_all(&keys);
            group.bench_with_input(BenchmarkId::new(structure.name(), size), &keys, |b, keys| {
                b.iter(|| black_box(keys.iter().filter(|&&k| index.find(k)).count()));
            });
        }
    }

    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");

    let size = 100_000;
    let keys = generate_dense_keys(size);
    let mut rng = StdRng::seed_from_u64(7);
    let ranges: Vec<(u32, u32)> = (0..1_000)
        .map(|_| {
            let lo = rng.gen_range(0..size as u32);
            (lo, lo.saturating_add(rng.gen_range(0..1_000)))
        })
        .collect();

    for structure in Structure::ALL.into_iter().filter(|s| s.supports_range()) {
        let mut index = structure.build();
        index.insert_all(&keys);
        group.bench_function(structure.name(), |b| {
            b.iter(|| {
                let found: usize = ranges.iter().map(|&(lo, hi)| index.find_range(lo, hi).len()).sum();
                black_box(found)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_range);
criterion_main!(benches);
