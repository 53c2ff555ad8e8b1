use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

fn validate_tree(t: &Art) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "integrity violations: {issues:#?}");
    let stats = t.stats();
    assert_eq!(stats.leaves, t.len(), "reachable leaf count must match Art::len");
    assert!(stats.max_depth <= art::KEY_BYTES);
}

fn expected_range(m: &BTreeSet<u32>, from: u32, to: u32) -> Vec<u32> {
    if from > to {
        return Vec::new();
    }
    m.range(from..=to).copied().collect()
}

/// Keys that share prefixes often enough to exercise every node tier and
/// lazy-expansion path, mixed with fully random keys.
fn key_strategy() -> impl Strategy<Value = u32> + Clone {
    prop_oneof![
        3 => any::<u32>(),
        4 => (0u32..3, 0u32..3, 0u32..80, any::<u8>())
            .prop_map(|(a, b, c, d)| (a << 24) | (b << 16) | (c << 8) | u32::from(d)),
        2 => 0u32..300,
        1 => (u32::MAX - 300)..=u32::MAX,
    ]
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 6)]
    Insert(#[proptest(strategy = "key_strategy()")] u32),
    #[proptest(weight = 3)]
    Find(#[proptest(strategy = "key_strategy()")] u32),
    #[proptest(weight = 1)]
    Range(
        #[proptest(strategy = "key_strategy()")] u32,
        #[proptest(strategy = "key_strategy()")] u32,
    ),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=2000)) {
        let mut t = Art::new();
        let mut m: BTreeSet<u32> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    t.insert(key);
                    m.insert(key);
                }
                Op::Find(key) => {
                    prop_assert_eq!(t.find(key), m.contains(&key));
                }
                Op::Range(from, to) => {
                    prop_assert_eq!(t.find_range(from, to), expected_range(&m, from, to));
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let expected: Vec<u32> = m.iter().copied().collect();
        prop_assert_eq!(t.keys(), expected);
    }

    #[test]
    fn prop_structures_agree(
        keys in prop::collection::vec(key_strategy(), 0..=400),
        probes in prop::collection::vec(key_strategy(), 0..=50),
    ) {
        let m: BTreeSet<u32> = keys.iter().copied().collect();

        for structure in Structure::ALL {
            let mut index = structure.build();
            index.insert_all(&keys);
            prop_assert_eq!(index.len(), m.len(), "{}", structure);

            for &p in &probes {
                prop_assert_eq!(index.find(p), m.contains(&p), "{} find({})", structure, p);
            }
            for w in probes.windows(2) {
                prop_assert_eq!(
                    index.find_range(w[0], w[1]),
                    expected_range(&m, w[0], w[1]),
                    "{} find_range({}, {})", structure, w[0], w[1]
                );
            }
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    // Divergence on every byte position, plus both ends of the domain.
    let keys: Vec<u32> = vec![
        0x0000_0001,
        0x0000_0002,
        0x0000_0100,
        0x0001_0000,
        0x0100_0000,
        u32::MAX,
    ];

    for_each_permutation(&keys, |perm| {
        let mut t = Art::new();
        let mut m = BTreeSet::new();

        for k in perm {
            t.insert(k);
            m.insert(k);
        }

        validate_tree(&t);
        let expected: Vec<u32> = m.iter().copied().collect();
        assert_eq!(t.keys(), expected);
        assert_eq!(t.find_range(2, 0x0100_0000), expected[1..5].to_vec());
    });
}

#[test]
fn exhaustive_growth_order() {
    // 17 children under one inner node: forces Node4 -> Node16 -> Node48 in
    // every rotation of the insertion order.
    let base: Vec<u32> = (0..17u32).map(|i| 0x0A0B_0000 | (i * 13) << 8).collect();
    for shift in 0..base.len() {
        let mut t = Art::new();
        for &k in base.iter().cycle().skip(shift).take(base.len()) {
            t.insert(k);
        }
        validate_tree(&t);
        assert_eq!(t.stats().nodes.node48, 1);
        for &k in &base {
            assert!(t.find(k));
            assert!(!t.find(k + 1));
        }
    }
}
