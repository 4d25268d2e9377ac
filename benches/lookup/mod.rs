use std::ops::Range;

use criterion::{
    measurement::Measurement, BatchSize, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};
use interrb::IntervalTree;

use crate::{build_tree, Lfsr};

type Tree = IntervalTree<Range<u16>, usize>;

/// A boolean lookup for one query family.
type Lookup = fn(&Tree, &Range<u16>) -> bool;

const LOOKUPS: [(&str, Lookup); 5] = [
    ("equivalent", |t, r| t.contains_key(r)),
    ("intersection", |t, r| t.contains_intersection(r)),
    ("superset", |t, r| t.contains_superset(r)),
    ("subset", |t, r| t.contains_subset(r)),
    ("covers", |t, r| t.covers(r)),
];

#[derive(Debug, Clone, Copy)]
struct BenchName {
    family: &'static str,
    outcome: &'static str,
    n_values: usize,
    n_lookups: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(
            format!("{}/{}/{}_values/n_lookups", v.family, v.outcome, v.n_values),
            v.n_lookups,
        )
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("lookup");

    // Tree size
    for n_values in [1_000, 10_000] {
        let (t, _) = build_tree(n_values);

        // Number of range lookups
        for n_lookups in [100, 1_000] {
            for (family, lookup) in LOOKUPS {
                bench_family(&mut g, &t, family, lookup, n_lookups);
            }
        }
    }
}

/// Measure `n_lookups` calls of `lookup` against `t`, once with keys that
/// all hit, and once with keys that all miss.
fn bench_family<M>(
    g: &mut BenchmarkGroup<'_, M>,
    t: &Tree,
    family: &'static str,
    lookup: Lookup,
    n_lookups: usize,
) where
    M: Measurement,
{
    // Every hit key is a stored range, so it is equivalent to, intersects,
    // contains, is contained by and is covered by that stored range.
    assert!(t.len() >= n_lookups);

    let name = BenchName {
        family,
        outcome: "hits",
        n_values: t.len(),
        n_lookups,
    };
    g.throughput(Throughput::Elements(n_lookups as _)); // Lookups per second
    g.bench_function(BenchmarkId::from(name), |b| {
        b.iter_batched(
            // Replays the ranges inserted by build_tree().
            Lfsr::default,
            |mut rand| {
                let mut all_hit = true;
                for _ in 0..n_lookups {
                    all_hit &= lookup(t, &rand.next_range());
                }
                assert!(all_hit);
            },
            BatchSize::SmallInput,
        )
    });

    let name = BenchName {
        outcome: "misses",
        ..name
    };
    g.throughput(Throughput::Elements(n_lookups as _));
    g.bench_function(BenchmarkId::from(name), |b| {
        b.iter_batched(
            Lfsr::default,
            |mut rand| {
                let mut any_hit = false;
                for _ in 0..n_lookups {
                    any_hit |= lookup(t, &rand.next_disjoint_range());
                }
                assert!(!any_hit);
            },
            BatchSize::SmallInput,
        )
    });
}
