use criterion::{
    measurement::Measurement, BatchSize, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};
use interrb::{IntervalTree, Query};

use crate::{build_tree, Lfsr};

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("mutate");

    for n_values in [1, 100, 1_000, 10_000] {
        bench_insert(&mut g, n_values);
        bench_remove(&mut g, n_values);
        bench_clear_view(&mut g, n_values);
    }
}

/// Insert `n_values` randomly generated intervals into an empty tree,
/// rebalancing as it grows.
fn bench_insert<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    g.throughput(Throughput::Elements(n_values as _)); // Keys inserted per second
    g.bench_function(BenchmarkId::new("insert/n_values", n_values), |b| {
        b.iter_batched(
            || (IntervalTree::default(), Lfsr::default()),
            |(mut t, mut rand)| {
                for i in 0..n_values {
                    t.insert(rand.next_range(), i);
                }
                t
            },
            BatchSize::PerIteration,
        );
    });
}

/// Remove every entry of a tree of `n_values` by key, in insertion order.
fn bench_remove<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let (t, _) = build_tree(n_values);

    g.throughput(Throughput::Elements(n_values as _)); // Keys removed per second
    g.bench_function(BenchmarkId::new("remove/n_values", n_values), |b| {
        b.iter_batched(
            || (t.clone(), Lfsr::default()),
            |(mut t, mut rand)| {
                for _ in 0..n_values {
                    assert!(t.remove(&rand.next_range()).is_some());
                }
                t
            },
            BatchSize::PerIteration,
        );
    });
}

/// Remove the entries intersecting the lower quarter of the key domain
/// through a filtered view, leaving the rest in place.
fn bench_clear_view<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let (t, _) = build_tree(n_values);
    let q = 0..u16::MAX / 4;

    g.throughput(Throughput::Elements(n_values as _));
    g.bench_function(BenchmarkId::new("clear_view/n_values", n_values), |b| {
        b.iter_batched(
            || t.clone(),
            |mut t| {
                t.query_mut(Query::Intersecting(&q)).clear();
                t
            },
            BatchSize::PerIteration,
        );
    });
}
