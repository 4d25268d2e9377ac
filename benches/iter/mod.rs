use std::{hint::black_box, ops::Range};

use criterion::{measurement::Measurement, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use interrb::IntervalTree;

use crate::build_tree;

#[derive(Debug)]
struct BenchName {
    bench_name: &'static str,
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(format!("{}/n_values", v.bench_name), v.n_values)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("iter");

    for n_values in [1, 100, 1_000, 10_000] {
        bench_param(&mut g, n_values)
    }
}

fn bench_param<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let (t, _) = build_tree(n_values);

    bench_iter(n_values, g, &t);
    bench_rev(n_values, g, &t);
    bench_equivalent(n_values, g, &t);
    bench_intersecting(n_values, g, &t);
    bench_superset(n_values, g, &t);
    bench_subset(n_values, g, &t);
}

fn bench_iter<M>(n_values: usize, g: &mut BenchmarkGroup<M>, t: &IntervalTree<Range<u16>, usize>)
where
    M: Measurement,
{
    let bench_name = BenchName {
        n_values,
        bench_name: "iter",
    };

    g.throughput(Throughput::Elements(n_values as _));
    // Values per second
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter(|| {
            let iter = t.iter();
            for v in iter {
                black_box(v);
            }
        })
    });
}

/// Walk every entry in descending order.
fn bench_rev<M>(n_values: usize, g: &mut BenchmarkGroup<M>, t: &IntervalTree<Range<u16>, usize>)
where
    M: Measurement,
{
    let bench_name = BenchName {
        n_values,
        bench_name: "rev",
    };

    g.throughput(Throughput::Elements(n_values as _));
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter(|| {
            for v in t.iter().rev() {
                black_box(v);
            }
        })
    });
}

macro_rules! iter_bench {
    (
        $name:ident
    ) => {
        paste::paste! {
            fn [<bench_ $name>]<M>(n_values: usize, g: &mut BenchmarkGroup<M>, t: &IntervalTree<Range<u16>, usize>)
            where
                M: Measurement,
            {
                let bench_name = BenchName {
                    n_values,
                    bench_name: stringify!($name),
                };

                g.throughput(Throughput::Elements(n_values as _));
                // Values per second
                g.bench_function(BenchmarkId::from(bench_name), |b| {
                    b.iter(|| {
                        let iter = t.[<iter_ $name>](&(42..100));
                        for v in iter {
                            black_box(v);
                        }
                    })
                });
            }
        }
    }
}

iter_bench!(equivalent);
iter_bench!(intersecting);
iter_bench!(superset);
iter_bench!(subset);
