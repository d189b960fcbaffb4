//! Benchmarks for the fragment rebalancer hot path.

use chronos_core::{Deployment, FragmentSet, SplitMix, VaultType};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_structural_rebalance(c: &mut Criterion) {
    c.bench_function("grow_and_shrink_fragment_set", |b| {
        b.iter(|| {
            let mut set = FragmentSet::default_split();
            while set.len() < 7 {
                let _ = set.add_fragment();
            }
            while set.len() > 2 {
                let _ = set.remove_fragment(0);
            }
            black_box(set)
        });
    });
}

fn bench_percentage_updates(c: &mut Criterion) {
    c.bench_function("update_percentage_sweep", |b| {
        b.iter(|| {
            let mut set = FragmentSet::default_split();
            for requested in 1..100u32 {
                let _ = set.update_percentage((requested as usize) % set.len(), requested);
            }
            black_box(set)
        });
    });
}

fn bench_deployment_run(c: &mut Criterion) {
    c.bench_function("deployment_full_run", |b| {
        b.iter(|| {
            let mut deployment = Deployment::Idle;
            let mut rng = SplitMix::new(7);
            deployment.begin(VaultType::Fragment);
            while deployment.is_deploying() {
                deployment.tick(&mut rng);
            }
            black_box(deployment)
        });
    });
}

criterion_group!(
    benches,
    bench_structural_rebalance,
    bench_percentage_updates,
    bench_deployment_run
);
criterion_main!(benches);
