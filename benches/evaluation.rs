//! Benchmarks for node registration and graph evaluation.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- deep_chain
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

use rate_dag::clock::ManualClock;
use rate_dag::processors::combinators::{Passthrough, Reduce, ReduceOp};
use rate_dag::processors::MemoryFeed;
use rate_dag::types::{FeedId, NodeDefinition, NodeId, ProcessorId};
use rate_dag::{compute_id, OracleConfig, OracleManager, ProcessorTable};
use rust_decimal::Decimal;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

const NOW: u64 = 1_700_000_000;

fn feed() -> FeedId {
    FeedId::from_label("ETH/USD")
}

fn identity() -> ProcessorId {
    ProcessorId::from_label("identity")
}

fn mean() -> ProcessorId {
    ProcessorId::from_label("mean")
}

fn new_manager() -> OracleManager {
    let processors = ProcessorTable::builder()
        .with_feed(feed(), Arc::new(MemoryFeed::new(Decimal::from(3_000), NOW)))
        .with_external(identity(), Arc::new(Passthrough))
        .with_external(mean(), Arc::new(Reduce::new(ReduceOp::Mean)))
        .build();
    OracleManager::new(
        processors,
        Arc::new(ManualClock::new(NOW)),
        OracleConfig::default(),
    )
}

/// Chainlink leaf followed by `len` passthrough nodes. Returns the tip.
fn build_chain(manager: &mut OracleManager, len: usize) -> NodeId {
    let mut tip = manager
        .register(NodeDefinition::chainlink(feed(), 3_600).unwrap())
        .unwrap();
    for _ in 0..len {
        tip = manager
            .register(NodeDefinition::external(identity(), vec![], vec![tip]).unwrap())
            .unwrap();
    }
    tip
}

/// One mean node over `width` constant leaves.
fn build_wide(manager: &mut OracleManager, width: usize) -> NodeId {
    let parents = (0..width)
        .map(|i| {
            manager
                .register(NodeDefinition::constant(Decimal::from(i as u64 + 1)))
                .unwrap()
        })
        .collect();
    manager
        .register(NodeDefinition::external(mean(), vec![], parents).unwrap())
        .unwrap()
}

// ============================================================================
// BENCHMARKS
// ============================================================================

fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity");
    group.measurement_time(Duration::from_secs(5));

    let leaf = NodeDefinition::chainlink(feed(), 3_600).unwrap();
    group.bench_function("compute_id_leaf", |b| {
        b.iter(|| compute_id(black_box(&leaf)).unwrap())
    });

    let parents = (0..64u8).map(|i| NodeId([i; 32])).collect();
    let wide = NodeDefinition::external(mean(), vec![], parents).unwrap();
    group.bench_function("compute_id_64_parents", |b| {
        b.iter(|| compute_id(black_box(&wide)).unwrap())
    });

    group.finish();
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(50);

    group.bench_function("chain_of_32", |b| {
        b.iter(|| {
            let mut manager = new_manager();
            black_box(build_chain(&mut manager, 32))
        })
    });

    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    group.measurement_time(Duration::from_secs(10));

    for depth in [1usize, 8, 32] {
        let mut manager = new_manager();
        let tip = build_chain(&mut manager, depth);
        group.bench_with_input(BenchmarkId::new("deep_chain", depth), &tip, |b, &tip| {
            b.iter(|| manager.process(black_box(tip)).unwrap())
        });
    }

    for width in [4usize, 16, 64] {
        let mut manager = new_manager();
        let root = build_wide(&mut manager, width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::new("wide_mean", width), &root, |b, &root| {
            b.iter(|| manager.process(black_box(root)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_identity, bench_register, bench_process);
criterion_main!(benches);
