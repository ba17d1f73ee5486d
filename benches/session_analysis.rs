//! Benchmarks for analysis sessions comparing sequential and parallel runs.
//!
//! Files are built in memory with the testkit builders, so the numbers cover
//! metrics, fact collection, pattern scoring and graph construction only.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gomap::ast::{ParseFailure, SourceFile, Span};
use gomap::config::ParallelConfig;
use gomap::testkit::*;
use gomap::{AnalysisConfig, AnalysisSession};
use std::hint::black_box;

/// A file with a worker pool, a semaphore and a branchy helper.
fn create_test_file(i: usize) -> SourceFile {
    let mut run = func_decl(
        "Run",
        vec![
            at(2, var_stmt("wg", Some(qty("sync", "WaitGroup")), None)),
            at(3, assign("jobs", make_chan(ty("int"), None))),
            at(4, assign("sem", make_chan(struct_of(vec![]), Some(int(4))))),
            at(5, go_call("worker", vec![ident("jobs")])),
            at(6, go_call("worker", vec![ident("jobs")])),
            at(7, go_call("worker", vec![ident("jobs")])),
            at(8, go_call("worker", vec![ident("jobs")])),
            at(9, expr_stmt(call("wg.Wait", vec![]))),
        ],
    );
    run.span = Span::new(1, 10);

    let mut worker = func_decl(
        "worker",
        vec![for_ever(vec![select(vec![
            comm_recv("job", ident("jobs"), vec![if_stmt(
                ident("job"),
                vec![if_else(ident("ok"), vec![ret()], vec![cont()])],
            )]),
            comm_default(vec![brk()]),
        ])])],
    );
    worker.span = Span::new(11, 24);

    let next = format!("example.com/bench/svc{}", (i + 1) % 8);
    let mut file = package_file(
        &format!("svc{}/file_{i}.go", i % 8),
        &format!("example.com/bench/svc{}", i % 8),
        &["sync", next.as_str()],
    );
    file.decls = vec![run.into(), worker.into()];
    file.source = (0..24)
        .map(|line| format!("\tline_{line} := {line} // filler\n"))
        .collect();
    file
}

fn create_inputs(num_files: usize) -> Vec<Result<SourceFile, ParseFailure>> {
    (0..num_files).map(|i| Ok(create_test_file(i))).collect()
}

fn session(parallel: ParallelConfig) -> AnalysisSession {
    let mut config = AnalysisConfig {
        parallel,
        ..AnalysisConfig::default()
    };
    config.graph.module_path = Some("example.com/bench".to_string());
    AnalysisSession::new(config).unwrap()
}

fn benchmark_session_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_sequential");

    for &size in &[10, 50, 200] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || create_inputs(size),
                |inputs| black_box(session(ParallelConfig::sequential()).analyze(inputs)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_session_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_parallel");

    for &size in &[10, 50, 200] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || create_inputs(size),
                |inputs| black_box(session(ParallelConfig::default()).analyze(inputs)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_batch_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_batch_size");
    let size = 200;
    group.throughput(Throughput::Elements(size as u64));

    for &batch_size in &[10, 50, 200] {
        group.bench_with_input(
            BenchmarkId::new("batch", batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter_batched(
                    || create_inputs(size),
                    |inputs| {
                        let parallel = ParallelConfig {
                            batch_size: Some(batch_size),
                            ..ParallelConfig::default()
                        };
                        black_box(session(parallel).analyze(inputs))
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_session_sequential,
    benchmark_session_parallel,
    benchmark_batch_sizes
);
criterion_main!(benches);
