//! Coverage Engine Benchmarks
//!
//! Benchmarks for ignore matching, reconciliation and full runs over large
//! synthetic contracts.
//!
//! Run with: `cargo bench --bench engine_ops`

use apicov::{
    CoverageEngine, DocumentedCodes, EndpointKey, FailingCaseIds, IgnoreRuleSet,
    ProbeObservation, Traffic, VerdictReconciler,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const CODES: [u16; 8] = [200, 201, 204, 400, 404, 409, 429, 500];

fn synthetic_inputs(endpoints: usize) -> (DocumentedCodes, Traffic, FailingCaseIds) {
    let mut documented = DocumentedCodes::new();
    let mut traffic = Traffic::new();
    let mut failing = FailingCaseIds::new();

    for i in 0..endpoints {
        let key = EndpointKey::new(if i % 2 == 0 { "GET" } else { "POST" }, format!("/resource/{i}"));
        for (j, &code) in CODES.iter().enumerate() {
            if (i + j) % 3 != 0 {
                documented.insert(key.clone(), code);
            }
            if (i + j) % 2 == 0 {
                let case_id = format!("case-{i}-{j}");
                if (i + j) % 5 == 0 {
                    failing.insert(case_id.clone());
                }
                traffic.record(ProbeObservation::new(key.clone(), code).with_case_id(case_id));
            }
        }
        traffic.record(ProbeObservation::new(key, 418));
    }

    (documented, traffic, failing)
}

fn bench_ignore_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("ignore_matching");

    let configs = vec![
        (vec!["429", "5XX"], "default"),
        (vec!["401, 403 429", "4XX", "5XX", "bogus"], "mixed"),
    ];

    for (directives, name) in configs {
        let rules = IgnoreRuleSet::new(directives);
        group.bench_with_input(BenchmarkId::from_parameter(name), &rules, |bench, rules| {
            bench.iter(|| {
                let ignored = (100u16..600).filter(|&code| rules.is_ignored(black_box(code))).count();
                black_box(ignored);
            });
        });
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for endpoints in [10, 100, 1000] {
        let (_, traffic, failing) = synthetic_inputs(endpoints);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{endpoints}_endpoints")),
            &(traffic, failing),
            |bench, (traffic, failing)| {
                bench.iter(|| {
                    let verdicts = VerdictReconciler::new().reconcile(black_box(traffic), black_box(failing));
                    black_box(verdicts);
                });
            },
        );
    }

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    let engine = CoverageEngine::with_default_rules();

    for endpoints in [10, 100, 1000] {
        let inputs = synthetic_inputs(endpoints);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{endpoints}_endpoints")),
            &inputs,
            |bench, (documented, traffic, failing)| {
                bench.iter(|| {
                    let run = engine.run(black_box(documented), black_box(traffic), black_box(failing));
                    black_box(run);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ignore_matching, bench_reconcile, bench_full_run);
criterion_main!(benches);
