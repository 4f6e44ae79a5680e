//! Performance benchmarks for the Earnings Engine.
//!
//! This benchmark suite covers:
//! - The calculation pipeline for a rate declared at each term
//! - A single POST /calculate request through the router
//! - Share link resolution through GET /calculate
//! - A batch of 100 requests across every configured variant
//! - Scaling with the number of tax rules
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use earnings_engine::api::{AppState, create_router};
use earnings_engine::calculation::{
    Bracket, FlatRate, ProgressiveBrackets, TaxBase, TaxRule, calculate_earnings,
};
use earnings_engine::config::ConfigLoader;
use earnings_engine::models::{Rate, Term, WorkSchedule};

use axum::{Router, body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    AppState::new(config)
}

fn standard_schedule() -> WorkSchedule {
    WorkSchedule::new(Decimal::from(8), 5, Decimal::from(25))
}

/// Creates a rule set of `count` rules alternating progressive and flat.
fn create_rules(count: usize) -> Vec<TaxRule> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                TaxRule::Progressive(ProgressiveBrackets {
                    label: format!("Income Tax {}", i),
                    brackets: vec![
                        Bracket {
                            from: Decimal::ZERO,
                            rate: Decimal::ZERO,
                        },
                        Bracket {
                            from: Decimal::from(12570),
                            rate: Decimal::new(20, 2),
                        },
                        Bracket {
                            from: Decimal::from(50270),
                            rate: Decimal::new(40, 2),
                        },
                    ],
                    base: TaxBase::Gross,
                })
            } else {
                TaxRule::Flat(FlatRate {
                    label: format!("Contribution {}", i),
                    rate: Decimal::new(2, 2),
                    base: TaxBase::Remaining,
                })
            }
        })
        .collect()
}

fn create_request_body(country: &str, variant: &str, term: &str, int: u64) -> String {
    serde_json::json!({
        "country": country,
        "variant": variant,
        "term": term,
        "rate": {"int": int, "float": "50"},
        "schedule": {
            "hours_per_day": "7.5",
            "days_per_week": 5,
            "annual_leave_days": "25"
        }
    })
    .to_string()
}

async fn post_calculate(router: Router, body: String) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Benchmark: The pipeline alone for each declared term.
fn bench_pipeline_per_term(c: &mut Criterion) {
    let schedule = standard_schedule();
    let rules = create_rules(4);

    let mut group = c.benchmark_group("pipeline");

    for term in Term::ALL {
        let rate = Rate::new(term, "1234.56".parse().unwrap());
        group.bench_with_input(BenchmarkId::new("term", term), &rate, |b, rate| {
            b.iter(|| black_box(calculate_earnings(rate, &schedule, &rules).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark: A single request through the router.
fn bench_single_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = create_request_body("gb", "student-loan-plan-2", "hourly", 28);

    c.bench_function("single_request", |b| {
        b.to_async(&rt).iter(|| async {
            let response = post_calculate(router.clone(), body.clone()).await;
            black_box(response)
        })
    });
}

/// Benchmark: Resolving a share link.
fn bench_share_link_resolution(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let uri = "/calculate?c=de&v=with-church-tax&t=monthly&r=4500.00&h=8&d=5&l=30";

    c.bench_function("share_link_resolution", |b| {
        b.to_async(&rt).iter(|| async {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Batch of 100 requests across every configured variant.
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    let variants = [
        ("gb", "standard"),
        ("gb", "student-loan-plan-2"),
        ("au", "resident"),
        ("au", "non-resident"),
        ("de", "standard"),
        ("de", "with-church-tax"),
    ];

    let requests: Vec<String> = (0..100)
        .map(|i| {
            let (country, variant) = variants[i % variants.len()];
            let term = Term::ALL[i % Term::ALL.len()].as_str();
            create_request_body(country, variant, term, 20 + i as u64 * 37)
        })
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &requests {
                let router = create_router(state.clone());
                results.push(post_calculate(router, body.clone()).await);
            }
            black_box(results)
        })
    });

    group.finish();
}

/// Benchmark: Various rule counts to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let schedule = standard_schedule();
    let rate = Rate::new(Term::Yearly, "85000".parse().unwrap());

    let mut group = c.benchmark_group("scaling");

    for rule_count in [0usize, 1, 4, 16, 64].iter() {
        let rules = create_rules(*rule_count);

        group.throughput(Throughput::Elements((*rule_count).max(1) as u64));
        group.bench_with_input(BenchmarkId::new("rules", rule_count), &rules, |b, rules| {
            b.iter(|| black_box(calculate_earnings(&rate, &schedule, rules).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pipeline_per_term,
    bench_single_request,
    bench_share_link_resolution,
    bench_batch_100,
    bench_scaling,
);
criterion_main!(benches);
