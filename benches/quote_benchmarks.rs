//! Performance benchmarks for the quote engine.
//!
//! This benchmark suite covers:
//! - The bare engine on a plain and a fully-featured move
//! - A single quote through the HTTP router
//! - Batches of 100 and 1000 quotes through the router
//! - Scaling with the number of booked services
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use quote_engine::api::{AppState, QuoteRequest, create_router};
use quote_engine::calculation::quote;
use quote_engine::config::ConfigLoader;
use quote_engine::models::{InsuranceTier, InventoryItem, Leg, MoveFacts, Service};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config").expect("Failed to load config")
}

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    AppState::new(load_config())
}

/// All services a move can book, in request JSON form.
fn all_services() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({"type": "hvz_permit"}),
        serde_json::json!({"type": "packing"}),
        serde_json::json!({"type": "disassembly"}),
        serde_json::json!({"type": "external_lift"}),
        serde_json::json!({"type": "kitchen_assembly", "meters": "4.5"}),
        serde_json::json!({"type": "disposal", "volume_m3": "3"}),
        serde_json::json!({"type": "long_carry", "distance_m": "35"}),
        serde_json::json!({"type": "insurance", "tier": "basic"}),
    ]
}

/// Creates a quote request booking the first `service_count` services.
fn create_request_with_services(tenant: &str, service_count: usize) -> QuoteRequest {
    let request_json = serde_json::json!({
        "tenant": tenant,
        "origin": {"city": "Berlin", "postal_code": "10115", "floor": 3},
        "destination": {"city": "München", "postal_code": "80331", "floor": 5},
        "volume_m3": "42.5",
        "distance_km": "585",
        "base_travel_hours": "5.8",
        "move_date": "2025-08-02",
        "services": all_services().into_iter().take(service_count).collect::<Vec<_>>(),
        "inventory": [
            {"name": "Klavier", "unit_volume_m3": "1.5"},
            {"name": "Tresor", "unit_volume_m3": "0.4"}
        ]
    });

    serde_json::from_value(request_json).expect("Failed to create request")
}

fn post_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/quote")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Benchmark: the engine alone, without HTTP or JSON.
fn bench_engine(c: &mut Criterion) {
    let loader = load_config();
    let date = NaiveDate::from_ymd_opt(2025, 8, 2).unwrap();
    let config = loader
        .rate_configuration("muenchen-umzuege", date)
        .expect("tenant has summer rates");

    let plain = MoveFacts {
        volume_m3: dec!(40),
        distance_km: dec!(50),
        base_travel_hours: dec!(0.8),
        move_date: Some(date),
        ..MoveFacts::default()
    };
    let full = MoveFacts {
        origin: Leg {
            floor: 3,
            has_elevator: false,
            postal_code: Some("10115".to_string()),
        },
        destination: Leg {
            floor: 5,
            has_elevator: false,
            postal_code: Some("80331".to_string()),
        },
        services: vec![
            Service::HvzPermit,
            Service::Packing,
            Service::ExternalLift,
            Service::LongCarry {
                distance_m: dec!(35),
            },
            Service::Insurance {
                tier: InsuranceTier::Premium,
            },
        ],
        inventory: vec![InventoryItem {
            name: "Klavier".to_string(),
            category: None,
            quantity: 1,
            unit_volume_m3: dec!(1.5),
        }],
        declared_value: Some(dec!(25000)),
        ..plain.clone()
    };

    let mut group = c.benchmark_group("engine");
    group.bench_function("plain_move", |b| {
        b.iter(|| quote(black_box(&plain), black_box(config)))
    });
    group.bench_function("full_move", |b| {
        b.iter(|| quote(black_box(&full), black_box(config)))
    });
    group.finish();
}

/// Benchmark: Single quote through the router.
///
/// Target: < 100μs mean
fn bench_single_quote(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = serde_json::to_string(&create_request_with_services("default", 3)).unwrap();

    c.bench_function("single_quote", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router.oneshot(post_request(body.clone())).await.unwrap();
            black_box(response)
        })
    });
}

fn run_batch(c: &mut Criterion, size: usize, group_name: &str) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();
    let service_count = all_services().len();

    // Alternate tenants and service selections for a realistic mix
    let requests: Vec<String> = (0..size)
        .map(|i| {
            let tenant = if i % 2 == 0 { "default" } else { "muenchen-umzuege" };
            let request = create_request_with_services(tenant, i % (service_count + 1));
            serde_json::to_string(&request).unwrap()
        })
        .collect();

    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(size as u64));
    if size >= 1000 {
        // Reduce sample size for large batches to keep benchmark time reasonable
        group.sample_size(10);
    }

    group.bench_function(format!("batch_{}", size), |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(size);
            for body in &requests {
                let router = create_router(state.clone());
                let response = router.oneshot(post_request(body.clone())).await.unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });

    group.finish();
}

/// Benchmark: Batch of 100 quotes.
///
/// Target: < 100ms mean
fn bench_batch_100(c: &mut Criterion) {
    run_batch(c, 100, "batch_processing");
}

/// Benchmark: Batch of 1000 quotes.
///
/// Target: < 500ms mean
fn bench_batch_1000(c: &mut Criterion) {
    run_batch(c, 1000, "large_batch_processing");
}

/// Benchmark: Various service counts to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    let mut group = c.benchmark_group("scaling");

    for service_count in [0usize, 2, 4, 8].iter() {
        let router = create_router(state.clone());
        let request = create_request_with_services("default", *service_count);
        let body = serde_json::to_string(&request).unwrap();

        group.throughput(Throughput::Elements(*service_count as u64));
        group.bench_with_input(
            BenchmarkId::new("services", service_count),
            service_count,
            |b, _| {
                b.to_async(&rt).iter(|| async {
                    let router = router.clone();
                    let response = router.oneshot(post_request(body.clone())).await.unwrap();
                    black_box(response)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_engine,
    bench_single_quote,
    bench_batch_100,
    bench_batch_1000,
    bench_scaling,
);
criterion_main!(benches);
