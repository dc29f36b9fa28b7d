use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal_macros::dec;
use stockiq_api::auth::{role_permissions, AuthConfig, AuthService};
use stockiq_api::entities::{inventory_item, user, UserRole};
use stockiq_api::export::{analytics_export, ExportFormat};
use stockiq_api::services::analytics::ExportSummary;
use stockiq_api::stock::{classify, evaluate};
use uuid::Uuid;

fn sample_item(quantity: i32, reorder_level: i32) -> inventory_item::Model {
    inventory_item::Model {
        id: Uuid::new_v4(),
        name: "Hex Bolt M8".to_string(),
        sku: "HB-M8-040".to_string(),
        description: None,
        category: "fasteners".to_string(),
        quantity,
        reorder_level,
        unit_price: dec!(0.12),
        supplier_id: Uuid::new_v4(),
        location: Some("A-12-3".to_string()),
        updated_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// Benchmark for the stock status classifier
fn classification_benchmark(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| {
            let status = classify(black_box(42), black_box(10));
            black_box(status)
        });
    });
}

// Benchmark for the alerting rule across the three stock states
fn alerting_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let healthy = sample_item(40, 10);
    let low = sample_item(3, 10);
    let empty = sample_item(0, 10);

    group.bench_function("in_stock", |b| {
        b.iter(|| black_box(evaluate(black_box(&healthy))));
    });
    group.bench_function("low_stock", |b| {
        b.iter(|| black_box(evaluate(black_box(&low))));
    });
    group.bench_function("out_of_stock", |b| {
        b.iter(|| black_box(evaluate(black_box(&empty))));
    });

    group.finish();
}

// Benchmark for expanding a role into its permission claims
fn permission_expansion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("role_permissions");

    for role in [UserRole::Admin, UserRole::Manager, UserRole::Staff] {
        group.bench_with_input(
            BenchmarkId::from_parameter(role),
            &role,
            |b, role| {
                b.iter(|| black_box(role_permissions(role)));
            },
        );
    }

    group.finish();
}

// Benchmark for JWT issuance and validation
fn token_benchmark(c: &mut Criterion) {
    let service = AuthService::new(AuthConfig::new(
        "a signing secret that is long enough for the bench".to_string(),
        "stockiq-api".to_string(),
        "stockiq-auth".to_string(),
        Duration::from_secs(3600),
    ));
    let account = user::Model {
        id: Uuid::new_v4(),
        name: "Bench User".to_string(),
        email: "bench@example.net".to_string(),
        password_hash: "unused".to_string(),
        role: UserRole::Manager,
        is_active: true,
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    c.bench_function("token_generate", |b| {
        b.iter(|| {
            let token = service.generate_token(&account).unwrap();
            black_box(token)
        });
    });

    let token = service.generate_token(&account).unwrap();
    c.bench_function("token_validate", |b| {
        b.iter(|| {
            let claims = service.validate_token(&token).unwrap();
            black_box(claims)
        });
    });
}

// Benchmark for rendering the analytics export at growing category counts
fn export_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics_csv");

    for size in [5u64, 50, 500].iter() {
        let summary = ExportSummary {
            total_items: *size * 10,
            low_stock_items: *size,
            total_value: dec!(125000.50),
            category_counts: (0..*size)
                .map(|i| (format!("category-{:03}", i), i + 1))
                .collect::<BTreeMap<_, _>>(),
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &summary, |b, summary| {
            b.iter(|| {
                let file = analytics_export(summary, ExportFormat::Csv).unwrap();
                black_box(file.bytes)
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets =
        classification_benchmark,
        alerting_benchmark,
        permission_expansion_benchmark,
        token_benchmark,
        export_benchmark
}

criterion_main!(benches);
