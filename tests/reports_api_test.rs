//! Report generation under `/api/v1/reports/generate` (admin-only).
//!
//! The endpoint hands back a file attachment; these tests pin the format
//! selection rules and the report content for a known seeded warehouse.

mod common;

use axum::http::{header, Method, StatusCode};
use axum::response::Response;
use common::{read_bytes, read_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

fn header_string(response: &Response, name: header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .expect("header present")
        .to_str()
        .expect("header is ascii")
        .to_string()
}

/// Same warehouse as the analytics suite: three items across two
/// suppliers, one low and one out of stock.
async fn seed_warehouse(app: &TestApp) {
    let apex = app.seed_supplier("Apex Industrial").await;
    let borealis = app.seed_supplier("Borealis Parts").await;

    app.seed_item(apex.id, "BOLT-M8", 40, 10, dec!(2.50)).await;
    app.seed_item(apex.id, "WASHER-M8", 3, 10, dec!(1.00)).await;
    app.seed_item(borealis.id, "GASKET-40", 0, 5, dec!(4.00))
        .await;
}

// ==================== Format Selection ====================

#[tokio::test]
async fn reports_default_to_pdf() {
    let app = TestApp::new().await;
    seed_warehouse(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reports/generate",
            None,
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_string(&response, header::CONTENT_TYPE),
        "application/pdf"
    );
    assert_eq!(
        header_string(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"report.pdf\""
    );

    let text = String::from_utf8(read_bytes(response).await).unwrap();
    assert!(text.starts_with("%PDF-1.4"));
    assert!(text.contains("(Inventory Management System Report) Tj"));
    // All three seeded accounts are active
    assert!(text.contains("(admin  Count: 1  Active: 1) Tj"));
    assert!(text.contains("(manager  Count: 1  Active: 1) Tj"));
    assert!(text.contains("(staff  Count: 1  Active: 1) Tj"));
    // Seeding raised one alert of each stock type inside the period
    assert!(text.contains("(low-stock  Count: 1  Resolved: 0) Tj"));
    assert!(text.contains("(out-of-stock  Count: 1  Resolved: 0) Tj"));
}

#[tokio::test]
async fn reports_render_csv_on_request() {
    let app = TestApp::new().await;
    seed_warehouse(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reports/generate?format=csv",
            None,
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_string(&response, header::CONTENT_TYPE), "text/csv");
    assert_eq!(
        header_string(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"report.csv\""
    );

    let text = String::from_utf8(read_bytes(response).await).unwrap();
    assert!(text.starts_with("Inventory Management System Report\n"));
    assert!(text.contains("INVENTORY SUMMARY\n"));
    assert!(text.contains("total_items,3\n"));
    assert!(text.contains("low_stock_items,2\n"));
    assert!(text.contains("out_of_stock_items,1\n"));
    // (2.50 + 1.00 + 4.00) / 3
    assert!(text.contains("avg_price,2.50\n"));
    // (40 + 3 + 0) / 3
    assert!(text.contains("avg_quantity,14.33\n"));

    assert!(text.contains("CATEGORY BREAKDOWN\n"));
    assert!(text.contains("general,3,103.00,2.50\n"));

    assert!(text.contains("SUPPLIER PERFORMANCE\n"));
    assert!(text.contains("Apex Industrial,2,103.00\n"));
    assert!(text.contains("Borealis Parts,1,0.00\n"));
}

#[tokio::test]
async fn body_format_wins_over_the_query_string() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reports/generate?format=csv",
            Some(json!({ "format": "pdf" })),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_string(&response, header::CONTENT_TYPE),
        "application/pdf"
    );
}

#[tokio::test]
async fn unknown_report_formats_fall_back_to_pdf() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reports/generate?format=xlsx",
            None,
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_string(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"report.pdf\""
    );
}

// ==================== Reporting Window ====================

#[tokio::test]
async fn a_custom_period_appears_in_the_report_header() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reports/generate",
            Some(json!({
                "format": "csv",
                "start_date": "2026-01-01T00:00:00Z",
                "end_date": "2026-02-01T00:00:00Z",
            })),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = String::from_utf8(read_bytes(response).await).unwrap();
    assert!(text.contains("Period,2026-01-01T00:00:00.000Z,2026-02-01T00:00:00.000Z\n"));
}

#[tokio::test]
async fn alerts_outside_the_period_are_not_counted() {
    let app = TestApp::new().await;
    seed_warehouse(&app).await;

    // The stock alerts raised during seeding postdate this window
    let response = app
        .request(
            Method::POST,
            "/api/v1/reports/generate",
            Some(json!({
                "start_date": "2020-01-01T00:00:00Z",
                "end_date": "2020-02-01T00:00:00Z",
            })),
            Some(app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = String::from_utf8(read_bytes(response).await).unwrap();
    assert!(!text.contains("(low-stock"));
    assert!(!text.contains("(out-of-stock"));
}

// ==================== Access ====================

#[tokio::test]
async fn report_generation_requires_authentication() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/api/v1/reports/generate", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
}
