//! Integration tests for the inventory endpoints and the stock alert rule.
//!
//! Tests cover:
//! - CRUD over `/api/v1/inventory` with derived response fields
//! - SKU normalization and case-insensitive uniqueness
//! - Automatic low-stock / out-of-stock alerts with deduplication
//! - Restocking leaving alerts open until an operator resolves them
//! - The staff quantity-only update restriction

mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

/// Money fields serialize as strings; parse before comparing so the
/// assertions do not depend on trailing-zero scale.
fn dec_field(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal fields serialize as strings")
        .parse()
        .expect("well-formed decimal")
}

async fn unresolved_alerts(app: &TestApp, alert_type: &str) -> Vec<Value> {
    let uri = format!("/api/v1/alerts?type={}&resolved=false", alert_type);
    let response = app
        .request(Method::GET, &uri, None, Some(app.admin_token()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    body["data"]["items"].as_array().cloned().unwrap_or_default()
}

// ==================== CRUD ====================

#[tokio::test]
async fn create_item_returns_derived_fields_and_normalized_sku() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "name": "Hex bolts M8",
                "sku": "bolt-m8",
                "category": "fasteners",
                "quantity": 40,
                "reorder_level": 10,
                "unit_price": "2.50",
                "supplier_id": supplier.id,
                "location": "A-12",
            })),
            Some(app.manager_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sku"], "BOLT-M8");
    assert_eq!(body["data"]["stock_status"], "in-stock");
    // 40 x 2.50
    assert_eq!(dec_field(&body["data"]["total_value"]), dec!(100));
    assert_eq!(body["data"]["quantity"], 40);
}

#[tokio::test]
async fn get_and_list_round_trip() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app
        .seed_item(supplier.id, "WID-1", 25, 10, dec!(4.00))
        .await;
    app.seed_item(supplier.id, "WID-2", 30, 10, dec!(1.00))
        .await;

    let single = app
        .request(
            Method::GET,
            &format!("/api/v1/inventory/{}", item.id),
            None,
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(single.status(), StatusCode::OK);
    let single = read_json(single).await;
    assert_eq!(single["data"]["id"], item.id.to_string());
    assert_eq!(dec_field(&single["data"]["total_value"]), dec!(100));

    let list = app
        .request(
            Method::GET,
            "/api/v1/inventory?page=1&per_page=1",
            None,
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(list.status(), StatusCode::OK);
    let list = read_json(list).await;
    assert_eq!(list["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(list["data"]["pagination"]["total"], 2);
    assert_eq!(list["data"]["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn list_supports_search_and_category_filters() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;

    app.state
        .services
        .inventory
        .create_item(
            stockiq_api::services::inventory::CreateItemInput {
                name: "Copper wire spool".into(),
                sku: "WIRE-CU".into(),
                description: Some("18 AWG".into()),
                category: "electrical".into(),
                quantity: 90,
                reorder_level: 10,
                unit_price: dec!(12.00),
                supplier_id: supplier.id,
                location: None,
            },
            None,
        )
        .await
        .expect("seed");
    app.seed_item(supplier.id, "BOLT-M8", 50, 10, dec!(0.20))
        .await;

    let search = app
        .request(
            Method::GET,
            "/api/v1/inventory?search=copper",
            None,
            Some(app.staff_token()),
        )
        .await;
    let search = read_json(search).await;
    let items = search["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "WIRE-CU");

    let category = app
        .request(
            Method::GET,
            "/api/v1/inventory?category=electrical",
            None,
            Some(app.staff_token()),
        )
        .await;
    let category = read_json(category).await;
    assert_eq!(category["data"]["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unknown_item_answers_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/inventory/{}", Uuid::new_v4()),
            None,
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = read_json(response).await;
    assert_eq!(body["message"], "Inventory item not found");
}

#[tokio::test]
async fn delete_removes_the_item() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app
        .seed_item(supplier.id, "WID-1", 25, 10, dec!(4.00))
        .await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/inventory/{}", item.id),
            None,
            Some(app.manager_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Inventory item deleted successfully");

    let gone = app
        .request(
            Method::GET,
            &format!("/api/v1/inventory/{}", item.id),
            None,
            Some(app.manager_token()),
        )
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_invalid_payloads() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "name": "Broken",
                "sku": "NEG-1",
                "category": "misc",
                "quantity": -5,
                "unit_price": "1.00",
                "supplier_id": supplier.id,
            })),
            Some(app.manager_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_array().expect("errors");
    assert!(errors
        .iter()
        .any(|e| e.as_str().is_some_and(|s| s.starts_with("quantity:"))));
}

#[tokio::test]
async fn sku_uniqueness_is_case_insensitive() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    app.seed_item(supplier.id, "BOLT-M8", 25, 10, dec!(0.20))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "name": "Duplicate bolts",
                "sku": "bolt-m8",
                "category": "fasteners",
                "quantity": 5,
                "unit_price": "0.25",
                "supplier_id": supplier.id,
            })),
            Some(app.manager_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = read_json(response).await;
    assert_eq!(body["message"], "SKU already exists");
}

// ==================== Stock alert rule ====================

#[tokio::test]
async fn creating_a_low_item_opens_one_low_stock_alert() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app.seed_item(supplier.id, "LOW-1", 3, 10, dec!(1.00)).await;

    let alerts = unresolved_alerts(&app, "low-stock").await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["related_item"], item.id.to_string());
    assert_eq!(alerts[0]["severity"], "high");
    assert_eq!(alerts[0]["title"], "Low Stock Alert");
}

#[tokio::test]
async fn zero_quantity_opens_a_critical_out_of_stock_alert() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    app.seed_item(supplier.id, "EMPTY-1", 0, 10, dec!(1.00))
        .await;

    let alerts = unresolved_alerts(&app, "out-of-stock").await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["severity"], "critical");
    assert!(unresolved_alerts(&app, "low-stock").await.is_empty());
}

#[tokio::test]
async fn repeated_low_updates_do_not_duplicate_the_alert() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app.seed_item(supplier.id, "LOW-1", 3, 10, dec!(1.00)).await;

    for quantity in [2, 1, 4] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/v1/inventory/{}", item.id),
                Some(json!({ "quantity": quantity })),
                Some(app.staff_token()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let alerts = unresolved_alerts(&app, "low-stock").await;
    assert_eq!(alerts.len(), 1, "dedup must keep a single open alert");
}

#[tokio::test]
async fn restocking_leaves_the_alert_open() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app.seed_item(supplier.id, "LOW-1", 3, 10, dec!(1.00)).await;
    assert_eq!(unresolved_alerts(&app, "low-stock").await.len(), 1);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/inventory/{}", item.id),
            Some(json!({ "quantity": 500 })),
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["stock_status"], "in-stock");

    // Resolution is an operator action, never a side effect of restocking
    assert_eq!(unresolved_alerts(&app, "low-stock").await.len(), 1);
}

#[tokio::test]
async fn resolving_then_dropping_again_opens_a_fresh_alert() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app.seed_item(supplier.id, "LOW-1", 3, 10, dec!(1.00)).await;

    let open = unresolved_alerts(&app, "low-stock").await;
    let alert_id = open[0]["id"].as_str().expect("alert id").to_string();

    let resolve = app
        .request(
            Method::PATCH,
            &format!("/api/v1/alerts/{}/resolve", alert_id),
            None,
            Some(app.manager_token()),
        )
        .await;
    assert_eq!(resolve.status(), StatusCode::OK);
    assert!(unresolved_alerts(&app, "low-stock").await.is_empty());

    // Restock, then fall low again: the resolved alert must not block a new one
    for quantity in [50, 2] {
        app.request(
            Method::PUT,
            &format!("/api/v1/inventory/{}", item.id),
            Some(json!({ "quantity": quantity })),
            Some(app.staff_token()),
        )
        .await;
    }

    let reopened = unresolved_alerts(&app, "low-stock").await;
    assert_eq!(reopened.len(), 1);
    assert_ne!(reopened[0]["id"].as_str(), Some(alert_id.as_str()));
}

#[tokio::test]
async fn low_and_out_of_stock_alerts_coexist_for_one_item() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app.seed_item(supplier.id, "DIP-1", 3, 10, dec!(1.00)).await;

    app.request(
        Method::PUT,
        &format!("/api/v1/inventory/{}", item.id),
        Some(json!({ "quantity": 0 })),
        Some(app.staff_token()),
    )
    .await;

    assert_eq!(unresolved_alerts(&app, "low-stock").await.len(), 1);
    assert_eq!(unresolved_alerts(&app, "out-of-stock").await.len(), 1);
}

// ==================== Staff restriction ====================

#[tokio::test]
async fn staff_may_update_quantity_only() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app
        .seed_item(supplier.id, "WID-1", 25, 10, dec!(4.00))
        .await;

    let allowed = app
        .request(
            Method::PUT,
            &format!("/api/v1/inventory/{}", item.id),
            Some(json!({ "quantity": 30 })),
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    let allowed = read_json(allowed).await;
    assert_eq!(allowed["data"]["quantity"], 30);

    let forbidden = app
        .request(
            Method::PUT,
            &format!("/api/v1/inventory/{}", item.id),
            Some(json!({ "quantity": 30, "unit_price": "9.99" })),
            Some(app.staff_token()),
        )
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    let forbidden = read_json(forbidden).await;
    assert_eq!(forbidden["message"], "Staff can only update quantity");
}

#[tokio::test]
async fn staff_restriction_is_checked_before_the_row_lookup() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/inventory/{}", Uuid::new_v4()),
            Some(json!({ "name": "Renamed" })),
            Some(app.staff_token()),
        )
        .await;
    // 403 wins over 404 for ids that do not exist
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn managers_may_update_any_field() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme").await;
    let item = app
        .seed_item(supplier.id, "WID-1", 25, 10, dec!(4.00))
        .await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/inventory/{}", item.id),
            Some(json!({ "name": "Premium widget", "unit_price": "6.00" })),
            Some(app.manager_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["name"], "Premium widget");
    assert_eq!(dec_field(&body["data"]["unit_price"]), dec!(6));
    assert_eq!(dec_field(&body["data"]["total_value"]), dec!(150));
}

#[tokio::test]
async fn inventory_requires_authentication() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/inventory", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
