#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    middleware, Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use stockiq_api::{
    auth::AuthService,
    config::AppConfig,
    db::{self, DbConfig},
    entities::{
        alert::{self, AlertType},
        inventory_item, supplier, user, UserRole,
    },
    middleware_helpers::request_id::request_id_middleware,
    services::{
        alerts::CreateAlertInput, inventory::CreateItemInput, suppliers::CreateSupplierInput,
        users::CreateUserInput,
    },
    AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

const TEST_JWT_SECRET: &str =
    "zK8jW3qR7xT2mN9pL4vB6cY1dF5gH0eS_zK8jW3qR7xT2mN9pL4vB6cY1dF5gH0eS";

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const MANAGER_EMAIL: &str = "manager@example.com";
pub const STAFF_EMAIL: &str = "staff@example.com";
pub const SEED_PASSWORD: &str = "correct horse battery";

/// Harness that spins up the full route tree against a fresh in-memory
/// SQLite database, with one seeded account per role.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    admin_token: String,
    manager_token: String,
    staff_token: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // One pooled connection: with more, each checkout would open its
        // own empty in-memory database.
        let db_config = DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            TEST_JWT_SECRET.into(),
            3600,
            "127.0.0.1".into(),
            0,
            "test".into(),
        );

        let state = AppState::new(Arc::new(pool), cfg);

        let admin_token = seed_user(&state, "Avery Admin", ADMIN_EMAIL, UserRole::Admin).await;
        let manager_token =
            seed_user(&state, "Morgan Manager", MANAGER_EMAIL, UserRole::Manager).await;
        let staff_token = seed_user(&state, "Sam Staff", STAFF_EMAIL, UserRole::Staff).await;

        let auth_service = state.auth_service.clone();
        let router = Router::new()
            .nest("/api/v1", stockiq_api::api_v1_routes())
            .layer(middleware::from_fn_with_state(
                auth_service,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .layer(middleware::from_fn(request_id_middleware))
            .with_state(state.clone());

        Self {
            router,
            state,
            admin_token,
            manager_token,
            staff_token,
        }
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    pub fn manager_token(&self) -> &str {
        &self.manager_token
    }

    pub fn staff_token(&self) -> &str {
        &self.staff_token
    }

    /// Bearer token for the seeded account with the given role.
    pub fn token_for_role(&self, role: UserRole) -> &str {
        match role {
            UserRole::Admin => self.admin_token(),
            UserRole::Manager => self.manager_token(),
            UserRole::Staff => self.staff_token(),
        }
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Insert a supplier directly through the service layer.
    pub async fn seed_supplier(&self, name: &str) -> supplier::Model {
        self.state
            .services
            .suppliers
            .create_supplier(
                CreateSupplierInput {
                    name: name.to_string(),
                    contact_person: "Jordan Vale".to_string(),
                    email: format!(
                        "{}@suppliers.example.com",
                        name.to_lowercase().replace(' ', "-")
                    ),
                    phone: "555-0100".to_string(),
                    category: "general".to_string(),
                    rating: None,
                    payment_terms: None,
                    address_street: None,
                    address_city: None,
                    address_state: None,
                    address_zip: None,
                    address_country: None,
                    notes: None,
                },
                None,
            )
            .await
            .expect("seed supplier for tests")
    }

    /// Insert an inventory item directly through the service layer.
    pub async fn seed_item(
        &self,
        supplier_id: Uuid,
        sku: &str,
        quantity: i32,
        reorder_level: i32,
        unit_price: Decimal,
    ) -> inventory_item::Model {
        self.state
            .services
            .inventory
            .create_item(
                CreateItemInput {
                    name: format!("Seeded {}", sku),
                    sku: sku.to_string(),
                    description: None,
                    category: "general".to_string(),
                    quantity,
                    reorder_level,
                    unit_price,
                    supplier_id,
                    location: None,
                },
                None,
            )
            .await
            .expect("seed inventory item for tests")
    }

    /// Insert an alert directly through the service layer.
    pub async fn seed_alert(&self, alert_type: AlertType, title: &str) -> alert::Model {
        self.state
            .services
            .alerts
            .create_alert(CreateAlertInput {
                alert_type,
                title: title.to_string(),
                message: format!("{} raised during test setup", title),
                severity: None,
                related_item: None,
                related_supplier: None,
                assigned_to: None,
                expires_at: None,
            })
            .await
            .expect("seed alert for tests")
    }

    /// Mint a token for an arbitrary user record.
    pub fn token_for(&self, user: &user::Model) -> String {
        self.state
            .auth_service
            .generate_token(user)
            .expect("generate token for tests")
    }
}

async fn seed_user(state: &AppState, name: &str, email: &str, role: UserRole) -> String {
    let user = state
        .services
        .users
        .create_user(CreateUserInput {
            name: name.to_string(),
            email: email.to_string(),
            password: SEED_PASSWORD.to_string(),
            role,
            created_by: None,
        })
        .await
        .expect("seed user for tests");

    state
        .auth_service
        .generate_token(&user)
        .expect("generate seed token")
}

/// Read a response body as JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&body).expect("response body is not json")
}

/// Read a response body as raw bytes.
pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body")
        .to_vec()
}
