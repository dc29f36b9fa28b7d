use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use stockiq_api as api;

use api::auth::AuthService;
use api::middleware_helpers::request_id::request_id_middleware;
use api::tracing::RequestSpanMaker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    info!(
        environment = %cfg.environment,
        version = env!("CARGO_PKG_VERSION"),
        "starting stockiq-api"
    );

    let db_pool = api::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;

    if cfg.auto_migrate {
        if let Err(e) = api::db::run_migrations(&db_pool).await {
            error!("Database migration failed: {}", e);
            return Err(e.into());
        }
    }

    let db = Arc::new(db_pool);
    let state = api::AppState::new(db.clone(), cfg.clone());

    api::bootstrap::ensure_admin(db, state.auth_service.clone(), &cfg).await?;

    let cors_layer = build_cors_layer(&cfg)?;

    // Handlers and the auth layer resolve the token verifier out of request
    // extensions, so every request gets a handle to it up front.
    let auth_service = state.auth_service.clone();
    let inject_auth = axum::middleware::from_fn_with_state(
        auth_service,
        |State(auth): State<Arc<AuthService>>, mut req: Request, next: Next| async move {
            req.extensions_mut().insert(auth);
            next.run(req).await
        },
    );

    let app = Router::new()
        .route("/", get(|| async { "stockiq-api up" }))
        .nest("/api/v1", api::api_v1_routes())
        .merge(api::openapi::swagger_ui())
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpanMaker))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .layer(inject_auth)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    let bind_addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    let addr = listener.local_addr()?;
    info!("stockiq-api listening on http://{}", addr);
    info!("interactive API docs at http://{}/docs", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down cleanly");
    Ok(())
}

/// Builds the CORS policy from configuration.
///
/// Explicit origins win. Development (or the explicit any-origin flag)
/// falls back to a permissive policy. Anything else is a startup error
/// rather than a silently open API.
fn build_cors_layer(cfg: &api::config::AppConfig) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let request_id = HeaderName::from_static("x-request-id");

    if let Some(raw) = cfg.cors_allowed_origins.as_deref() {
        let origins: Vec<HeaderValue> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect();

        if !origins.is_empty() {
            info!(origins = raw, "CORS restricted to configured origins");
            // Explicit method/header lists: wildcards cannot be combined
            // with allow_credentials.
            let mut layer = CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    request_id.clone(),
                ])
                .expose_headers([request_id]);
            if cfg.cors_allow_credentials {
                layer = layer.allow_credentials(true);
            }
            return Ok(layer);
        }
    }

    if cfg.should_allow_permissive_cors() {
        info!("CORS is permissive (development or explicit opt-in)");
        return Ok(CorsLayer::permissive());
    }

    error!("refusing to start without a CORS policy");
    Err(
        "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true"
            .into(),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
