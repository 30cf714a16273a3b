//! # Route Modules
//!
//! One module per resource, each exporting a `router()` merged here.
//!
//! ## Surface
//! ```text
//! POST   /api/auth/login
//! GET    /api/clients           GET/PUT/DELETE /api/clients/{id}
//! POST   /api/clients
//! GET    /api/executors         GET/PUT/DELETE /api/executors/{id}
//! POST   /api/executors
//! GET    /api/plans             PUT/DELETE     /api/plans/{id}
//! POST   /api/plans
//! POST   /api/plans/delete-by-client-and-period
//! GET    /api/invoices          GET/PUT/DELETE /api/invoices/{id}
//! POST   /api/invoices
//! GET    /api/kufs              GET/PUT/DELETE /api/kufs/{id}
//! POST   /api/kufs
//! GET    /api/sanitarne         GET/PUT/DELETE /api/sanitarne/{id}
//! POST   /api/sanitarne
//! GET    /health
//! ```
//!
//! Everything under `/api` except `/api/auth/login` requires a bearer token.

pub mod auth;
pub mod clients;
pub mod executors;
pub mod invoices;
pub mod kufs;
pub mod plans;
pub mod sanitary;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

/// Builds the full application router.
///
/// Resource routes sit behind the bearer-token guard; `/`, `/health` and
/// the login endpoint stay open.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/clients", clients::router())
        .nest("/api/executors", executors::router())
        .nest("/api/plans", plans::router())
        .nest("/api/invoices", invoices::router())
        .nest("/api/kufs", kufs::router())
        .nest("/api/sanitarne", sanitary::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        // The browser UI is served from a different origin in development
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "ured-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded" })),
        )
    }
}
