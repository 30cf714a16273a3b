//! # Ured API Server
//!
//! REST backend for the back-office UI: clients, executors, service
//! plans, outgoing invoices (with year-scoped numbering), incoming
//! invoices (KUF) and sanitary certificates.
//!
//! The library crate exists so integration tests can build the router
//! against an in-memory database; the binary lives in `main.rs`.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use crate::auth::{DbCredentialVerifier, JwtManager};
use crate::config::ApiConfig;
use crate::state::AppState;

/// Wires the router for a database handle using the standard
/// database-backed credential verifier.
pub fn build_app(db: ured_db::Database, config: &ApiConfig) -> axum::Router {
    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
    let verifier = Arc::new(DbCredentialVerifier::new(db.users()));
    let state = AppState::new(db, jwt, verifier);
    routes::build_router(state)
}
