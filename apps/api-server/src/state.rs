//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::auth::{CredentialVerifier, JwtManager};
use ured_db::Database;

/// Application state.
///
/// Cheap to clone; axum clones it per request.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (wraps the connection pool).
    pub db: Database,

    /// Token signing and validation.
    pub jwt: Arc<JwtManager>,

    /// Credential verification seam. Swappable in tests.
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtManager, verifier: Arc<dyn CredentialVerifier>) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
            verifier,
        }
    }
}
