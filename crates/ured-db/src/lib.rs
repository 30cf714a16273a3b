//! # ured-db: Database Layer for Ured
//!
//! This crate provides database access for the Ured back office.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (client, invoice, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ured_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/ured.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let clients = db.clients().list().await?;
//! let next = db.invoices().next_sequence_for(suffix).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::client::{ClientInput, ClientRepository};
pub use repository::executor::{ExecutorInput, ExecutorRepository};
pub use repository::invoice::{InvoiceRepository, InvoiceUpdate, NewInvoice};
pub use repository::kuf::{KufInput, KufRepository};
pub use repository::plan::{PlanInput, PlanRepository};
pub use repository::sanitary::{SanitaryInput, SanitaryRepository};
pub use repository::user::{NewUser, UserRepository};
