//! # Repository Module
//!
//! One repository per entity, each owning the SQL for that table.
//!
//! ## Pattern
//! - Repositories hold a cloned `SqlitePool` (cheap, reference-counted)
//! - Reads use `sqlx::query_as::<_, Entity>` with the `FromRow` derives
//!   from ured-core
//! - Writes check `rows_affected()` and surface `DbError::NotFound`
//! - Input structs (`*Input`, `NewInvoice`, ...) are plain data; request
//!   validation happens in the API layer before they are built

pub mod client;
pub mod executor;
pub mod invoice;
pub mod kuf;
pub mod plan;
pub mod sanitary;
pub mod user;

/// Generates a new entity ID (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
