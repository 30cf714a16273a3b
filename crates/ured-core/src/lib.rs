//! # ured-core: Pure Business Logic for Ured
//!
//! This crate is the **heart** of Ured. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ured Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Browser UI (React)                          │   │
//! │  │    Clients ──► Plans ──► Invoices ──► KUF ──► Sanitary         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     api-server (axum)                           │   │
//! │  │    /api/clients, /api/invoices, /api/auth/login, ...           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ ured-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │  number   │  │ validation│                  │   │
//! │  │   │  Client   │  │ Invoice   │  │   rules   │                  │   │
//! │  │   │  Invoice  │  │ Number    │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     ured-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Executor, Plan, Invoice, Kuf, ...)
//! - [`number`] - Invoice number format and the year-scoped sequence allocator
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use ured_core::number::{self, InvoiceNumber, YearSuffix};
//!
//! // Allocate the next sequence for the 2025 partition
//! let stored = ["223/25", "224/25", "10/26"];
//! let suffix = YearSuffix::from_year(2025);
//! let next = number::next_sequence(suffix, stored, ured_core::DEFAULT_SEQUENCE_FLOOR);
//! assert_eq!(next, 225);
//!
//! // Format it for persistence
//! let formatted = InvoiceNumber::new(next, suffix).to_string();
//! assert_eq!(formatted, "225/25");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod number;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use ured_core::InvoiceNumber` instead of
// `use ured_core::number::InvoiceNumber`

pub use error::{CoreError, ValidationError};
pub use number::{InvoiceNumber, YearSuffix};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// First sequence number issued when no prior invoice exists for a year.
///
/// The numbering scheme predates this system; the books started mid-series,
/// so an empty year partition continues from 223 rather than 1. Deployments
/// that want a fresh series override this through server configuration.
pub const DEFAULT_SEQUENCE_FLOOR: u64 = 223;

/// Maximum attempts when invoice creation collides on a duplicate number.
///
/// Allocation is a read followed by an insert; the UNIQUE index on
/// `invoices.number` turns a concurrent duplicate into a constraint error,
/// and the caller re-allocates up to this many times.
pub const MAX_NUMBER_ALLOCATION_ATTEMPTS: u32 = 3;
