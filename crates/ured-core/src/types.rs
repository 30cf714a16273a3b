//! # Domain Types
//!
//! Core domain types used throughout Ured.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Client      │   │    Invoice      │   │      Plan       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name, pib, ... │   │  number "N/YY"  │   │  client_id      │       │
//! │  │                 │   │  date, totals   │   │  service, date  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Executor     │   │      Kuf        │   │ SanitaryRecord  │       │
//! │  │  field crew     │   │  incoming       │   │  employee       │       │
//! │  │  contact data   │   │  invoice (AP)   │   │  certificates   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where applicable: (invoice number, KUF number) -
//!   human-readable, potentially mutable
//!
//! ## Wire Format
//! All types serialize to camelCase JSON for the browser UI. KUF fields
//! keep their Bosnian names on the wire (`brojKuf`, `iznos`, `placeno`),
//! matching the books the operators work with.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Client
// =============================================================================

/// A client the company provides services to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Company or person name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    pub phone: String,

    /// Street address.
    pub address: String,

    /// Postal code.
    pub postal_code: Option<String>,

    /// Company registration number (ID broj).
    pub company_id: Option<String>,

    /// Tax identification number (PIB).
    pub pib: Option<String>,

    /// Service contract number.
    pub contract_number: Option<String>,

    /// Payment term printed on invoices (e.g. "15 dana").
    pub payment_term: Option<String>,

    /// Invoice total spelled out in words.
    pub amount_in_words: Option<String>,

    /// When the record was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Executor
// =============================================================================

/// A field worker (contractor) who carries out service plans.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Executor {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Worker name.
    pub name: String,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Plan
// =============================================================================

/// A scheduled (possibly recurring) service visit for a client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Plan {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Client the visit is for.
    pub client_id: String,

    /// Executor assigned to the visit.
    pub executor_id: String,

    /// Service description (deratization, disinfection, ...).
    pub service: String,

    /// Scheduled date.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Recurrence pattern, free text ("monthly", "quarterly", ...).
    pub recurrence: Option<String>,

    /// Whether the visit has been carried out.
    pub done: bool,

    /// Agreed price for the visit. Stored in the `iznos` column; the API
    /// has always called it `price`.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "iznos"))]
    pub price: f64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Invoice
// =============================================================================

/// An outgoing invoice.
///
/// `number` is assigned once at creation by the year-scoped allocator
/// (see [`crate::number`]) and is never reassigned automatically. It can
/// still be edited through the generic update endpoint, which is why the
/// allocator treats stored numbers as untrusted input.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    /// Unique identifier (UUID v4). Immutable, owned by the store.
    pub id: String,

    /// Display number, format `"<sequence>/<yearSuffix>"` (e.g. "223/25").
    pub number: String,

    /// Client being billed.
    pub client_id: String,

    /// Issuance date. Determines the year partition the sequence belongs to.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Line item description.
    pub description: Option<String>,

    /// Line item quantity.
    pub quantity: Option<i64>,

    /// Unit price.
    pub price: Option<f64>,

    /// Unit of measure.
    pub unit: Option<String>,

    /// Total excluding VAT.
    pub total_no_vat: Option<f64>,

    /// VAT amount.
    pub vat: Option<f64>,

    /// Total including VAT.
    pub total: Option<f64>,

    /// Total spelled out in words.
    pub amount_in_words: Option<String>,

    /// Contract number referenced on the invoice.
    pub contract_number: Option<String>,

    /// Payment term printed on the invoice.
    pub payment_term: Option<String>,

    /// Date payment was received.
    #[ts(as = "Option<String>")]
    pub payment_date: Option<NaiveDate>,

    /// Bank payment order number.
    pub payment_order_number: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// KUF (incoming invoice)
// =============================================================================

/// An incoming invoice entry (KUF - knjiga ulaznih faktura).
///
/// Accounts-payable bookkeeping; unrelated to outgoing invoice numbering.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Kuf {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Supplier's invoice number as printed on their document.
    pub broj_kuf: String,

    /// Supplier's invoice date.
    #[ts(as = "String")]
    pub datum_kuf: NaiveDate,

    /// Date the document was received.
    #[ts(as = "Option<String>")]
    pub datum_prijema: Option<NaiveDate>,

    /// Supplier name.
    pub ime_komitenta: String,

    /// Supplier identification number.
    pub id_komitenta: Option<String>,

    /// Amount owed.
    pub iznos: f64,

    /// Whether the invoice has been paid.
    pub placeno: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sanitary Record
// =============================================================================

/// A sanitary certificate (sanitarna knjižica) tracked for a client's employee.
///
/// The office watches `expiry_date` to remind clients about renewals.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SanitaryRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Client the employee works for.
    pub client_id: String,

    /// Employee the certificate belongs to.
    pub employee_name: String,

    /// Date the certificate was issued.
    #[ts(as = "String")]
    pub date_issued: NaiveDate,

    /// Date the certificate expires.
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A back-office user account.
///
/// Credentials live in the database as argon2 hashes - never as an
/// in-memory user list. The hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login name, unique.
    pub username: String,

    /// Argon2 password hash. Excluded from serialization.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role label ("direktor", "komercijala", "izvodjac").
    pub role: String,

    /// Inactive accounts cannot log in.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_serializes_camel_case() {
        let client = Client {
            id: "c1".to_string(),
            name: "Pekara Centar".to_string(),
            email: "pekara@example.ba".to_string(),
            phone: "+387 33 123 456".to_string(),
            address: "Titova 1".to_string(),
            postal_code: Some("71000".to_string()),
            company_id: None,
            pib: None,
            contract_number: Some("12/2025".to_string()),
            payment_term: None,
            amount_in_words: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["postalCode"], "71000");
        assert_eq!(json["contractNumber"], "12/2025");
        assert!(json.get("postal_code").is_none());
    }

    #[test]
    fn test_kuf_keeps_bosnian_field_names() {
        let kuf = Kuf {
            id: "k1".to_string(),
            broj_kuf: "455-07".to_string(),
            datum_kuf: "2025-02-01".parse().unwrap(),
            datum_prijema: None,
            ime_komitenta: "Dobavljač d.o.o.".to_string(),
            id_komitenta: None,
            iznos: 120.50,
            placeno: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&kuf).unwrap();
        assert_eq!(json["brojKuf"], "455-07");
        assert_eq!(json["imeKomitenta"], "Dobavljač d.o.o.");
        assert_eq!(json["placeno"], false);
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: "u1".to_string(),
            username: "samir".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "direktor".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "samir");
    }
}
