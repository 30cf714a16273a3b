//! # Invoice Repository
//!
//! Database operations for outgoing invoices, including the year-scoped
//! number allocation.
//!
//! Allocation is read-compute-insert: load the stored numbers of the year
//! partition, take max + 1 (or the configured floor for an empty year),
//! insert. The UNIQUE index on `invoices.number` is the arbiter under
//! concurrency; losing an insert race surfaces as a unique violation and
//! the whole cycle reruns, bounded by
//! [`ured_core::MAX_NUMBER_ALLOCATION_ATTEMPTS`].

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use ured_core::number::{self, InvoiceNumber, YearSuffix};
use ured_core::{Invoice, MAX_NUMBER_ALLOCATION_ATTEMPTS};

/// Fields accepted when creating an invoice.
///
/// The display number is never part of the input; it is allocated by the
/// repository at insert time.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub client_id: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub total_no_vat: Option<f64>,
    pub vat: Option<f64>,
    pub total: Option<f64>,
    pub amount_in_words: Option<String>,
    pub contract_number: Option<String>,
    pub payment_term: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_order_number: Option<String>,
}

/// Fields accepted when updating an invoice.
///
/// Same shape as [`NewInvoice`] plus an optional number override; `None`
/// keeps the number the invoice already carries. Hand-edited numbers are
/// accepted verbatim, which is why readers of stored numbers never trust
/// the format.
#[derive(Debug, Clone)]
pub struct InvoiceUpdate {
    pub number: Option<String>,
    pub client_id: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub total_no_vat: Option<f64>,
    pub vat: Option<f64>,
    pub total: Option<f64>,
    pub amount_in_words: Option<String>,
    pub contract_number: Option<String>,
    pub payment_term: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_order_number: Option<String>,
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
    sequence_floor: u64,
}

const INVOICE_COLUMNS: &str = r#"
    id, number, client_id, date, description, quantity, price, unit,
    total_no_vat, vat, total, amount_in_words, contract_number,
    payment_term, payment_date, payment_order_number, created_at, updated_at
"#;

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool, sequence_floor: u64) -> Self {
        InvoiceRepository {
            pool,
            sequence_floor,
        }
    }

    /// Lists all invoices, newest first.
    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        debug!("Listing invoices");

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Gets an invoice by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Computes the next free sequence for a year partition.
    ///
    /// Loads the partition's stored numbers and delegates to the pure
    /// allocator. Rows that don't parse are logged and skipped rather
    /// than inflating or breaking the result.
    pub async fn next_sequence_for(&self, suffix: YearSuffix) -> DbResult<u64> {
        let numbers: Vec<String> =
            sqlx::query_scalar("SELECT number FROM invoices WHERE year_suffix = ?1")
                .bind(suffix.to_string())
                .fetch_all(&self.pool)
                .await?;

        let malformed = number::malformed_numbers(numbers.iter().map(String::as_str));
        if !malformed.is_empty() {
            warn!(
                suffix = %suffix,
                count = malformed.len(),
                samples = ?&malformed[..malformed.len().min(3)],
                "Skipping unparsable invoice numbers during allocation"
            );
        }

        Ok(number::next_sequence(
            suffix,
            numbers.iter().map(String::as_str),
            self.sequence_floor,
        ))
    }

    /// Creates a new invoice, allocating its number from the year
    /// partition of `input.date`.
    ///
    /// Retries the whole read-compute-insert cycle when a concurrent
    /// create claims the same number first. Duplicate numbers are
    /// impossible; under pathological contention the call fails instead.
    pub async fn create(&self, input: NewInvoice) -> DbResult<Invoice> {
        let suffix = YearSuffix::from_date(input.date);

        let mut attempt = 1;
        loop {
            let seq = self.next_sequence_for(suffix).await?;
            let number = InvoiceNumber::new(seq, suffix);

            match self.insert_with_number(&number, &input).await {
                Ok(invoice) => {
                    info!(number = %number, client_id = %input.client_id, "Created invoice");
                    return Ok(invoice);
                }
                Err(err)
                    if err.is_unique_violation_on("invoices.number")
                        && attempt < MAX_NUMBER_ALLOCATION_ATTEMPTS =>
                {
                    warn!(
                        number = %number,
                        attempt,
                        "Lost invoice number race, reallocating"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn insert_with_number(
        &self,
        number: &InvoiceNumber,
        input: &NewInvoice,
    ) -> DbResult<Invoice> {
        let id = generate_id();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, number, seq, year_suffix, client_id, date, description,
                quantity, price, unit, total_no_vat, vat, total,
                amount_in_words, contract_number, payment_term, payment_date,
                payment_order_number, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
            )
            "#,
        )
        .bind(&id)
        .bind(number.to_string())
        // seq is advisory; a sequence past i64 range stores as NULL and the
        // number string still carries the full value
        .bind(i64::try_from(number.sequence).ok())
        .bind(number.year_suffix.to_string())
        .bind(&input.client_id)
        .bind(input.date)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.price)
        .bind(&input.unit)
        .bind(input.total_no_vat)
        .bind(input.vat)
        .bind(input.total)
        .bind(&input.amount_in_words)
        .bind(&input.contract_number)
        .bind(&input.payment_term)
        .bind(input.payment_date)
        .bind(&input.payment_order_number)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", &id))
    }

    /// Updates an invoice.
    ///
    /// An explicit `number` in the input replaces the stored one verbatim;
    /// otherwise the existing number is kept. Either way the partition
    /// columns are re-derived so later allocations see the row under the
    /// right year.
    pub async fn update(&self, id: &str, input: InvoiceUpdate) -> DbResult<()> {
        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))?;

        let number = input.number.unwrap_or(existing.number);
        let partition = number::partition_suffix(&number, input.date);
        let seq: Option<i64> = number
            .trim()
            .parse::<InvoiceNumber>()
            .ok()
            .and_then(|n| i64::try_from(n.sequence).ok());

        debug!(id = %id, number = %number, "Updating invoice");

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE invoices SET
                number = ?2, seq = ?3, year_suffix = ?4, client_id = ?5,
                date = ?6, description = ?7, quantity = ?8, price = ?9,
                unit = ?10, total_no_vat = ?11, vat = ?12, total = ?13,
                amount_in_words = ?14, contract_number = ?15,
                payment_term = ?16, payment_date = ?17,
                payment_order_number = ?18, updated_at = ?19
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&number)
        .bind(seq)
        .bind(partition.to_string())
        .bind(&input.client_id)
        .bind(input.date)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.price)
        .bind(&input.unit)
        .bind(input.total_no_vat)
        .bind(input.vat)
        .bind(input.total)
        .bind(&input.amount_in_words)
        .bind(&input.contract_number)
        .bind(&input.payment_term)
        .bind(input.payment_date)
        .bind(&input.payment_order_number)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes an invoice.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting invoice");

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn invoice_on(client_id: &str, date: &str) -> NewInvoice {
        NewInvoice {
            client_id: client_id.to_string(),
            date: date.parse().unwrap(),
            description: Some("deratizacija objekta".to_string()),
            quantity: Some(1),
            price: Some(100.0),
            unit: Some("kom".to_string()),
            total_no_vat: Some(100.0),
            vat: Some(17.0),
            total: Some(117.0),
            amount_in_words: None,
            contract_number: None,
            payment_term: Some("15 dana".to_string()),
            payment_date: None,
            payment_order_number: None,
        }
    }

    fn update_from(invoice: &Invoice) -> InvoiceUpdate {
        InvoiceUpdate {
            number: None,
            client_id: invoice.client_id.clone(),
            date: invoice.date,
            description: invoice.description.clone(),
            quantity: invoice.quantity,
            price: invoice.price,
            unit: invoice.unit.clone(),
            total_no_vat: invoice.total_no_vat,
            vat: invoice.vat,
            total: invoice.total,
            amount_in_words: invoice.amount_in_words.clone(),
            contract_number: invoice.contract_number.clone(),
            payment_term: invoice.payment_term.clone(),
            payment_date: invoice.payment_date,
            payment_order_number: invoice.payment_order_number.clone(),
        }
    }

    #[tokio::test]
    async fn test_first_invoice_of_year_starts_at_floor() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        let invoice = repo.create(invoice_on("c-1", "2025-03-01")).await.unwrap();
        assert_eq!(invoice.number, "223/25");
    }

    #[tokio::test]
    async fn test_sequential_creates_are_contiguous() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        for expected in ["223/25", "224/25", "225/25"] {
            let invoice = repo.create(invoice_on("c-1", "2025-06-15")).await.unwrap();
            assert_eq!(invoice.number, expected);
        }
    }

    #[tokio::test]
    async fn test_year_partitions_allocate_independently() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        repo.create(invoice_on("c-1", "2025-12-30")).await.unwrap();
        repo.create(invoice_on("c-1", "2025-12-31")).await.unwrap();

        // New calendar year restarts at the floor
        let first_of_26 = repo.create(invoice_on("c-1", "2026-01-02")).await.unwrap();
        assert_eq!(first_of_26.number, "223/26");

        // And the old year keeps counting where it left off
        let late_25 = repo.create(invoice_on("c-1", "2025-12-31")).await.unwrap();
        assert_eq!(late_25.number, "225/25");
    }

    #[tokio::test]
    async fn test_configured_floor_is_honored() {
        let db = Database::new(DbConfig::in_memory().invoice_sequence_floor(1))
            .await
            .unwrap();
        let repo = db.invoices();

        let invoice = repo.create(invoice_on("c-1", "2025-03-01")).await.unwrap();
        assert_eq!(invoice.number, "1/25");
    }

    #[tokio::test]
    async fn test_hand_edited_garbage_number_does_not_break_allocation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        let first = repo.create(invoice_on("c-1", "2025-03-01")).await.unwrap();
        repo.create(invoice_on("c-1", "2025-03-02")).await.unwrap();

        // Operator rewrites a number to something unparsable
        let mut patch = update_from(&first);
        patch.number = Some("STORNO-223".to_string());
        repo.update(&first.id, patch).await.unwrap();

        // Allocation skips the garbage row and continues past the valid max
        let next = repo.create(invoice_on("c-1", "2025-03-03")).await.unwrap();
        assert_eq!(next.number, "225/25");
    }

    #[tokio::test]
    async fn test_hand_edited_wide_number_keeps_counting() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        let first = repo.create(invoice_on("c-1", "2025-03-01")).await.unwrap();

        // Operator types a sequence far past anything allocation would produce
        let mut patch = update_from(&first);
        patch.number = Some("99999999999/25".to_string());
        repo.update(&first.id, patch).await.unwrap();

        // Allocation counts on from the edited value instead of dropping it
        let next = repo.create(invoice_on("c-1", "2025-03-02")).await.unwrap();
        assert_eq!(next.number, "100000000000/25");
    }

    #[tokio::test]
    async fn test_update_moves_row_between_partitions() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        let invoice = repo.create(invoice_on("c-1", "2025-03-01")).await.unwrap();

        // Renumber into the 2024 partition; the suffix in the number wins
        let mut patch = update_from(&invoice);
        patch.number = Some("300/24".to_string());
        repo.update(&invoice.id, patch).await.unwrap();

        let suffix_24: YearSuffix = "24".parse().unwrap();
        assert_eq!(repo.next_sequence_for(suffix_24).await.unwrap(), 301);

        // The 2025 partition no longer sees the row
        let suffix_25: YearSuffix = "25".parse().unwrap();
        assert_eq!(repo.next_sequence_for(suffix_25).await.unwrap(), 223);
    }

    #[tokio::test]
    async fn test_concurrent_creates_never_duplicate_numbers() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..6 {
            let repo = db.invoices();
            handles.push(tokio::spawn(async move {
                repo.create(invoice_on("c-1", "2025-05-05")).await
            }));
        }

        let mut numbers = Vec::new();
        for handle in handles {
            if let Ok(invoice) = handle.await.unwrap() {
                numbers.push(invoice.number);
            }
        }

        // Whatever committed, every number is distinct
        let mut deduped = numbers.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), numbers.len());
        assert!(!numbers.is_empty());
    }

    #[tokio::test]
    async fn test_invoice_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        let invoice = repo.create(invoice_on("c-1", "2025-03-01")).await.unwrap();
        repo.delete(&invoice.id).await.unwrap();
        assert!(repo.get_by_id(&invoice.id).await.unwrap().is_none());

        let err = repo.delete(&invoice.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
