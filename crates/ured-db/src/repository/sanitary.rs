//! # Sanitary Record Repository
//!
//! Database operations for employee sanitary certificates
//! (sanitarne knjižice).

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use ured_core::SanitaryRecord;

/// Fields accepted when creating or replacing a sanitary record.
#[derive(Debug, Clone)]
pub struct SanitaryInput {
    pub client_id: String,
    pub employee_name: String,
    pub date_issued: NaiveDate,
    pub expiry_date: NaiveDate,
}

/// Repository for sanitary record database operations.
#[derive(Debug, Clone)]
pub struct SanitaryRepository {
    pool: SqlitePool,
}

impl SanitaryRepository {
    /// Creates a new SanitaryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SanitaryRepository { pool }
    }

    /// Lists all sanitary records, soonest expiry first.
    pub async fn list(&self) -> DbResult<Vec<SanitaryRecord>> {
        debug!("Listing sanitary records");

        let records = sqlx::query_as::<_, SanitaryRecord>(
            r#"
            SELECT
                id, client_id, employee_name, date_issued, expiry_date,
                created_at, updated_at
            FROM sanitarne
            ORDER BY expiry_date, employee_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Gets a sanitary record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SanitaryRecord>> {
        let record = sqlx::query_as::<_, SanitaryRecord>(
            r#"
            SELECT
                id, client_id, employee_name, date_issued, expiry_date,
                created_at, updated_at
            FROM sanitarne
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Creates a new sanitary record and returns the stored row.
    pub async fn create(&self, input: SanitaryInput) -> DbResult<SanitaryRecord> {
        let id = generate_id();
        let now = Utc::now();

        debug!(id = %id, employee = %input.employee_name, "Creating sanitary record");

        sqlx::query(
            r#"
            INSERT INTO sanitarne (
                id, client_id, employee_name, date_issued, expiry_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&input.client_id)
        .bind(&input.employee_name)
        .bind(input.date_issued)
        .bind(input.expiry_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("SanitaryRecord", &id))
    }

    /// Replaces a sanitary record's fields.
    pub async fn update(&self, id: &str, input: SanitaryInput) -> DbResult<()> {
        let now = Utc::now();

        debug!(id = %id, "Updating sanitary record");

        let result = sqlx::query(
            r#"
            UPDATE sanitarne SET
                client_id = ?2, employee_name = ?3, date_issued = ?4,
                expiry_date = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.client_id)
        .bind(&input.employee_name)
        .bind(input.date_issued)
        .bind(input.expiry_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SanitaryRecord", id));
        }

        Ok(())
    }

    /// Deletes a sanitary record.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sanitary record");

        let result = sqlx::query("DELETE FROM sanitarne WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SanitaryRecord", id));
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

    fn record_for(employee: &str, expiry: &str) -> SanitaryInput {
        SanitaryInput {
            client_id: "c-1".to_string(),
            employee_name: employee.to_string(),
            date_issued: "2025-01-10".parse().unwrap(),
            expiry_date: expiry.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_sanitary_crud_cycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sanitarne();

        let created = repo.create(record_for("Amira K.", "2025-07-10")).await.unwrap();
        assert_eq!(created.employee_name, "Amira K.");

        // Renewal pushes the expiry out
        let mut input = record_for("Amira K.", "2026-01-10");
        input.date_issued = "2025-07-10".parse().unwrap();
        repo.update(&created.id, input).await.unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.expiry_date, "2026-01-10".parse::<NaiveDate>().unwrap());

        repo.delete(&created.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_expiry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sanitarne();

        repo.create(record_for("B", "2025-12-01")).await.unwrap();
        repo.create(record_for("A", "2025-06-01")).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].employee_name, "A");
        assert_eq!(listed[1].employee_name, "B");
    }
}
