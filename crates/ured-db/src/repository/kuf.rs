//! # KUF Repository
//!
//! Database operations for incoming invoice entries (knjiga ulaznih
//! faktura). Plain bookkeeping rows; the supplier's number is recorded
//! verbatim and never allocated.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use ured_core::Kuf;

/// Fields accepted when creating or replacing a KUF entry.
#[derive(Debug, Clone)]
pub struct KufInput {
    pub broj_kuf: String,
    pub datum_kuf: NaiveDate,
    pub datum_prijema: Option<NaiveDate>,
    pub ime_komitenta: String,
    pub id_komitenta: Option<String>,
    pub iznos: f64,
    pub placeno: bool,
}

/// Repository for KUF database operations.
#[derive(Debug, Clone)]
pub struct KufRepository {
    pool: SqlitePool,
}

impl KufRepository {
    /// Creates a new KufRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KufRepository { pool }
    }

    /// Lists all KUF entries, newest invoice date first.
    pub async fn list(&self) -> DbResult<Vec<Kuf>> {
        debug!("Listing KUF entries");

        let kufs = sqlx::query_as::<_, Kuf>(
            r#"
            SELECT
                id, broj_kuf, datum_kuf, datum_prijema, ime_komitenta,
                id_komitenta, iznos, placeno, created_at, updated_at
            FROM kufs
            ORDER BY datum_kuf DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(kufs)
    }

    /// Gets a KUF entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Kuf>> {
        let kuf = sqlx::query_as::<_, Kuf>(
            r#"
            SELECT
                id, broj_kuf, datum_kuf, datum_prijema, ime_komitenta,
                id_komitenta, iznos, placeno, created_at, updated_at
            FROM kufs
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(kuf)
    }

    /// Creates a new KUF entry and returns the stored row.
    pub async fn create(&self, input: KufInput) -> DbResult<Kuf> {
        let id = generate_id();
        let now = Utc::now();

        debug!(id = %id, broj_kuf = %input.broj_kuf, "Creating KUF entry");

        sqlx::query(
            r#"
            INSERT INTO kufs (
                id, broj_kuf, datum_kuf, datum_prijema, ime_komitenta,
                id_komitenta, iznos, placeno, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&id)
        .bind(&input.broj_kuf)
        .bind(input.datum_kuf)
        .bind(input.datum_prijema)
        .bind(&input.ime_komitenta)
        .bind(&input.id_komitenta)
        .bind(input.iznos)
        .bind(input.placeno)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Kuf", &id))
    }

    /// Replaces a KUF entry's fields.
    pub async fn update(&self, id: &str, input: KufInput) -> DbResult<()> {
        let now = Utc::now();

        debug!(id = %id, "Updating KUF entry");

        let result = sqlx::query(
            r#"
            UPDATE kufs SET
                broj_kuf = ?2, datum_kuf = ?3, datum_prijema = ?4,
                ime_komitenta = ?5, id_komitenta = ?6, iznos = ?7,
                placeno = ?8, updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.broj_kuf)
        .bind(input.datum_kuf)
        .bind(input.datum_prijema)
        .bind(&input.ime_komitenta)
        .bind(&input.id_komitenta)
        .bind(input.iznos)
        .bind(input.placeno)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Kuf", id));
        }

        Ok(())
    }

    /// Deletes a KUF entry.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting KUF entry");

        let result = sqlx::query("DELETE FROM kufs WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Kuf", id));
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

    fn sample_input() -> KufInput {
        KufInput {
            broj_kuf: "455-07".to_string(),
            datum_kuf: "2025-02-01".parse().unwrap(),
            datum_prijema: Some("2025-02-05".parse().unwrap()),
            ime_komitenta: "Dobavljač d.o.o.".to_string(),
            id_komitenta: Some("4200000000001".to_string()),
            iznos: 120.50,
            placeno: false,
        }
    }

    #[tokio::test]
    async fn test_kuf_crud_cycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.kufs();

        let created = repo.create(sample_input()).await.unwrap();
        assert_eq!(created.broj_kuf, "455-07");
        assert!(!created.placeno);

        // Mark paid
        let mut input = sample_input();
        input.placeno = true;
        repo.update(&created.id, input).await.unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert!(fetched.placeno);
        assert_eq!(fetched.iznos, 120.50);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_kuf_supplier_numbers_may_repeat() {
        // Different suppliers can reuse the same printed number
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.kufs();

        repo.create(sample_input()).await.unwrap();

        let mut other = sample_input();
        other.ime_komitenta = "Drugi dobavljač".to_string();
        repo.create(other).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}
