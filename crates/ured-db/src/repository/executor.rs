//! # Executor Repository
//!
//! Database operations for field workers who carry out service plans.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use ured_core::Executor;

/// Fields accepted when creating or replacing an executor.
#[derive(Debug, Clone)]
pub struct ExecutorInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Repository for executor database operations.
#[derive(Debug, Clone)]
pub struct ExecutorRepository {
    pool: SqlitePool,
}

impl ExecutorRepository {
    /// Creates a new ExecutorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExecutorRepository { pool }
    }

    /// Lists all executors.
    pub async fn list(&self) -> DbResult<Vec<Executor>> {
        debug!("Listing executors");

        let executors = sqlx::query_as::<_, Executor>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM executors
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(executors)
    }

    /// Gets an executor by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Executor>> {
        let executor = sqlx::query_as::<_, Executor>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM executors
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(executor)
    }

    /// Creates a new executor and returns the stored row.
    pub async fn create(&self, input: ExecutorInput) -> DbResult<Executor> {
        let id = generate_id();
        let now = Utc::now();

        debug!(id = %id, name = %input.name, "Creating executor");

        sqlx::query(
            r#"
            INSERT INTO executors (id, name, email, phone, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Executor", &id))
    }

    /// Replaces an executor's fields.
    pub async fn update(&self, id: &str, input: ExecutorInput) -> DbResult<()> {
        let now = Utc::now();

        debug!(id = %id, "Updating executor");

        let result = sqlx::query(
            r#"
            UPDATE executors SET
                name = ?2, email = ?3, phone = ?4, address = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Executor", id));
        }

        Ok(())
    }

    /// Deletes an executor.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting executor");

        let result = sqlx::query("DELETE FROM executors WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Executor", id));
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

    #[tokio::test]
    async fn test_executor_crud_cycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.executors();

        let created = repo
            .create(ExecutorInput {
                name: "Emir H.".to_string(),
                email: None,
                phone: Some("+387 61 111 222".to_string()),
                address: None,
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Emir H.");
        assert!(created.email.is_none());

        repo.update(
            &created.id,
            ExecutorInput {
                name: "Emir Hodžić".to_string(),
                email: Some("emir@example.ba".to_string()),
                phone: Some("+387 61 111 222".to_string()),
                address: None,
            },
        )
        .await
        .unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Emir Hodžić");
        assert_eq!(fetched.email.as_deref(), Some("emir@example.ba"));

        repo.delete(&created.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
