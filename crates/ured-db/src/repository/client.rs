//! # Client Repository
//!
//! Database operations for client records.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use ured_core::Client;

/// Fields accepted when creating or replacing a client.
///
/// The browser UI always submits the full form, so update is a full
/// overwrite with the same shape as create.
#[derive(Debug, Clone)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub company_id: Option<String>,
    pub pib: Option<String>,
    pub contract_number: Option<String>,
    pub payment_term: Option<String>,
    pub amount_in_words: Option<String>,
}

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists all clients.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        debug!("Listing clients");

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT
                id, name, email, phone, address, postal_code, company_id,
                pib, contract_number, payment_term, amount_in_words,
                created_at, updated_at
            FROM clients
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Gets a client by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT
                id, name, email, phone, address, postal_code, company_id,
                pib, contract_number, payment_term, amount_in_words,
                created_at, updated_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Creates a new client and returns the stored row.
    pub async fn create(&self, input: ClientInput) -> DbResult<Client> {
        let id = generate_id();
        let now = Utc::now();

        debug!(id = %id, name = %input.name, "Creating client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, email, phone, address, postal_code, company_id,
                pib, contract_number, payment_term, amount_in_words,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.postal_code)
        .bind(&input.company_id)
        .bind(&input.pib)
        .bind(&input.contract_number)
        .bind(&input.payment_term)
        .bind(&input.amount_in_words)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", &id))
    }

    /// Replaces a client's fields.
    pub async fn update(&self, id: &str, input: ClientInput) -> DbResult<()> {
        let now = Utc::now();

        debug!(id = %id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2, email = ?3, phone = ?4, address = ?5,
                postal_code = ?6, company_id = ?7, pib = ?8,
                contract_number = ?9, payment_term = ?10,
                amount_in_words = ?11, updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.postal_code)
        .bind(&input.company_id)
        .bind(&input.pib)
        .bind(&input.contract_number)
        .bind(&input.payment_term)
        .bind(&input.amount_in_words)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    /// Deletes a client.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
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

    fn sample_input() -> ClientInput {
        ClientInput {
            name: "Pekara Centar".to_string(),
            email: "pekara@example.ba".to_string(),
            phone: "+387 33 123 456".to_string(),
            address: "Titova 1, Sarajevo".to_string(),
            postal_code: Some("71000".to_string()),
            company_id: None,
            pib: Some("4201234567890".to_string()),
            contract_number: Some("12/2025".to_string()),
            payment_term: Some("15 dana".to_string()),
            amount_in_words: None,
        }
    }

    #[tokio::test]
    async fn test_client_crud_cycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        let created = repo.create(sample_input()).await.unwrap();
        assert_eq!(created.name, "Pekara Centar");
        assert_eq!(created.postal_code.as_deref(), Some("71000"));

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);

        let mut input = sample_input();
        input.phone = "+387 33 987 654".to_string();
        repo.update(&created.id, input).await.unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.phone, "+387 33 987 654");

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_client_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        let err = repo.update("missing-id", sample_input()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete("missing-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
