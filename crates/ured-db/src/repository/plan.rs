//! # Plan Repository
//!
//! Database operations for scheduled service visits.
//!
//! The planner screen regenerates recurring visits wholesale, so alongside
//! plain CRUD there is a bulk delete scoped to one client and a date range.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use ured_core::Plan;

/// Fields accepted when creating or replacing a plan.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub client_id: String,
    pub executor_id: String,
    pub service: String,
    pub date: NaiveDate,
    pub recurrence: Option<String>,
    pub done: bool,
    pub price: f64,
}

/// Repository for plan database operations.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: SqlitePool,
}

impl PlanRepository {
    /// Creates a new PlanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PlanRepository { pool }
    }

    /// Lists all plans, oldest visit first.
    pub async fn list(&self) -> DbResult<Vec<Plan>> {
        debug!("Listing plans");

        let plans = sqlx::query_as::<_, Plan>(
            r#"
            SELECT
                id, client_id, executor_id, service, date, recurrence,
                done, iznos, created_at, updated_at
            FROM plans
            ORDER BY date, created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    /// Gets a plan by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            SELECT
                id, client_id, executor_id, service, date, recurrence,
                done, iznos, created_at, updated_at
            FROM plans
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    /// Creates a new plan and returns the stored row.
    pub async fn create(&self, input: PlanInput) -> DbResult<Plan> {
        let id = generate_id();
        let now = Utc::now();

        debug!(id = %id, client_id = %input.client_id, date = %input.date, "Creating plan");

        sqlx::query(
            r#"
            INSERT INTO plans (
                id, client_id, executor_id, service, date, recurrence,
                done, iznos, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&id)
        .bind(&input.client_id)
        .bind(&input.executor_id)
        .bind(&input.service)
        .bind(input.date)
        .bind(&input.recurrence)
        .bind(input.done)
        .bind(input.price)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Plan", &id))
    }

    /// Replaces a plan's fields.
    pub async fn update(&self, id: &str, input: PlanInput) -> DbResult<()> {
        let now = Utc::now();

        debug!(id = %id, "Updating plan");

        let result = sqlx::query(
            r#"
            UPDATE plans SET
                client_id = ?2, executor_id = ?3, service = ?4, date = ?5,
                recurrence = ?6, done = ?7, iznos = ?8, updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.client_id)
        .bind(&input.executor_id)
        .bind(&input.service)
        .bind(input.date)
        .bind(&input.recurrence)
        .bind(input.done)
        .bind(input.price)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Plan", id));
        }

        Ok(())
    }

    /// Deletes a plan.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting plan");

        let result = sqlx::query("DELETE FROM plans WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Plan", id));
        }

        Ok(())
    }

    /// Deletes every plan for a client whose date falls inside the given
    /// inclusive range. Returns the number of rows removed (zero is fine;
    /// regeneration runs this even for untouched periods).
    pub async fn delete_by_client_and_period(
        &self,
        client_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM plans
            WHERE client_id = ?1 AND date >= ?2 AND date <= ?3
            "#,
        )
        .bind(client_id)
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;

        let removed = result.rows_affected();
        info!(client_id = %client_id, %from, %to, removed, "Deleted plans for period");

        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn plan_on(client_id: &str, date: &str) -> PlanInput {
        PlanInput {
            client_id: client_id.to_string(),
            executor_id: "ex-1".to_string(),
            service: "deratizacija".to_string(),
            date: date.parse().unwrap(),
            recurrence: Some("monthly".to_string()),
            done: false,
            price: 80.0,
        }
    }

    #[tokio::test]
    async fn test_plan_crud_cycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.plans();

        let created = repo.create(plan_on("c-1", "2025-03-10")).await.unwrap();
        assert_eq!(created.service, "deratizacija");
        assert_eq!(created.price, 80.0);
        assert!(!created.done);

        let mut input = plan_on("c-1", "2025-03-10");
        input.done = true;
        input.price = 95.0;
        repo.update(&created.id, input).await.unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert!(fetched.done);
        assert_eq!(fetched.price, 95.0);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_client_and_period_scopes_correctly() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.plans();

        repo.create(plan_on("c-1", "2025-03-05")).await.unwrap();
        repo.create(plan_on("c-1", "2025-03-20")).await.unwrap();
        // Outside the range.
        repo.create(plan_on("c-1", "2025-04-01")).await.unwrap();
        // Other client, inside the range.
        repo.create(plan_on("c-2", "2025-03-15")).await.unwrap();

        let removed = repo
            .delete_by_client_and_period(
                "c-1",
                "2025-03-01".parse().unwrap(),
                "2025-03-31".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining
            .iter()
            .all(|p| p.client_id == "c-2" || p.date > "2025-03-31".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_delete_by_period_with_no_matches_returns_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.plans();

        let removed = repo
            .delete_by_client_and_period(
                "c-1",
                "2025-01-01".parse().unwrap(),
                "2025-01-31".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }
}
