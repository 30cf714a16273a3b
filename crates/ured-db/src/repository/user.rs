//! # User Repository
//!
//! Database operations for back-office user accounts, plus the argon2
//! password helpers. Passwords are stored only as salted argon2 hashes;
//! verification happens server-side against the stored hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use ured_core::User;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored argon2 hash.
///
/// An unparsable stored hash verifies as false rather than erroring; a
/// corrupted row must not be distinguishable from a wrong password.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Repository
// =============================================================================

/// Fields accepted when provisioning a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    /// Plaintext; hashed before it touches the database.
    pub password: String,
    pub role: String,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Finds an active user by username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        debug!(username = %username, "Looking up user");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, is_active, created_at, updated_at
            FROM users
            WHERE username = ?1 AND is_active = 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Provisions a user account, hashing the password.
    pub async fn create(&self, input: NewUser) -> DbResult<User> {
        let id = generate_id();
        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();

        debug!(username = %input.username, role = %input.role, "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(&input.username)
        .bind(&password_hash)
        .bind(&input.role)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_username(&input.username)
            .await?
            .ok_or_else(|| DbError::not_found("User", &id))
    }

    /// Deactivates a user. Their sessions expire naturally; new logins fail.
    pub async fn deactivate(&self, username: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users SET is_active = 0, updated_at = ?2 WHERE username = ?1",
        )
        .bind(username)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", username));
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

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("pass123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("pass123", &hash));
        assert!(!verify_password("pass124", &hash));
    }

    #[test]
    fn test_verify_tolerates_garbage_hash() {
        assert!(!verify_password("pass123", "not-a-hash"));
        assert!(!verify_password("pass123", ""));
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let created = repo
            .create(NewUser {
                username: "samir".to_string(),
                password: "pass123".to_string(),
                role: "direktor".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.role, "direktor");
        assert!(verify_password("pass123", &created.password_hash));

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let input = NewUser {
            username: "selma".to_string(),
            password: "selma123".to_string(),
            role: "komercijala".to_string(),
        };
        repo.create(input.clone()).await.unwrap();

        let err = repo.create(input).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_deactivated_user_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.create(NewUser {
            username: "izvodjac1".to_string(),
            password: "izvo123".to_string(),
            role: "izvodjac".to_string(),
        })
        .await
        .unwrap();

        repo.deactivate("izvodjac1").await.unwrap();
        assert!(repo.find_by_username("izvodjac1").await.unwrap().is_none());
    }
}
