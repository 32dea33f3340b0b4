//! User Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{User, UserRole};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(user)
    }

    /// Find user by email (login path)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create an account with an already-hashed password
    pub async fn create(
        &self,
        email: String,
        name: String,
        password_hash: String,
        role: UserRole,
    ) -> RepoResult<User> {
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Account '{}' already exists",
                email
            )));
        }

        let user = User {
            id: None,
            email,
            name,
            password_hash: Some(password_hash),
            role,
            created_at: Some(surrealdb::sql::Datetime::from(chrono::Utc::now())),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Whether any admin account exists (startup seeding check)
    pub async fn has_admin(&self) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM user WHERE role = 'admin' GROUP ALL")
            .await?;

        #[derive(serde::Deserialize)]
        struct Count {
            total: i64,
        }

        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total > 0).unwrap_or(false))
    }
}
