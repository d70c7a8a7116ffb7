//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate, UserId, now_millis};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Maximum results for username search
const SEARCH_LIMIT: i64 = 10;

/// Minimal projection used for batched username resolution
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummaryRow {
    pub id: UserId,
    pub username: String,
}

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
    pub async fn find_by_id(&self, id: &UserId) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(id.clone()).await?;
        Ok(user)
    }

    /// Find user by email
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

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// Duplicate email/username fail with [`RepoError::Duplicate`]; the
    /// unique indexes backstop racing inserts.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already exists",
                data.email
            )));
        }
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                "CREATE user CONTENT {
                    username: $username,
                    email: $email,
                    password_hash: $password_hash,
                    role: $role,
                    bio: '',
                    avatar_url: '',
                    reset_otp_hash: NONE,
                    reset_otp_expires_at: NONE,
                    created_at: $now,
                    updated_at: $now
                }",
            )
            .bind(("username", data.username))
            .bind(("email", data.email))
            .bind(("password_hash", data.password_hash))
            .bind(("role", data.role))
            .bind(("now", now))
            .await?;

        let created: Vec<User> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Case-insensitive username search, capped at [`SEARCH_LIMIT`]
    pub async fn search(&self, query: &str) -> RepoResult<Vec<UserSummaryRow>> {
        let query_owned = query.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT id, username FROM user \
                 WHERE string::contains(string::lowercase(username), string::lowercase($q)) \
                 ORDER BY username LIMIT $limit",
            )
            .bind(("q", query_owned))
            .bind(("limit", SEARCH_LIMIT))
            .await?;
        let rows: Vec<UserSummaryRow> = result.take(0)?;
        Ok(rows)
    }

    /// Resolve usernames for a batch of user ids (feed/profile rendering)
    pub async fn summaries(&self, ids: Vec<UserId>) -> RepoResult<Vec<UserSummaryRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut result = self
            .base
            .db()
            .query("SELECT id, username FROM user WHERE id IN $ids")
            .bind(("ids", ids))
            .await?;
        let rows: Vec<UserSummaryRow> = result.take(0)?;
        Ok(rows)
    }

    /// Store a pending password-reset code (sha256 hex + expiry)
    pub async fn set_reset_otp(
        &self,
        id: &UserId,
        otp_hash: String,
        expires_at: i64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE $id SET reset_otp_hash = $hash, reset_otp_expires_at = $expires, \
                 updated_at = $now",
            )
            .bind(("id", id.clone()))
            .bind(("hash", otp_hash))
            .bind(("expires", expires_at))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Replace the password hash and clear the pending reset (single use)
    pub async fn complete_reset(&self, id: &UserId, password_hash: String) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE $id SET password_hash = $password_hash, reset_otp_hash = NONE, \
                 reset_otp_expires_at = NONE, updated_at = $now",
            )
            .bind(("id", id.clone()))
            .bind(("password_hash", password_hash))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }
}
