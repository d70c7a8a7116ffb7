//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod follow;
pub mod post;
pub mod user;

// Re-exports
pub use follow::FollowRepository;
pub use post::PostRepository;
pub use user::UserRepository;

use shared::{AppError, ErrorCode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "post:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("post", "abc");
//   - CRUD: db.select(id) 直接使用 RecordId

/// Parse an API path id into a [`RecordId`] of the expected table
///
/// Accepts both the full `"table:key"` form and the bare key. Rejects ids
/// that name a different table (a `user:` id passed to a post route).
pub fn parse_record_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    if let Some((tb, key)) = raw.split_once(':') {
        if tb != table {
            return Err(RepoError::Validation(format!("Invalid ID: {raw}")));
        }
        return Ok(RecordId::from_table_key(table, key));
    }
    Ok(RecordId::from_table_key(table, raw))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id_accepts_both_forms() {
        let full = parse_record_id("post", "post:abc123").unwrap();
        let bare = parse_record_id("post", "abc123").unwrap();
        assert_eq!(full, bare);
        assert_eq!(full.table(), "post");
    }

    #[test]
    fn test_parse_record_id_rejects_wrong_table() {
        assert!(parse_record_id("post", "user:abc123").is_err());
    }
}
