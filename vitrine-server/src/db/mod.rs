//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema definition.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use shared::AppError;

const NAMESPACE: &str = "vitrine";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk RocksDB database and apply the schema
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(path.as_ref())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.select_and_define().await?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");
        Ok(service)
    }

    /// Open an in-memory database (tests)
    pub async fn connect_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.select_and_define().await?;
        Ok(service)
    }

    async fn select_and_define(&self) -> Result<(), AppError> {
        self.db
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        self.define_schema().await
    }

    /// Apply the schema
    ///
    /// Unique indexes back the duplicate pre-checks in the repositories, so
    /// a racing insert still cannot produce a second record with the same
    /// email/username or a duplicate follow edge.
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                "
                DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS user_email_idx ON TABLE user COLUMNS email UNIQUE;
                DEFINE INDEX IF NOT EXISTS user_username_idx ON TABLE user COLUMNS username UNIQUE;

                DEFINE TABLE IF NOT EXISTS post SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS post_author_idx ON TABLE post COLUMNS author, created_at;

                DEFINE TABLE IF NOT EXISTS follows TYPE RELATION FROM user TO user;
                DEFINE INDEX IF NOT EXISTS follows_edge_idx ON TABLE follows COLUMNS in, out UNIQUE;
                ",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::debug!("Database schema applied");
        Ok(())
    }
}
