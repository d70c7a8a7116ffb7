//! Shared types for the Vitrine backend
//!
//! Common types used by the server and any Rust client: the unified
//! error system and the API request/response structures.

pub mod client;
pub mod error;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
