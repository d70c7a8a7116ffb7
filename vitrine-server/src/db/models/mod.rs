//! Database models
//!
//! Storage-side structs for SurrealDB records. API-facing shapes live in
//! `shared::client`; conversion happens in `crate::api::convert`.

pub mod post;
pub mod user;

pub use post::{Comment, Post, PostCreate, PostId, Tag};
pub use user::{User, UserCreate, UserId, UserRole};

/// Current timestamp in epoch milliseconds (storage convention)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
