//! User API 模块
//!
//! 关注/取关、用户主页和用户名搜索。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users/{id}", get(handler::profile))
        .route("/api/users/{id}/follow", put(handler::toggle_follow))
        .route("/api/users/search/{query}", get(handler::search))
}

// Handler fns are exercised directly by the integration tests
pub use handler::{profile, search, toggle_follow};
