//! Post API 模块
//!
//! 信息流、发帖、点赞、评论、商品标签和删除。
//!
//! `DELETE /api/admin/posts/{id}` 与 `DELETE /api/posts/{id}` 复用同一个
//! 处理器：作者或管理员均可删除，授权判断只存在一处。

mod handler;

pub use handler::{ImagePart, create_post_inner};
pub(crate) use handler::render_posts;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/posts", get(handler::feed).post(handler::create))
        .route("/api/posts/{id}", delete(handler::delete_post))
        .route("/api/posts/{id}/like", put(handler::toggle_like))
        .route("/api/posts/{id}/comment", post(handler::add_comment))
        .route(
            "/api/posts/{post_id}/tags/{tag_id}/click",
            put(handler::click_tag),
        )
        .route(
            "/api/posts/{post_id}/tags/{tag_id}",
            put(handler::edit_tag).delete(handler::delete_tag),
        )
        // Admin alias - same handler, same owner-or-admin authorization path
        .route("/api/admin/posts/{id}", delete(handler::delete_post))
}

// Handler fns are exercised directly by the integration tests
pub use handler::{
    add_comment, click_tag, delete_post, delete_tag, edit_tag, feed, toggle_like,
};
