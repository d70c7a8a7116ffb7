//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (注册、登录、找回密码)
//! - [`posts`] - 帖子接口 (信息流、点赞、评论、商品标签)
//! - [`users`] - 用户接口 (关注、主页、搜索)

pub mod convert;

pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
