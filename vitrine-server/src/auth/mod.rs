//! 认证模块 - JWT 认证
//!
//! # 模块结构
//!
//! - [`jwt`] - JWT 令牌服务和当前用户上下文
//! - [`middleware`] - Axum 认证中间件
//! - [`extractor`] - CurrentUser 提取器

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
