//! 服务模块 - 图片资源存储、外发邮件
//!
//! # 模块结构
//!
//! - [`asset_store`] - 图片资源存储 (本地磁盘、内容寻址)
//! - [`mailer`] - 找回密码邮件 (HTTP 中继 / 日志)

pub mod asset_store;
pub mod mailer;

pub use asset_store::{AssetStore, LocalAssetStore};
pub use mailer::{HttpRelayMailer, Mailer, TracingMailer};
