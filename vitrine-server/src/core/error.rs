use thiserror::Error;

/// 服务器生命周期错误 (启动、绑定、数据库初始化)
///
/// 请求级错误使用 [`shared::AppError`]；此类型只覆盖 [`super::Server`]
/// 启动和运行过程中的失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器生命周期的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
