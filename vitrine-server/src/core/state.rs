use std::path::{Path, PathBuf};
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::{FollowRepository, PostRepository, UserRepository};
use crate::services::{AssetStore, HttpRelayMailer, LocalAssetStore, Mailer, TracingMailer};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是后端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | asset_store | Arc<dyn AssetStore> | 图片资源存储 |
/// | mailer | Arc<dyn Mailer> | 找回密码邮件 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 图片资源存储
    pub asset_store: Arc<dyn AssetStore>,
    /// 邮件服务
    pub mailer: Arc<dyn Mailer>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试场景直接注入
    /// 内存数据库和替身服务。
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        asset_store: Arc<dyn AssetStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            asset_store,
            mailer,
        }
    }

    /// 初始化所有服务并返回服务器状态
    ///
    /// - 打开 (或创建) RocksDB 数据库并应用 schema
    /// - 创建图片目录
    /// - 根据配置选择邮件实现
    pub async fn initialize(config: &Config) -> Result<Self> {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(&work_dir)?;

        let db_service = DbService::connect(work_dir.join("data"))
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let asset_store: Arc<dyn AssetStore> = Arc::new(
            LocalAssetStore::new(work_dir.join("images"), config.public_base_url.clone())
                .map_err(|e| ServerError::Config(e.to_string()))?,
        );

        let mailer: Arc<dyn Mailer> = match &config.mail_relay_url {
            Some(endpoint) => Arc::new(HttpRelayMailer::new(
                endpoint.clone(),
                config.mail_from.clone(),
            )),
            None => {
                tracing::warn!("MAIL_RELAY_URL not set - outgoing mail will only be logged");
                Arc::new(TracingMailer)
            }
        };

        Ok(Self::new(
            config.clone(),
            db_service.db,
            jwt_service,
            asset_store,
            mailer,
        ))
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 用户仓库
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    /// 帖子仓库
    pub fn posts(&self) -> PostRepository {
        PostRepository::new(self.db.clone())
    }

    /// 关注边仓库
    pub fn follows(&self) -> FollowRepository {
        FollowRepository::new(self.db.clone())
    }

    /// 图片目录 (用于静态文件服务)
    pub fn images_dir(&self) -> PathBuf {
        Path::new(&self.config.work_dir).join("images")
    }
}
