use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, hash_password};
use crate::core::Config;
use crate::db;
use crate::db::models::UserRole;
use crate::db::repository::UserRepository;
use crate::orders::OrderEngine;
use crate::services::ProofStorage;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是店面服务器的核心数据结构。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | proofs | ProofStorage | 支付凭证文件存储 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 支付凭证文件存储
    pub proofs: ProofStorage,
}

impl ServerState {
    /// 初始化所有服务
    ///
    /// 打开数据库、准备上传目录、种子初始管理员账号。
    pub async fn initialize(config: &Config) -> Self {
        let db = db::connect(&config.work_dir)
            .await
            .expect("Failed to open database");

        let proofs =
            ProofStorage::new(config.uploads_dir()).expect("Failed to prepare uploads directory");

        let state = Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            proofs,
        };

        state.seed_admin().await;
        state
    }

    /// In-memory state for tests
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let config = Config {
            work_dir: std::env::temp_dir().to_string_lossy().to_string(),
            http_port: 0,
            jwt: crate::auth::JwtConfig {
                secret: "test-secret-test-secret-test-secret!".to_string(),
                expiration_minutes: 60,
                issuer: "store-server".to_string(),
            },
            environment: "test".to_string(),
            admin_email: "admin@arbor.local".to_string(),
            admin_password: None,
        };
        let db = db::connect_memory().await.expect("in-memory db");
        let dir = tempfile::tempdir().expect("tempdir").keep();
        Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::new(config.jwt)),
            proofs: ProofStorage::new(dir).expect("proof storage"),
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Order engine bound to this state's database
    pub fn order_engine(&self) -> OrderEngine {
        OrderEngine::new(self.db.clone())
    }

    /// 首次启动时创建管理员账号 (需设置 ADMIN_PASSWORD)
    async fn seed_admin(&self) {
        let repo = UserRepository::new(self.db.clone());
        match repo.has_admin().await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Admin seed check failed: {}", e);
                return;
            }
        }

        let Some(password) = self.config.admin_password.clone() else {
            tracing::warn!("No admin account exists and ADMIN_PASSWORD is not set");
            return;
        };

        let hash = match hash_password(&password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("Failed to hash admin password: {}", e);
                return;
            }
        };

        match repo
            .create(
                self.config.admin_email.clone(),
                "Administrator".to_string(),
                hash,
                UserRole::Admin,
            )
            .await
        {
            Ok(_) => tracing::info!("Seeded admin account {}", self.config.admin_email),
            Err(e) => tracing::error!("Failed to seed admin account: {}", e),
        }
    }
}
