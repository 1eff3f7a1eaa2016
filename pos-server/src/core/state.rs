use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::audit::AuditService;
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆的成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | audit_service | 审计日志服务 (mpsc 异步写入) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub audit_service: Arc<AuditService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (确保存在)
    /// 2. 数据库 (work_dir/pos.db, WAL) + 迁移
    /// 3. 种子数据 (默认管理员、默认设置)
    /// 4. 服务 (JWT, Audit)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(&work_dir).expect("Failed to create work directory");

        let db_path = work_dir.join("pos.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        crate::db::seed::run(&pool)
            .await
            .expect("Failed to seed database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let (audit_service, audit_rx) = AuditService::new(pool.clone());
        let audit_service = Arc::new(audit_service);
        crate::audit::spawn_worker(pool.clone(), audit_rx);

        Self {
            config: config.clone(),
            pool,
            jwt_service,
            audit_service,
        }
    }

    /// 测试用状态：内存数据库 + 已迁移 schema，不做种子
    pub async fn for_tests(pool: SqlitePool) -> Self {
        let config = Config::with_overrides("/tmp/hermit-test", 0);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let (audit_service, audit_rx) = AuditService::new(pool.clone());
        crate::audit::spawn_worker(pool.clone(), audit_rx);

        Self {
            config,
            pool,
            jwt_service: jwt_service.clone(),
            audit_service: Arc::new(audit_service),
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
