//! Hermit POS Server - 酒店/餐厅收银后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SQLite (sqlx, WAL)
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **订单金额** (`order_money`): Decimal 精确计算的订单定价
//! - **审计** (`audit`): mpsc 异步审计日志
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── audit/         # 审计日志服务
//! ├── order_money/   # 订单金额计算
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod order_money;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Audit logging macro - 将业务变更投递到审计通道
#[macro_export]
macro_rules! audit_log {
    ($service:expr, $action:expr, $resource_type:expr, $resource_id:expr, $user:expr, $details:expr) => {
        $service.log($crate::audit::AuditLogRequest {
            action: $action,
            resource_type: $resource_type.to_string(),
            resource_id: $resource_id.to_string(),
            operator_id: Some($user.id),
            operator_name: Some($user.username.clone()),
            details: $details,
        })
    };
}

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 进程启动时的环境准备：.env、日志
///
/// 生产环境写滚动日志文件 (LOG_DIR，默认 WORK_DIR/logs)，
/// 其余环境输出到控制台。
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    if environment == "production" {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| {
            let work_dir =
                std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/hermit/pos".to_string());
            format!("{work_dir}/logs")
        });
        std::fs::create_dir_all(&log_dir)?;
        init_logger_with_file(Some(&log_level), Some(&log_dir));
    } else {
        init_logger_with_file(Some(&log_level), None);
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  __                    _ __
   / / / /__  _________ ___  (_) /_
  / /_/ / _ \/ ___/ __ `__ \/ / __/
 / __  /  __/ /  / / / / / / / /_
/_/ /_/\___/_/  /_/ /_/ /_/_/\__/
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
