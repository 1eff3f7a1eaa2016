//! 审计日志
//!
//! 业务变更通过 mpsc 通道异步落库，请求路径上只做一次 try_send，
//! 通道满时丢弃并告警，绝不阻塞请求。

use sqlx::SqlitePool;
use tokio::sync::mpsc;

use crate::db::repository::audit::{self, AuditInsert, AuditLogRow};
use crate::db::repository::RepoResult;

const CHANNEL_CAPACITY: usize = 256;

/// Business actions worth an audit trail entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    StaffCreate,
    StaffUpdate,
    StaffDeactivate,
    InventoryCreate,
    InventoryUpdate,
    InventoryAdjust,
    InventoryDeactivate,
    ProductCreate,
    ProductUpdate,
    ProductDeactivate,
    OrderCreate,
    OrderStatusChange,
    PaymentRecord,
    ReturnCreate,
    ReturnUpdate,
    ReturnDelete,
    ExpenseCreate,
    ExpenseUpdate,
    ExpenseDelete,
    SettingsUpdate,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::StaffCreate => "STAFF_CREATE",
            Self::StaffUpdate => "STAFF_UPDATE",
            Self::StaffDeactivate => "STAFF_DEACTIVATE",
            Self::InventoryCreate => "INVENTORY_CREATE",
            Self::InventoryUpdate => "INVENTORY_UPDATE",
            Self::InventoryAdjust => "INVENTORY_ADJUST",
            Self::InventoryDeactivate => "INVENTORY_DEACTIVATE",
            Self::ProductCreate => "PRODUCT_CREATE",
            Self::ProductUpdate => "PRODUCT_UPDATE",
            Self::ProductDeactivate => "PRODUCT_DEACTIVATE",
            Self::OrderCreate => "ORDER_CREATE",
            Self::OrderStatusChange => "ORDER_STATUS_CHANGE",
            Self::PaymentRecord => "PAYMENT_RECORD",
            Self::ReturnCreate => "RETURN_CREATE",
            Self::ReturnUpdate => "RETURN_UPDATE",
            Self::ReturnDelete => "RETURN_DELETE",
            Self::ExpenseCreate => "EXPENSE_CREATE",
            Self::ExpenseUpdate => "EXPENSE_UPDATE",
            Self::ExpenseDelete => "EXPENSE_DELETE",
            Self::SettingsUpdate => "SETTINGS_UPDATE",
        }
    }
}

/// 发送到 AuditService 的日志请求
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

/// 审计日志服务：写入走通道，查询直接读库
pub struct AuditService {
    pool: SqlitePool,
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    pub fn new(pool: SqlitePool) -> (Self, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { pool, tx }, rx)
    }

    /// Fire-and-forget: a full channel drops the entry with a warning
    pub fn log(&self, request: AuditLogRequest) {
        if let Err(e) = self.tx.try_send(request) {
            tracing::warn!("Audit log entry dropped: {e}");
        }
    }

    pub async fn recent(&self, limit: i32) -> RepoResult<Vec<AuditLogRow>> {
        audit::find_recent(&self.pool, limit).await
    }
}

/// Serialize an entity for the details column; secrets must already be
/// stripped (serde skip) on the type itself
pub fn create_snapshot<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|_| serde_json::json!({}))
}

/// Drain the channel into audit_log until all senders are gone
pub fn spawn_worker(pool: SqlitePool, mut rx: mpsc::Receiver<AuditLogRequest>) {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let entry = AuditInsert {
                action: request.action.as_str().to_string(),
                resource_type: request.resource_type,
                resource_id: request.resource_id,
                operator_id: request.operator_id,
                operator_name: request.operator_name,
                details: request.details,
            };
            if let Err(e) = audit::insert(&pool, entry).await {
                tracing::error!("Failed to persist audit log entry: {e}");
            }
        }
    });
}
