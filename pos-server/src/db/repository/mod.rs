//! Repository Module
//!
//! Plain-function CRUD over `sqlx::SqlitePool`. 每个多行变更都在单个
//! 事务内完成；共享计数器 (库存、订单状态) 一律使用条件 UPDATE +
//! `rows_affected()` 守卫，避免并发下账本为负或重复扣减。

pub mod audit;
pub mod expense;
pub mod inventory;
pub mod order;
pub mod product;
pub mod product_return;
pub mod report;
pub mod settings;
pub mod staff;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// 库存不足：整个扣减失败，不做部分扣减
    #[error("Insufficient stock for: {}", items.join(", "))]
    InsufficientStock { items: Vec<String> },

    /// 状态机拒绝的转移
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// 并发更新输掉竞争 (条件更新未命中)，调用方可重试
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
