//! Shared data models and utilities
//!
//! 前后端共享的数据模型 (通过 API 序列化)。
//! DB row 类型通过 `db` feature 启用 `sqlx::FromRow` / `sqlx::Type` 派生。

pub mod models;
pub mod util;

pub use models::*;
