//! Data models
//!
//! Shared between pos-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are snowflake `i64`, all timestamps Unix millis `i64`.

pub mod expense;
pub mod inventory;
pub mod order;
pub mod payment;
pub mod product;
pub mod product_return;
pub mod settings;
pub mod staff;

// Re-exports
pub use expense::*;
pub use inventory::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use product_return::*;
pub use settings::*;
pub use staff::*;
