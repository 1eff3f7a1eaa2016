//! Product Return Model (退货/退库)
//!
//! 创建退货必须同事务增加对应库存项的 current_stock；
//! 删除/冲销必须先做反向扣减 —— 对称性是该子系统的核心不变量。

use serde::{Deserialize, Serialize};

/// Return reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReturnReason {
    Damaged,
    Expired,
    WrongOrder,
    QualityIssue,
    Other,
}

/// Product return entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductReturn {
    pub id: i64,
    /// Optional link back to the order the goods came from
    pub order_id: Option<i64>,
    pub inventory_item_id: i64,
    pub quantity_returned: f64,
    pub reason: ReturnReason,
    pub refund_amount: f64,
    pub created_by: i64,
    pub created_at: i64,
}

/// Create return payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReturnCreate {
    pub order_id: Option<i64>,
    pub inventory_item_id: i64,
    pub quantity_returned: f64,
    pub reason: ReturnReason,
    /// When absent the server falls back to its configured estimate
    pub refund_amount: Option<f64>,
}

/// Update return payload (quantity edits apply the stock *delta*)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductReturnUpdate {
    pub quantity_returned: Option<f64>,
    pub reason: Option<ReturnReason>,
    pub refund_amount: Option<f64>,
}
