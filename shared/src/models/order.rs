//! Order Model (订单聚合)
//!
//! 状态机是显式编码的转移表，不从字符串字面量推断：
//!
//! ```text
//! PENDING → CONFIRMED → PREPARING → READY → COMPLETED
//!     └────────┴───────────┴─────────┴→ CANCELLED (terminal)
//! ```
//!
//! COMPLETED 是库存扣减的触发边；转移写入使用条件更新，
//! 重复完成是幂等空操作。

use serde::{Deserialize, Serialize};

/// Order type — determines whether a table or a room is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
    RoomService,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Explicit transition table. Forward transitions are adjacent-only;
    /// CANCELLED is reachable from any non-completed state and terminal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (*self, next),
            (Pending, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, Ready)
                | (Ready, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Preparing, Cancelled)
                | (Ready, Cancelled)
        )
    }

}

/// Rollup payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
    Refunded,
}

/// Per-item kitchen status (subset of the order lifecycle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
}

impl OrderItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Served => "SERVED",
        }
    }

    /// Adjacent-forward only
    pub fn can_transition_to(&self, next: OrderItemStatus) -> bool {
        use OrderItemStatus::*;
        matches!(
            (*self, next),
            (Pending, Preparing) | (Preparing, Ready) | (Ready, Served)
        )
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub order_type: OrderType,
    /// Dine-in table, exclusive with room_number
    pub table_number: Option<String>,
    /// Room service room, exclusive with table_number
    pub room_number: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub service_charge: f64,
    pub discount_amount: f64,
    /// subtotal + tax + service − discount, clamped at 0
    pub total_amount: f64,
    pub created_by: i64,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// Menu product reference; None for custom (off-menu) items
    pub product_id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// Sum of variation modifiers applied per unit
    pub modifiers_total: f64,
    /// quantity × (unit_price + modifiers_total)
    pub total_price: f64,
    pub status: OrderItemStatus,
    pub note: Option<String>,
}

/// Line item input for order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    /// Menu product; when None, `name` describes a custom item
    pub product_id: Option<i64>,
    /// Required for custom items; ignored for products (menu name wins)
    pub name: Option<String>,
    pub quantity: i64,
    /// Required for custom items; products default to the menu price
    pub unit_price: Option<f64>,
    /// Variation price modifiers per unit (e.g. extra shot +0.50)
    #[serde(default)]
    pub modifiers: Vec<f64>,
    pub note: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub room_number: Option<String>,
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub discount_amount: f64,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Order with line items and payments attached (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub payments: Vec<crate::models::Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_adjacent_only() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Completed));

        // skipping a step is rejected
        assert!(!Pending.can_transition_to(Preparing));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Ready));
        // no going backwards
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Completed.can_transition_to(Pending));
    }

    #[test]
    fn cancel_reachable_from_any_non_completed_state() {
        use OrderStatus::*;
        for s in [Pending, Confirmed, Preparing, Ready] {
            assert!(s.can_transition_to(Cancelled), "{s:?} should cancel");
        }
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn item_status_moves_forward_only() {
        use OrderItemStatus::*;
        assert!(Pending.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Served));
        assert!(!Pending.can_transition_to(Served));
        assert!(!Served.can_transition_to(Ready));
    }
}
