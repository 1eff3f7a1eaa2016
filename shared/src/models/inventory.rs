//! Inventory Model (库存台账)

use serde::{Deserialize, Serialize};

/// Inventory category — which station owns the stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum InventoryType {
    Kitchen,
    Bar,
    Housekeeping,
    Minibar,
}

impl InventoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "KITCHEN",
            Self::Bar => "BAR",
            Self::Housekeeping => "HOUSEKEEPING",
            Self::Minibar => "MINIBAR",
        }
    }
}

/// Inventory item entity
///
/// `current_stock` is the authoritative remaining quantity and must never go
/// below zero. Mutations go through conditional repository updates only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    /// Measurement unit (kg, L, piece...)
    pub unit: String,
    pub current_stock: f64,
    /// Reorder threshold
    pub minimum_stock: f64,
    pub buying_price: f64,
    pub selling_price: f64,
    pub inventory_type: InventoryType,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl InventoryItem {
    /// Low-stock is a derived property, recomputed on every read
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }
}

/// Create inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub current_stock: f64,
    #[serde(default)]
    pub minimum_stock: f64,
    #[serde(default)]
    pub buying_price: f64,
    #[serde(default)]
    pub selling_price: f64,
    pub inventory_type: InventoryType,
}

/// Update inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub minimum_stock: Option<f64>,
    pub buying_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub inventory_type: Option<InventoryType>,
    pub is_active: Option<bool>,
}

/// Manual stock adjustment payload (positive = receive, negative = write-off)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub delta: f64,
    pub note: Option<String>,
}
