//! Product Model (菜单商品)
//!
//! 商品通过 recipe 行映射到库存项：下单完成时按
//! `quantity_per_unit × 销售数量` 扣减库存。

use serde::{Deserialize, Serialize};

/// Menu side of the revenue split (bar vs food reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ProductType {
    Food,
    Bar,
}

/// Menu product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub product_type: ProductType,
    pub price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One recipe line: consuming `quantity_per_unit` of an inventory item
/// per unit of product sold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeLine {
    pub product_id: i64,
    pub inventory_item_id: i64,
    pub quantity_per_unit: f64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub product_type: ProductType,
    pub price: f64,
    /// Recipe lines (may be empty: product consumes no tracked stock)
    #[serde(default)]
    pub recipe: Vec<RecipeLineInput>,
}

/// Recipe line input (product_id implied by the route)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLineInput {
    pub inventory_item_id: i64,
    pub quantity_per_unit: f64,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub product_type: Option<ProductType>,
    pub price: Option<f64>,
    /// When present, replaces the whole recipe
    pub recipe: Option<Vec<RecipeLineInput>>,
    pub is_active: Option<bool>,
}

/// Product with its recipe attached (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithRecipe {
    #[serde(flatten)]
    pub product: Product,
    pub recipe: Vec<RecipeLine>,
}
