//! 集成测试共用脚手架：内存 SQLite + 迁移 + 基础种子数据
#![allow(dead_code)]

use pos_server::db::DbService;
use pos_server::db::repository::{RepoError, inventory, order, product, settings, staff};
use pos_server::order_money::{self, LineInput};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use shared::models::{
    InventoryItemCreate, InventoryType, Order, OrderDetail, OrderStatus, OrderType, ProductCreate,
    ProductType, RecipeLineInput, StaffRole,
};

/// 内存库必须单连接，多连接会各自拿到独立的空库
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::query("PRAGMA foreign_keys = ON;")
        .execute(&pool)
        .await
        .expect("enable foreign keys");
    DbService::migrate(&pool).await.expect("migrations");
    pool
}

pub async fn seed_staff(pool: &SqlitePool) -> i64 {
    let record = staff::create(
        pool,
        staff::StaffInsert {
            employee_code: "EMP-1001".to_string(),
            name: "Test Cashier".to_string(),
            role: StaffRole::Cashier,
            username: "cashier".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            pin: None,
        },
    )
    .await
    .expect("seed staff");
    record.id
}

pub async fn seed_item(pool: &SqlitePool, name: &str, stock: f64, minimum: f64) -> i64 {
    let item = inventory::create(
        pool,
        InventoryItemCreate {
            name: name.to_string(),
            unit: "kg".to_string(),
            current_stock: stock,
            minimum_stock: minimum,
            buying_price: 5.0,
            selling_price: 10.0,
            inventory_type: InventoryType::Kitchen,
        },
    )
    .await
    .expect("seed inventory item");
    item.id
}

pub async fn seed_product(
    pool: &SqlitePool,
    name: &str,
    product_type: ProductType,
    price: f64,
    recipe: Vec<RecipeLineInput>,
) -> i64 {
    let detail = product::create(
        pool,
        ProductCreate {
            name: name.to_string(),
            product_type,
            price,
            recipe,
        },
    )
    .await
    .expect("seed product");
    detail.product.id
}

pub async fn stock_of(pool: &SqlitePool, item_id: i64) -> f64 {
    inventory::find_by_id(pool, item_id)
        .await
        .expect("query item")
        .expect("item exists")
        .current_stock
}

pub fn line(product_id: Option<i64>, name: &str, quantity: i64, unit_price: f64) -> LineInput {
    LineInput {
        product_id,
        name: name.to_string(),
        quantity,
        unit_price,
        modifiers: Vec::new(),
        note: None,
    }
}

/// Price with the configured charge rates and persist a takeaway order
pub async fn place_order(pool: &SqlitePool, staff_id: i64, lines: Vec<LineInput>) -> OrderDetail {
    let charges = settings::get_charges(pool).await.expect("charge rates");
    let (priced, totals) = order_money::price_order(&lines, &charges, 0.0).expect("pricing");
    order::create(
        pool,
        order::OrderInsert {
            order_type: OrderType::Takeaway,
            table_number: None,
            room_number: None,
            lines: priced,
            totals,
            created_by: staff_id,
        },
    )
    .await
    .expect("create order")
}

/// Walk an order up to READY, then attempt the COMPLETED edge
pub async fn complete_order(pool: &SqlitePool, order_id: i64) -> Result<Order, RepoError> {
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        order::transition_status(pool, order_id, status)
            .await
            .expect("forward transition");
    }
    order::transition_status(pool, order_id, OrderStatus::Completed).await
}
