//! Order Repository
//!
//! 订单生命周期的写路径。关键不变量：
//!
//! - 转移写入是条件更新 (`WHERE status = <prior>`)，并发竞争输者得到
//!   [`RepoError::Conflict`]，重复同状态写入是幂等空操作。
//! - COMPLETED 边在同一事务内完成状态写入 + 按 recipe 聚合的库存扣减；
//!   任一条目库存不足则整个事务回滚，订单停留在原状态。

use super::{RepoError, RepoResult, inventory};
use crate::order_money::{OrderTotals, PricedLine};
use shared::models::{
    Order, OrderDetail, OrderItem, OrderItemStatus, OrderStatus, OrderType, Payment, PaymentCreate,
    PaymentStatus,
};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, order_number, order_type, table_number, room_number, status, payment_status, subtotal, tax_amount, service_charge, discount_amount, total_amount, created_by, completed_at, created_at, updated_at FROM orders";

const ITEM_SELECT: &str = "SELECT id, order_id, product_id, name, quantity, unit_price, modifiers_total, total_price, status, note FROM order_item";

/// Reconciliation tolerance for split payments (one cent)
const PAYMENT_TOLERANCE: f64 = 0.009;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_payments(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Payment>> {
    let rows = sqlx::query_as::<_, Payment>(
        "SELECT id, order_id, method, amount, status, created_at FROM payment WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = find_items(pool, id).await?;
    let payments = find_payments(pool, id).await?;
    Ok(Some(OrderDetail {
        order,
        items,
        payments,
    }))
}

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(s) => {
            let sql = format!("{ORDER_SELECT} WHERE status = ? ORDER BY created_at DESC LIMIT ? OFFSET ?");
            sqlx::query_as::<_, Order>(&sql)
                .bind(s)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
            sqlx::query_as::<_, Order>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

/// Table / room attachment must match the order type
fn validate_location(
    order_type: OrderType,
    table_number: &Option<String>,
    room_number: &Option<String>,
) -> RepoResult<()> {
    match order_type {
        OrderType::DineIn => {
            if table_number.is_none() || room_number.is_some() {
                return Err(RepoError::Validation(
                    "dine-in orders require a table_number and no room_number".into(),
                ));
            }
        }
        OrderType::RoomService => {
            if room_number.is_none() || table_number.is_some() {
                return Err(RepoError::Validation(
                    "room-service orders require a room_number and no table_number".into(),
                ));
            }
        }
        OrderType::Takeaway | OrderType::Delivery => {
            if table_number.is_some() || room_number.is_some() {
                return Err(RepoError::Validation(
                    "takeaway/delivery orders carry neither table nor room".into(),
                ));
            }
        }
    }
    Ok(())
}

pub struct OrderInsert {
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub room_number: Option<String>,
    pub lines: Vec<PricedLine>,
    pub totals: OrderTotals,
    pub created_by: i64,
}

/// Create an order with its priced line items in a single transaction
pub async fn create(pool: &SqlitePool, data: OrderInsert) -> RepoResult<OrderDetail> {
    validate_location(data.order_type, &data.table_number, &data.room_number)?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let order_number = format!("ORD-{id}");

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO orders (id, order_number, order_type, table_number, room_number, status, payment_status, \
         subtotal, tax_amount, service_charge, discount_amount, total_amount, created_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, 'PENDING', 'PENDING', ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&order_number)
    .bind(data.order_type)
    .bind(&data.table_number)
    .bind(&data.room_number)
    .bind(data.totals.subtotal)
    .bind(data.totals.tax_amount)
    .bind(data.totals.service_charge)
    .bind(data.totals.discount_amount)
    .bind(data.totals.total_amount)
    .bind(data.created_by)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for line in &data.lines {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, name, quantity, unit_price, modifiers_total, total_price, status, note) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'PENDING', ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.modifiers_total)
        .bind(line.total_price)
        .bind(&line.note)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Aggregated inventory consumption of an order via recipe lines.
/// Custom items (no product link) consume nothing.
async fn consumption(
    conn: &mut sqlx::SqliteConnection,
    order_id: i64,
) -> RepoResult<Vec<(i64, String, f64)>> {
    let rows = sqlx::query_as::<_, (i64, String, f64)>(
        "SELECT r.inventory_item_id, ii.name, SUM(oi.quantity * r.quantity_per_unit) AS qty \
         FROM order_item oi \
         JOIN recipe r ON r.product_id = oi.product_id \
         JOIN inventory_item ii ON ii.id = r.inventory_item_id \
         WHERE oi.order_id = ? \
         GROUP BY r.inventory_item_id, ii.name",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Drive the order status machine.
///
/// - Same-status writes are idempotent no-ops (retry safety: completing an
///   already-completed order does not decrement inventory again).
/// - Illegal edges fail [`RepoError::InvalidTransition`] with no state change.
/// - The PENDING-side edge into COMPLETED decrements inventory atomically;
///   insufficient stock rolls everything back.
pub async fn transition_status(
    pool: &SqlitePool,
    id: i64,
    target: OrderStatus,
) -> RepoResult<Order> {
    let order = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    // Idempotent retry: repeated writes of the current status change nothing
    if order.status == target {
        return Ok(order);
    }

    if !order.status.can_transition_to(target) {
        return Err(RepoError::InvalidTransition {
            from: order.status.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    // Conditional write: losing a concurrent race leaves 0 rows affected
    let completed_at = (target == OrderStatus::Completed).then_some(now);
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, completed_at = COALESCE(?2, completed_at), updated_at = ?3 \
         WHERE id = ?4 AND status = ?5",
    )
    .bind(target)
    .bind(completed_at)
    .bind(now)
    .bind(id)
    .bind(order.status)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(RepoError::Conflict(format!(
            "Order {id} was updated concurrently, retry"
        )));
    }

    // Inventory decrement happens exactly on the edge into COMPLETED
    if target == OrderStatus::Completed {
        let needs = consumption(&mut tx, id).await?;
        let mut missing = Vec::new();
        for (item_id, name, qty) in &needs {
            if !inventory::try_decrement(&mut *tx, *item_id, *qty).await? {
                missing.push(name.clone());
            }
        }
        if !missing.is_empty() {
            tx.rollback().await?;
            return Err(RepoError::InsufficientStock { items: missing });
        }
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Record a payment (split payments allowed) and recompute the rollup
/// payment status inside one transaction.
pub async fn add_payment(
    pool: &SqlitePool,
    order_id: i64,
    data: PaymentCreate,
) -> RepoResult<Payment> {
    if !data.amount.is_finite() || data.amount <= 0.0 {
        return Err(RepoError::Validation(format!(
            "payment amount must be positive, got {}",
            data.amount
        )));
    }

    let now = shared::util::now_millis();
    let payment_id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;

    // Status read inside the transaction: a concurrent cancel cannot land
    // between the check and the insert
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
    if order.status == OrderStatus::Cancelled {
        tx.rollback().await?;
        return Err(RepoError::Validation(
            "cannot record a payment against a cancelled order".into(),
        ));
    }

    sqlx::query(
        "INSERT INTO payment (id, order_id, method, amount, status, created_at) \
         VALUES (?, ?, ?, ?, 'COMPLETED', ?)",
    )
    .bind(payment_id)
    .bind(order_id)
    .bind(data.method)
    .bind(data.amount)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let paid: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM payment WHERE order_id = ? AND status = 'COMPLETED'",
    )
    .bind(order_id)
    .fetch_one(&mut *tx)
    .await?;

    let payment_status = if paid + PAYMENT_TOLERANCE >= order.total_amount {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    };
    sqlx::query("UPDATE orders SET payment_status = ?, updated_at = ? WHERE id = ?")
        .bind(payment_status)
        .bind(now)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let payment = sqlx::query_as::<_, Payment>(
        "SELECT id, order_id, method, amount, status, created_at FROM payment WHERE id = ?",
    )
    .bind(payment_id)
    .fetch_one(pool)
    .await?;
    Ok(payment)
}

/// Advance one line item through the kitchen statuses (forward-only)
pub async fn transition_item_status(
    pool: &SqlitePool,
    order_id: i64,
    item_id: i64,
    target: OrderItemStatus,
) -> RepoResult<OrderItem> {
    let sql = format!("{ITEM_SELECT} WHERE id = ? AND order_id = ?");
    let item = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(item_id)
        .bind(order_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!("Order item {item_id} not found in order {order_id}"))
        })?;

    if item.status == target {
        return Ok(item);
    }
    if !item.status.can_transition_to(target) {
        return Err(RepoError::InvalidTransition {
            from: item.status.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }

    let rows = sqlx::query("UPDATE order_item SET status = ?1 WHERE id = ?2 AND status = ?3")
        .bind(target)
        .bind(item_id)
        .bind(item.status)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order item {item_id} was updated concurrently, retry"
        )));
    }

    let item = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(item_id)
        .bind(order_id)
        .fetch_one(pool)
        .await?;
    Ok(item)
}
