//! Inventory Repository
//!
//! `current_stock` 只通过条件 UPDATE 变更：
//!
//! ```sql
//! UPDATE inventory_item SET current_stock = current_stock - ?
//! WHERE id = ? AND current_stock >= ?
//! ```
//!
//! `rows_affected() == 0` 意味着库存不足或输掉并发竞争，由调用方
//! 回滚整个事务。低库存是查询时派生属性，从不缓存。

use super::{RepoError, RepoResult};
use shared::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate, InventoryType};
use sqlx::{SqliteConnection, SqlitePool};

const ITEM_SELECT: &str = "SELECT id, name, unit, current_stock, minimum_stock, buying_price, selling_price, inventory_type, is_active, created_at, updated_at FROM inventory_item";

/// Find all active items, optionally restricted to a set of inventory types
/// (the caller's role → type map is applied at the API boundary).
pub async fn find_all(
    pool: &SqlitePool,
    types: Option<&[InventoryType]>,
) -> RepoResult<Vec<InventoryItem>> {
    match types {
        None => {
            let sql = format!("{ITEM_SELECT} WHERE is_active = 1 ORDER BY name");
            Ok(sqlx::query_as::<_, InventoryItem>(&sql)
                .fetch_all(pool)
                .await?)
        }
        Some(types) => {
            // placeholders generated per type; SQLite has no array binds
            let placeholders = vec!["?"; types.len().max(1)].join(", ");
            let sql = format!(
                "{ITEM_SELECT} WHERE is_active = 1 AND inventory_type IN ({placeholders}) ORDER BY name"
            );
            let mut query = sqlx::query_as::<_, InventoryItem>(&sql);
            for t in types {
                query = query.bind(t.as_str());
            }
            Ok(query.fetch_all(pool).await?)
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<InventoryItem>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, InventoryItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Low-stock items, recomputed on every read (`current_stock <= minimum_stock`)
pub async fn find_low_stock(
    pool: &SqlitePool,
    types: Option<&[InventoryType]>,
) -> RepoResult<Vec<InventoryItem>> {
    let items = find_all(pool, types).await?;
    Ok(items.into_iter().filter(|i| i.is_low_stock()).collect())
}

pub async fn create(pool: &SqlitePool, data: InventoryItemCreate) -> RepoResult<InventoryItem> {
    if data.current_stock < 0.0 || data.minimum_stock < 0.0 {
        return Err(RepoError::Validation(
            "stock quantities cannot be negative".into(),
        ));
    }
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO inventory_item (id, name, unit, current_stock, minimum_stock, buying_price, selling_price, inventory_type, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.unit)
    .bind(data.current_stock)
    .bind(data.minimum_stock)
    .bind(data.buying_price)
    .bind(data.selling_price)
    .bind(data.inventory_type.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create inventory item".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: InventoryItemUpdate,
) -> RepoResult<InventoryItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE inventory_item SET name = COALESCE(?1, name), unit = COALESCE(?2, unit), \
         minimum_stock = COALESCE(?3, minimum_stock), buying_price = COALESCE(?4, buying_price), \
         selling_price = COALESCE(?5, selling_price), inventory_type = COALESCE(?6, inventory_type), \
         is_active = COALESCE(?7, is_active), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.name)
    .bind(&data.unit)
    .bind(data.minimum_stock)
    .bind(data.buying_price)
    .bind(data.selling_price)
    .bind(data.inventory_type.map(|t| t.as_str()))
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Inventory item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Inventory item {id} not found")))
}

/// Soft delete
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE inventory_item SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Ledger mutations (transaction-scoped) ───────────────────────────

/// Conditionally subtract `qty` from an item's stock inside an open
/// transaction. Returns `false` when the guard misses (insufficient stock
/// or a lost race) — the caller must roll the transaction back.
pub async fn try_decrement(
    conn: &mut SqliteConnection,
    item_id: i64,
    qty: f64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE inventory_item SET current_stock = current_stock - ?1, updated_at = ?2 \
         WHERE id = ?3 AND is_active = 1 AND current_stock >= ?1",
    )
    .bind(qty)
    .bind(now)
    .bind(item_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Add `qty` back to an item's stock inside an open transaction.
/// Only the returns workflow calls this, keyed to a persisted return row.
pub async fn increment(conn: &mut SqliteConnection, item_id: i64, qty: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE inventory_item SET current_stock = current_stock + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(qty)
    .bind(now)
    .bind(item_id)
    .execute(conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Inventory item {item_id} not found"
        )));
    }
    Ok(())
}

/// Manual stock adjustment (receiving / write-off). Negative deltas use the
/// same conditional guard as order decrements.
pub async fn adjust_stock(pool: &SqlitePool, id: i64, delta: f64) -> RepoResult<InventoryItem> {
    let mut tx = pool.begin().await?;

    if delta >= 0.0 {
        increment(&mut *tx, id, delta).await?;
    } else if !try_decrement(&mut *tx, id, -delta).await? {
        tx.rollback().await?;
        let name = find_by_id(pool, id)
            .await?
            .map(|i| i.name)
            .ok_or_else(|| RepoError::NotFound(format!("Inventory item {id} not found")))?;
        return Err(RepoError::InsufficientStock { items: vec![name] });
    }

    tx.commit().await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Inventory item {id} not found")))
}
