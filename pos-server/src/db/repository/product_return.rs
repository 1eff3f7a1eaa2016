//! Product Return Repository
//!
//! 退货与库存的对称性：创建加库存，删除减库存，编辑按差额调整。
//! 每条路径都在一个事务内完成记录写入和库存变更。

use super::{RepoError, RepoResult, inventory};
use shared::models::{ProductReturn, ProductReturnCreate, ProductReturnUpdate};
use sqlx::SqlitePool;

const RETURN_SELECT: &str = "SELECT id, order_id, inventory_item_id, quantity_returned, reason, refund_amount, created_by, created_at FROM product_return";

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<ProductReturn>> {
    let sql = format!("{RETURN_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, ProductReturn>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductReturn>> {
    let sql = format!("{RETURN_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ProductReturn>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

fn validate_quantity(quantity: f64) -> RepoResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(RepoError::Validation(format!(
            "quantity_returned must be positive, got {quantity}"
        )));
    }
    Ok(())
}

/// Register a return and restock the referenced item atomically.
///
/// When no refund amount is given the legacy fallback `current_stock ×
/// quantity` is applied. NOTE: this matches the historical behavior and is
/// almost certainly wrong (unit cost × quantity is the expected formula);
/// kept verbatim pending a product decision, see DESIGN.md.
pub async fn create(
    pool: &SqlitePool,
    data: ProductReturnCreate,
    created_by: i64,
) -> RepoResult<ProductReturn> {
    validate_quantity(data.quantity_returned)?;

    let item = inventory::find_by_id(pool, data.inventory_item_id)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!(
                "Inventory item {} not found",
                data.inventory_item_id
            ))
        })?;

    let refund_amount = match data.refund_amount {
        Some(amount) => {
            if !amount.is_finite() || amount < 0.0 {
                return Err(RepoError::Validation(format!(
                    "refund_amount must be non-negative, got {amount}"
                )));
            }
            amount
        }
        None => item.current_stock * data.quantity_returned,
    };

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO product_return (id, order_id, inventory_item_id, quantity_returned, reason, refund_amount, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.order_id)
    .bind(data.inventory_item_id)
    .bind(data.quantity_returned)
    .bind(data.reason)
    .bind(refund_amount)
    .bind(created_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    inventory::increment(&mut tx, data.inventory_item_id, data.quantity_returned).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create return".into()))
}

/// Edit a return. A changed quantity applies the *difference* to stock,
/// never a blind re-application of the full amount.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ProductReturnUpdate,
) -> RepoResult<ProductReturn> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Return {id} not found")))?;

    if let Some(q) = data.quantity_returned {
        validate_quantity(q)?;
    }
    if let Some(amount) = data.refund_amount
        && (!amount.is_finite() || amount < 0.0)
    {
        return Err(RepoError::Validation(format!(
            "refund_amount must be non-negative, got {amount}"
        )));
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE product_return SET \
         quantity_returned = COALESCE(?1, quantity_returned), \
         reason = COALESCE(?2, reason), \
         refund_amount = COALESCE(?3, refund_amount) \
         WHERE id = ?4",
    )
    .bind(data.quantity_returned)
    .bind(data.reason)
    .bind(data.refund_amount)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(new_quantity) = data.quantity_returned {
        let delta = new_quantity - existing.quantity_returned;
        if delta > 0.0 {
            inventory::increment(&mut tx, existing.inventory_item_id, delta).await?;
        } else if delta < 0.0 {
            // Shrinking a return takes stock back out; fails if it was consumed since
            let ok = inventory::try_decrement(&mut *tx, existing.inventory_item_id, -delta).await?;
            if !ok {
                tx.rollback().await?;
                return Err(RepoError::Conflict(
                    "Cannot reduce return quantity, the restocked quantity was already consumed"
                        .into(),
                ));
            }
        }
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Return {id} not found")))
}

/// Reverse a return: take the restocked quantity back out, then delete the
/// record, in one transaction. Fails if the stock was already consumed.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Return {id} not found")))?;

    let mut tx = pool.begin().await?;

    let ok = inventory::try_decrement(
        &mut *tx,
        existing.inventory_item_id,
        existing.quantity_returned,
    )
    .await?;
    if !ok {
        tx.rollback().await?;
        return Err(RepoError::Conflict(
            "Cannot reverse return, the restocked quantity was already consumed".into(),
        ));
    }

    sqlx::query("DELETE FROM product_return WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
