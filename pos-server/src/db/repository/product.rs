//! Product Repository
//!
//! 商品 + recipe 行 (商品→库存映射)。recipe 替换是整体替换，
//! 与商品写入同事务。

use super::{RepoError, RepoResult};
use shared::models::{
    Product, ProductCreate, ProductUpdate, ProductWithRecipe, RecipeLine, RecipeLineInput,
};
use sqlx::{SqliteConnection, SqlitePool};

const PRODUCT_SELECT: &str =
    "SELECT id, name, product_type, price, is_active, created_at, updated_at FROM product";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE is_active = 1 ORDER BY name");
    Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_with_recipe(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductWithRecipe>> {
    let Some(product) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let recipe = find_recipe(pool, id).await?;
    Ok(Some(ProductWithRecipe { product, recipe }))
}

pub async fn find_recipe(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<RecipeLine>> {
    let rows = sqlx::query_as::<_, RecipeLine>(
        "SELECT product_id, inventory_item_id, quantity_per_unit FROM recipe WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

fn validate_recipe(recipe: &[RecipeLineInput]) -> RepoResult<()> {
    for line in recipe {
        if !line.quantity_per_unit.is_finite() || line.quantity_per_unit <= 0.0 {
            return Err(RepoError::Validation(format!(
                "recipe quantity_per_unit must be positive, got {}",
                line.quantity_per_unit
            )));
        }
    }
    Ok(())
}

async fn replace_recipe(
    conn: &mut SqliteConnection,
    product_id: i64,
    recipe: &[RecipeLineInput],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM recipe WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    for line in recipe {
        sqlx::query(
            "INSERT INTO recipe (product_id, inventory_item_id, quantity_per_unit) VALUES (?, ?, ?)",
        )
        .bind(product_id)
        .bind(line.inventory_item_id)
        .bind(line.quantity_per_unit)
        .execute(&mut *conn)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => RepoError::Validation(format!(
                "duplicate recipe line for inventory item {}",
                line.inventory_item_id
            )),
            RepoError::Database(msg) if msg.contains("FOREIGN KEY") => RepoError::NotFound(
                format!("Inventory item {} not found", line.inventory_item_id),
            ),
            other => other,
        })?;
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<ProductWithRecipe> {
    validate_recipe(&data.recipe)?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO product (id, name, product_type, price, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.product_type)
    .bind(data.price)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    replace_recipe(&mut *tx, id, &data.recipe).await?;
    tx.commit().await?;

    find_with_recipe(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<ProductWithRecipe> {
    if let Some(recipe) = &data.recipe {
        validate_recipe(recipe)?;
    }
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), product_type = COALESCE(?2, product_type), \
         price = COALESCE(?3, price), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.product_type)
    .bind(data.price)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }

    if let Some(recipe) = &data.recipe {
        replace_recipe(&mut *tx, id, recipe).await?;
    }
    tx.commit().await?;

    find_with_recipe(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Soft delete
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE product SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}
