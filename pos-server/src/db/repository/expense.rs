//! Expense Repository
//!
//! 独立的支出台账，不触碰其他表。

use super::{RepoError, RepoResult};
use shared::models::{Expense, ExpenseCreate, ExpenseUpdate};
use sqlx::SqlitePool;

const EXPENSE_SELECT: &str = "SELECT id, expense_date, category, amount, payment_method, receipt_number, note, created_by, created_at FROM expense";

pub async fn find_all(
    pool: &SqlitePool,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> RepoResult<Vec<Expense>> {
    let rows = match (from_date, to_date) {
        (Some(from), Some(to)) => {
            let sql = format!(
                "{EXPENSE_SELECT} WHERE expense_date >= ? AND expense_date <= ? ORDER BY expense_date DESC, id DESC"
            );
            sqlx::query_as::<_, Expense>(&sql)
                .bind(from)
                .bind(to)
                .fetch_all(pool)
                .await?
        }
        _ => {
            let sql = format!("{EXPENSE_SELECT} ORDER BY expense_date DESC, id DESC");
            sqlx::query_as::<_, Expense>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Expense>> {
    let sql = format!("{EXPENSE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Expense>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

fn validate_amount(amount: f64) -> RepoResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(RepoError::Validation(format!(
            "expense amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

pub async fn create(
    pool: &SqlitePool,
    data: ExpenseCreate,
    created_by: i64,
) -> RepoResult<Expense> {
    validate_amount(data.amount)?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let result = sqlx::query(
        "INSERT INTO expense (id, expense_date, category, amount, payment_method, receipt_number, note, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.expense_date)
    .bind(&data.category)
    .bind(data.amount)
    .bind(data.payment_method)
    .bind(&data.receipt_number)
    .bind(&data.note)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) => {
            return match RepoError::from(e) {
                RepoError::Duplicate(_) => Err(RepoError::Duplicate(
                    "An expense with this receipt number already exists".into(),
                )),
                other => Err(other),
            };
        }
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create expense".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ExpenseUpdate) -> RepoResult<Expense> {
    if let Some(amount) = data.amount {
        validate_amount(amount)?;
    }

    let result = sqlx::query(
        "UPDATE expense SET \
         expense_date = COALESCE(?1, expense_date), \
         category = COALESCE(?2, category), \
         amount = COALESCE(?3, amount), \
         payment_method = COALESCE(?4, payment_method), \
         receipt_number = COALESCE(?5, receipt_number), \
         note = COALESCE(?6, note) \
         WHERE id = ?7",
    )
    .bind(&data.expense_date)
    .bind(&data.category)
    .bind(data.amount)
    .bind(data.payment_method)
    .bind(&data.receipt_number)
    .bind(&data.note)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Expense {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Expense {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM expense WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Expense {id} not found")));
    }
    Ok(())
}
