//! Staff Repository

use super::{RepoError, RepoResult};
use shared::models::{Staff, StaffPublic, StaffRole};
use sqlx::SqlitePool;

const STAFF_SELECT: &str = "SELECT id, employee_code, name, role, username, password_hash, pin, is_active, created_at, updated_at FROM staff";

const STAFF_PUBLIC_SELECT: &str =
    "SELECT id, employee_code, name, role, username, is_active, created_at, updated_at FROM staff";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<StaffPublic>> {
    let sql = format!("{STAFF_PUBLIC_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, StaffPublic>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let sql = format!("{STAFF_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Staff>> {
    let sql = format!("{STAFF_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub struct StaffInsert {
    pub employee_code: String,
    pub name: String,
    pub role: StaffRole,
    pub username: String,
    /// Already argon2-hashed at the handler boundary
    pub password_hash: String,
    pub pin: Option<String>,
}

pub async fn create(pool: &SqlitePool, data: StaffInsert) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO staff (id, employee_code, name, role, username, password_hash, pin, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.employee_code)
    .bind(&data.name)
    .bind(data.role.as_str())
    .bind(&data.username)
    .bind(&data.password_hash)
    .bind(&data.pin)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate("Staff username or employee code already exists".into())
        }
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff".into()))
}

pub struct StaffPatch {
    pub name: Option<String>,
    pub role: Option<StaffRole>,
    pub password_hash: Option<String>,
    pub pin: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(pool: &SqlitePool, id: i64, data: StaffPatch) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE staff SET name = COALESCE(?1, name), role = COALESCE(?2, role), \
         password_hash = COALESCE(?3, password_hash), pin = COALESCE(?4, pin), \
         is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(data.role.map(|r| r.as_str()))
    .bind(&data.password_hash)
    .bind(&data.pin)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Staff {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Staff {id} not found")))
}

/// Soft delete — staff are deactivated, never removed
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE staff SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
