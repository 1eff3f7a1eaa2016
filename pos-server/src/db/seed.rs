//! 首次启动种子数据
//!
//! 员工表为空时创建默认管理员 (admin / admin123)，
//! 并写入默认收费设置。仅在全新数据库上生效。

use sqlx::SqlitePool;

use crate::auth::credential;
use crate::db::repository::RepoResult;
use shared::models::{SETTING_CURRENCY, SETTING_SERVICE_CHARGE_RATE, SETTING_TAX_RATE, StaffRole};

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

pub async fn run(pool: &SqlitePool) -> RepoResult<()> {
    ensure_default_settings(pool).await?;
    ensure_default_admin(pool).await?;
    Ok(())
}

async fn ensure_default_settings(pool: &SqlitePool) -> RepoResult<()> {
    let now = shared::util::now_millis();
    for (key, value) in [
        (SETTING_TAX_RATE, "0.16"),
        (SETTING_SERVICE_CHARGE_RATE, "0.10"),
        (SETTING_CURRENCY, "EUR"),
    ] {
        sqlx::query("INSERT OR IGNORE INTO pos_setting (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn ensure_default_admin(pool: &SqlitePool) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let hash = credential::hash_password(DEFAULT_ADMIN_PASSWORD)
        .map_err(|e| crate::db::repository::RepoError::Database(e.to_string()))?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO staff (id, employee_code, name, role, username, password_hash, is_active, created_at, updated_at) \
         VALUES (?, 'EMP-0001', 'Administrator', ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(StaffRole::Superadmin.as_str())
    .bind(DEFAULT_ADMIN_USERNAME)
    .bind(&hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    tracing::warn!(
        "Created default admin account '{}' — change the password immediately",
        DEFAULT_ADMIN_USERNAME
    );
    Ok(())
}
