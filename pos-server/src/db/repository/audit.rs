//! Audit Log Repository

use super::RepoResult;
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditLogRow {
    pub id: i64,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub details: String,
    pub created_at: i64,
}

pub struct AuditInsert {
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

pub async fn insert(pool: &SqlitePool, entry: AuditInsert) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO audit_log (id, action, resource_type, resource_id, operator_id, operator_name, details, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(shared::util::snowflake_id())
    .bind(&entry.action)
    .bind(&entry.resource_type)
    .bind(&entry.resource_id)
    .bind(entry.operator_id)
    .bind(&entry.operator_name)
    .bind(entry.details.to_string())
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_recent(pool: &SqlitePool, limit: i32) -> RepoResult<Vec<AuditLogRow>> {
    let rows = sqlx::query_as::<_, AuditLogRow>(
        "SELECT id, action, resource_type, resource_id, operator_id, operator_name, details, created_at \
         FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
