//! Audit API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::audit::AuditLogRow;
use crate::utils::AppResult;

const DEFAULT_LIMIT: i32 = 100;
const MAX_LIMIT: i32 = 1000;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i32>,
}

/// GET /api/audit?limit= - 最近的审计记录
pub async fn recent(
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<AuditLogRow>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let rows = state.audit_service.recent(limit).await?;
    Ok(Json(rows))
}
