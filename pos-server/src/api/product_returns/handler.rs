//! Product Returns API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::AppError;
use crate::audit::{AuditAction, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product_return;
use crate::utils::AppResult;
use shared::models::{ProductReturn, ProductReturnCreate, ProductReturnUpdate};

const RESOURCE: &str = "product_return";

const DEFAULT_PAGE_SIZE: i32 = 50;
const MAX_PAGE_SIZE: i32 = 200;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

/// GET /api/product-returns
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ProductReturn>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);
    let rows = product_return::find_all(&state.pool, limit, offset).await?;
    Ok(Json(rows))
}

/// GET /api/product-returns/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductReturn>> {
    let row = product_return::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Return {}", id)))?;
    Ok(Json(row))
}

/// POST /api/product-returns - 登记退货并回补库存
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProductReturnCreate>,
) -> AppResult<Json<ProductReturn>> {
    let row = product_return::create(&state.pool, payload, current_user.id).await?;

    audit_log!(
        state.audit_service,
        AuditAction::ReturnCreate,
        RESOURCE,
        row.id,
        current_user,
        create_snapshot(&row)
    );
    Ok(Json(row))
}

/// PUT /api/product-returns/:id - 编辑；数量变化按差额调库存
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductReturnUpdate>,
) -> AppResult<Json<ProductReturn>> {
    let row = product_return::update(&state.pool, id, payload).await?;

    audit_log!(
        state.audit_service,
        AuditAction::ReturnUpdate,
        RESOURCE,
        id,
        current_user,
        create_snapshot(&row)
    );
    Ok(Json(row))
}

/// DELETE /api/product-returns/:id - 撤销退货并扣回库存
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<crate::utils::AppResponse<()>>> {
    product_return::delete(&state.pool, id).await?;

    audit_log!(
        state.audit_service,
        AuditAction::ReturnDelete,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({})
    );
    Ok(crate::utils::ok_with_message((), "Return reversed"))
}
