//! Inventory API Handlers
//!
//! 所有读取路径按当前用户角色的可见类别过滤 (静态映射，见
//! `auth::permissions::allowed_inventory_types`)。

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::AppError;
use crate::audit::{AuditAction, create_snapshot};
use crate::audit_log;
use crate::auth::{CurrentUser, allowed_inventory_types};
use crate::core::ServerState;
use crate::db::repository::inventory;
use crate::utils::AppResult;
use crate::utils::validation::{validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN};
use shared::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate, StockAdjustment};

const RESOURCE: &str = "inventory_item";

/// GET /api/inventory - 当前角色可见的库存
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let types = allowed_inventory_types(current_user.role);
    let items = inventory::find_all(&state.pool, Some(types)).await?;
    Ok(Json(items))
}

/// GET /api/inventory/low-stock - 低于补货阈值的条目
pub async fn low_stock(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let types = allowed_inventory_types(current_user.role);
    let items = inventory::find_low_stock(&state.pool, Some(types)).await?;
    Ok(Json(items))
}

/// GET /api/inventory/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<InventoryItem>> {
    let item = inventory::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inventory item {}", id)))?;

    if !allowed_inventory_types(current_user.role).contains(&item.inventory_type) {
        return Err(AppError::forbidden("Inventory category not visible to this role"));
    }
    Ok(Json(item))
}

/// POST /api/inventory
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<InventoryItemCreate>,
) -> AppResult<Json<InventoryItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.unit, "unit", MAX_NAME_LEN)?;

    let item = inventory::create(&state.pool, payload).await?;
    audit_log!(
        state.audit_service,
        AuditAction::InventoryCreate,
        RESOURCE,
        item.id,
        current_user,
        create_snapshot(&item)
    );
    Ok(Json(item))
}

/// PUT /api/inventory/:id - 部分更新 (不含库存数量，数量走 adjust)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<InventoryItemUpdate>,
) -> AppResult<Json<InventoryItem>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;

    let item = inventory::update(&state.pool, id, payload).await?;
    audit_log!(
        state.audit_service,
        AuditAction::InventoryUpdate,
        RESOURCE,
        id,
        current_user,
        create_snapshot(&item)
    );
    Ok(Json(item))
}

/// POST /api/inventory/:id/adjust - 手工调整 (收货为正，报损为负)
pub async fn adjust(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjustment>,
) -> AppResult<Json<InventoryItem>> {
    if !payload.delta.is_finite() || payload.delta == 0.0 {
        return Err(AppError::validation("delta must be a non-zero finite number"));
    }
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let item = inventory::adjust_stock(&state.pool, id, payload.delta).await?;
    audit_log!(
        state.audit_service,
        AuditAction::InventoryAdjust,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({
            "delta": payload.delta,
            "note": payload.note,
            "current_stock": item.current_stock,
        })
    );
    Ok(Json(item))
}

/// DELETE /api/inventory/:id - 停用 (软删除)
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<crate::utils::AppResponse<()>>> {
    let changed = inventory::deactivate(&state.pool, id).await?;
    if !changed {
        return Err(AppError::not_found(format!("Inventory item {}", id)));
    }

    audit_log!(
        state.audit_service,
        AuditAction::InventoryDeactivate,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({})
    );
    Ok(crate::utils::ok_with_message((), "Inventory item deactivated"))
}
