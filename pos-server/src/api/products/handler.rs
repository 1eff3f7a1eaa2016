//! Products API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::AppError;
use crate::audit::{AuditAction, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::AppResult;
use crate::utils::validation::{validate_amount, validate_required_text, MAX_NAME_LEN};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductWithRecipe};

const RESOURCE: &str = "product";

/// GET /api/products - 在售菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 商品详情 (含配方)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithRecipe>> {
    let detail = product::find_with_recipe(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(detail))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductWithRecipe>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_amount(payload.price, "price")?;

    let detail = product::create(&state.pool, payload).await?;
    audit_log!(
        state.audit_service,
        AuditAction::ProductCreate,
        RESOURCE,
        detail.product.id,
        current_user,
        create_snapshot(&detail)
    );
    Ok(Json(detail))
}

/// PUT /api/products/:id - 部分更新；recipe 给出时整体替换
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductWithRecipe>> {
    if let Some(price) = payload.price {
        validate_amount(price, "price")?;
    }

    let detail = product::update(&state.pool, id, payload).await?;
    audit_log!(
        state.audit_service,
        AuditAction::ProductUpdate,
        RESOURCE,
        id,
        current_user,
        create_snapshot(&detail)
    );
    Ok(Json(detail))
}

/// DELETE /api/products/:id - 下架 (软删除)
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<crate::utils::AppResponse<()>>> {
    let changed = product::deactivate(&state.pool, id).await?;
    if !changed {
        return Err(AppError::not_found(format!("Product {}", id)));
    }

    audit_log!(
        state.audit_service,
        AuditAction::ProductDeactivate,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({})
    );
    Ok(crate::utils::ok_with_message((), "Product deactivated"))
}
