//! Orders API Handlers
//!
//! 金额计算在 `order_money` 中进行，税率/服务费从 pos_setting 读取
//! 并作为显式配置注入。

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::AppError;
use crate::audit::AuditAction;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{order, product, settings};
use crate::order_money::{self, LineInput};
use crate::utils::AppResult;
use shared::models::{
    Order, OrderCreate, OrderDetail, OrderItem, OrderItemStatus, OrderStatus, OrderStatusUpdate,
    Payment, PaymentCreate,
};

const RESOURCE: &str = "order";

const DEFAULT_PAGE_SIZE: i32 = 50;
const MAX_PAGE_SIZE: i32 = 200;

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

/// GET /api/orders?status=&limit=&offset=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);
    let orders = order::find_all(&state.pool, query.status, limit, offset).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情 (条目 + 收款)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(detail))
}

/// 将 API 条目输入解析为定价输入。
/// 关联商品的条目取菜单名称和价格；自选条目必须自带名称和单价。
async fn resolve_lines(
    state: &ServerState,
    items: &[shared::models::OrderItemInput],
) -> Result<Vec<LineInput>, AppError> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let line = match item.product_id {
            Some(product_id) => {
                let menu_product = product::find_by_id(&state.pool, product_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Product {}", product_id)))?;
                if !menu_product.is_active {
                    return Err(AppError::validation(format!(
                        "Product '{}' is no longer on the menu",
                        menu_product.name
                    )));
                }
                LineInput {
                    product_id: Some(product_id),
                    name: menu_product.name,
                    quantity: item.quantity,
                    unit_price: item.unit_price.unwrap_or(menu_product.price),
                    modifiers: item.modifiers.clone(),
                    note: item.note.clone(),
                }
            }
            None => LineInput {
                product_id: None,
                name: item
                    .name
                    .clone()
                    .ok_or_else(|| AppError::validation("custom items require a name"))?,
                quantity: item.quantity,
                unit_price: item
                    .unit_price
                    .ok_or_else(|| AppError::validation("custom items require a unit_price"))?,
                modifiers: item.modifiers.clone(),
                note: item.note.clone(),
            },
        };
        lines.push(line);
    }
    Ok(lines)
}

/// POST /api/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let lines = resolve_lines(&state, &payload.items).await?;
    let charges = settings::get_charges(&state.pool).await?;
    let (priced, totals) = order_money::price_order(&lines, &charges, payload.discount_amount)?;

    let detail = order::create(
        &state.pool,
        order::OrderInsert {
            order_type: payload.order_type,
            table_number: payload.table_number,
            room_number: payload.room_number,
            lines: priced,
            totals,
            created_by: current_user.id,
        },
    )
    .await?;

    audit_log!(
        state.audit_service,
        AuditAction::OrderCreate,
        RESOURCE,
        detail.order.id,
        current_user,
        serde_json::json!({
            "order_number": detail.order.order_number,
            "total_amount": detail.order.total_amount,
            "item_count": detail.items.len(),
        })
    );
    Ok(Json(detail))
}

/// PUT /api/orders/:id/status - 状态流转
///
/// READY → COMPLETED 的边在仓储层原子地扣减库存；
/// 库存不足时订单停留在原状态。
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let updated = order::transition_status(&state.pool, id, payload.status).await?;

    audit_log!(
        state.audit_service,
        AuditAction::OrderStatusChange,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({"status": updated.status.as_str()})
    );
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct ItemStatusUpdate {
    pub status: OrderItemStatus,
}

/// PUT /api/orders/:id/items/:item_id/status - 厨房条目状态
pub async fn update_item_status(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<ItemStatusUpdate>,
) -> AppResult<Json<OrderItem>> {
    let item = order::transition_item_status(&state.pool, id, item_id, payload.status).await?;
    Ok(Json(item))
}

/// POST /api/orders/:id/payments - 收款 (支持分笔)
pub async fn add_payment(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<Payment>> {
    let payment = order::add_payment(&state.pool, id, payload).await?;

    audit_log!(
        state.audit_service,
        AuditAction::PaymentRecord,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({
            "payment_id": payment.id,
            "amount": payment.amount,
        })
    );
    Ok(Json(payment))
}
