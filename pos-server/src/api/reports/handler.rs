//! Reports API Handlers
//!
//! 日期参数是营业日 (YYYY-MM-DD)，在这里按营业时区换算成
//! Unix 毫秒区间后传给仓储层。缺省为今天。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::AppError;
use crate::core::ServerState;
use crate::db::repository::report::{
    self, MarginRow, PaymentMethodRow, RevenueSplitRow, SalesSummary, StaffSalesRow, StockHealth,
};
use crate::utils::AppResult;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};

#[derive(Deserialize)]
pub struct RangeQuery {
    /// YYYY-MM-DD, inclusive; defaults to today
    pub from: Option<String>,
    /// YYYY-MM-DD, inclusive; defaults to `from`
    pub to: Option<String>,
}

/// `[start, end)` millis for the requested business-date range
fn resolve_range(state: &ServerState, query: &RangeQuery) -> Result<(i64, i64), AppError> {
    let tz = state.config.timezone;
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();

    let from = match &query.from {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let to = match &query.to {
        Some(s) => parse_date(s)?,
        None => from,
    };
    if to < from {
        return Err(AppError::validation("'to' date is before 'from' date"));
    }
    Ok((day_start_millis(from, tz), day_end_millis(to, tz)))
}

/// GET /api/reports/sales-summary?from=&to=
pub async fn sales_summary(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<SalesSummary>> {
    let (start, end) = resolve_range(&state, &query)?;
    let summary = report::sales_summary(&state.pool, start, end).await?;
    Ok(Json(summary))
}

/// GET /api/reports/sales-by-staff?from=&to=
pub async fn sales_by_staff(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<StaffSalesRow>>> {
    let (start, end) = resolve_range(&state, &query)?;
    let rows = report::sales_by_staff(&state.pool, start, end).await?;
    Ok(Json(rows))
}

/// GET /api/reports/payment-methods?from=&to=
pub async fn payment_methods(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<PaymentMethodRow>>> {
    let (start, end) = resolve_range(&state, &query)?;
    let rows = report::payments_by_method(&state.pool, start, end).await?;
    Ok(Json(rows))
}

/// GET /api/reports/revenue-split?from=&to= - 餐/酒营收拆分
pub async fn revenue_split(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<RevenueSplitRow>>> {
    let (start, end) = resolve_range(&state, &query)?;
    let rows = report::revenue_split(&state.pool, start, end).await?;
    Ok(Json(rows))
}

/// GET /api/reports/item-margins - 按毛利率排序的库存条目
pub async fn item_margins(State(state): State<ServerState>) -> AppResult<Json<Vec<MarginRow>>> {
    let rows = report::item_margins(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/reports/stock-health - OK/低/缺 计数
pub async fn stock_health(State(state): State<ServerState>) -> AppResult<Json<StockHealth>> {
    let health = report::stock_health(&state.pool).await?;
    Ok(Json(health))
}
