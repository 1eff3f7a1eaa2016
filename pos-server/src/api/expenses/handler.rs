//! Expenses API Handlers

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
use crate::db::repository::expense;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{validate_optional_text, validate_required_text, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};
use shared::models::{Expense, ExpenseCreate, ExpenseUpdate};

const RESOURCE: &str = "expense";

#[derive(Deserialize)]
pub struct ListQuery {
    /// YYYY-MM-DD, inclusive
    pub from: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub to: Option<String>,
}

/// GET /api/expenses?from=&to=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    if let Some(from) = &query.from {
        parse_date(from)?;
    }
    if let Some(to) = &query.to {
        parse_date(to)?;
    }
    let rows = expense::find_all(&state.pool, query.from.as_deref(), query.to.as_deref()).await?;
    Ok(Json(rows))
}

/// GET /api/expenses/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Expense>> {
    let row = expense::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense {}", id)))?;
    Ok(Json(row))
}

/// POST /api/expenses
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<Json<Expense>> {
    parse_date(&payload.expense_date)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let row = expense::create(&state.pool, payload, current_user.id).await?;
    audit_log!(
        state.audit_service,
        AuditAction::ExpenseCreate,
        RESOURCE,
        row.id,
        current_user,
        create_snapshot(&row)
    );
    Ok(Json(row))
}

/// PUT /api/expenses/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseUpdate>,
) -> AppResult<Json<Expense>> {
    if let Some(date) = &payload.expense_date {
        parse_date(date)?;
    }
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let row = expense::update(&state.pool, id, payload).await?;
    audit_log!(
        state.audit_service,
        AuditAction::ExpenseUpdate,
        RESOURCE,
        id,
        current_user,
        create_snapshot(&row)
    );
    Ok(Json(row))
}

/// DELETE /api/expenses/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<crate::utils::AppResponse<()>>> {
    expense::delete(&state.pool, id).await?;

    audit_log!(
        state.audit_service,
        AuditAction::ExpenseDelete,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({})
    );
    Ok(crate::utils::ok_with_message((), "Expense deleted"))
}
