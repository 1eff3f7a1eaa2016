//! Staff API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::AppError;
use crate::audit::{AuditAction, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::staff::{self, StaffInsert, StaffPatch};
use crate::utils::AppResult;
use crate::utils::validation::{validate_required_text, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN};
use shared::models::{StaffCreate, StaffPublic, StaffUpdate};

const RESOURCE: &str = "staff";

/// GET /api/staff - 员工列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StaffPublic>>> {
    let rows = staff::find_all(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/staff/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StaffPublic>> {
    let record = staff::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff {}", id)))?;
    Ok(Json(record.into()))
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be 8-{MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// POST /api/staff - 创建员工账号
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<StaffPublic>> {
    validate_required_text(&payload.name, "name", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.employee_code, "employee_code", MAX_SHORT_TEXT_LEN)?;
    validate_password(&payload.password)?;

    let password_hash = crate::auth::credential::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;
    let pin = match &payload.pin {
        Some(pin) => Some(
            crate::auth::credential::hash_password(pin)
                .map_err(|e| AppError::internal(format!("PIN hashing failed: {}", e)))?,
        ),
        None => None,
    };

    let record = staff::create(
        &state.pool,
        StaffInsert {
            employee_code: payload.employee_code,
            name: payload.name,
            role: payload.role,
            username: payload.username,
            password_hash,
            pin,
        },
    )
    .await?;

    let public: StaffPublic = record.into();
    audit_log!(
        state.audit_service,
        AuditAction::StaffCreate,
        RESOURCE,
        public.id,
        current_user,
        create_snapshot(&public)
    );
    Ok(Json(public))
}

/// PUT /api/staff/:id - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<StaffPublic>> {
    let password_hash = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            Some(
                crate::auth::credential::hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?,
            )
        }
        None => None,
    };
    let pin = match &payload.pin {
        Some(pin) => Some(
            crate::auth::credential::hash_password(pin)
                .map_err(|e| AppError::internal(format!("PIN hashing failed: {}", e)))?,
        ),
        None => None,
    };

    let record = staff::update(
        &state.pool,
        id,
        StaffPatch {
            name: payload.name,
            role: payload.role,
            password_hash,
            pin,
            is_active: payload.is_active,
        },
    )
    .await?;

    let public: StaffPublic = record.into();
    audit_log!(
        state.audit_service,
        AuditAction::StaffUpdate,
        RESOURCE,
        id,
        current_user,
        create_snapshot(&public)
    );
    Ok(Json(public))
}

/// DELETE /api/staff/:id - 停用 (软删除)
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<crate::utils::AppResponse<()>>> {
    if current_user.id == id {
        return Err(AppError::validation("Cannot deactivate your own account"));
    }

    let changed = staff::deactivate(&state.pool, id).await?;
    if !changed {
        return Err(AppError::not_found(format!("Staff {}", id)));
    }

    audit_log!(
        state.audit_service,
        AuditAction::StaffDeactivate,
        RESOURCE,
        id,
        current_user,
        serde_json::json!({})
    );
    Ok(crate::utils::ok_with_message((), "Staff deactivated"))
}
