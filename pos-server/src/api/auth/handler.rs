//! Authentication Handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::audit::{AuditAction, AuditLogRequest};
use crate::auth::{CurrentUser, get_default_permissions};
use crate::core::ServerState;
use crate::db::repository::staff;
use shared::models::StaffPublic;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: StaffPublic,
}

/// POST /api/auth/login
///
/// 校验凭证并签发 JWT。用户名不存在和密码错误返回同一错误消息，
/// 防止用户名枚举。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let record = staff::find_by_username(&state.pool, &req.username).await?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(record) = record else {
        log_failed_login(&state, &req.username, "user_not_found");
        return Err(AppError::unauthorized());
    };

    if !record.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = crate::auth::credential::verify_password(&req.password, &record.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        log_failed_login(&state, &req.username, "invalid_credentials");
        return Err(AppError::unauthorized());
    }

    let permissions = get_default_permissions(record.role);
    let token = state
        .get_jwt_service()
        .generate_token(record.id, &record.username, record.role, &permissions)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    state.audit_service.log(AuditLogRequest {
        action: AuditAction::Login,
        resource_type: "auth".to_string(),
        resource_id: record.id.to_string(),
        operator_id: Some(record.id),
        operator_name: Some(record.name.clone()),
        details: serde_json::json!({"username": record.username}),
    });

    Ok(Json(LoginResponse {
        token,
        user: record.into(),
    }))
}

fn log_failed_login(state: &ServerState, username: &str, reason: &str) {
    tracing::warn!(username = %username, reason = %reason, "Login failed");
    state.audit_service.log(AuditLogRequest {
        action: AuditAction::Login,
        resource_type: "auth".to_string(),
        resource_id: format!("username:{username}"),
        operator_id: None,
        operator_name: None,
        details: serde_json::json!({"reason": reason}),
    });
}

/// GET /api/auth/me - 当前登录用户
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<StaffPublic>, AppError> {
    let record = staff::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff {}", current_user.id)))?;
    Ok(Json(record.into()))
}
