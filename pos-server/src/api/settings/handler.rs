//! Settings API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};

use crate::audit::{AuditAction, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::settings;
use crate::utils::AppResult;
use shared::models::{SettingsUpdate, SettingsView};

const RESOURCE: &str = "settings";

/// GET /api/settings
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<SettingsView>> {
    let view = settings::get_view(&state.pool).await?;
    Ok(Json(view))
}

/// PUT /api/settings - 部分更新 (upsert)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<SettingsView>> {
    let view = settings::update(&state.pool, payload).await?;

    audit_log!(
        state.audit_service,
        AuditAction::SettingsUpdate,
        RESOURCE,
        "pos_setting",
        current_user,
        create_snapshot(&view)
    );
    Ok(Json(view))
}
