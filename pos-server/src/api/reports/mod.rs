//! Reports API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/sales-summary", get(handler::sales_summary))
        .route("/sales-by-staff", get(handler::sales_by_staff))
        .route("/payment-methods", get(handler::payment_methods))
        .route("/revenue-split", get(handler::revenue_split))
        .route("/item-margins", get(handler::item_margins))
        .route("/stock-health", get(handler::stock_health))
        .layer(middleware::from_fn(require_permission("reports:view")))
}
