//! Reporting Repository
//!
//! 只读汇总查询。空值一律 COALESCE 到 0，绝不让 NULL 进入算术。
//! 时间范围由调用方换算成 Unix 毫秒（营业时区在 handler 边界处理）。
//! 已完成订单的汇总按完成时间归期，而不是下单时间。

use super::RepoResult;
use serde::Serialize;
use sqlx::SqlitePool;

/// Headline figures for a date range, completed orders only
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesSummary {
    pub order_count: i64,
    pub gross_sales: f64,
    pub tax_total: f64,
    pub service_charge_total: f64,
    pub discount_total: f64,
}

/// Per-staff sales row (daily sales by staff)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StaffSalesRow {
    pub staff_id: i64,
    pub staff_name: String,
    pub order_count: i64,
    pub total_sales: f64,
}

/// Completed-payment totals grouped by method
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentMethodRow {
    pub method: String,
    pub payment_count: i64,
    pub total_amount: f64,
}

/// FOOD vs BAR revenue split over completed orders
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RevenueSplitRow {
    pub product_type: String,
    pub item_count: i64,
    pub revenue: f64,
}

/// Margin per inventory item; missing prices default to 0
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MarginRow {
    pub item_id: i64,
    pub name: String,
    pub inventory_type: String,
    pub buying_price: f64,
    pub selling_price: f64,
    pub margin: f64,
}

/// Stock health counts across active items
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockHealth {
    pub ok_count: i64,
    pub low_count: i64,
    pub out_count: i64,
}

pub async fn sales_summary(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<SalesSummary> {
    let row = sqlx::query_as::<_, SalesSummary>(
        "SELECT COUNT(*) AS order_count, \
         COALESCE(SUM(total_amount), 0.0) AS gross_sales, \
         COALESCE(SUM(tax_amount), 0.0) AS tax_total, \
         COALESCE(SUM(service_charge), 0.0) AS service_charge_total, \
         COALESCE(SUM(discount_amount), 0.0) AS discount_total \
         FROM orders \
         WHERE status = 'COMPLETED' \
         AND COALESCE(completed_at, created_at) >= ? AND COALESCE(completed_at, created_at) < ?",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn sales_by_staff(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<StaffSalesRow>> {
    let rows = sqlx::query_as::<_, StaffSalesRow>(
        "SELECT s.id AS staff_id, s.name AS staff_name, \
         COUNT(o.id) AS order_count, \
         COALESCE(SUM(o.total_amount), 0.0) AS total_sales \
         FROM orders o \
         JOIN staff s ON s.id = o.created_by \
         WHERE o.status = 'COMPLETED' \
         AND COALESCE(o.completed_at, o.created_at) >= ? AND COALESCE(o.completed_at, o.created_at) < ? \
         GROUP BY s.id, s.name \
         ORDER BY total_sales DESC",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn payments_by_method(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<PaymentMethodRow>> {
    let rows = sqlx::query_as::<_, PaymentMethodRow>(
        "SELECT p.method AS method, COUNT(*) AS payment_count, \
         COALESCE(SUM(p.amount), 0.0) AS total_amount \
         FROM payment p \
         WHERE p.status = 'COMPLETED' AND p.created_at >= ? AND p.created_at < ? \
         GROUP BY p.method \
         ORDER BY total_amount DESC",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Custom items (no product link) are excluded: they have no FOOD/BAR class
pub async fn revenue_split(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<RevenueSplitRow>> {
    let rows = sqlx::query_as::<_, RevenueSplitRow>(
        "SELECT pr.product_type AS product_type, \
         COUNT(oi.id) AS item_count, \
         COALESCE(SUM(oi.total_price), 0.0) AS revenue \
         FROM order_item oi \
         JOIN orders o ON o.id = oi.order_id \
         JOIN product pr ON pr.id = oi.product_id \
         WHERE o.status = 'COMPLETED' \
         AND COALESCE(o.completed_at, o.created_at) >= ? AND COALESCE(o.completed_at, o.created_at) < ? \
         GROUP BY pr.product_type \
         ORDER BY revenue DESC",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn item_margins(pool: &SqlitePool) -> RepoResult<Vec<MarginRow>> {
    let rows = sqlx::query_as::<_, MarginRow>(
        "SELECT id AS item_id, name, inventory_type, \
         COALESCE(buying_price, 0.0) AS buying_price, \
         COALESCE(selling_price, 0.0) AS selling_price, \
         CASE WHEN COALESCE(selling_price, 0.0) > 0 \
              THEN (COALESCE(selling_price, 0.0) - COALESCE(buying_price, 0.0)) / selling_price \
              ELSE 0.0 END AS margin \
         FROM inventory_item \
         WHERE is_active = 1 \
         ORDER BY margin DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn stock_health(pool: &SqlitePool) -> RepoResult<StockHealth> {
    let row = sqlx::query_as::<_, StockHealth>(
        "SELECT \
         COALESCE(SUM(CASE WHEN current_stock > minimum_stock THEN 1 ELSE 0 END), 0) AS ok_count, \
         COALESCE(SUM(CASE WHEN current_stock <= minimum_stock AND current_stock > 0 THEN 1 ELSE 0 END), 0) AS low_count, \
         COALESCE(SUM(CASE WHEN current_stock <= 0 THEN 1 ELSE 0 END), 0) AS out_count \
         FROM inventory_item WHERE is_active = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}
