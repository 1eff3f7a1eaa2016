//! 报表聚合集成测试
//!
//! 聚合只统计 COMPLETED 的订单/付款，空区间一律回落为 0。

mod common;

use common::*;
use pos_server::db::repository::{inventory, order, report};
use shared::models::{InventoryItemCreate, InventoryType, PaymentCreate, PaymentMethod, ProductType};

const RANGE_ALL: (i64, i64) = (0, i64::MAX);

#[tokio::test]
async fn empty_range_reports_zeros() {
    let pool = test_pool().await;

    let summary = report::sales_summary(&pool, RANGE_ALL.0, RANGE_ALL.1)
        .await
        .unwrap();
    assert_eq!(summary.order_count, 0);
    assert_eq!(summary.gross_sales, 0.0);
    assert_eq!(summary.tax_total, 0.0);
    assert_eq!(summary.service_charge_total, 0.0);
    assert_eq!(summary.discount_total, 0.0);

    assert!(report::sales_by_staff(&pool, RANGE_ALL.0, RANGE_ALL.1)
        .await
        .unwrap()
        .is_empty());
    assert!(report::payments_by_method(&pool, RANGE_ALL.0, RANGE_ALL.1)
        .await
        .unwrap()
        .is_empty());

    let health = report::stock_health(&pool).await.unwrap();
    assert_eq!(
        (health.ok_count, health.low_count, health.out_count),
        (0, 0, 0)
    );
}

/// 只有 COMPLETED 订单进入销售汇总
#[tokio::test]
async fn summary_counts_completed_orders_only() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;

    let done = place_order(&pool, staff_id, vec![line(None, "Fish", 2, 100.0)]).await;
    complete_order(&pool, done.order.id).await.unwrap();

    // 第二单停在 PENDING，不计入
    place_order(&pool, staff_id, vec![line(None, "Salad", 1, 50.0)]).await;

    let summary = report::sales_summary(&pool, RANGE_ALL.0, RANGE_ALL.1)
        .await
        .unwrap();
    assert_eq!(summary.order_count, 1);
    assert_eq!(summary.gross_sales, 252.0); // 200 + 16% + 10%
    assert_eq!(summary.tax_total, 32.0);
    assert_eq!(summary.service_charge_total, 20.0);

    let by_staff = report::sales_by_staff(&pool, RANGE_ALL.0, RANGE_ALL.1)
        .await
        .unwrap();
    assert_eq!(by_staff.len(), 1);
    assert_eq!(by_staff[0].staff_id, staff_id);
    assert_eq!(by_staff[0].order_count, 1);
    assert_eq!(by_staff[0].total_sales, 252.0);
}

/// 跨午夜完成的订单按完成时间归期，不按下单时间
#[tokio::test]
async fn completed_orders_attributed_to_completion_time() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;

    let detail = place_order(&pool, staff_id, vec![line(None, "Fish", 1, 100.0)]).await;
    complete_order(&pool, detail.order.id).await.unwrap();

    // 把完成时间挪到两天后 (模拟创建与完成跨日)
    let created_at = detail.order.created_at;
    let two_days = 2 * 24 * 3600 * 1000;
    sqlx::query("UPDATE orders SET completed_at = ? WHERE id = ?")
        .bind(created_at + two_days)
        .bind(detail.order.id)
        .execute(&pool)
        .await
        .unwrap();

    // 下单日的区间不再包含这单
    let creation_day = report::sales_summary(&pool, 0, created_at + 1)
        .await
        .unwrap();
    assert_eq!(creation_day.order_count, 0);

    // 完成日的区间包含
    let completion_day = report::sales_summary(&pool, created_at + two_days, i64::MAX)
        .await
        .unwrap();
    assert_eq!(completion_day.order_count, 1);

    let by_staff = report::sales_by_staff(&pool, 0, created_at + 1).await.unwrap();
    assert!(by_staff.is_empty());
}

#[tokio::test]
async fn payments_grouped_by_method() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let detail = place_order(&pool, staff_id, vec![line(None, "Fish", 1, 100.0)]).await;

    order::add_payment(
        &pool,
        detail.order.id,
        PaymentCreate {
            method: PaymentMethod::Cash,
            amount: 50.0,
        },
    )
    .await
    .unwrap();
    order::add_payment(
        &pool,
        detail.order.id,
        PaymentCreate {
            method: PaymentMethod::Cash,
            amount: 26.0,
        },
    )
    .await
    .unwrap();
    order::add_payment(
        &pool,
        detail.order.id,
        PaymentCreate {
            method: PaymentMethod::Card,
            amount: 50.0,
        },
    )
    .await
    .unwrap();

    let rows = report::payments_by_method(&pool, RANGE_ALL.0, RANGE_ALL.1)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let cash = rows.iter().find(|r| r.method == "CASH").unwrap();
    assert_eq!(cash.payment_count, 2);
    assert_eq!(cash.total_amount, 76.0);
    let card = rows.iter().find(|r| r.method == "CARD").unwrap();
    assert_eq!(card.payment_count, 1);
    assert_eq!(card.total_amount, 50.0);
}

/// FOOD / BAR 营收拆分；无商品关联的自定义行不参与
#[tokio::test]
async fn revenue_split_by_product_type() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let pizza = seed_product(&pool, "Pizza", ProductType::Food, 12.0, vec![]).await;
    let beer = seed_product(&pool, "Beer", ProductType::Bar, 4.0, vec![]).await;

    let detail = place_order(
        &pool,
        staff_id,
        vec![
            line(Some(pizza), "Pizza", 2, 12.0),
            line(Some(beer), "Beer", 1, 4.0),
            line(None, "Birthday Surprise", 1, 30.0),
        ],
    )
    .await;
    complete_order(&pool, detail.order.id).await.unwrap();

    let rows = report::revenue_split(&pool, RANGE_ALL.0, RANGE_ALL.1)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let food = rows.iter().find(|r| r.product_type == "FOOD").unwrap();
    assert_eq!(food.item_count, 1);
    assert_eq!(food.revenue, 24.0);
    let bar = rows.iter().find(|r| r.product_type == "BAR").unwrap();
    assert_eq!(bar.item_count, 1);
    assert_eq!(bar.revenue, 4.0);
}

#[tokio::test]
async fn margins_default_to_zero_without_selling_price() {
    let pool = test_pool().await;
    // 买 5 卖 10 → 毛利率 0.5
    seed_item(&pool, "Steak", 10.0, 2.0).await;
    // 没有售价的内部物料 → 毛利率 0
    inventory::create(
        &pool,
        InventoryItemCreate {
            name: "Napkins".to_string(),
            unit: "pack".to_string(),
            current_stock: 50.0,
            minimum_stock: 5.0,
            buying_price: 2.0,
            selling_price: 0.0,
            inventory_type: InventoryType::Housekeeping,
        },
    )
    .await
    .unwrap();

    let rows = report::item_margins(&pool).await.unwrap();
    assert_eq!(rows.len(), 2);
    let steak = rows.iter().find(|r| r.name == "Steak").unwrap();
    assert_eq!(steak.margin, 0.5);
    let napkins = rows.iter().find(|r| r.name == "Napkins").unwrap();
    assert_eq!(napkins.margin, 0.0);
}

#[tokio::test]
async fn stock_health_buckets_items() {
    let pool = test_pool().await;
    seed_item(&pool, "Plenty", 10.0, 2.0).await; // ok
    seed_item(&pool, "Running Low", 1.0, 2.0).await; // low
    seed_item(&pool, "Gone", 0.0, 2.0).await; // out

    let health = report::stock_health(&pool).await.unwrap();
    assert_eq!(health.ok_count, 1);
    assert_eq!(health.low_count, 1);
    assert_eq!(health.out_count, 1);
}
