//! 订单生命周期集成测试
//!
//! 覆盖：金额汇总、状态机、完成边的库存扣减（含幂等重试）、
//! 库存不足回滚、分次付款的付款状态归集。

mod common;

use common::*;
use pos_server::db::repository::{RepoError, inventory, order};
use shared::models::{
    OrderItemStatus, OrderStatus, OrderType, PaymentCreate, PaymentMethod, PaymentStatus,
    RecipeLineInput,
};

/// 2 × 100 + 1 × 50，税 16%，服务费 10% → 250 / 40 / 25 / 315
#[tokio::test]
async fn totals_follow_configured_rates() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;

    let detail = place_order(
        &pool,
        staff_id,
        vec![
            line(None, "Grilled Fish", 2, 100.0),
            line(None, "House Salad", 1, 50.0),
        ],
    )
    .await;

    assert_eq!(detail.order.subtotal, 250.0);
    assert_eq!(detail.order.tax_amount, 40.0);
    assert_eq!(detail.order.service_charge, 25.0);
    assert_eq!(detail.order.discount_amount, 0.0);
    assert_eq!(detail.order.total_amount, 315.0);
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.order.payment_status, PaymentStatus::Pending);
    assert_eq!(detail.items.len(), 2);
}

#[tokio::test]
async fn status_machine_rejects_skips_and_backward_moves() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let detail = place_order(&pool, staff_id, vec![line(None, "Espresso", 1, 3.0)]).await;
    let id = detail.order.id;

    // PENDING → READY 跳级，拒绝
    let err = order::transition_status(&pool, id, OrderStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition { .. }));

    let o = order::transition_status(&pool, id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(o.status, OrderStatus::Confirmed);

    // 不允许回退
    let err = order::transition_status(&pool, id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition { .. }));

    // 同状态写入是幂等空操作
    let o = order::transition_status(&pool, id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(o.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn cancel_allowed_before_completion_only() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let detail = place_order(&pool, staff_id, vec![line(None, "Tea", 1, 2.0)]).await;
    let id = detail.order.id;

    let completed = complete_order(&pool, id).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.completed_at.is_some());

    let err = order::transition_status(&pool, id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition { .. }));
}

/// 完成时按 recipe 扣库存；重复完成是幂等空操作，只扣一次
#[tokio::test]
async fn completion_decrements_inventory_exactly_once() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let beans = seed_item(&pool, "Coffee Beans", 10.0, 2.0).await;
    let coffee = seed_product(
        &pool,
        "Coffee",
        shared::models::ProductType::Bar,
        4.0,
        vec![RecipeLineInput {
            inventory_item_id: beans,
            quantity_per_unit: 0.5,
        }],
    )
    .await;

    let detail = place_order(&pool, staff_id, vec![line(Some(coffee), "Coffee", 6, 4.0)]).await;
    let id = detail.order.id;

    complete_order(&pool, id).await.unwrap();
    assert_eq!(stock_of(&pool, beans).await, 7.0);

    // 重试同一个完成请求
    let again = order::transition_status(&pool, id, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(again.status, OrderStatus::Completed);
    assert_eq!(stock_of(&pool, beans).await, 7.0);
}

/// 库存不够时整个事务回滚：状态不变，库存不变
#[tokio::test]
async fn insufficient_stock_blocks_completion() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let flour = seed_item(&pool, "Flour", 3.0, 1.0).await;
    let pizza = seed_product(
        &pool,
        "Pizza",
        shared::models::ProductType::Food,
        12.0,
        vec![RecipeLineInput {
            inventory_item_id: flour,
            quantity_per_unit: 1.0,
        }],
    )
    .await;

    let detail = place_order(&pool, staff_id, vec![line(Some(pizza), "Pizza", 5, 12.0)]).await;
    let id = detail.order.id;

    let err = complete_order(&pool, id).await.unwrap_err();
    match err {
        RepoError::InsufficientStock { items } => assert_eq!(items, vec!["Flour".to_string()]),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    let o = order::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(o.status, OrderStatus::Ready);
    assert_eq!(stock_of(&pool, flour).await, 3.0);

    // 补货后同一个请求成功
    inventory::adjust_stock(&pool, flour, 4.0).await.unwrap();
    let o = order::transition_status(&pool, id, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(o.status, OrderStatus::Completed);
    assert_eq!(stock_of(&pool, flour).await, 2.0);
}

/// 咖啡豆场景：10 → 7 (不低) → 2 (低) → 退货 +4 → 6 (不低)
#[tokio::test]
async fn low_stock_tracks_ledger_across_orders_and_returns() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let beans = inventory::create(
        &pool,
        shared::models::InventoryItemCreate {
            name: "Coffee Beans".to_string(),
            unit: "kg".to_string(),
            current_stock: 10.0,
            minimum_stock: 5.0,
            buying_price: 8.0,
            selling_price: 14.0,
            inventory_type: shared::models::InventoryType::Bar,
        },
    )
    .await
    .unwrap()
    .id;
    let coffee = seed_product(
        &pool,
        "Coffee",
        shared::models::ProductType::Bar,
        3.0,
        vec![RecipeLineInput {
            inventory_item_id: beans,
            quantity_per_unit: 1.0,
        }],
    )
    .await;

    let first = place_order(&pool, staff_id, vec![line(Some(coffee), "Coffee", 3, 3.0)]).await;
    complete_order(&pool, first.order.id).await.unwrap();
    assert_eq!(stock_of(&pool, beans).await, 7.0);
    assert!(inventory::find_low_stock(&pool, None).await.unwrap().is_empty());

    let second = place_order(&pool, staff_id, vec![line(Some(coffee), "Coffee", 5, 3.0)]).await;
    complete_order(&pool, second.order.id).await.unwrap();
    assert_eq!(stock_of(&pool, beans).await, 2.0);
    let low = inventory::find_low_stock(&pool, None).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, beans);

    // 退货 4 个单位回补库存
    pos_server::db::repository::product_return::create(
        &pool,
        shared::models::ProductReturnCreate {
            order_id: Some(second.order.id),
            inventory_item_id: beans,
            quantity_returned: 4.0,
            reason: shared::models::ReturnReason::WrongOrder,
            refund_amount: Some(12.0),
        },
        staff_id,
    )
    .await
    .unwrap();
    assert_eq!(stock_of(&pool, beans).await, 6.0);
    assert!(inventory::find_low_stock(&pool, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn split_payments_roll_up_to_paid() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let detail = place_order(
        &pool,
        staff_id,
        vec![
            line(None, "Grilled Fish", 2, 100.0),
            line(None, "House Salad", 1, 50.0),
        ],
    )
    .await;
    let id = detail.order.id;

    order::add_payment(
        &pool,
        id,
        PaymentCreate {
            method: PaymentMethod::Cash,
            amount: 100.0,
        },
    )
    .await
    .unwrap();
    let o = order::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(o.payment_status, PaymentStatus::Partial);

    order::add_payment(
        &pool,
        id,
        PaymentCreate {
            method: PaymentMethod::Card,
            amount: 215.0,
        },
    )
    .await
    .unwrap();
    let o = order::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(o.payment_status, PaymentStatus::Paid);

    let payments = order::find_payments(&pool, id).await.unwrap();
    assert_eq!(payments.len(), 2);
}

#[tokio::test]
async fn cancelled_orders_reject_payments() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let detail = place_order(&pool, staff_id, vec![line(None, "Tea", 1, 2.0)]).await;
    let id = detail.order.id;

    order::transition_status(&pool, id, OrderStatus::Cancelled)
        .await
        .unwrap();

    let err = order::add_payment(
        &pool,
        id,
        PaymentCreate {
            method: PaymentMethod::Cash,
            amount: 2.0,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // 拒绝路径零残留：没有付款行，付款状态不变
    assert!(order::find_payments(&pool, id).await.unwrap().is_empty());
    let o = order::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(o.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn item_status_moves_forward_only() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let detail = place_order(&pool, staff_id, vec![line(None, "Soup", 1, 6.0)]).await;
    let order_id = detail.order.id;
    let item_id = detail.items[0].id;

    // PENDING → SERVED 跳级
    let err = order::transition_item_status(&pool, order_id, item_id, OrderItemStatus::Served)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition { .. }));

    for status in [
        OrderItemStatus::Preparing,
        OrderItemStatus::Ready,
        OrderItemStatus::Served,
    ] {
        let item = order::transition_item_status(&pool, order_id, item_id, status)
            .await
            .unwrap();
        assert_eq!(item.status, status);
    }

    let err = order::transition_item_status(&pool, order_id, item_id, OrderItemStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition { .. }));
}

#[tokio::test]
async fn location_must_match_order_type() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let charges = shared::models::ChargesConfig::default();
    let (lines, totals) =
        pos_server::order_money::price_order(&[line(None, "Tea", 1, 2.0)], &charges, 0.0).unwrap();

    // 堂食订单必须带桌号
    let err = order::create(
        &pool,
        order::OrderInsert {
            order_type: OrderType::DineIn,
            table_number: None,
            room_number: None,
            lines: lines.clone(),
            totals: totals.clone(),
            created_by: staff_id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // 客房送餐不能带桌号
    let err = order::create(
        &pool,
        order::OrderInsert {
            order_type: OrderType::RoomService,
            table_number: Some("T1".to_string()),
            room_number: Some("501".to_string()),
            lines,
            totals,
            created_by: staff_id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
