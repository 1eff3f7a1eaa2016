//! 退货流程集成测试
//!
//! 退货与库存是对称账本：创建加库存，删除减库存，编辑按差额调整。
//! 已被消耗的回补量不允许再收回（Conflict）。

mod common;

use common::*;
use pos_server::db::repository::{RepoError, inventory, product_return};
use shared::models::{ProductReturnCreate, ProductReturnUpdate, ReturnReason};

fn return_of(item_id: i64, quantity: f64) -> ProductReturnCreate {
    ProductReturnCreate {
        order_id: None,
        inventory_item_id: item_id,
        quantity_returned: quantity,
        reason: ReturnReason::Damaged,
        refund_amount: Some(0.0),
    }
}

#[tokio::test]
async fn create_then_delete_restores_stock_exactly() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let item = seed_item(&pool, "Olive Oil", 10.0, 2.0).await;

    let ret = product_return::create(&pool, return_of(item, 2.0), staff_id)
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, item).await, 12.0);

    product_return::delete(&pool, ret.id).await.unwrap();
    assert_eq!(stock_of(&pool, item).await, 10.0);
    assert!(product_return::find_by_id(&pool, ret.id)
        .await
        .unwrap()
        .is_none());
}

/// 编辑数量只按差额动库存，从不重放全量
#[tokio::test]
async fn quantity_edits_apply_the_delta() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let item = seed_item(&pool, "Butter", 10.0, 2.0).await;

    let ret = product_return::create(&pool, return_of(item, 2.0), staff_id)
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, item).await, 12.0);

    // 2 → 5：差额 +3
    let ret = product_return::update(
        &pool,
        ret.id,
        ProductReturnUpdate {
            quantity_returned: Some(5.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(ret.quantity_returned, 5.0);
    assert_eq!(stock_of(&pool, item).await, 15.0);

    // 5 → 1：差额 −4
    let ret = product_return::update(
        &pool,
        ret.id,
        ProductReturnUpdate {
            quantity_returned: Some(1.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(ret.quantity_returned, 1.0);
    assert_eq!(stock_of(&pool, item).await, 11.0);
}

/// 回补量已被消耗后，删除和缩小都拿不回库存
#[tokio::test]
async fn consumed_restock_cannot_be_taken_back() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let item = seed_item(&pool, "Milk", 0.0, 1.0).await;

    let ret = product_return::create(&pool, return_of(item, 5.0), staff_id)
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, item).await, 5.0);

    // 回补的 5 个里已经用掉 4 个
    inventory::adjust_stock(&pool, item, -4.0).await.unwrap();
    assert_eq!(stock_of(&pool, item).await, 1.0);

    let err = product_return::delete(&pool, ret.id).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let err = product_return::update(
        &pool,
        ret.id,
        ProductReturnUpdate {
            quantity_returned: Some(1.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // 失败路径不动任何状态
    assert_eq!(stock_of(&pool, item).await, 1.0);
    let ret = product_return::find_by_id(&pool, ret.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ret.quantity_returned, 5.0);
}

/// 未给退款金额时沿用历史回退公式 current_stock × quantity
#[tokio::test]
async fn refund_fallback_uses_legacy_formula() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let item = seed_item(&pool, "Sugar", 10.0, 2.0).await;

    let ret = product_return::create(
        &pool,
        ProductReturnCreate {
            order_id: None,
            inventory_item_id: item,
            quantity_returned: 2.0,
            reason: ReturnReason::Expired,
            refund_amount: None,
        },
        staff_id,
    )
    .await
    .unwrap();

    // 入账前库存 10 × 数量 2
    assert_eq!(ret.refund_amount, 20.0);
    assert_eq!(stock_of(&pool, item).await, 12.0);
}

#[tokio::test]
async fn rejects_invalid_quantities_and_refunds() {
    let pool = test_pool().await;
    let staff_id = seed_staff(&pool).await;
    let item = seed_item(&pool, "Salt", 10.0, 2.0).await;

    let err = product_return::create(&pool, return_of(item, 0.0), staff_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = product_return::create(
        &pool,
        ProductReturnCreate {
            refund_amount: Some(-1.0),
            ..return_of(item, 1.0)
        },
        staff_id,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = product_return::create(&pool, return_of(999, 1.0), staff_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    // 失败路径不动库存
    assert_eq!(stock_of(&pool, item).await, 10.0);
}
