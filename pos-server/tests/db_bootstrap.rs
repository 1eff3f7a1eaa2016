//! 数据库启动路径集成测试：文件库 + 迁移 + 种子幂等性

use pos_server::db::repository::settings;
use pos_server::db::{DbService, seed};

#[tokio::test]
async fn bootstrap_creates_schema_and_seeds_once() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("pos.db");

    let db = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    seed::run(&db.pool).await.unwrap();
    // 再跑一次不会重复建账号
    seed::run(&db.pool).await.unwrap();

    let staff_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(staff_count, 1);

    let charges = settings::get_charges(&db.pool).await.unwrap();
    assert_eq!(charges.tax_rate, 0.16);
    assert_eq!(charges.service_charge_rate, 0.10);

    // 重新打开同一个文件库，schema 已就位
    drop(db);
    let reopened = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    let staff_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(&reopened.pool)
        .await
        .unwrap();
    assert_eq!(staff_count, 1);
}
