//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`staff`] - 员工账号管理
//! - [`inventory`] - 库存管理
//! - [`products`] - 菜单商品与配方
//! - [`orders`] - 订单生命周期与收款
//! - [`product_returns`] - 退货工作流
//! - [`expenses`] - 支出台账
//! - [`reports`] - 报表汇总
//! - [`settings`] - 系统设置
//! - [`audit`] - 审计日志查询

pub mod audit;
pub mod auth;
pub mod expenses;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod product_returns;
pub mod products;
pub mod reports;
pub mod settings;
pub mod staff;
