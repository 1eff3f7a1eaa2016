//! Permission Definitions
//!
//! 简化的 RBAC：
//! - 基础操作 (下单、状态流转、收款) 登录即可，不需要额外权限
//! - 管理类操作按模块授权
//! - 库存可见范围由角色静态映射决定，在 API 边界过滤

use shared::models::{InventoryType, StaffRole};

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[
    "staff:manage",     // 员工账号管理
    "inventory:manage", // 库存增删改与手工调整
    "products:manage",  // 菜单与配方管理
    "returns:manage",   // 退货登记/撤销
    "expenses:manage",  // 支出台账
    "reports:view",     // 报表查看
    "settings:manage",  // 税率/服务费/币种
    "audit:view",       // 审计日志查看
];

const MANAGER_PERMISSIONS: &[&str] = &[
    "inventory:manage",
    "products:manage",
    "returns:manage",
    "expenses:manage",
    "reports:view",
    "settings:manage",
    "audit:view",
];

const CASHIER_PERMISSIONS: &[&str] = &["returns:manage", "reports:view"];

const RECEPTIONIST_PERMISSIONS: &[&str] = &["reports:view"];

/// Default permissions per role. Admin roles carry the "all" marker.
pub fn get_default_permissions(role: StaffRole) -> Vec<String> {
    let perms: &[&str] = match role {
        StaffRole::Superadmin | StaffRole::Admin => &["all"],
        StaffRole::Manager => MANAGER_PERMISSIONS,
        StaffRole::Cashier => CASHIER_PERMISSIONS,
        StaffRole::Receptionist => RECEPTIONIST_PERMISSIONS,
        StaffRole::Waiter
        | StaffRole::KitchenStaff
        | StaffRole::Delivery
        | StaffRole::Housekeeping => &[],
    };
    perms.iter().map(|s| s.to_string()).collect()
}

const ALL_INVENTORY_TYPES: &[InventoryType] = &[
    InventoryType::Kitchen,
    InventoryType::Bar,
    InventoryType::Housekeeping,
    InventoryType::Minibar,
];

/// Static role to inventory-category visibility map, applied as a query
/// filter at the API boundary.
pub fn allowed_inventory_types(role: StaffRole) -> &'static [InventoryType] {
    match role {
        StaffRole::Superadmin | StaffRole::Admin | StaffRole::Manager => ALL_INVENTORY_TYPES,
        StaffRole::Cashier | StaffRole::Waiter | StaffRole::Delivery => {
            &[InventoryType::Kitchen, InventoryType::Bar]
        }
        StaffRole::KitchenStaff => &[InventoryType::Kitchen],
        StaffRole::Receptionist => &[InventoryType::Minibar],
        StaffRole::Housekeeping => &[InventoryType::Housekeeping, InventoryType::Minibar],
    }
}

pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission) || permission == "all" || permission.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kitchen_staff_sees_only_kitchen() {
        assert_eq!(
            allowed_inventory_types(StaffRole::KitchenStaff),
            &[InventoryType::Kitchen]
        );
    }

    #[test]
    fn managers_see_everything() {
        assert_eq!(allowed_inventory_types(StaffRole::Manager).len(), 4);
    }

    #[test]
    fn admin_roles_get_all_marker() {
        assert_eq!(get_default_permissions(StaffRole::Admin), vec!["all"]);
    }
}
