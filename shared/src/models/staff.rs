//! Staff Model (员工账号)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Staff role (closed set, drives permissions and inventory visibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StaffRole {
    Superadmin,
    Admin,
    Manager,
    Cashier,
    Waiter,
    KitchenStaff,
    Delivery,
    Receptionist,
    Housekeeping,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "SUPERADMIN",
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Cashier => "CASHIER",
            Self::Waiter => "WAITER",
            Self::KitchenStaff => "KITCHEN_STAFF",
            Self::Delivery => "DELIVERY",
            Self::Receptionist => "RECEPTIONIST",
            Self::Housekeeping => "HOUSEKEEPING",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown staff role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for StaffRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPERADMIN" => Ok(Self::Superadmin),
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "CASHIER" => Ok(Self::Cashier),
            "WAITER" => Ok(Self::Waiter),
            "KITCHEN_STAFF" => Ok(Self::KitchenStaff),
            "DELIVERY" => Ok(Self::Delivery),
            "RECEPTIONIST" => Ok(Self::Receptionist),
            "HOUSEKEEPING" => Ok(Self::Housekeeping),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff entity
///
/// `password_hash` never leaves the server boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    /// Employee identifier (badge number), unique
    pub employee_code: String,
    pub name: String,
    pub role: StaffRole,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Optional PIN for quick terminal unlock
    #[serde(skip_serializing)]
    pub pin: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub employee_code: String,
    pub name: String,
    pub role: StaffRole,
    pub username: String,
    pub password: String,
    pub pin: Option<String>,
}

/// Update staff payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub role: Option<StaffRole>,
    pub password: Option<String>,
    pub pin: Option<String>,
    pub is_active: Option<bool>,
}

/// Public staff view (safe for list/detail responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffPublic {
    pub id: i64,
    pub employee_code: String,
    pub name: String,
    pub role: StaffRole,
    pub username: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Staff> for StaffPublic {
    fn from(s: Staff) -> Self {
        Self {
            id: s.id,
            employee_code: s.employee_code,
            name: s.name,
            role: s.role,
            username: s.username,
            is_active: s.is_active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
