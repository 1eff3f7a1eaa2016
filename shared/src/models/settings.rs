//! Settings Model
//!
//! pos_setting 是 key/value 表；税率等通过类型化的 [`ChargesConfig`]
//! 注入订单金额计算，缺省时使用编译期默认值。

use serde::{Deserialize, Serialize};

/// One key/value setting row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PosSetting {
    pub key: String,
    pub value: String,
    pub updated_at: i64,
}

/// Typed charge configuration consumed by the totals computation.
///
/// Passed explicitly into `order_money` — never read from a hidden global,
/// so totals stay deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargesConfig {
    /// Fraction of subtotal, e.g. 0.16
    pub tax_rate: f64,
    /// Fraction of subtotal, e.g. 0.10
    pub service_charge_rate: f64,
}

impl Default for ChargesConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.16,
            service_charge_rate: 0.10,
        }
    }
}

/// Settings update payload (partial upsert)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub tax_rate: Option<f64>,
    pub service_charge_rate: Option<f64>,
    pub currency: Option<String>,
}

/// Settings view returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsView {
    pub tax_rate: f64,
    pub service_charge_rate: f64,
    pub currency: String,
}

pub const SETTING_TAX_RATE: &str = "tax_rate";
pub const SETTING_SERVICE_CHARGE_RATE: &str = "service_charge_rate";
pub const SETTING_CURRENCY: &str = "currency";
pub const DEFAULT_CURRENCY: &str = "EUR";
