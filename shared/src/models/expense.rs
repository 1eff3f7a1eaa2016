//! Expense Model (独立支出台账，无跨实体变更)

use serde::{Deserialize, Serialize};

use crate::models::PaymentMethod;

/// Expense entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    /// Business date (YYYY-MM-DD)
    pub expense_date: String,
    pub category: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    /// Unique when present
    pub receipt_number: Option<String>,
    pub note: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
}

/// Create expense payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub expense_date: String,
    pub category: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub receipt_number: Option<String>,
    pub note: Option<String>,
}

/// Update expense payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExpenseUpdate {
    pub expense_date: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub receipt_number: Option<String>,
    pub note: Option<String>,
}
