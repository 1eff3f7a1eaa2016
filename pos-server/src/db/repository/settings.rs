//! Settings Repository
//!
//! pos_setting 读写。读取缺失的键回落到编译期默认值，
//! 所以空库也能直接计算订单金额。

use super::RepoResult;
use shared::models::{
    ChargesConfig, DEFAULT_CURRENCY, SETTING_CURRENCY, SETTING_SERVICE_CHARGE_RATE,
    SETTING_TAX_RATE, SettingsUpdate, SettingsView,
};
use sqlx::SqlitePool;

async fn get_value(pool: &SqlitePool, key: &str) -> RepoResult<Option<String>> {
    let row: Option<String> = sqlx::query_scalar("SELECT value FROM pos_setting WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

fn parse_rate(raw: Option<String>, default: f64) -> f64 {
    raw.and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

/// Charge rates injected into the totals computation
pub async fn get_charges(pool: &SqlitePool) -> RepoResult<ChargesConfig> {
    let defaults = ChargesConfig::default();
    let tax = get_value(pool, SETTING_TAX_RATE).await?;
    let service = get_value(pool, SETTING_SERVICE_CHARGE_RATE).await?;
    Ok(ChargesConfig {
        tax_rate: parse_rate(tax, defaults.tax_rate),
        service_charge_rate: parse_rate(service, defaults.service_charge_rate),
    })
}

pub async fn get_view(pool: &SqlitePool) -> RepoResult<SettingsView> {
    let charges = get_charges(pool).await?;
    let currency = get_value(pool, SETTING_CURRENCY)
        .await?
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    Ok(SettingsView {
        tax_rate: charges.tax_rate,
        service_charge_rate: charges.service_charge_rate,
        currency,
    })
}

async fn upsert(pool: &SqlitePool, key: &str, value: &str) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO pos_setting (key, value, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
    )
    .bind(key)
    .bind(value)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, data: SettingsUpdate) -> RepoResult<SettingsView> {
    if let Some(rate) = data.tax_rate {
        validate_rate(rate, "tax_rate")?;
        upsert(pool, SETTING_TAX_RATE, &rate.to_string()).await?;
    }
    if let Some(rate) = data.service_charge_rate {
        validate_rate(rate, "service_charge_rate")?;
        upsert(pool, SETTING_SERVICE_CHARGE_RATE, &rate.to_string()).await?;
    }
    if let Some(currency) = &data.currency {
        if currency.trim().is_empty() {
            return Err(super::RepoError::Validation(
                "currency must not be blank".into(),
            ));
        }
        upsert(pool, SETTING_CURRENCY, currency.trim()).await?;
    }
    get_view(pool).await
}

fn validate_rate(rate: f64, field: &str) -> RepoResult<()> {
    if !rate.is_finite() || rate < 0.0 || rate > 1.0 {
        return Err(super::RepoError::Validation(format!(
            "{field} must be a fraction between 0 and 1, got {rate}"
        )));
    }
    Ok(())
}
