use crate::utils::error::{Result, TradeError};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::net::SocketAddr;

/// 十位數、兩位小數 (與資料表欄位定義一致)
pub const MONEY_MAX_DIGITS: u32 = 10;
pub const MONEY_DECIMAL_PLACES: u32 = 2;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TradeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TradeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| TradeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(TradeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TradeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// 以下為請求內容的欄位檢查，錯誤一律回報為 Validation

pub fn validate_non_empty(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TradeError::validation(
            field_name,
            "This field may not be blank",
        ));
    }
    Ok(())
}

pub fn validate_max_length(field_name: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(TradeError::validation(
            field_name,
            format!("Ensure this field has no more than {} characters", max),
        ));
    }
    Ok(())
}

pub fn validate_optional_length(field_name: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) => validate_max_length(field_name, v, max),
        None => Ok(()),
    }
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    validate_max_length(field_name, value, 254)?;
    if !EMAIL_RE.is_match(value) {
        return Err(TradeError::validation(
            field_name,
            "Enter a valid email address",
        ));
    }
    Ok(())
}

/// 金額欄位：非負、最多兩位小數、整數部分最多八位
pub fn validate_money(field_name: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TradeError::validation(
            field_name,
            "Ensure this value is greater than or equal to 0",
        ));
    }

    if value.normalize().scale() > MONEY_DECIMAL_PLACES {
        return Err(TradeError::validation(
            field_name,
            format!(
                "Ensure that there are no more than {} decimal places",
                MONEY_DECIMAL_PLACES
            ),
        ));
    }

    let limit = Decimal::from(10i64.pow(MONEY_MAX_DIGITS - MONEY_DECIMAL_PLACES));
    if value >= limit {
        return Err(TradeError::validation(
            field_name,
            format!(
                "Ensure that there are no more than {} digits in total",
                MONEY_MAX_DIGITS
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("bind_address", "127.0.0.1:8000").is_ok());
        assert!(validate_socket_addr("bind_address", "0.0.0.0:0").is_ok());
        assert!(validate_socket_addr("bind_address", "localhost").is_err());
        assert!(validate_socket_addr("bind_address", "").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("request_timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("request_timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "sales@acme.example").is_ok());
        assert!(validate_email("email", "first.last+tag@sub.example.org").is_ok());
        assert!(validate_email("email", "no-at-sign").is_err());
        assert!(validate_email("email", "user@nodot").is_err());
        assert!(validate_email("email", "").is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money("debt", Decimal::ZERO).is_ok());
        assert!(validate_money("debt", Decimal::from_str("99999999.99").unwrap()).is_ok());
        assert!(validate_money("debt", Decimal::from_str("10.50").unwrap()).is_ok());
        assert!(validate_money("debt", Decimal::from_str("100000000").unwrap()).is_err());
        assert!(validate_money("debt", Decimal::from_str("1.005").unwrap()).is_err());
        assert!(validate_money("debt", Decimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn test_validate_lengths() {
        assert!(validate_max_length("city", "Berlin", 50).is_ok());
        assert!(validate_max_length("house_number", "12345678901", 10).is_err());
        assert!(validate_optional_length("street", None, 50).is_ok());
        assert!(validate_non_empty("name", "   ").is_err());
    }
}
